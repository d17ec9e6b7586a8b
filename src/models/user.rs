use serde::{Deserialize, Serialize};

use super::enums::Role;

/// Profile row created at sign-up and read once at login to decide
/// post-login routing. No update or delete path exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub role: Role,
}
