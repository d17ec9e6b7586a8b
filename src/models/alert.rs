use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One pending request for staff attention. The store row is the sole
/// source of truth; dashboards hold disposable projections of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Assigned by the server on insert; immutable.
    pub id: Uuid,
    pub name: String,
    pub bed_number: String,
    pub room_number: String,
    pub message: String,
    /// Assigned by the server on insert; drives descending display order.
    pub created_at: DateTime<Utc>,
}

/// Client-supplied alert fields, before the server assigns id + timestamp.
/// Doubles as the `POST /api/alerts` request body on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertDraft {
    pub name: String,
    pub bed_number: String,
    pub room_number: String,
    pub message: String,
}

impl Alert {
    /// Materialize a draft into a store row with server-assigned fields.
    pub fn from_draft(draft: AlertDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            bed_number: draft.bed_number,
            room_number: draft.room_number,
            message: draft.message,
            created_at: Utc::now(),
        }
    }
}
