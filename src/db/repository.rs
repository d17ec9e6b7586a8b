//! Row CRUD for the three store tables.
//!
//! Free functions over a borrowed `Connection`, one module per table.

pub mod alert;
pub mod credential;
pub mod user;

pub use alert::*;
pub use credential::*;
pub use user::*;
