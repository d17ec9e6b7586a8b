//! API endpoint handlers.
//!
//! One module per resource. Handlers open a database connection via
//! the shared context and convert store faults at the boundary.

pub mod alerts;
pub mod auth;
pub mod health;
pub mod users;
