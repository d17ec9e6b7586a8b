//! Wardbell — hospital ward alerting.
//!
//! Patients raise a bed/room alert; doctors watch a live dashboard
//! fed by a WebSocket change feed and acknowledge ("Coming") or
//! resolve ("Done") alerts. The crate carries both sides:
//!
//! - the backend service: axum API + SQLite store + feed hub
//! - the client library: submission form, session + role gate,
//!   feed subscription, and the dashboard synchronizer

pub mod api; // HTTP + WebSocket API
pub mod auth; // Password hashing
pub mod client; // Backend client, session, router, form, feed subscription
pub mod config;
pub mod dashboard; // Alert lifecycle synchronizer
pub mod db;
pub mod feed; // Change feed events + subscriber hub
pub mod models;
pub mod state; // Shared service state
