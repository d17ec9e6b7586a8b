//! HTTP + WebSocket API.
//!
//! JSON endpoints under `/api/` and the alert change feed at
//! `/ws/feed`. The router is composable — `api_router()` returns a
//! `Router` that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;
pub mod websocket;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ApiServerInfo};
pub use types::ApiContext;
