//! Shared types for the API layer.

use std::sync::Arc;

use crate::state::ServiceState;

/// Shared context for all API routes and the WebSocket feed.
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<ServiceState>,
}

impl ApiContext {
    pub fn new(state: Arc<ServiceState>) -> Self {
        Self { state }
    }
}
