//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub subscribers: usize,
    pub version: &'static str,
}

/// `GET /api/health` — liveness probe.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let subscribers = ctx
        .state
        .feed()
        .lock()
        .map_err(|_| ApiError::Internal("feed lock".into()))?
        .subscriber_count();

    Ok(Json(HealthResponse {
        status: "ok",
        subscribers,
        version: crate::config::APP_VERSION,
    }))
}
