//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum
//! server. JSON endpoints are nested under `/api/`; the WebSocket
//! change feed lives at `/ws/feed`. A permissive CORS layer covers
//! browser-hosted dashboards.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::api::websocket;
use crate::state::ServiceState;

/// Build the API router.
pub fn api_router(state: Arc<ServiceState>) -> Router {
    build_router(ApiContext::new(state))
}

/// Build router from a pre-constructed `ApiContext`.
///
/// Used by integration tests that need access to the shared state
/// (e.g. to inspect the feed hub).
#[cfg(test)]
pub(crate) fn api_router_with_ctx(ctx: ApiContext) -> Router {
    build_router(ctx)
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/auth/signup", post(endpoints::auth::signup))
        .route("/auth/login", post(endpoints::auth::login))
        .route("/users", post(endpoints::users::create))
        .route("/users/:email", get(endpoints::users::lookup))
        .route(
            "/alerts",
            get(endpoints::alerts::list).post(endpoints::alerts::create),
        )
        .route("/alerts/:id", delete(endpoints::alerts::remove))
        .with_state(ctx.clone());

    let ws_routes = Router::new()
        .route("/ws/feed", get(websocket::feed_upgrade))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .merge(ws_routes)
        .layer(CorsLayer::permissive())
}
