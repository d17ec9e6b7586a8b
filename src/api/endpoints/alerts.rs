//! Alert endpoints.
//!
//! `GET    /api/alerts`     — all alerts, newest first
//! `POST   /api/alerts`     — insert one alert, broadcast to the feed
//! `DELETE /api/alerts/:id` — resolve ("Done"): destructive delete

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::feed::FeedEvent;
use crate::models::{Alert, AlertDraft};

/// `GET /api/alerts` — bulk load for a mounting dashboard.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Alert>>, ApiError> {
    let conn = ctx.state.open_db()?;
    let alerts = repository::list_alerts(&conn)?;
    Ok(Json(alerts))
}

/// `POST /api/alerts` — submit one alert.
///
/// The server assigns id and timestamp, inserts the row, then
/// broadcasts `AlertInserted` to every connected subscriber.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(draft): Json<AlertDraft>,
) -> Result<Json<Alert>, ApiError> {
    let alert = Alert::from_draft(draft);

    let conn = ctx.state.open_db()?;
    repository::insert_alert(&conn, &alert)?;

    // Broadcast only after the row is durably inserted.
    let delivered = ctx
        .state
        .feed()
        .lock()
        .map_err(|_| ApiError::Internal("feed lock".into()))?
        .broadcast(FeedEvent::AlertInserted {
            alert: alert.clone(),
        });

    tracing::info!(alert_id = %alert.id, delivered, "alert created");
    Ok(Json(alert))
}

/// `DELETE /api/alerts/:id` — resolve an alert.
///
/// Deleting an id that is already gone succeeds: a doctor pressing
/// "Done" twice (or two doctors racing) must not see an error.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.state.open_db()?;
    repository::delete_alert(&conn, &id)?;

    tracing::info!(alert_id = %id, "alert resolved");
    Ok(StatusCode::NO_CONTENT)
}
