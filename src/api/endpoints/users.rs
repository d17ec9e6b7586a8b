//! User profile endpoints.
//!
//! `POST /api/users`        — insert the profile row (email + role)
//! `GET  /api/users/:email` — fetch the profile row for login routing

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use std::str::FromStr;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::{Role, User};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub role: String,
}

/// `POST /api/users` — create a profile row.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    if req.email.is_empty() {
        return Err(ApiError::BadRequest("Email is required".into()));
    }
    let role = Role::from_str(&req.role)?;

    let user = User {
        email: req.email,
        role,
    };

    let conn = ctx.state.open_db()?;
    repository::insert_user(&conn, &user).map_err(|e| match e {
        // Primary-key collision on email
        crate::db::DatabaseError::Sqlite(rusqlite::Error::SqliteFailure(f, _))
            if f.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            ApiError::EmailTaken
        }
        other => other.into(),
    })?;

    tracing::info!(email = %user.email, role = user.role.as_str(), "user profile created");
    Ok(Json(user))
}

/// `GET /api/users/:email` — fetch a profile row. Expects exactly one.
pub async fn lookup(
    State(ctx): State<ApiContext>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    let conn = ctx.state.open_db()?;
    let user = repository::get_user_by_email(&conn, &email)?;
    Ok(Json(user))
}
