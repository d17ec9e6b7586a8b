//! Authentication endpoints.
//!
//! `POST /api/auth/signup` — create a sign-up credential
//! `POST /api/auth/login`  — verify email + password
//!
//! Sign-up only creates the credential; the profile row with the role
//! is inserted by the client through `POST /api/users` as a second,
//! separate call. No tokens are issued: the role gate on the client is
//! advisory and the API trusts its network boundary.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth;
use crate::db::repository;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub email: String,
}

/// `POST /api/auth/signup` — register an email + password pair.
pub async fn signup(
    State(ctx): State<ApiContext>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".into()));
    }

    let conn = ctx.state.open_db()?;

    if repository::get_credential(&conn, &req.email)?.is_some() {
        return Err(ApiError::EmailTaken);
    }

    let hash = auth::hash_password(&req.password);
    repository::insert_credential(&conn, &req.email, &hash)?;

    tracing::info!(email = %req.email, "credential created");
    Ok(Json(AuthResponse { email: req.email }))
}

/// `POST /api/auth/login` — verify a credential.
///
/// Unknown email and wrong password produce the same response.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let conn = ctx.state.open_db()?;

    let stored =
        repository::get_credential(&conn, &req.email)?.ok_or(ApiError::InvalidCredentials)?;

    let valid = auth::verify_password(&req.password, &stored)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    Ok(Json(AuthResponse { email: req.email }))
}
