//! HTTP client for the alert backend.
//!
//! Thin typed wrapper over the JSON API. Every failure is converted
//! into a `ClientError` at the call site; callers display a message
//! and never retry automatically.

use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Alert, AlertDraft, Role, User};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("store request failed: {0}")]
    Store(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for the alert backend API.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// `base_url` is the HTTP origin, e.g. `http://127.0.0.1:8787`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// WebSocket URL of the alert change feed.
    pub fn feed_url(&self) -> String {
        let ws_origin = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.base_url.clone()
        };
        format!("{ws_origin}/ws/feed")
    }

    // ── Auth ─────────────────────────────────────────────────

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/auth/signup", self.base_url))
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(failure(resp).await)
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(failure(resp).await)
        }
    }

    // ── Users ────────────────────────────────────────────────

    pub async fn create_user(&self, email: &str, role: &Role) -> Result<User, ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/users", self.base_url))
            .json(&serde_json::json!({"email": email, "role": role.as_str()}))
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(failure(resp).await)
        }
    }

    pub async fn fetch_user(&self, email: &str) -> Result<User, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/users/{email}", self.base_url))
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(failure(resp).await)
        }
    }

    // ── Alerts ───────────────────────────────────────────────

    pub async fn fetch_alerts(&self) -> Result<Vec<Alert>, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/alerts", self.base_url))
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(failure(resp).await)
        }
    }

    pub async fn submit_alert(&self, draft: &AlertDraft) -> Result<Alert, ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/alerts", self.base_url))
            .json(draft)
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(failure(resp).await)
        }
    }

    pub async fn delete_alert(&self, id: &Uuid) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(format!("{}/api/alerts/{id}", self.base_url))
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(failure(resp).await)
        }
    }
}

/// Turn a non-success response into the matching error, preferring the
/// structured message from the body.
async fn failure(resp: reqwest::Response) -> ClientError {
    let status = resp.status();
    let message = resp
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"));

    if status == StatusCode::UNAUTHORIZED {
        ClientError::Auth(message)
    } else {
        ClientError::Store(message)
    }
}
