//! Client-side session: cached email + role.
//!
//! The session is an explicit object handed to the router at
//! construction; nothing reads it ad hoc from ambient storage. It is
//! refreshed only through `login` / `logout`, and persisted as a small
//! JSON file so a restarted client resumes where it left off.
//!
//! Advisory only: no expiry, no signature, no revocation. The backend
//! does not verify any of it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::http::{BackendClient, ClientError};
use crate::models::Role;

/// An authenticated client identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub role: Role,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session file I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum LoginError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Disk-backed session cache.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the default application data directory.
    pub fn default_location() -> Self {
        Self::new(crate::config::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached session. A missing or unreadable file is simply
    /// no session — the cache is disposable.
    pub fn load(&self) -> Option<Session> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed session file");
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Create an account. The sign-up credential and the profile row are
/// two distinct backend calls, exactly as the signup form issues them.
pub async fn register(
    client: &BackendClient,
    email: &str,
    password: &str,
    role: &Role,
) -> Result<(), ClientError> {
    client.sign_up(email, password).await?;
    client.create_user(email, role).await?;
    tracing::info!(email = %email, role = role.as_str(), "account created");
    Ok(())
}

/// Sign in, fetch the profile row for the email, persist the session.
///
/// Mirrors the login flow of the submission/dashboard clients: the
/// credential check and the role lookup are two separate backend calls.
pub async fn login(
    client: &BackendClient,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<Session, LoginError> {
    client.sign_in(email, password).await?;
    let user = client.fetch_user(email).await?;

    let session = Session {
        email: user.email,
        role: user.role,
    };
    store.save(&session)?;

    tracing::info!(email = %session.email, role = session.role.as_str(), "logged in");
    Ok(session)
}

/// Clear the persisted session.
pub fn logout(store: &SessionStore) -> Result<(), SessionError> {
    store.clear()?;
    tracing::info!("logged out");
    Ok(())
}
