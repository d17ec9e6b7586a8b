//! Shared service state for the API server.
//!
//! One `ServiceState` is created at startup and shared (via `Arc`)
//! by every handler and the WebSocket feed layer. Handlers open a
//! fresh SQLite connection per request; the feed hub sits behind a
//! `Mutex` and is only held long enough to register a channel or
//! broadcast one event.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::db::{self, DatabaseError};
use crate::feed::FeedHub;

pub struct ServiceState {
    /// Path to the alert database. Connections are opened per request.
    db_path: PathBuf,
    /// Connected feed subscribers.
    feed: Mutex<FeedHub>,
}

impl ServiceState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            feed: Mutex::new(FeedHub::new()),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a database connection. Migrations are idempotent, so this
    /// is safe from any handler at any time.
    pub fn open_db(&self) -> Result<rusqlite::Connection, DatabaseError> {
        db::open_database(&self.db_path)
    }

    pub fn feed(&self) -> &Mutex<FeedHub> {
        &self.feed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_db_runs_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let state = ServiceState::new(dir.path().join("wardbell.db"));

        let conn = state.open_db().unwrap();
        let tables = crate::db::count_tables(&conn).unwrap();
        assert_eq!(tables, 4);
    }

    #[test]
    fn feed_hub_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let state = ServiceState::new(dir.path().join("wardbell.db"));
        assert_eq!(state.feed().lock().unwrap().subscriber_count(), 0);
    }
}
