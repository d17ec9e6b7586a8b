//! Change feed: wire events and the server-side subscriber hub.
//!
//! Every alert insert is broadcast as an `AlertInserted` event to all
//! registered WebSocket subscriber channels. Subscribers are anonymous
//! dashboards; two mounted dashboards both receive every event.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::models::Alert;

/// Per-subscriber channel depth. A subscriber that falls this far
/// behind starts losing events; the bulk load on its next mount
/// re-converges it with the store.
pub const SUBSCRIBER_CHANNEL_DEPTH: usize = 64;

/// Reconnection policy advertised to subscribers in `Welcome`.
///
/// Subscribers use these parameters for exponential backoff on
/// disconnect: `delay = min(initial_delay_ms * 2^attempt, max_delay_ms)
/// + random_jitter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconnectionPolicy {
    /// Initial delay before first reconnection attempt (ms).
    pub initial_delay_ms: u32,
    /// Maximum delay cap (ms).
    pub max_delay_ms: u32,
    /// Maximum number of consecutive failed attempts before giving up.
    pub max_retries: u32,
    /// Maximum random jitter added to each delay (ms).
    pub jitter_ms: u32,
}

impl Default for ReconnectionPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            max_retries: 10,
            jitter_ms: 500,
        }
    }
}

/// Server → subscriber feed messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedEvent {
    /// Connection acknowledged. Includes reconnection backoff policy.
    Welcome {
        session_id: String,
        reconnect_policy: ReconnectionPolicy,
    },
    /// A new alert row was inserted. Payload carries the full row.
    AlertInserted { alert: Alert },
    /// Server heartbeat; keeps idle connections from being reaped.
    Heartbeat { server_time: String },
}

// ═══════════════════════════════════════════════════════════
// FeedHub — subscriber registry
// ═══════════════════════════════════════════════════════════

/// Registry of connected feed subscribers.
///
/// Lives inside `ServiceState` behind a `Mutex`; the WebSocket layer
/// registers a channel per connection and the alerts endpoint
/// broadcasts through it after each insert.
#[derive(Debug, Default)]
pub struct FeedHub {
    /// Subscriber send channels, keyed by session id.
    subscribers: HashMap<String, mpsc::Sender<FeedEvent>>,
}

impl FeedHub {
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
        }
    }

    /// Register a subscriber channel under its session id.
    pub fn register(&mut self, session_id: &str, tx: mpsc::Sender<FeedEvent>) {
        self.subscribers.insert(session_id.to_string(), tx);
    }

    /// Remove a subscriber channel (on disconnect).
    pub fn unregister(&mut self, session_id: &str) {
        self.subscribers.remove(session_id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Broadcast an event to every subscriber.
    ///
    /// Uses `try_send` so a slow or dead consumer never blocks an
    /// insert; channels that report closed are dropped from the
    /// registry. Returns how many subscribers accepted the event.
    pub fn broadcast(&mut self, event: FeedEvent) -> usize {
        let mut delivered = 0;
        let mut dead = Vec::new();

        for (session_id, tx) in &self.subscribers {
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(session_id = %session_id, "feed subscriber lagging, event dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    dead.push(session_id.clone());
                }
            }
        }

        for session_id in dead {
            self.subscribers.remove(&session_id);
        }
        delivered
    }
}
