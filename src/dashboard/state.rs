//! Dashboard state machine.
//!
//! Extracted from the async driver so every lifecycle transition is
//! unit-testable without a live backend or WebSocket: bulk-load
//! results, feed inserts, operator actions and teardown are all plain
//! method calls.
//!
//! The alert sequence is keyed by id with upsert semantics on both the
//! load and feed paths, so the race between the initial load and early
//! feed events can duplicate nothing. Display order is newest-known-
//! first: feed arrivals are prepended, bulk-loaded rows (already
//! sorted descending) are appended behind whatever the feed delivered
//! first, and an upsert of a known id updates in place.

use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::dashboard::sound::{SoundAction, SoundManager};
use crate::models::Alert;

/// Toasts dismiss themselves after this long, unless dismissed by hand.
pub const TOAST_AUTO_DISMISS: Duration = Duration::from_secs(5);

/// Transient notification for a feed-delivered alert.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    message: String,
    shown_at: Instant,
}

impl Toast {
    fn new(message: String, now: Instant) -> Self {
        Self {
            message,
            shown_at: now,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= TOAST_AUTO_DISMISS
    }
}

/// What a feed insert did to the sequence.
#[derive(Debug, PartialEq)]
pub enum FeedOutcome {
    /// New id: prepended, sound requested, toast shown.
    Inserted { sound: SoundAction },
    /// Known id (bulk-load race): updated in place, no sound, no toast.
    Updated,
    /// Dashboard is unmounted; nothing happened.
    Ignored,
}

pub struct DashboardState {
    /// Newest-known-first projection of the alerts table.
    alerts: Vec<Alert>,
    loading: bool,
    /// Persistent inline error from a failed bulk load.
    load_error: Option<String>,
    /// Last operator-action failure (e.g. a delete that did not land).
    action_error: Option<String>,
    /// Persistent notice once the feed has given up reconnecting.
    feed_notice: Option<String>,
    toast: Option<Toast>,
    sound: SoundManager,
    /// Cleared on unmount; everything becomes a no-op afterwards.
    live: bool,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            alerts: Vec::new(),
            loading: true,
            load_error: None,
            action_error: None,
            feed_notice: None,
            toast: None,
            sound: SoundManager::new(),
            live: true,
        }
    }

    // ── Read accessors ───────────────────────────────────────

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub fn feed_notice(&self) -> Option<&str> {
        self.feed_notice.as_deref()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn sound(&self) -> &SoundManager {
        &self.sound
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    // ── Bulk load ────────────────────────────────────────────

    /// Merge the bulk-load result. Rows the feed already delivered are
    /// updated in place and stay ahead of the loaded suffix.
    pub fn on_load_success(&mut self, rows: Vec<Alert>) {
        if !self.live {
            return;
        }
        for row in rows {
            if let Some(existing) = self.alerts.iter_mut().find(|a| a.id == row.id) {
                *existing = row;
            } else {
                self.alerts.push(row);
            }
        }
        self.loading = false;
        self.load_error = None;
    }

    /// Bulk load failed: persistent inline error, no automatic retry.
    /// Rows the feed already delivered stay — they are real store rows.
    pub fn on_load_failure(&mut self, message: impl Into<String>) {
        if !self.live {
            return;
        }
        self.loading = false;
        self.load_error = Some(message.into());
    }

    // ── Feed ─────────────────────────────────────────────────

    /// Apply one feed-delivered insert.
    pub fn on_feed_insert(&mut self, alert: Alert, now: Instant) -> FeedOutcome {
        if !self.live {
            return FeedOutcome::Ignored;
        }

        if let Some(existing) = self.alerts.iter_mut().find(|a| a.id == alert.id) {
            *existing = alert;
            return FeedOutcome::Updated;
        }

        let sound = self.sound.request(alert.id);
        self.toast = Some(Toast::new(
            format!(
                "New alert from {} — bed {}, room {}: {}",
                alert.name, alert.bed_number, alert.room_number, alert.message
            ),
            now,
        ));
        self.alerts.insert(0, alert);
        FeedOutcome::Inserted { sound }
    }

    /// The subscription gave up reconnecting (or was torn down behind
    /// our back): show a persistent notice.
    pub fn on_feed_closed(&mut self) {
        if !self.live {
            return;
        }
        self.feed_notice = Some("Live alert feed disconnected.".into());
    }

    // ── Operator actions ─────────────────────────────────────

    /// "Coming": silence this alert's sound. Never removes the alert,
    /// never talks to the store — a remount forgets it entirely.
    pub fn coming(&mut self, alert_id: &Uuid) -> SoundAction {
        if !self.live {
            return SoundAction::None;
        }
        self.sound.silence(alert_id)
    }

    /// "Done" landed: drop the alert (and any sound it still owed).
    pub fn on_done_success(&mut self, alert_id: &Uuid) -> SoundAction {
        if !self.live {
            return SoundAction::None;
        }
        self.alerts.retain(|a| a.id != *alert_id);
        self.action_error = None;
        self.sound.silence(alert_id)
    }

    /// "Done" failed: the alert stays and the failure is shown. The
    /// operator retries by pressing "Done" again.
    pub fn on_done_failure(&mut self, alert_id: &Uuid, message: impl Into<String>) {
        if !self.live {
            return;
        }
        tracing::warn!(alert_id = %alert_id, "alert resolve failed");
        self.action_error = Some(message.into());
    }

    // ── Toast ────────────────────────────────────────────────

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    /// Drop the toast once its auto-dismiss deadline has passed.
    /// Returns true if it was dismissed by this call.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self.toast.as_ref().is_some_and(|t| t.expired(now)) {
            self.toast = None;
            true
        } else {
            false
        }
    }

    // ── Teardown ─────────────────────────────────────────────

    /// Unmount: silence everything and ignore all later completions
    /// (late load responses, stray feed deliveries, stale deletes).
    pub fn unmount(&mut self) -> SoundAction {
        self.live = false;
        self.toast = None;
        self.sound.silence_all()
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}
