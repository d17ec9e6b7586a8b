//! Doctor dashboard: the alert lifecycle synchronizer.
//!
//! `DashboardState` (in [`state`]) is the pure state machine; the
//! `Dashboard` here is the async driver wiring it to the backend
//! client and the feed subscription. Mount order matters: the feed is
//! attached (and confirmed via `Welcome`) before the bulk load is
//! issued, so an insert can race the load only into the id-keyed
//! upsert, never past it.
//!
//! The synchronizer has no terminal state of its own — it runs until
//! `unmount`, which tears the subscription down and freezes the state
//! against late completions.

pub mod sound;
pub mod state;

use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::client::feed::FeedSubscription;
use crate::client::http::{BackendClient, ClientError};
use crate::dashboard::sound::SoundAction;
use crate::dashboard::state::DashboardState;
use crate::feed::ReconnectionPolicy;

/// How long a mounting dashboard waits for the feed's `Welcome`
/// before issuing the bulk load anyway.
const FEED_ATTACH_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Dashboard {
    state: DashboardState,
    client: BackendClient,
    feed: Option<FeedSubscription>,
}

impl Dashboard {
    /// Mount against a backend, subscribing with the default policy.
    pub async fn mount(client: BackendClient) -> Self {
        let feed = FeedSubscription::subscribe(client.feed_url(), ReconnectionPolicy::default());
        Self::mount_with_feed(client, feed).await
    }

    /// Mount with a pre-built subscription (custom reconnect policy).
    pub async fn mount_with_feed(client: BackendClient, mut feed: FeedSubscription) -> Self {
        // Attach the feed first; a slow or dead feed must not block
        // the load forever.
        let _ = tokio::time::timeout(FEED_ATTACH_TIMEOUT, feed.ready()).await;

        let mut state = DashboardState::new();
        match client.fetch_alerts().await {
            Ok(rows) => state.on_load_success(rows),
            Err(e) => {
                tracing::warn!(error = %e, "alert bulk load failed");
                state.on_load_failure("Failed to load alerts.");
            }
        }

        Self {
            state,
            client,
            feed: Some(feed),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Process the next feed event. Returns `false` once the
    /// subscription has ended (after marking the state with a
    /// persistent feed notice).
    pub async fn pump(&mut self) -> bool {
        let Some(feed) = self.feed.as_mut() else {
            return false;
        };
        match feed.next_alert().await {
            Some(alert) => {
                self.state.on_feed_insert(alert, Instant::now());
                true
            }
            None => {
                self.state.on_feed_closed();
                self.feed = None;
                false
            }
        }
    }

    /// "Coming": local acknowledgment, sound only.
    pub fn coming(&mut self, alert_id: &Uuid) -> SoundAction {
        self.state.coming(alert_id)
    }

    /// "Done": one delete call, then remove locally on success or
    /// surface the failure and keep the alert on screen.
    pub async fn done(&mut self, alert_id: &Uuid) -> Result<(), ClientError> {
        match self.client.delete_alert(alert_id).await {
            Ok(()) => {
                self.state.on_done_success(alert_id);
                Ok(())
            }
            Err(e) => {
                self.state.on_done_failure(alert_id, "Failed to resolve alert.");
                Err(e)
            }
        }
    }

    pub fn dismiss_toast(&mut self) {
        self.state.dismiss_toast();
    }

    /// Periodic housekeeping from the host UI's timer.
    pub fn tick(&mut self) {
        self.state.expire_toast(Instant::now());
    }

    /// Tear down: silence sounds, end the subscription, freeze state.
    pub async fn unmount(mut self) {
        self.state.unmount();
        if let Some(feed) = self.feed.take() {
            feed.unsubscribe().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::api::types::ApiContext;
    use crate::models::AlertDraft;
    use crate::state::ServiceState;

    async fn live_server() -> (
        BackendClient,
        Arc<ServiceState>,
        tempfile::TempDir,
        tokio::task::JoinHandle<()>,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(ServiceState::new(dir.path().join("wardbell.db")));
        let app = crate::api::router::api_router_with_ctx(ApiContext::new(state.clone()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let client = BackendClient::new(format!("http://127.0.0.1:{}", addr.port()));
        (client, state, dir, handle)
    }

    fn draft(name: &str) -> AlertDraft {
        AlertDraft {
            name: name.into(),
            bed_number: "12".into(),
            room_number: "204".into(),
            message: "Need assistance".into(),
        }
    }

    #[tokio::test]
    async fn mount_loads_existing_alerts_newest_first() {
        let (client, _state, _dir, server) = live_server().await;
        client.submit_alert(&draft("First")).await.unwrap();
        client.submit_alert(&draft("Second")).await.unwrap();

        let dashboard = Dashboard::mount(client).await;
        let alerts = dashboard.state().alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].name, "Second");
        assert_eq!(alerts[1].name, "First");
        assert!(!dashboard.state().is_loading());

        dashboard.unmount().await;
        server.abort();
    }

    #[tokio::test]
    async fn feed_insert_reaches_the_mounted_dashboard() {
        let (client, _state, _dir, server) = live_server().await;
        let mut dashboard = Dashboard::mount(client.clone()).await;

        let created = client.submit_alert(&draft("Jane Doe")).await.unwrap();

        assert!(dashboard.pump().await);
        let state = dashboard.state();
        assert_eq!(state.alerts()[0].id, created.id);
        assert!(state.sound().is_playing());
        assert!(state.toast().unwrap().message().contains("Jane Doe"));

        dashboard.unmount().await;
        server.abort();
    }

    #[tokio::test]
    async fn done_deletes_remotely_and_removes_locally() {
        let (client, _state, _dir, server) = live_server().await;
        let created = client.submit_alert(&draft("Jane Doe")).await.unwrap();

        let mut dashboard = Dashboard::mount(client.clone()).await;
        assert_eq!(dashboard.state().alerts().len(), 1);

        dashboard.done(&created.id).await.unwrap();
        assert!(dashboard.state().alerts().is_empty());
        assert!(client.fetch_alerts().await.unwrap().is_empty());

        dashboard.unmount().await;
        server.abort();
    }

    #[tokio::test]
    async fn done_failure_keeps_alert_and_shows_error() {
        let (client, _state, _dir, server) = live_server().await;
        let created = client.submit_alert(&draft("Jane Doe")).await.unwrap();

        let mut dashboard = Dashboard::mount(client).await;
        // Kill the backend before resolving
        server.abort();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(dashboard.done(&created.id).await.is_err());
        assert_eq!(dashboard.state().alerts().len(), 1);
        assert_eq!(
            dashboard.state().action_error(),
            Some("Failed to resolve alert.")
        );

        dashboard.unmount().await;
    }

    #[tokio::test]
    async fn two_dashboards_both_see_the_same_insert() {
        let (client, _state, _dir, server) = live_server().await;

        let mut dash_a = Dashboard::mount(client.clone()).await;
        let mut dash_b = Dashboard::mount(client.clone()).await;

        let created = client.submit_alert(&draft("Jane Doe")).await.unwrap();

        assert!(dash_a.pump().await);
        assert!(dash_b.pump().await);
        assert_eq!(dash_a.state().alerts()[0].id, created.id);
        assert_eq!(dash_b.state().alerts()[0].id, created.id);

        dash_a.unmount().await;
        dash_b.unmount().await;
        server.abort();
    }

    #[tokio::test]
    async fn unmount_releases_the_feed_subscription() {
        let (client, state, _dir, server) = live_server().await;

        let dashboard = Dashboard::mount(client.clone()).await;
        assert_eq!(state.feed().lock().unwrap().subscriber_count(), 1);

        dashboard.unmount().await;

        for _ in 0..50 {
            if state.feed().lock().unwrap().subscriber_count() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(state.feed().lock().unwrap().subscriber_count(), 0);

        server.abort();
    }

    #[tokio::test]
    async fn mount_against_dead_backend_shows_load_error() {
        // Bind then drop a listener to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = BackendClient::new(format!("http://127.0.0.1:{port}"));
        let feed = FeedSubscription::subscribe(
            client.feed_url(),
            ReconnectionPolicy {
                initial_delay_ms: 1,
                max_delay_ms: 5,
                max_retries: 1,
                jitter_ms: 0,
            },
        );
        let mut dashboard = Dashboard::mount_with_feed(client, feed).await;

        assert!(!dashboard.state().is_loading());
        assert_eq!(dashboard.state().load_error(), Some("Failed to load alerts."));
        assert!(dashboard.state().alerts().is_empty());

        // The exhausted feed eventually closes and leaves a notice
        assert!(!dashboard.pump().await);
        assert!(dashboard.state().feed_notice().is_some());

        dashboard.unmount().await;
    }
}
