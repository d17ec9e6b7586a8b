//! Client-side feed subscription.
//!
//! A background task keeps a WebSocket to `/ws/feed` open for the
//! lifetime of a mounted dashboard and forwards every `AlertInserted`
//! payload through an mpsc channel. On disconnect it resubscribes with
//! exponential backoff (`delay = min(initial * 2^(attempt-1), max) +
//! jitter`), adopting the policy the server advertises in `Welcome`.
//! After `max_retries` consecutive failures it gives up and closes the
//! channel, which the dashboard surfaces as a persistent feed notice.
//!
//! `unsubscribe()` tears the task down; nothing is delivered after it
//! returns. Dropping the subscription has the same effect.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;

use crate::feed::{FeedEvent, ReconnectionPolicy};
use crate::models::Alert;

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Why the per-connection read loop ended.
enum StreamEnd {
    /// Unsubscribed or receiver dropped — stop for good.
    Teardown,
    /// Connection lost — reconnect per policy.
    Disconnected,
}

/// Handle to a live feed subscription.
pub struct FeedSubscription {
    alerts: mpsc::Receiver<Alert>,
    ready_rx: Option<oneshot::Receiver<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

impl FeedSubscription {
    /// Open a subscription to the given `ws://.../ws/feed` URL.
    ///
    /// `policy` governs reconnection until the server's `Welcome`
    /// replaces it.
    pub fn subscribe(url: impl Into<String>, policy: ReconnectionPolicy) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let (ready_tx, ready_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_feed(url.into(), policy, tx, ready_tx, shutdown_rx));
        Self {
            alerts: rx,
            ready_rx: Some(ready_rx),
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }

    /// Wait until the server's first `Welcome` lands (or the task has
    /// already given up). A dashboard attaches the feed this way
    /// before issuing its bulk load, so no insert can fall between
    /// the two.
    pub async fn ready(&mut self) {
        if let Some(rx) = self.ready_rx.take() {
            let _ = rx.await;
        }
    }

    /// Next feed-delivered alert. `None` once the subscription has
    /// ended (teardown or retries exhausted).
    pub async fn next_alert(&mut self) -> Option<Alert> {
        self.alerts.recv().await
    }

    /// Tear the subscription down and wait for the task to finish.
    pub async fn unsubscribe(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

async fn run_feed(
    url: String,
    mut policy: ReconnectionPolicy,
    tx: mpsc::Sender<Alert>,
    ready_tx: oneshot::Sender<()>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut attempt: u32 = 0;
    let mut ready = Some(ready_tx);

    loop {
        tokio::select! {
            _ = &mut shutdown => return,
            result = tokio_tungstenite::connect_async(url.as_str()) => match result {
                Ok((mut ws, _)) => {
                    attempt = 0;
                    tracing::info!("alert feed connected");
                    if let StreamEnd::Teardown =
                        read_stream(&mut ws, &mut policy, &mut ready, &tx, &mut shutdown).await
                    {
                        let _ = ws.close(None).await;
                        return;
                    }
                    tracing::warn!("alert feed disconnected");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "alert feed connect failed");
                }
            }
        }

        attempt += 1;
        if attempt > policy.max_retries {
            tracing::error!(
                max_retries = policy.max_retries,
                "alert feed gave up reconnecting"
            );
            return; // drops tx; the dashboard sees the closed channel
        }

        let delay = backoff_delay(&policy, attempt);
        tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "alert feed backing off");
        tokio::select! {
            _ = &mut shutdown => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

async fn read_stream(
    ws: &mut WsStream,
    policy: &mut ReconnectionPolicy,
    ready: &mut Option<oneshot::Sender<()>>,
    tx: &mpsc::Sender<Alert>,
    shutdown: &mut oneshot::Receiver<()>,
) -> StreamEnd {
    loop {
        tokio::select! {
            _ = &mut *shutdown => return StreamEnd::Teardown,
            msg = ws.next() => match msg {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<FeedEvent>(&text) {
                    Ok(FeedEvent::Welcome { reconnect_policy, .. }) => {
                        *policy = reconnect_policy;
                        if let Some(tx) = ready.take() {
                            let _ = tx.send(());
                        }
                    }
                    Ok(FeedEvent::AlertInserted { alert }) => {
                        // Stay responsive to teardown even if the
                        // dashboard has stopped draining the channel.
                        let delivered = tokio::select! {
                            _ = &mut *shutdown => return StreamEnd::Teardown,
                            result = tx.send(alert) => result,
                        };
                        if delivered.is_err() {
                            // Receiver dropped: dashboard unmounted
                            return StreamEnd::Teardown;
                        }
                    }
                    Ok(FeedEvent::Heartbeat { .. }) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "unparseable feed message");
                    }
                },
                Some(Ok(Message::Close(_))) | None => return StreamEnd::Disconnected,
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "alert feed stream error");
                    return StreamEnd::Disconnected;
                }
                _ => {}
            }
        }
    }
}

/// Backoff before reconnect attempt `attempt` (1-based).
fn backoff_delay(policy: &ReconnectionPolicy, attempt: u32) -> Duration {
    let shift = attempt.saturating_sub(1).min(16);
    let base = (policy.initial_delay_ms as u64) << shift;
    let capped = base.min(policy.max_delay_ms as u64);
    let jitter = if policy.jitter_ms > 0 {
        use rand::Rng;
        rand::thread_rng().gen_range(0..=policy.jitter_ms as u64)
    } else {
        0
    };
    Duration::from_millis(capped + jitter)
}
