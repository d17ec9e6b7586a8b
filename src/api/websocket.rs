//! WebSocket change feed.
//!
//! `GET /ws/feed` upgrades the connection and registers the subscriber
//! with the feed hub. The server then pushes:
//! 1. `Welcome` with the reconnection policy subscribers should adopt
//! 2. `AlertInserted` for every insert, as it happens
//! 3. `Heartbeat` every 30s
//!
//! The feed is one-way; anything the subscriber sends besides Close is
//! ignored. Closing the socket unregisters the channel, so no event is
//! delivered after teardown.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::api::types::ApiContext;
use crate::feed::{FeedEvent, ReconnectionPolicy, SUBSCRIBER_CHANNEL_DEPTH};

/// Heartbeat interval: server sends Heartbeat every 30 seconds.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// WebSocket upgrade handler for the alert feed.
pub async fn feed_upgrade(
    ws: WebSocketUpgrade,
    State(ctx): State<ApiContext>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_feed(socket, ctx))
}

/// Main feed connection handler.
///
/// Spawns a sender task for channel→WS forwarding, then waits for the
/// subscriber to disconnect while ticking heartbeats.
async fn handle_feed(socket: WebSocket, ctx: ApiContext) {
    let session_id = Uuid::new_v4().to_string();
    let (ws_sink, mut ws_stream) = socket.split();
    let (tx, rx) = mpsc::channel::<FeedEvent>(SUBSCRIBER_CHANNEL_DEPTH);

    {
        let mut feed = match ctx.state.feed().lock() {
            Ok(f) => f,
            Err(_) => return,
        };
        feed.register(&session_id, tx.clone());
    }
    tracing::info!(session_id = %session_id, "feed subscriber connected");

    // Sender task (reads from channel, writes to WebSocket)
    let sender_handle = tokio::spawn(async move {
        let mut sink = ws_sink;
        let mut rx = rx;
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(j) => j,
                Err(_) => continue,
            };
            if sink.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let _ = tx
        .send(FeedEvent::Welcome {
            session_id: session_id.clone(),
            reconnect_policy: ReconnectionPolicy::default(),
        })
        .await;

    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await; // Consume initial immediate tick

    loop {
        tokio::select! {
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {} // one-way feed; subscriber chatter is ignored
                }
            }
            _ = heartbeat.tick() => {
                // try_send: a stalled subscriber must not block this loop
                let _ = tx.try_send(FeedEvent::Heartbeat {
                    server_time: chrono::Utc::now().to_rfc3339(),
                });
            }
        }
    }

    // Cleanup: unregister first so no sender clone survives, then let
    // the sender task drain and exit.
    if let Ok(mut feed) = ctx.state.feed().lock() {
        feed.unregister(&session_id);
    }
    drop(tx);
    let _ = sender_handle.await;

    tracing::info!(session_id = %session_id, "feed subscriber disconnected");
}
