//! API server lifecycle — starts/stops the axum HTTP server.
//!
//! Pattern: bind → spawn background task → return handle with
//! shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::state::ServiceState;

/// Metadata for a running API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiServerInfo {
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running API server.
pub struct ApiServer {
    pub info: ApiServerInfo,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Start the API server on the given address.
///
/// Binds (port 0 picks an ephemeral port), builds the router, and
/// spawns the axum server in a background tokio task.
pub async fn start_api_server(
    state: Arc<ServiceState>,
    addr: SocketAddr,
) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%addr, "API server binding");

    let app = api_router(state);

    let info = ApiServerInfo {
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        info,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> (Arc<ServiceState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(ServiceState::new(dir.path().join("wardbell.db")));
        (state, dir)
    }

    fn loopback() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let (state, _dir) = test_state();
        let mut server = start_api_server(state, loopback())
            .await
            .expect("server should start");

        assert!(server.info.port > 0);

        let url = format!("http://127.0.0.1:{}/api/health", server.info.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert!(resp.status().is_success());

        server.shutdown();
        // Give server time to stop
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn server_info_has_valid_metadata() {
        let (state, _dir) = test_state();
        let mut server = start_api_server(state, loopback())
            .await
            .expect("server should start");

        assert!(!server.info.started_at.is_empty());
        assert!(server.info.server_addr.contains(':'));

        server.shutdown();
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (state, _dir) = test_state();
        let mut server = start_api_server(state, loopback())
            .await
            .expect("server should start");

        let url = format!("http://127.0.0.1:{}/nonexistent", server.info.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let (state, _dir) = test_state();
        let mut server = start_api_server(state, loopback())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown(); // Second call should be safe
    }
}
