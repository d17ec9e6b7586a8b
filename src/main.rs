use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use wardbell::state::ServiceState;
use wardbell::{api, config, db};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_path = config::database_path();
    if let Some(parent) = db_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::error!("Cannot create data directory: {e}");
            std::process::exit(1);
        }
    }

    // Open once at startup so migration failures surface immediately
    if let Err(e) = db::open_database(&db_path) {
        tracing::error!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    let state = Arc::new(ServiceState::new(db_path));
    let mut server = match api::start_api_server(state, config::bind_addr()).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %server.info.server_addr, "wardbell ready");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    server.shutdown();
    // Let the graceful shutdown finish before the runtime drops
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
}
