use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Wardbell";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address for the API server.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Environment variable overriding the bind address.
pub const BIND_ADDR_ENV: &str = "WARDBELL_ADDR";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "WARDBELL_DATA_DIR";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    "info,wardbell=debug".to_string()
}

/// Get the application data directory
/// ~/Wardbell/ on all platforms (user-visible), unless overridden via env.
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Wardbell")
}

/// Path to the alert database.
pub fn database_path() -> PathBuf {
    app_data_dir().join("wardbell.db")
}

/// Path to the client-side session file (cached email + role).
pub fn session_path() -> PathBuf {
    app_data_dir().join("session.json")
}

/// Resolve the API server bind address from the environment.
pub fn bind_addr() -> SocketAddr {
    std::env::var(BIND_ADDR_ENV)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            DEFAULT_BIND_ADDR
                .parse()
                .expect("default bind address is valid")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_under_app_data() {
        let db = database_path();
        let app = app_data_dir();
        assert!(db.starts_with(app));
        assert!(db.ends_with("wardbell.db"));
    }

    #[test]
    fn session_under_app_data() {
        let session = session_path();
        assert!(session.starts_with(app_data_dir()));
        assert!(session.ends_with("session.json"));
    }

    #[test]
    fn app_name_is_wardbell() {
        assert_eq!(APP_NAME, "Wardbell");
    }

    #[test]
    fn default_bind_addr_parses() {
        let addr: SocketAddr = DEFAULT_BIND_ADDR.parse().unwrap();
        assert_eq!(addr.port(), 8787);
    }
}
