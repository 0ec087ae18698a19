/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Persist blacklist entries locally and treat the database as the
    /// source of truth (default: `true`). When false, mutations proxy
    /// straight through to the gateway.
    pub blacklist_persist: bool,
    /// Same flag for the per-route whitelists (default: `true`).
    pub whitelist_persist: bool,
    /// Write audit entries to the database in addition to tracing
    /// (default: `true`).
    pub audit_db_write: bool,
    /// Prometheus base URL for the analytics proxy.
    pub prometheus_url: String,
    /// Interval between background sync runs, in seconds (default: 30 min).
    pub sync_interval_secs: u64,
}

fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `BLACKLIST_PERSIST_TO_DB` | `true`                     |
    /// | `WHITELIST_PERSIST_TO_DB` | `true`                     |
    /// | `AUDIT_LOG_DB_WRITE`      | `true`                     |
    /// | `PROMETHEUS_URL`          | `http://prometheus:9090`   |
    /// | `SYNC_INTERVAL_SECS`      | `1800`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let sync_interval_secs: u64 = std::env::var("SYNC_INTERVAL_SECS")
            .unwrap_or_else(|_| "1800".into())
            .parse()
            .expect("SYNC_INTERVAL_SECS must be a valid u64");

        let prometheus_url = std::env::var("PROMETHEUS_URL")
            .unwrap_or_else(|_| "http://prometheus:9090".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            blacklist_persist: env_bool("BLACKLIST_PERSIST_TO_DB", true),
            whitelist_persist: env_bool("WHITELIST_PERSIST_TO_DB", true),
            audit_db_write: env_bool("AUDIT_LOG_DB_WRITE", true),
            prometheus_url,
            sync_interval_secs,
        }
    }
}
