//! Probe configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment
//! variables (or a `.env` file via `dotenvy`). The secret identifier
//! is deliberately optional at load time — its absence is reported as
//! a 500 envelope at execution time rather than refusing to start, so
//! the service always answers its invoker.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

/// Top-level probe configuration.
///
/// Loaded once at startup via [`ProbeConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Identifier of the credential secret in the secret store.
    /// Required at execution time; `None` yields a 500 envelope with
    /// no database attempt.
    pub secret_id: Option<String>,

    /// Name of the remote log group backing per-invocation streams.
    pub log_group: String,

    /// Prefix for generated stream names.
    pub log_stream_prefix: String,

    /// Retention applied to the log group when it is first created.
    pub log_retention_days: i32,

    /// Hard bound on database connection acquisition.
    pub connect_timeout: Duration,
}

impl ProbeConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed
    /// as a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("invalid LISTEN_ADDR")?;

        let secret_id = std::env::var("DB_SECRET_ID").ok();

        let log_group = std::env::var("LOG_GROUP_NAME")
            .unwrap_or_else(|_| "/aurora-pulse/connectivity".to_string());
        let log_stream_prefix =
            std::env::var("LOG_STREAM_PREFIX").unwrap_or_else(|_| "execution-".to_string());
        let log_retention_days = parse_env("LOG_RETENTION_DAYS", 7);

        let connect_timeout = Duration::from_secs(parse_env("DB_CONNECT_TIMEOUT_SECS", 5));

        Ok(Self {
            listen_addr,
            secret_id,
            log_group,
            log_stream_prefix,
            log_retention_days,
            connect_timeout,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on
/// missing or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
