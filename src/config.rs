//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::notification_hub::DEFAULT_SUBSCRIBER_CAPACITY;

/// Default path of the realtime WebSocket channel.
pub const DEFAULT_REALTIME_PATH: &str = "/realtime";

/// Paths served by the router, with everything below them.
const RESERVED_PATHS: [&str; 4] = ["/quotes", "/health", "/swagger-ui", "/api-docs"];

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, multi-field lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`QotdConfig::from_env`].
#[derive(Debug, Clone)]
pub struct QotdConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// SQLite connection string.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_acquire_timeout_secs: u64,

    /// Schema script replacing the bundled one.
    pub schema_script_path: Option<PathBuf>,

    /// Seed script replacing the bundled one.
    pub seed_script_path: Option<PathBuf>,

    /// Queue capacity of each hub subscriber.
    pub hub_subscriber_capacity: usize,

    /// Path of the realtime WebSocket channel.
    pub realtime_path: String,

    /// Send the latest stored quote to each new realtime session.
    pub realtime_send_latest_on_connect: bool,

    /// Tracing output format.
    pub log_format: LogFormat,
}

impl Default for QotdConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 10,
            database_min_connections: 1,
            database_acquire_timeout_secs: 5,
            schema_script_path: None,
            seed_script_path: None,
            hub_subscriber_capacity: DEFAULT_SUBSCRIBER_CAPACITY,
            realtime_path: DEFAULT_REALTIME_PATH.to_string(),
            realtime_send_latest_on_connect: false,
            log_format: LogFormat::Pretty,
        }
    }
}

impl QotdConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the [`Default`] values when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`], or if `REALTIME_PATH` is rejected by
    /// [`check_realtime_path`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.listen_addr,
        };

        let database_url = std::env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let database_max_connections =
            parse_env("DATABASE_MAX_CONNECTIONS", defaults.database_max_connections);
        let database_min_connections =
            parse_env("DATABASE_MIN_CONNECTIONS", defaults.database_min_connections);
        let database_acquire_timeout_secs = parse_env(
            "DATABASE_ACQUIRE_TIMEOUT_SECS",
            defaults.database_acquire_timeout_secs,
        );

        let schema_script_path = std::env::var("SCHEMA_SCRIPT_PATH").ok().map(PathBuf::from);
        let seed_script_path = std::env::var("SEED_SCRIPT_PATH").ok().map(PathBuf::from);

        let hub_subscriber_capacity =
            parse_env("HUB_SUBSCRIBER_CAPACITY", defaults.hub_subscriber_capacity);

        let realtime_path = std::env::var("REALTIME_PATH").unwrap_or(defaults.realtime_path);
        check_realtime_path(&realtime_path)
            .map_err(|reason| format!("REALTIME_PATH {realtime_path:?} {reason}"))?;
        let realtime_send_latest_on_connect = parse_env_bool(
            "REALTIME_SEND_LATEST_ON_CONNECT",
            defaults.realtime_send_latest_on_connect,
        );

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections,
            database_min_connections,
            database_acquire_timeout_secs,
            schema_script_path,
            seed_script_path,
            hub_subscriber_capacity,
            realtime_path,
            realtime_send_latest_on_connect,
            log_format,
        })
    }
}

/// Checks that `path` can be mounted as the realtime route.
///
/// The path must start with `/`, must not use route syntax, and must not
/// shadow a REST or documentation route.
///
/// # Errors
///
/// Returns the reason the path is rejected.
pub fn check_realtime_path(path: &str) -> Result<(), String> {
    if !path.starts_with('/') {
        return Err("must start with '/'".to_string());
    }
    if path.contains(['{', '}', '*']) || path.split('/').any(|seg| seg.starts_with(':')) {
        return Err("must be a literal path without captures or wildcards".to_string());
    }
    let reserved = RESERVED_PATHS
        .iter()
        .copied()
        .find(|r| path == *r || path.strip_prefix(*r).is_some_and(|rest| rest.starts_with('/')));
    if let Some(reserved) = reserved {
        return Err(format!("collides with the {reserved} route"));
    }
    Ok(())
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}
