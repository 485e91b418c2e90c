//! Connection source backed by an `sqlx` SQLite pool.
//!
//! Every backend operation borrows a [`Connection`] for the duration of
//! one statement or script. The handle goes back to the pool when it is
//! dropped, so it is released exactly once on every exit path.

use std::str::FromStr;
use std::time::Duration;

use sqlx::Sqlite;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::QotdConfig;

/// An exclusively owned, pooled backend connection.
pub type Connection = PoolConnection<Sqlite>;

/// Supplies short-lived connections to the quote database.
#[derive(Debug, Clone)]
pub struct ConnectionSource {
    pool: SqlitePool,
}

impl ConnectionSource {
    /// Opens the pool described by `config`.
    ///
    /// In-memory databases keep at least one connection alive for the
    /// lifetime of the pool, since SQLite discards a memory database
    /// when its last connection closes.
    ///
    /// # Errors
    ///
    /// Returns an [`sqlx::Error`] if the URL is invalid or the first
    /// connection cannot be established.
    pub async fn connect(config: &QotdConfig) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.database_max_connections.max(1))
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_acquire_timeout_secs));

        if is_in_memory(&config.database_url) {
            pool_options = pool_options
                .min_connections(config.database_min_connections.max(1))
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;
        tracing::info!(
            max_connections = config.database_max_connections,
            "database pool opened"
        );
        Ok(Self { pool })
    }

    /// Borrows a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an [`sqlx::Error`] if the pool is closed or no connection
    /// becomes available within the acquire timeout.
    pub async fn acquire(&self) -> Result<Connection, sqlx::Error> {
        self.pool.acquire().await
    }

    /// Closes the pool, waiting for borrowed connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) async fn test_source() -> ConnectionSource {
    let Ok(source) = ConnectionSource::connect(&QotdConfig::default()).await else {
        panic!("in-memory sqlite must open");
    };
    source
}
