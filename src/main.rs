//! qotd-gateway server entry point.
//!
//! Bootstraps the database, then starts the Axum HTTP server with REST
//! and WebSocket endpoints.

use tracing_subscriber::EnvFilter;

use qotd_gateway::config::{LogFormat, QotdConfig};
use qotd_gateway::server::{Gateway, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = QotdConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(addr = %config.listen_addr, "starting qotd-gateway");

    // Bootstrap before binding: nothing is served until the schema exists
    let gateway = match Gateway::prepare(&config).await {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::error!(error = %e, "error in initializing database");
            return Err(e.into());
        }
    };

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    gateway.serve(listener, shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}
