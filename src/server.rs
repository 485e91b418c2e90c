//! Component wiring, router composition, and the serve loop.
//!
//! [`Gateway::prepare`] builds every component explicitly and runs the
//! bootstrapper to completion. Only a prepared gateway can produce a
//! router or serve, so no request can reach the store before the schema
//! exists.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::{QotdConfig, check_realtime_path};
use crate::domain::{NotificationHub, Readiness};
use crate::error::SetupError;
use crate::persistence::{Bootstrapper, ConnectionSource, QuoteStore};
use crate::service::QuoteService;
use crate::ws::handler::ws_handler;

/// A bootstrapped service, ready to accept connections.
#[derive(Debug)]
pub struct Gateway {
    state: AppState,
    source: ConnectionSource,
    realtime_path: String,
}

impl Gateway {
    /// Opens the database, runs the bootstrap scripts, and wires the
    /// store, hub, and service together.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] if the realtime path cannot be mounted,
    /// the database cannot be opened, or a bootstrap step fails. The
    /// service must not start in that case.
    pub async fn prepare(config: &QotdConfig) -> Result<Self, SetupError> {
        check_realtime_path(&config.realtime_path).map_err(|reason| {
            SetupError::InvalidConfig(format!("realtime path {:?} {reason}", config.realtime_path))
        })?;

        let source = ConnectionSource::connect(config)
            .await
            .map_err(SetupError::Open)?;
        let readiness = Readiness::new();

        Bootstrapper::from_config(source.clone(), readiness.clone(), config)
            .prepare()
            .await?;
        tracing::info!("database initialized");

        let hub = NotificationHub::new(config.hub_subscriber_capacity);
        let store = QuoteStore::new(source.clone(), readiness.clone());
        let quote_service = Arc::new(QuoteService::new(store, hub.clone()));

        let state = AppState {
            quote_service,
            hub,
            readiness,
            send_latest_on_connect: config.realtime_send_latest_on_connect,
        };

        Ok(Self {
            state,
            source,
            realtime_path: config.realtime_path.clone(),
        })
    }

    /// Shared handler state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Builds the full router: REST endpoints, the realtime channel, and
    /// (with the `swagger-ui` feature) the API docs.
    #[must_use]
    pub fn router(&self) -> Router {
        let app = Router::new()
            .merge(api::build_router())
            .route(&self.realtime_path, get(ws_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone());

        #[cfg(feature = "swagger-ui")]
        let app = {
            use utoipa::OpenApi;
            app.merge(
                utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                    .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
            )
        };

        app
    }

    /// Closes the database pool. Subsequent store calls fail with a
    /// connection error.
    pub async fn close_database(&self) {
        self.source.close().await;
    }

    /// Serves on `listener` until `shutdown` resolves.
    ///
    /// On shutdown the hub is closed so every realtime session ends, and
    /// the database pool is closed once the server has drained.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the accept loop fails.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let hub = self.state.hub.clone();

        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, realtime_path = %self.realtime_path, "server listening");
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("shutdown requested");
                hub.close();
            })
            .await?;

        self.close_database().await;
        Ok(())
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
