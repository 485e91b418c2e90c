//! System endpoints: health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::BootstrapState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    #[schema(value_type = String)]
    bootstrap: BootstrapState,
    subscribers: usize,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns bootstrap state, live realtime session count, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Bootstrap has not completed", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let bootstrap = state.readiness.state();
    let (status, label) = match bootstrap {
        BootstrapState::Ready => (StatusCode::OK, "healthy"),
        BootstrapState::NotReady => (StatusCode::SERVICE_UNAVAILABLE, "starting"),
    };
    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            bootstrap,
            subscribers: state.hub.subscriber_count(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
