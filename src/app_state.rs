//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{NotificationHub, Readiness};
use crate::service::QuoteService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Quote service for all business logic.
    pub quote_service: Arc<QuoteService>,
    /// Notification hub for realtime sessions.
    pub hub: NotificationHub,
    /// Bootstrap readiness, reported by the health endpoint.
    pub readiness: Readiness,
    /// Send the latest stored quote to each new realtime session.
    pub send_latest_on_connect: bool,
}
