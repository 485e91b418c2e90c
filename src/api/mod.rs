//! REST API layer: route handlers, DTOs, OpenAPI document, and router
//! composition.
//!
//! Endpoints are mounted at the root: `/quotes` and `/health`.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}
