//! Quote handlers: list and add.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::AddQuoteRequest;
use crate::app_state::AppState;
use crate::domain::{NewQuote, Quote};
use crate::error::{ErrorResponse, QotdError, StoreError};

/// `GET /quotes` — List every stored quote.
///
/// # Errors
///
/// Returns [`QotdError::QuotesUnavailable`] (bare 404) when the read
/// fails, or [`QotdError::NotReady`] before bootstrap.
#[utoipa::path(
    get,
    path = "/quotes",
    tag = "Quotes",
    summary = "List quotes",
    description = "Returns every stored quote. Order is backend-defined.",
    responses(
        (status = 200, description = "All quotes", body = Vec<Quote>),
        (status = 404, description = "Quotes could not be read"),
        (status = 503, description = "Service not ready", body = ErrorResponse),
    )
)]
pub async fn list_quotes(State(state): State<AppState>) -> Result<impl IntoResponse, QotdError> {
    let quotes = state
        .quote_service
        .list_quotes()
        .await
        .map_err(|e| match e {
            StoreError::NotReady => QotdError::NotReady,
            other => {
                tracing::warn!(error = %other, "listing quotes failed");
                QotdError::QuotesUnavailable
            }
        })?;

    Ok(Json(quotes))
}

/// `POST /quotes` — Add a quote and notify realtime subscribers.
///
/// # Errors
///
/// Returns [`QotdError::InvalidRequest`] if the body is not a JSON object
/// with a non-empty string `text`; a server error if the insert fails.
#[utoipa::path(
    post,
    path = "/quotes",
    tag = "Quotes",
    summary = "Add a quote",
    description = "Persists a quote and pushes it to every connected realtime session. A missing or empty `author` is stored as `\"Unknown\"`.",
    request_body = AddQuoteRequest,
    responses(
        (status = 200, description = "Persisted quote", body = Quote),
        (status = 400, description = "Missing or invalid text", body = ErrorResponse),
        (status = 500, description = "Quote could not be persisted", body = ErrorResponse),
        (status = 503, description = "Service not ready", body = ErrorResponse),
    )
)]
pub async fn add_quote(
    State(state): State<AppState>,
    payload: Result<Json<AddQuoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, QotdError> {
    let Json(req) = payload.map_err(|e| QotdError::InvalidRequest(e.body_text()))?;
    let quote = NewQuote::try_from(req)?;

    let persisted = state.quote_service.add_quote(quote).await.map_err(|e| {
        tracing::warn!(error = %e, "adding quote failed");
        QotdError::from(e)
    })?;

    Ok(Json(persisted))
}

/// Quote routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/quotes", get(list_quotes).post(add_quote))
}
