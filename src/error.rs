//! Error types for startup, storage, and the HTTP boundary.
//!
//! [`SetupError`] is fatal to startup. [`StoreError`] is raised per
//! request by the quote store. [`QotdError`] is the HTTP-facing error:
//! each variant maps to a status code and a structured JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::persistence::bootstrap::BootstrapStep;

/// Structured JSON error response body.
///
/// All error responses except [`QotdError::QuotesUnavailable`] follow
/// this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: missing required field: text",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Failure while preparing the backend. Aborts startup.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The database pool could not be opened.
    #[error("failed to open database: {0}")]
    Open(#[source] sqlx::Error),

    /// The configuration cannot be served.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An override script could not be read from disk.
    #[error("failed to read {step} script from {path}: {source}")]
    ScriptRead {
        /// Step the script belongs to.
        step: BootstrapStep,
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No connection could be acquired for a step.
    #[error("failed to acquire connection for {step} step: {source}")]
    Connection {
        /// Step that needed the connection.
        step: BootstrapStep,
        /// Underlying driver error.
        #[source]
        source: sqlx::Error,
    },

    /// A script was rejected by the backend.
    #[error("{step} script failed: {source}")]
    Script {
        /// Step whose script failed.
        step: BootstrapStep,
        /// Underlying driver error.
        #[source]
        source: sqlx::Error,
    },
}

/// Failure of a single quote store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Bootstrap has not completed yet.
    #[error("quote store is not ready")]
    NotReady,

    /// Backend unreachable, pool exhausted, or pool closed.
    #[error("connection unavailable: {0}")]
    Connection(#[source] sqlx::Error),

    /// Statement failed after a connection was obtained.
    #[error("statement failed: {0}")]
    Persistence(#[source] sqlx::Error),
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status                |
/// |-----------|------------|----------------------------|
/// | 1000–1999 | Validation | 400 Bad Request            |
/// | 2000–2999 | Not Found  | 404 Not Found              |
/// | 3000–3999 | Server     | 500 / 503                  |
#[derive(Debug, thiserror::Error)]
pub enum QotdError {
    /// Request validation failed (missing `text`, malformed body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Listing quotes failed. Rendered as a bare 404.
    #[error("quotes unavailable")]
    QuotesUnavailable,

    /// Bootstrap has not completed.
    #[error("service is not ready")]
    NotReady,

    /// No backend connection could be obtained.
    #[error("database connection unavailable")]
    Connection,

    /// The backend rejected the statement.
    #[error("failed to persist quote")]
    Persistence,
}

impl QotdError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::QuotesUnavailable => 2001,
            Self::Persistence => 3001,
            Self::NotReady => 3002,
            Self::Connection => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::QuotesUnavailable => StatusCode::NOT_FOUND,
            Self::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            Self::Connection | Self::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for QotdError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotReady => Self::NotReady,
            StoreError::Connection(_) => Self::Connection,
            StoreError::Persistence(_) => Self::Persistence,
        }
    }
}

impl IntoResponse for QotdError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if matches!(self, Self::QuotesUnavailable) {
            return status.into_response();
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
