//! Quote request DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::NewQuote;
use crate::error::QotdError;

/// Request body for `POST /quotes`.
///
/// Both fields are optional at the wire level so that a missing `text`
/// is reported as a validation error rather than a body rejection.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddQuoteRequest {
    /// Quote body. Required and non-empty.
    #[serde(default)]
    pub text: Option<String>,
    /// Author. Absent or empty becomes `"Unknown"`.
    #[serde(default)]
    pub author: Option<String>,
}

impl TryFrom<AddQuoteRequest> for NewQuote {
    type Error = QotdError;

    fn try_from(req: AddQuoteRequest) -> Result<Self, Self::Error> {
        Self::new(req.text, req.author)
    }
}
