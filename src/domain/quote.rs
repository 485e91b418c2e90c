//! Quote entity and its validated, not-yet-persisted form.
//!
//! A [`NewQuote`] can only be built through [`NewQuote::new`], which
//! enforces the non-empty `text` invariant and applies the default
//! author. The store turns it into a [`Quote`] carrying the
//! backend-assigned identifier.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::QotdError;

/// Author substituted when a submission omits one or sends `""`.
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// A quote as stored in and returned from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Quote {
    /// Backend-assigned identifier. Absent only before insertion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<i64>,
    /// Quote body. Never empty.
    pub text: String,
    /// Attributed author. `"Unknown"` when none was supplied.
    pub author: String,
}

impl Quote {
    /// Builds a persisted quote from its row columns.
    #[must_use]
    pub fn from_row(quote_id: i64, text: String, author: String) -> Self {
        Self {
            quote_id: Some(quote_id),
            text,
            author,
        }
    }
}

/// A validated quote submission awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    text: String,
    author: String,
}

impl NewQuote {
    /// Validates a submission and applies the default author.
    ///
    /// # Errors
    ///
    /// Returns [`QotdError::InvalidRequest`] if `text` is missing or empty.
    pub fn new(text: Option<String>, author: Option<String>) -> Result<Self, QotdError> {
        let text = text
            .filter(|t| !t.is_empty())
            .ok_or_else(|| QotdError::InvalidRequest("missing required field: text".to_string()))?;
        let author = author
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
        Ok(Self { text, author })
    }

    /// Quote body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Author, already defaulted.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }
}
