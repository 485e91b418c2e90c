//! OpenAPI document for the REST endpoints.

use utoipa::OpenApi;

use super::dto::AddQuoteRequest;
use super::handlers::{quotes, system};
use crate::domain::Quote;
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI description, served by Swagger UI when the
/// `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "qotd-gateway",
        description = "Quote-of-the-day REST API. New quotes are also pushed over the realtime WebSocket channel."
    ),
    paths(quotes::list_quotes, quotes::add_quote, system::health_handler),
    components(schemas(Quote, AddQuoteRequest, ErrorResponse, ErrorBody, system::HealthResponse)),
    tags(
        (name = "Quotes", description = "Read and submit quotes"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_quote_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/quotes"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
