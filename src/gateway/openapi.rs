//! OpenAPI Documentation
//!
//! - OpenAPI JSON: `http://localhost:8000/api-docs/openapi.json`

use axum::Json;
use utoipa::OpenApi;

use crate::gateway::handlers::health::HealthResponse;
use crate::gateway::types::ErrorBody;
use crate::ingest::{TransactionInput, TransactionRecord, TransactionStatus};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payhook Transaction Webhook API",
        version = "1.0.0",
        description = "Idempotent payment-transaction webhook ingestion with deferred processing.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::webhook::receive_webhook,
        crate::gateway::handlers::transaction::get_transaction,
    ),
    components(schemas(
        HealthResponse,
        ErrorBody,
        TransactionInput,
        TransactionRecord,
        TransactionStatus,
    )),
    tags(
        (name = "System", description = "Liveness"),
        (name = "Webhooks", description = "Inbound transaction notifications"),
        (name = "Transactions", description = "Transaction state queries")
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_public_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/"));
        assert!(paths.iter().any(|p| p.as_str() == "/v1/webhooks/transactions"));
        assert!(
            paths
                .iter()
                .any(|p| p.as_str() == "/v1/transactions/{transaction_id}")
        );
    }
}
