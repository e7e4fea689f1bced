//! Health check handler

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "HEALTHY")]
    pub status: String,
    /// ISO-8601 UTC server time
    #[schema(example = "2025-01-01T12:00:00.000000Z")]
    pub current_time: String,
}

/// Health check endpoint
///
/// Liveness only: the store is not probed, so an unreachable store shows up
/// on the webhook path as 500s rather than here.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json")
    ),
    tag = "System"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "HEALTHY".to_string(),
        current_time: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}
