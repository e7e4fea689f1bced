//! Transaction webhook receiver

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ErrorBody};
use crate::ingest::TransactionInput;

/// Receive a transaction webhook
///
/// POST /v1/webhooks/transactions
///
/// Acknowledges with 202 and an empty body for both new and duplicate
/// deliveries. Processing happens later, off the request path.
#[utoipa::path(
    post,
    path = "/v1/webhooks/transactions",
    request_body(content = TransactionInput, content_type = "application/json"),
    responses(
        (status = 202, description = "Accepted (new or duplicate)"),
        (status = 422, description = "Malformed or missing fields", body = ErrorBody),
        (status = 500, description = "Transaction store unavailable", body = ErrorBody)
    ),
    tag = "Webhooks"
)]
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(input) = payload.map_err(ApiError::from_rejection)?;

    state.coordinator.receive(input).await?;

    Ok(StatusCode::ACCEPTED)
}
