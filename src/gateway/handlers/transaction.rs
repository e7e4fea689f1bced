//! Transaction query handler

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use super::super::state::AppState;
use super::super::types::{ApiResult, ErrorBody};
use crate::ingest::TransactionRecord;

/// Get transaction status
///
/// GET /v1/transactions/{transaction_id}
#[utoipa::path(
    get,
    path = "/v1/transactions/{transaction_id}",
    params(
        ("transaction_id" = String, Path, description = "Sender-supplied transaction id")
    ),
    responses(
        (status = 200, description = "Current transaction state", body = TransactionRecord),
        (status = 404, description = "Transaction not found", body = ErrorBody),
        (status = 500, description = "Transaction store unavailable", body = ErrorBody)
    ),
    tag = "Transactions"
)]
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<String>,
) -> ApiResult<Json<TransactionRecord>> {
    let record = state.coordinator.lookup(&transaction_id).await?;
    Ok(Json(record))
}
