//! API error type and error codes
//!
//! Success bodies are endpoint-specific; every error body is `{code, msg}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ingest::IngestError;

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Non-zero error code, see `error_codes`
    #[schema(example = 1001)]
    pub code: i32,
    #[schema(example = "Invalid payload: currency must not be empty")]
    pub msg: String,
}

/// Standard API error codes
pub mod error_codes {
    // Client errors (1xxx)
    pub const INVALID_PAYLOAD: i32 = 1001;

    // Resource errors (4xxx)
    pub const TRANSACTION_NOT_FOUND: i32 = 4001;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const STORE_UNAVAILABLE: i32 = 5001;
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            error_codes::INVALID_PAYLOAD,
            msg,
        )
    }

    /// Any body that fails to deserialize is a 422, whatever axum's default would be
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected webhook payload");
        Self::unprocessable(rejection.body_text())
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::Validation(_) => Self::unprocessable(e.to_string()),
            IngestError::NotFound(_) => Self::new(
                StatusCode::NOT_FOUND,
                error_codes::TRANSACTION_NOT_FOUND,
                "Transaction not found",
            ),
            IngestError::StoreUnavailable(_) => {
                tracing::error!(error = %e, code = e.code(), "Request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::STORE_UNAVAILABLE,
                    "Internal server error",
                )
            }
            IngestError::DispatchFailed(_) | IngestError::InvalidStateTransition(_) => {
                tracing::error!(error = %e, code = e.code(), "Request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::INTERNAL_ERROR,
                    "Internal server error",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            msg: self.msg,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_mapping() {
        let e: ApiError = IngestError::Validation("amount must be a finite number".into()).into();
        assert_eq!(e.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(e.code, error_codes::INVALID_PAYLOAD);

        let e: ApiError = IngestError::NotFound("t1".into()).into();
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.code, error_codes::TRANSACTION_NOT_FOUND);

        let e: ApiError = IngestError::StoreUnavailable("connection refused".into()).into();
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.code, error_codes::STORE_UNAVAILABLE);
    }

    #[test]
    fn test_store_failure_hides_details() {
        let e: ApiError =
            IngestError::StoreUnavailable("password authentication failed".into()).into();
        assert!(!e.msg.contains("password"));
    }
}
