//! Ingestion Error Types

use thiserror::Error;

/// Ingestion error types
///
/// `Validation` and `NotFound` are expected, caller-facing outcomes.
/// Everything else is an infrastructure failure.
#[derive(Error, Debug, Clone)]
pub enum IngestError {
    #[error("Invalid payload: {0}")]
    Validation(String),

    #[error("Transaction not found: {0}")]
    NotFound(String),

    #[error("Transaction store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Failed to dispatch finalization: {0}")]
    DispatchFailed(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl IngestError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::Validation(_) => "VALIDATION_ERROR",
            IngestError::NotFound(_) => "TRANSACTION_NOT_FOUND",
            IngestError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            IngestError::DispatchFailed(_) => "DISPATCH_FAILED",
            IngestError::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            IngestError::Validation(_) => 422,
            IngestError::NotFound(_) => 404,
            IngestError::StoreUnavailable(_)
            | IngestError::DispatchFailed(_)
            | IngestError::InvalidStateTransition(_) => 500,
        }
    }
}

impl From<sqlx::Error> for IngestError {
    fn from(e: sqlx::Error) -> Self {
        IngestError::StoreUnavailable(e.to_string())
    }
}
