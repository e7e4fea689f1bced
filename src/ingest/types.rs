//! Ingestion Core Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::IngestError;
use super::state::TransactionStatus;

/// Transaction identifier, supplied by the webhook sender
pub type TransactionId = String;

/// Caller-supplied transaction fields, as delivered by the webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TransactionInput {
    #[schema(example = "txn_test_001")]
    pub transaction_id: TransactionId,
    #[schema(example = "acc_user_001")]
    pub source_account: String,
    #[schema(example = "acc_merchant_001")]
    pub destination_account: String,
    #[schema(example = 2500.50)]
    pub amount: f64,
    #[schema(example = "USD")]
    pub currency: String,
}

impl TransactionInput {
    /// Check field constraints. Sign and range of `amount` are not constrained.
    pub fn validate(&self) -> Result<(), IngestError> {
        let required = [
            ("transaction_id", &self.transaction_id),
            ("source_account", &self.source_account),
            ("destination_account", &self.destination_account),
            ("currency", &self.currency),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(IngestError::Validation(format!("{} must not be empty", field)));
            }
        }

        if !self.amount.is_finite() {
            return Err(IngestError::Validation(
                "amount must be a finite number".to_string(),
            ));
        }

        Ok(())
    }
}

/// Persisted transaction record
///
/// `processed_at` is `Some` exactly when `status` is `PROCESSED`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub source_account: String,
    pub destination_account: String,
    pub amount: f64,
    pub currency: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl TransactionRecord {
    /// Build the initial record written on first sighting of an id
    pub fn admitted(input: TransactionInput, now: DateTime<Utc>) -> Self {
        Self {
            transaction_id: input.transaction_id,
            source_account: input.source_account,
            destination_account: input.destination_account,
            amount: input.amount,
            currency: input.currency,
            status: TransactionStatus::Processing,
            created_at: now,
            processed_at: None,
        }
    }

    /// Apply a field update in place, refusing illegal transitions.
    ///
    /// `created_at` and the caller-supplied fields are never touched.
    pub fn apply(&mut self, update: &TransactionUpdate) -> Result<(), IngestError> {
        if !self.status.can_transition_to(update.status) {
            return Err(IngestError::InvalidStateTransition(format!(
                "{}: {} -> {}",
                self.transaction_id, self.status, update.status
            )));
        }
        self.status = update.status;
        self.processed_at = Some(update.processed_at);
        Ok(())
    }

    /// Lifecycle invariant: timestamp present iff terminal
    pub fn is_consistent(&self) -> bool {
        self.status.is_terminal() == self.processed_at.is_some()
    }
}

/// Fields written by finalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionUpdate {
    pub status: TransactionStatus,
    pub processed_at: DateTime<Utc>,
}

impl TransactionUpdate {
    pub fn processed(at: DateTime<Utc>) -> Self {
        Self {
            status: TransactionStatus::Processed,
            processed_at: at,
        }
    }
}

/// Result of the idempotency gate
#[derive(Debug, Clone, PartialEq)]
pub enum AdmitOutcome {
    /// First sighting; the record is durable and finalization must be scheduled
    Admitted(TransactionRecord),
    /// Id already known; nothing was written
    Duplicate,
}

impl AdmitOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmitOutcome::Admitted(_))
    }
}

/// Result of a conditional insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// Result of a keyed field update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
    /// Record exists but its status does not allow the transition
    Rejected { current: TransactionStatus },
}
