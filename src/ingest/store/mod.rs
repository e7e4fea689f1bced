//! Transaction Store
//!
//! The durable collaborator behind the idempotency gate and the deferred
//! processor. All mutation is keyed by transaction id and scoped to a single
//! record; correctness rests on `insert_if_absent` being atomic per id.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgTransactionStore;

use std::time::Duration;

use async_trait::async_trait;

use super::error::IngestError;
use super::types::{InsertOutcome, TransactionRecord, TransactionUpdate, UpdateOutcome};

/// Transaction store operations
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Point lookup by transaction id
    async fn find_by_id(&self, transaction_id: &str)
    -> Result<Option<TransactionRecord>, IngestError>;

    /// Conditional insert
    ///
    /// # Atomicity
    /// Succeeds at most once per `transaction_id` across all concurrent callers.
    /// Every other caller observes `AlreadyExists`.
    async fn insert_if_absent(&self, record: &TransactionRecord)
    -> Result<InsertOutcome, IngestError>;

    /// Compare-and-set field update
    ///
    /// Applies only when the stored status may legally move to `update.status`.
    async fn update_fields(
        &self,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<UpdateOutcome, IngestError>;

    /// Records still `PROCESSING` whose `created_at` is older than `older_than`,
    /// oldest first, at most `limit`.
    async fn find_stale(
        &self,
        older_than: Duration,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, IngestError>;

    /// Connectivity check
    async fn ping(&self) -> Result<(), IngestError>;
}
