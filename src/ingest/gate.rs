//! Idempotency Gate
//!
//! Decides whether an incoming transaction is new or a duplicate, and
//! durably records it on first sighting.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::error::IngestError;
use super::store::TransactionStore;
use super::types::{AdmitOutcome, InsertOutcome, TransactionInput, TransactionRecord};

pub struct IdempotencyGate {
    store: Arc<dyn TransactionStore>,
}

impl IdempotencyGate {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    /// Admit a transaction
    ///
    /// Returns `Admitted` only after the create write has durably succeeded.
    /// The lookup is a fast path for redeliveries; the conditional insert is
    /// what actually decides, so two racing first deliveries yield exactly
    /// one `Admitted`.
    pub async fn admit(&self, input: TransactionInput) -> Result<AdmitOutcome, IngestError> {
        input.validate()?;

        if self.store.find_by_id(&input.transaction_id).await?.is_some() {
            info!(
                transaction_id = %input.transaction_id,
                "Duplicate transaction received"
            );
            return Ok(AdmitOutcome::Duplicate);
        }

        let record = TransactionRecord::admitted(input, Utc::now());

        match self.store.insert_if_absent(&record).await? {
            InsertOutcome::Inserted => {
                debug!(
                    transaction_id = %record.transaction_id,
                    store = self.store.name(),
                    "Transaction recorded as PROCESSING"
                );
                Ok(AdmitOutcome::Admitted(record))
            }
            InsertOutcome::AlreadyExists => {
                info!(
                    transaction_id = %record.transaction_id,
                    "Concurrent first delivery lost the insert race - treating as duplicate"
                );
                Ok(AdmitOutcome::Duplicate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::state::TransactionStatus;
    use crate::ingest::store::MemoryStore;

    fn input(id: &str) -> TransactionInput {
        TransactionInput {
            transaction_id: id.to_string(),
            source_account: "acc_user_001".to_string(),
            destination_account: "acc_merchant_001".to_string(),
            amount: 2500.50,
            currency: "USD".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_sighting_is_admitted() {
        let store = Arc::new(MemoryStore::new());
        let gate = IdempotencyGate::new(store.clone());

        let outcome = gate.admit(input("t1")).await.unwrap();
        let AdmitOutcome::Admitted(record) = outcome else {
            panic!("expected Admitted");
        };
        assert_eq!(record.status, TransactionStatus::Processing);

        let stored = store.find_by_id("t1").await.unwrap().unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_redelivery_is_duplicate_and_leaves_record_untouched() {
        let store = Arc::new(MemoryStore::new());
        let gate = IdempotencyGate::new(store.clone());

        gate.admit(input("t1")).await.unwrap();
        let before = store.find_by_id("t1").await.unwrap().unwrap();

        let mut changed = input("t1");
        changed.amount = 1.0;
        for _ in 0..3 {
            assert_eq!(
                gate.admit(changed.clone()).await.unwrap(),
                AdmitOutcome::Duplicate
            );
        }

        let after = store.find_by_id("t1").await.unwrap().unwrap();
        assert_eq!(before, after);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let gate = IdempotencyGate::new(store.clone());

        let mut bad = input("t1");
        bad.source_account = String::new();

        let err = gate.admit(bad).await.unwrap_err();
        assert!(matches!(err, IngestError::Validation(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_first_deliveries_admit_once() {
        let store = Arc::new(MemoryStore::new());
        let gate = Arc::new(IdempotencyGate::new(store.clone()));

        let mut handles = Vec::new();
        for _ in 0..50 {
            let gate = gate.clone();
            handles.push(tokio::spawn(async move { gate.admit(input("race")).await }));
        }

        let mut admitted = 0;
        for h in handles {
            if h.await.unwrap().unwrap().is_admitted() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(store.len(), 1);
    }
}
