//! Ingest Coordinator
//!
//! Wires the idempotency gate to the deferred processor. Scheduling happens
//! only on `Admitted`, and only after the create write has returned.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use super::error::IngestError;
use super::gate::IdempotencyGate;
use super::processor::DeferredProcessor;
use super::store::TransactionStore;
use super::types::{AdmitOutcome, TransactionInput, TransactionRecord};

pub struct IngestCoordinator {
    store: Arc<dyn TransactionStore>,
    gate: IdempotencyGate,
    processor: DeferredProcessor,
}

impl IngestCoordinator {
    pub fn new(store: Arc<dyn TransactionStore>, finalize_delay: Duration) -> Self {
        Self {
            gate: IdempotencyGate::new(store.clone()),
            processor: DeferredProcessor::new(store.clone(), finalize_delay),
            store,
        }
    }

    pub fn processor(&self) -> &DeferredProcessor {
        &self.processor
    }

    /// Accept a webhook delivery
    ///
    /// A dispatch failure after a durable insert does not fail the request:
    /// the record is already admitted and will surface as stuck PROCESSING.
    pub async fn receive(&self, input: TransactionInput) -> Result<AdmitOutcome, IngestError> {
        let outcome = self.gate.admit(input).await?;

        if let AdmitOutcome::Admitted(ref record) = outcome {
            match self.processor.schedule(record.transaction_id.clone()) {
                Ok(()) => info!(
                    transaction_id = %record.transaction_id,
                    "Transaction queued for processing"
                ),
                Err(e) => error!(
                    transaction_id = %record.transaction_id,
                    error = %e,
                    "Transaction admitted but finalization was not scheduled"
                ),
            }
        }

        Ok(outcome)
    }

    /// Current durable state of a transaction
    pub async fn lookup(&self, transaction_id: &str) -> Result<TransactionRecord, IngestError> {
        self.store
            .find_by_id(transaction_id)
            .await?
            .ok_or_else(|| IngestError::NotFound(transaction_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::state::TransactionStatus;
    use crate::ingest::store::MemoryStore;
    use crate::ingest::types::{InsertOutcome, TransactionUpdate, UpdateOutcome};
    use async_trait::async_trait;

    /// Store whose lookups always miss, so every delivery reaches the insert
    #[derive(Default)]
    struct BlindReadStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl TransactionStore for BlindReadStore {
        fn name(&self) -> &'static str {
            "blind-read"
        }

        async fn find_by_id(
            &self,
            _transaction_id: &str,
        ) -> Result<Option<TransactionRecord>, IngestError> {
            tokio::task::yield_now().await;
            Ok(None)
        }

        async fn insert_if_absent(
            &self,
            record: &TransactionRecord,
        ) -> Result<InsertOutcome, IngestError> {
            self.inner.insert_if_absent(record).await
        }

        async fn update_fields(
            &self,
            transaction_id: &str,
            update: TransactionUpdate,
        ) -> Result<UpdateOutcome, IngestError> {
            self.inner.update_fields(transaction_id, update).await
        }

        async fn find_stale(
            &self,
            older_than: Duration,
            limit: usize,
        ) -> Result<Vec<TransactionRecord>, IngestError> {
            self.inner.find_stale(older_than, limit).await
        }

        async fn ping(&self) -> Result<(), IngestError> {
            Ok(())
        }
    }

    fn input(id: &str) -> TransactionInput {
        TransactionInput {
            transaction_id: id.to_string(),
            source_account: "acc_user_001".to_string(),
            destination_account: "acc_merchant_001".to_string(),
            amount: 1002.0,
            currency: "INR".to_string(),
        }
    }

    #[tokio::test]
    async fn test_lookup_unknown_is_not_found() {
        let coordinator =
            IngestCoordinator::new(Arc::new(MemoryStore::new()), Duration::from_millis(10));

        let err = coordinator.lookup("txn_does_not_exist").await.unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_only_admitted_schedules_finalization() {
        let coordinator =
            IngestCoordinator::new(Arc::new(MemoryStore::new()), Duration::from_secs(60));

        assert!(coordinator.receive(input("t1")).await.unwrap().is_admitted());
        assert_eq!(coordinator.processor().in_flight(), 1);

        for _ in 0..3 {
            assert_eq!(
                coordinator.receive(input("t1")).await.unwrap(),
                AdmitOutcome::Duplicate
            );
        }
        assert_eq!(coordinator.processor().in_flight(), 1);
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let coordinator =
            IngestCoordinator::new(Arc::new(MemoryStore::new()), Duration::from_millis(50));

        coordinator.receive(input("t1")).await.unwrap();
        let record = coordinator.lookup("t1").await.unwrap();
        assert_eq!(record.status, TransactionStatus::Processing);
        assert!(record.processed_at.is_none());

        tokio::time::sleep(Duration::from_millis(300)).await;

        let record = coordinator.lookup("t1").await.unwrap();
        assert_eq!(record.status, TransactionStatus::Processed);
        assert!(record.processed_at.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_insert_race_losers_are_duplicates() {
        let store = Arc::new(BlindReadStore::default());
        let coordinator = Arc::new(IngestCoordinator::new(
            store.clone(),
            Duration::from_secs(60),
        ));

        let mut handles = Vec::new();
        for _ in 0..64 {
            let coordinator = coordinator.clone();
            handles.push(tokio::spawn(async move {
                coordinator.receive(input("race")).await
            }));
        }

        let mut admitted = 0;
        let mut duplicate = 0;
        for h in handles {
            match h.await.unwrap().unwrap() {
                AdmitOutcome::Admitted(_) => admitted += 1,
                AdmitOutcome::Duplicate => duplicate += 1,
            }
        }

        assert_eq!(admitted, 1);
        assert_eq!(duplicate, 63);
        assert_eq!(coordinator.processor().in_flight(), 1);
        assert_eq!(store.inner.len(), 1);
    }
}
