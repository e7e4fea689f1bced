//! In-process transaction store
//!
//! Backed by a `DashMap`; the shard lock held by `entry()` makes the
//! conditional insert atomic. Only valid for a single server process.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::TransactionStore;
use crate::ingest::error::IngestError;
use crate::ingest::state::TransactionStatus;
use crate::ingest::types::{InsertOutcome, TransactionRecord, TransactionUpdate, UpdateOutcome};

#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, TransactionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn find_by_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<TransactionRecord>, IngestError> {
        Ok(self.records.get(transaction_id).map(|r| r.value().clone()))
    }

    async fn insert_if_absent(
        &self,
        record: &TransactionRecord,
    ) -> Result<InsertOutcome, IngestError> {
        match self.records.entry(record.transaction_id.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn update_fields(
        &self,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<UpdateOutcome, IngestError> {
        let Some(mut record) = self.records.get_mut(transaction_id) else {
            return Ok(UpdateOutcome::NotFound);
        };

        let current = record.status;
        match record.apply(&update) {
            Ok(()) => Ok(UpdateOutcome::Updated),
            Err(_) => Ok(UpdateOutcome::Rejected { current }),
        }
    }

    async fn find_stale(
        &self,
        older_than: Duration,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, IngestError> {
        // A threshold reaching before the representable range matches nothing
        let Some(cutoff) = chrono::Duration::from_std(older_than)
            .ok()
            .and_then(|threshold| Utc::now().checked_sub_signed(threshold))
        else {
            return Ok(Vec::new());
        };

        let mut stale: Vec<TransactionRecord> = self
            .records
            .iter()
            .filter(|r| r.status == TransactionStatus::Processing && r.created_at < cutoff)
            .map(|r| r.value().clone())
            .collect();

        stale.sort_by_key(|r| r.created_at);
        stale.truncate(limit);
        Ok(stale)
    }

    async fn ping(&self) -> Result<(), IngestError> {
        Ok(())
    }
}
