//! Deferred Processor
//!
//! Finalizes an admitted transaction after a fixed delay. Each unit of work
//! is a detached tokio task: it outlives the request that scheduled it and
//! reports only through logs and the record's later state.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

use super::error::IngestError;
use super::store::TransactionStore;
use super::types::{TransactionUpdate, UpdateOutcome};

/// Stand-in for the external settlement call
pub const DEFAULT_FINALIZE_DELAY: Duration = Duration::from_secs(30);

pub struct DeferredProcessor {
    store: Arc<dyn TransactionStore>,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
}

impl DeferredProcessor {
    pub fn new(store: Arc<dyn TransactionStore>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_default_delay(store: Arc<dyn TransactionStore>) -> Self {
        Self::new(store, DEFAULT_FINALIZE_DELAY)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Scheduled finalizations that have not finished yet
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Dispatch a finalization task
    ///
    /// Never blocks. Fails only when there is no runtime to spawn onto; the
    /// error is returned, not logged.
    pub fn schedule(&self, transaction_id: String) -> Result<(), IngestError> {
        let handle =
            Handle::try_current().map_err(|e| IngestError::DispatchFailed(e.to_string()))?;

        let store = self.store.clone();
        let delay = self.delay;
        let in_flight = self.in_flight.clone();
        in_flight.fetch_add(1, Ordering::SeqCst);

        handle.spawn(async move {
            finalize(store.as_ref(), &transaction_id, delay).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });

        Ok(())
    }

    /// Run one finalization inline (wait, then mark PROCESSED)
    pub async fn finalize(&self, transaction_id: &str) {
        finalize(self.store.as_ref(), transaction_id, self.delay).await;
    }
}

async fn finalize(store: &dyn TransactionStore, transaction_id: &str, delay: Duration) {
    info!(
        transaction_id = %transaction_id,
        delay_ms = delay.as_millis() as u64,
        "Starting processing"
    );

    tokio::time::sleep(delay).await;

    let update = TransactionUpdate::processed(Utc::now());
    match store.update_fields(transaction_id, update).await {
        Ok(UpdateOutcome::Updated) => {
            info!(transaction_id = %transaction_id, "Transaction processed");
        }
        Ok(UpdateOutcome::NotFound) => {
            error!(
                transaction_id = %transaction_id,
                "Finalization target vanished from store"
            );
        }
        Ok(UpdateOutcome::Rejected { current }) => {
            warn!(
                transaction_id = %transaction_id,
                current = %current,
                "Finalization rejected by current status"
            );
        }
        Err(e) => {
            // No retry: the record stays PROCESSING and the watchdog reports it
            error!(
                transaction_id = %transaction_id,
                error = %e,
                "Finalization failed"
            );
        }
    }
}
