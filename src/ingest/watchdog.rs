//! Stale Transaction Watchdog
//!
//! Background worker that reports transactions stuck in `PROCESSING`.
//! It only reports; it never mutates records or retries finalization.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::error::IngestError;
use super::store::TransactionStore;

/// Configuration for the watchdog
#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// How often to scan
    pub scan_interval: Duration,
    /// How long a record may stay PROCESSING before it is reported
    pub stale_threshold: Duration,
    /// Maximum records reported per scan
    pub batch_size: usize,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(60),
            stale_threshold: Duration::from_secs(120), // 4x the default finalize delay
            batch_size: 100,
        }
    }
}

pub struct StaleTransactionWatchdog {
    store: Arc<dyn TransactionStore>,
    config: WatchdogConfig,
}

impl StaleTransactionWatchdog {
    pub fn new(store: Arc<dyn TransactionStore>, config: WatchdogConfig) -> Self {
        Self { store, config }
    }

    pub fn with_defaults(store: Arc<dyn TransactionStore>) -> Self {
        Self::new(store, WatchdogConfig::default())
    }

    /// Run the scan loop forever
    pub async fn run(&self) -> ! {
        info!(
            scan_interval_secs = self.config.scan_interval.as_secs(),
            stale_threshold_secs = self.config.stale_threshold.as_secs(),
            "Starting stale transaction watchdog"
        );

        loop {
            if let Err(e) = self.scan().await {
                error!(error = %e, "Stale transaction scan failed");
            }

            tokio::time::sleep(self.config.scan_interval).await;
        }
    }

    /// Run a single scan, returning the number of stuck records reported
    pub async fn scan(&self) -> Result<usize, IngestError> {
        let stale = self
            .store
            .find_stale(self.config.stale_threshold, self.config.batch_size)
            .await?;

        if stale.is_empty() {
            debug!("No stale transactions found");
            return Ok(0);
        }

        let now = Utc::now();
        for record in &stale {
            warn!(
                transaction_id = %record.transaction_id,
                created_at = %record.created_at,
                age_secs = (now - record.created_at).num_seconds(),
                "Transaction stuck in PROCESSING"
            );
        }

        warn!(count = stale.len(), "Stale transactions this scan");
        Ok(stale.len())
    }
}
