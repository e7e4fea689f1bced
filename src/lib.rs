//! Payhook - Idempotent Transaction Webhook Processor
//!
//! Accepts payment-transaction webhooks, acknowledges them immediately and
//! finalizes each transaction exactly once after a fixed delay.
//!
//! # Modules
//!
//! - [`ingest`] - Idempotency gate, deferred processor, lifecycle states, stores
//! - [`gateway`] - axum HTTP surface
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod gateway;
pub mod ingest;
pub mod logging;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use ingest::{
    AdmitOutcome, DeferredProcessor, IdempotencyGate, IngestCoordinator, IngestError,
    MemoryStore, PgTransactionStore, TransactionInput, TransactionRecord, TransactionStatus,
    TransactionStore,
};
