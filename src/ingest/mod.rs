//! Idempotent Transaction Ingestion
//!
//! Accepts payment-transaction webhooks, acknowledges immediately, and
//! finalizes each transaction exactly once after a fixed delay.
//!
//! # State Machine
//!
//! ```text
//! webhook → IdempotencyGate ──(new)──→ PROCESSING ──(DeferredProcessor, +delay)──→ PROCESSED
//!                  │
//!                  └──(seen)──→ Duplicate (no write, no scheduling)
//! ```
//!
//! # Safety Invariants
//!
//! 1. **Conditional Insert**: the store's insert succeeds at most once per id;
//!    losing a race is a duplicate, never a second admission
//! 2. **Write-Before-Schedule**: finalization is scheduled only after the create
//!    write has durably returned
//! 3. **Forward Only**: status moves `PROCESSING → PROCESSED` exactly once, enforced
//!    by a CAS in the store
//! 4. **No Retry**: a failed finalization leaves the record `PROCESSING`; the
//!    watchdog reports it

pub mod coordinator;
pub mod error;
pub mod gate;
pub mod processor;
pub mod state;
pub mod store;
pub mod types;
pub mod watchdog;

// Re-exports for convenience
pub use coordinator::IngestCoordinator;
pub use error::IngestError;
pub use gate::IdempotencyGate;
pub use processor::{DEFAULT_FINALIZE_DELAY, DeferredProcessor};
pub use state::TransactionStatus;
pub use store::{MemoryStore, PgTransactionStore, TransactionStore};
pub use types::{
    AdmitOutcome, InsertOutcome, TransactionId, TransactionInput, TransactionRecord,
    TransactionUpdate, UpdateOutcome,
};
pub use watchdog::{StaleTransactionWatchdog, WatchdogConfig};
