//! HTTP handlers

pub mod health;
pub mod transaction;
pub mod webhook;

pub use health::health_check;
pub use transaction::get_transaction;
pub use webhook::receive_webhook;
