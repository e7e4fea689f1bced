use std::sync::Arc;

use crate::ingest::IngestCoordinator;

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    /// Admission + deferred finalization
    pub coordinator: Arc<IngestCoordinator>,
}

impl AppState {
    pub fn new(coordinator: Arc<IngestCoordinator>) -> Self {
        Self { coordinator }
    }
}
