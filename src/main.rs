//! Payhook - transaction webhook server
//!
//! ```text
//! POST /v1/webhooks/transactions ─▶ IdempotencyGate ─▶ TransactionStore
//!                 │                        │ (Admitted)
//!               202                        ▼
//!                                  DeferredProcessor ──(+delay)──▶ PROCESSED
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use payhook::config::{AppConfig, StoreBackend, StoreConfig};
use payhook::gateway::{self, state::AppState};
use payhook::ingest::{
    IngestCoordinator, MemoryStore, PgTransactionStore, StaleTransactionWatchdog,
    TransactionStore, WatchdogConfig,
};

#[derive(Parser, Debug)]
#[command(name = "payhook")]
#[command(about = "Idempotent payment-transaction webhook processor")]
struct Cli {
    /// Config environment; loads <config-dir>/<env>.yaml
    #[arg(short, long, default_value = "dev", env = "PAYHOOK_ENV")]
    env: String,

    /// Directory holding the YAML config files
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Override gateway.port
    #[arg(long)]
    port: Option<u16>,
}

async fn build_store(config: &StoreConfig) -> Result<Arc<dyn TransactionStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store: records are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .postgres_url
                .as_deref()
                .context("store.backend is postgres but no postgres_url / DATABASE_URL is set")?;
            let store = PgTransactionStore::connect(url, config.max_connections)
                .await
                .context("Failed to connect to PostgreSQL")?;
            store
                .init_schema()
                .await
                .context("Failed to initialize transactions schema")?;
            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app_config = AppConfig::load(&cli.config_dir, &cli.env)?;
    app_config.apply_env_overrides();
    if let Some(port) = cli.port {
        app_config.gateway.port = port;
    }

    let _log_guard = payhook::logging::init_logging(&app_config.logging);

    tracing::info!(
        env = %cli.env,
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        "Starting payhook"
    );

    let store = build_store(&app_config.store).await?;
    store
        .ping()
        .await
        .context("Transaction store is not reachable")?;
    tracing::info!(store = store.name(), "Transaction store ready");

    if app_config.watchdog.enabled {
        let watchdog =
            StaleTransactionWatchdog::new(store.clone(), WatchdogConfig::from(&app_config.watchdog));
        tokio::spawn(async move {
            watchdog.run().await;
        });
    }

    let finalize_delay = app_config.processing.finalize_delay();
    tracing::info!(
        finalize_delay_ms = finalize_delay.as_millis() as u64,
        "Deferred processor configured"
    );
    let coordinator = Arc::new(IngestCoordinator::new(store, finalize_delay));

    let state = Arc::new(AppState::new(coordinator));
    gateway::run_server(&app_config.gateway, state).await
}
