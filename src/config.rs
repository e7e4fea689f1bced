use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::ingest::{DEFAULT_FINALIZE_DELAY, WatchdogConfig};

/// Upper bound for `watchdog.stale_threshold_secs` (10 years)
pub const MAX_STALE_THRESHOLD_SECS: u64 = 10 * 365 * 24 * 3600;

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub watchdog: WatchdogSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: LogRotation,
}

/// Log file rotation; unknown values fail config loading
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "payhook.log".to_string(),
            use_json: false,
            rotation: LogRotation::Daily,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Delay before an admitted transaction is finalized
    pub finalize_delay_ms: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            finalize_delay_ms: DEFAULT_FINALIZE_DELAY.as_millis() as u64,
        }
    }
}

impl ProcessingConfig {
    pub fn finalize_delay(&self) -> Duration {
        Duration::from_millis(self.finalize_delay_ms)
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Required when `backend: postgres`; `DATABASE_URL` overrides it
    pub postgres_url: Option<String>,
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            postgres_url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct WatchdogSettings {
    pub enabled: bool,
    pub scan_interval_secs: u64,
    pub stale_threshold_secs: u64,
    pub batch_size: usize,
}

impl Default for WatchdogSettings {
    fn default() -> Self {
        let defaults = WatchdogConfig::default();
        Self {
            enabled: true,
            scan_interval_secs: defaults.scan_interval.as_secs(),
            stale_threshold_secs: defaults.stale_threshold.as_secs(),
            batch_size: defaults.batch_size,
        }
    }
}

impl From<&WatchdogSettings> for WatchdogConfig {
    fn from(s: &WatchdogSettings) -> Self {
        WatchdogConfig {
            scan_interval: Duration::from_secs(s.scan_interval_secs),
            stale_threshold: Duration::from_secs(s.stale_threshold_secs),
            batch_size: s.batch_size,
        }
    }
}

impl AppConfig {
    /// Load `<config_dir>/<env>.yaml`
    pub fn load(config_dir: &Path, env: &str) -> Result<Self> {
        let config_path = config_dir.join(format!("{}.yaml", env));
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config yaml: {}", config_path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Range checks serde cannot express
    pub fn validate(&self) -> Result<()> {
        let w = &self.watchdog;
        ensure!(w.scan_interval_secs > 0, "watchdog.scan_interval_secs must be > 0");
        ensure!(w.batch_size > 0, "watchdog.batch_size must be > 0");
        ensure!(
            w.stale_threshold_secs <= MAX_STALE_THRESHOLD_SECS,
            "watchdog.stale_threshold_secs must be <= {}",
            MAX_STALE_THRESHOLD_SECS
        );
        Ok(())
    }

    /// Environment variables that take precedence over the file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL")
            && !url.is_empty()
        {
            self.store.postgres_url = Some(url);
        }
    }
}
