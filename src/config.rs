//! Configuration

use std::{path::PathBuf, time::Duration};

use config::Config;
use serde::Deserialize;

use crate::view::PaginationMode;

/// Environment variable holding an explicit config file path
pub const CONFIG_PATH_VAR: &str = "PULSE_CONFIG";

/// Config file looked up in the working directory
const DEFAULT_CONFIG_FILE: &str = "pulse";

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Article API config
    pub api: ApiConfig,
    /// View config
    pub view: ViewConfig,
    /// Local storage config
    #[serde(default)]
    pub storage: StorageConfig,
    /// Offline cache config
    pub offline: OfflineConfig,
    /// Trace configuration
    pub trace: TraceConfig,
}

/// Application configuration error
#[derive(Debug, thiserror::Error)]
pub enum AppConfigError {
    /// A source could not be read or a value has the wrong shape
    #[error("invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
    /// No storage directory configured and none could be derived
    #[error("no data directory available, set storage.dir")]
    NoDataDir,
    /// Invalid offline origin
    #[error("invalid offline origin: {0}")]
    InvalidOrigin(String),
}

impl AppConfig {
    /// Loads the configuration
    ///
    /// Sources, lowest priority first: defaults, the file named by
    /// `PULSE_CONFIG` (or `pulse.toml` in the working directory), then
    /// `PULSE_*` environment variables with `__` as the nesting separator.
    pub fn load() -> Result<Self, AppConfigError> {
        let file = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::load_from(&file)
    }

    /// Loads the configuration using a given config file (which may be missing)
    pub fn load_from(file: &str) -> Result<Self, AppConfigError> {
        let config = Self::defaults()?
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("PULSE")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize::<AppConfig>()?)
    }

    /// Returns a builder seeded with the default values
    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, AppConfigError> {
        Ok(Config::builder()
            .set_default("api.url", "http://localhost:8000/api/v1")?
            .set_default("view.pagination", "infinite-scroll")?
            .set_default("view.search_debounce_ms", 500_i64)?
            .set_default("view.sync_grace_ms", 3000_i64)?
            .set_default("offline.cache_name", "pulse-news-v1")?
            .set_default("offline.origin", "http://localhost:8080/")?
            .set_default("offline.api_namespace", "/api/v1")?
            .set_default("trace.stdout", true)?
            .set_default("trace.filter", "pulse=info,pulse_client=info")?)
    }
}

/// Article API configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL
    pub url: String,
}

impl ApiConfig {
    /// Returns the API client
    pub fn client(&self) -> pulse_client::Client {
        pulse_client::Client::new(&self.url)
    }
}

/// View configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    /// Pagination strategy
    pub pagination: PaginationMode,
    /// Quiet period before a search is committed
    pub search_debounce_ms: u64,
    /// Delay between a sync request and the re-fetch
    pub sync_grace_ms: u64,
}

impl ViewConfig {
    /// Returns the search quiet period
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Returns the sync grace period
    pub fn sync_grace(&self) -> Duration {
        Duration::from_millis(self.sync_grace_ms)
    }
}

/// Local storage configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Storage directory
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Returns the storage directory
    pub fn dir(&self) -> Result<PathBuf, AppConfigError> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join("Pulse"))
                .ok_or(AppConfigError::NoDataDir),
        }
    }
}

/// Offline cache configuration
#[derive(Debug, Deserialize, Clone)]
pub struct OfflineConfig {
    /// Versioned cache name
    pub cache_name: String,
    /// Origin the shell manifest is resolved against
    pub origin: String,
    /// Path fragment identifying API requests
    pub api_namespace: String,
}

impl OfflineConfig {
    /// Returns the parsed origin
    pub fn origin(&self) -> Result<reqwest::Url, AppConfigError> {
        reqwest::Url::parse(&self.origin)
            .map_err(|err| AppConfigError::InvalidOrigin(format!("{} ({err})", self.origin)))
    }
}

/// Trace configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TraceConfig {
    /// Export traces to stderr
    pub stdout: bool,
    /// Trace filter
    pub filter: String,
}
