//! Engine configuration with layered loading.
//!
//! Defaults work without any config file; overrides come from a state-dir
//! `config.toml`, a user-level `~/.config/wayfinder/config.toml`, an
//! explicit path, and `WAYFINDER_`-prefixed environment variables, in that
//! order.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Display name used in native history titles.
    #[serde(default = "default_product_name")]
    pub product_name: String,

    /// Full navigation backups older than this many hours are discarded.
    #[serde(default = "default_state_freshness_hours")]
    pub state_freshness_hours: u64,

    /// Cached contexts older than this many minutes are discarded.
    #[serde(default = "default_cache_freshness_minutes")]
    pub cache_freshness_minutes: u64,

    /// Window for coalescing rapid repeated navigation requests.
    #[serde(default = "default_debounce_window_ms")]
    pub debounce_window_ms: u64,

    /// Per-session history entries kept after cleanup.
    #[serde(default = "default_history_retention")]
    pub history_retention: usize,

    /// Directory for the file-backed state store. Defaults to the platform
    /// data directory.
    #[serde(default)]
    pub state_dir: Option<String>,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_product_name() -> String {
    "Wayfinder".to_string()
}

fn default_state_freshness_hours() -> u64 {
    24
}

fn default_cache_freshness_minutes() -> u64 {
    60
}

fn default_debounce_window_ms() -> u64 {
    300
}

fn default_history_retention() -> usize {
    50
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            product_name: default_product_name(),
            state_freshness_hours: default_state_freshness_hours(),
            cache_freshness_minutes: default_cache_freshness_minutes(),
            debounce_window_ms: default_debounce_window_ms(),
            history_retention: default_history_retention(),
            state_dir: None,
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Retry budget for network-bound operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_retry_max_attempts")]
    pub max_attempts: usize,
    /// Base delay; doubles on each attempt.
    #[serde(default = "default_retry_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_retry_max_attempts() -> usize {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    500
}

fn default_retry_max_delay_ms() -> u64 {
    10_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_retry_max_attempts(),
            base_delay_ms: default_retry_base_delay_ms(),
            max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Write logs to a file under the state directory instead of stderr.
    #[serde(default)]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
        }
    }
}

impl EngineConfig {
    /// User-level config path, when the platform has a config directory.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("wayfinder").join("config.toml"))
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the engine works without config files
        let defaults = EngineConfig::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        // State-dir config (primary location)
        let state_config = defaults.state_path().join("config.toml");
        if state_config.exists() {
            builder = builder.add_source(config::File::from(state_config));
        }

        // User config (optional global overrides)
        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (host override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with WAYFINDER_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("WAYFINDER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save this config as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        std::fs::write(path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    /// Directory for the file-backed state store.
    pub fn state_path(&self) -> PathBuf {
        match &self.state_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("wayfinder"),
        }
    }

    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }
}
