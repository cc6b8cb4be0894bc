//! Configuration for srcstore.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use srcstore_store::IndexLayout;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "SRCSTORE_CONFIG";

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory of the artifact store
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Indexes declared at each store level
    #[serde(default)]
    pub layout: IndexLayout,
}

/// Directory holding srcstore's config and default store
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".srcstore")
}

fn default_store_dir() -> PathBuf {
    config_dir().join("store")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            log_level: default_log_level(),
            layout: IndexLayout::default(),
        }
    }
}

impl StoreConfig {
    /// Path of the config file `load` reads
    pub fn default_path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => config_dir().join("config.yaml"),
        }
    }

    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        let config_path = Self::default_path();

        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config file: {}", e);
                }
            }
        }

        Self::default()
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| CoreError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String, CoreError> {
        serde_yaml::to_string(self).map_err(|e| CoreError::Config {
            path: "<memory>".to_string(),
            message: e.to_string(),
        })
    }
}
