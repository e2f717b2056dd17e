//! Application configuration management.
//!
//! The configuration holds the base URL of the Markdown catalog server.
//! It is stored at `~/.config/mdshelf/config.json` and may be overridden
//! with the `MDSHELF_BASE_URL` environment variable.

use std::path::PathBuf;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "mdshelf";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Store file name in the cache directory
const STORE_FILE: &str = "documents.json";

/// Environment variable that overrides the saved base URL
pub const BASE_URL_ENV: &str = "MDSHELF_BASE_URL";

/// Server used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://192.168.11.3:8081";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Could not find {0} directory")]
    MissingDir(&'static str),

    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Load the saved config (or defaults), then apply the env override.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.set_base_url(&url)?;
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Replace the base URL after validating it.
    /// Trailing slashes are stripped so endpoint paths join cleanly.
    pub fn set_base_url(&mut self, url: &str) -> Result<(), ConfigError> {
        self.base_url = normalize_base_url(url)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::MissingDir("config"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf, ConfigError> {
        let cache_dir = dirs::cache_dir().ok_or(ConfigError::MissingDir("cache"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Location of the document store file.
    pub fn store_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.cache_dir()?.join(STORE_FILE))
    }
}

fn normalize_base_url(url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(trimmed.to_string())
}
