use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::{Config, MAX_PAGE_SIZE};

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "RIG_API_URL";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/rig/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("rig").join("config.toml")
    }

    /// Loads configuration from the default config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_at(&Self::config_path())
    }

    /// Loads configuration from `path` and the environment.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Loads `path`, applies overrides from `lookup`, then validates once,
    /// so an override can repair a bad file value.
    pub fn load_with<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a specific file, without validating.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Applies environment overrides using the given lookup.
    ///
    /// Empty values are ignored so an exported-but-blank variable keeps
    /// the file setting.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                self.api.base_url = url.trim_end_matches('/').to_string();
            }
        }
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The base URL is an http(s) URL
    /// - The page size is within 1..=100
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = &self.api.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                message: format!("api.base_url must be an http(s) URL, got '{}'", base_url),
            });
        }

        let page_size = self.view.page_size;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "view.page_size must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, page_size
                ),
            });
        }

        Ok(())
    }
}
