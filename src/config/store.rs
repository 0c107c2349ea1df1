//! Shared, reloadable configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::loader::ConfigError;
use crate::config::types::{ApiConfig, Config, ViewConfig};

/// Config loaded from a file plus the environment, with an optional
/// command-line base URL that survives reloads.
///
/// Clones share the same config.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<RwLock<Config>>,
    path: PathBuf,
    api_url: Option<String>,
}

impl ConfigStore {
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path,
            api_url: None,
        }
    }

    /// Load `path` and pin the base URL to `api_url` when given.
    pub fn open(path: PathBuf, api_url: Option<String>) -> Result<Self, ConfigError> {
        let api_url = api_url.map(|url| url.trim_end_matches('/').to_string());
        let config = load(&path, api_url.as_deref())?;
        Ok(Self {
            inner: Arc::new(RwLock::new(config)),
            path,
            api_url,
        })
    }

    pub fn get(&self) -> Config {
        self.inner.read().clone()
    }

    pub fn api(&self) -> ApiConfig {
        self.inner.read().api.clone()
    }

    pub fn view(&self) -> ViewConfig {
        self.inner.read().view.clone()
    }

    /// Re-read the file and the environment.
    ///
    /// Returns `true` when the `[api]` section changed, i.e. clients built
    /// from the old settings should be rebuilt. On error the current config
    /// is kept.
    pub fn reload(&self) -> Result<bool, ConfigError> {
        let config = load(&self.path, self.api_url.as_deref())?;
        let mut current = self.inner.write();
        let api_changed = current.api != config.api;
        *current = config;
        if api_changed {
            tracing::info!(base_url = %current.api.base_url, "API settings changed");
        }
        Ok(api_changed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load(path: &Path, api_url: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = Config::load_from(path)?;
    config.apply_overrides(|key| std::env::var(key).ok());
    if let Some(url) = api_url {
        config.api.base_url = url.to_string();
    }
    config.validate()?;
    Ok(config)
}
