use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Connection settings for the RIG REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API host (e.g., "http://localhost:8000").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Overall request timeout in seconds; 0 disables it (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Settings shared by every remote collection view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Items requested per page (default: 20).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Quiet period before a search term reaches the query (default: 300).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Where the login token is persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Token file path. Defaults to `<config dir>/rig/session.token`.
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Upper bound accepted by the list endpoints for `limit`.
pub const MAX_PAGE_SIZE: u32 = 100;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_timeout() -> u32 {
    30
}

fn default_page_size() -> u32 {
    20
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_seconds: default_connect_timeout(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl ApiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_seconds))
    }

    /// `None` when the overall timeout is disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(u64::from(secs))),
        }
    }
}

impl ViewConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl SessionConfig {
    /// Resolve the token file, falling back to the platform config dir.
    pub fn token_path(&self) -> PathBuf {
        match &self.token_file {
            Some(path) => path.clone(),
            None => {
                let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
                config_dir.join("rig").join("session.token")
            }
        }
    }
}
