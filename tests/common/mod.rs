//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod fake_rig;
pub mod mock_backend;

use rig_client::api::ApiClient;
use rig_client::config::{ApiConfig, StaticCredentials, ViewConfig};
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Find an available port for testing.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to free port");
    listener.local_addr().unwrap().port()
}

/// Base URL nothing listens on.
pub fn unreachable_url() -> String {
    format!("http://127.0.0.1:{}", free_port())
}

/// Create a temporary config file with the given TOML content.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        connect_timeout_seconds: 1,
        timeout_seconds: 5,
    }
}

pub fn anonymous_client(base_url: &str) -> ApiClient {
    ApiClient::new(&api_config(base_url), Arc::new(StaticCredentials::anonymous()))
        .expect("Failed to build client")
}

pub fn bearer_client(base_url: &str, token: &str) -> ApiClient {
    ApiClient::new(&api_config(base_url), Arc::new(StaticCredentials::bearer(token)))
        .expect("Failed to build client")
}

pub fn view_config(page_size: u32, debounce_ms: u64) -> ViewConfig {
    ViewConfig {
        page_size,
        debounce_ms,
    }
}

/// Wait for a server to become available.
pub async fn wait_for_server(addr: SocketAddr, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
