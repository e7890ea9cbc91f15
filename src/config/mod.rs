//! Configuration management
//!
//! This module handles loading and parsing configuration for the K360 admin
//! console. Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Backend API configuration
    #[serde(default)]
    pub backend: BackendConfig,
    /// List snapshot cache configuration
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the Tera templates
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            templates_dir: default_templates_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

/// Backend REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the K360 backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Configuration for the per-session list snapshot cache
///
/// The snapshot cache only serves a failed refetch: the last successfully
/// fetched rows for a screen are shown again alongside the error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Maximum number of cached screen snapshots
    #[serde(default = "default_snapshot_capacity")]
    pub capacity: u64,
    /// Time-to-live for a snapshot in seconds
    #[serde(default = "default_snapshot_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            capacity: default_snapshot_capacity(),
            ttl_secs: default_snapshot_ttl_secs(),
        }
    }
}

fn default_snapshot_capacity() -> u64 {
    256
}

fn default_snapshot_ttl_secs() -> u64 {
    900
}

impl Config {
    /// Load configuration from a YAML file, falling back to defaults when the
    /// file is missing, then apply environment overrides.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&content)?
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Config::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// - `K360_BACKEND_URL`: backend API base URL
    /// - `K360_HOST`: server host
    /// - `K360_PORT`: server port
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("K360_BACKEND_URL") {
            if !url.is_empty() {
                self.backend.base_url = url;
            }
        }
        if let Ok(host) = std::env::var("K360_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }
        if let Ok(port) = std::env::var("K360_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
    }
}
