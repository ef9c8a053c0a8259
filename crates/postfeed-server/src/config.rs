//! Server configuration loaded from `.env` and the process environment

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_UPLOAD_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";

/// Largest accepted request body unless `MAX_UPLOAD_BYTES` says otherwise
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub service_name: String,
    pub storage_backend: StorageBackend,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_secs: u64,
    pub imagekit_private_key: Option<String>,
    pub imagekit_upload_url: String,
    pub imagekit_url_endpoint: Option<String>,
    pub upload_folder: String,
    pub upload_tags: String,
    pub upload_timeout_secs: u64,
    pub upload_temp_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load from `.env` (if present) and the process environment
    pub fn load() -> Result<Self> {
        match dotenv::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(_) => info!("No .env file found, using process environment"),
        }

        let config = Self::from_env(config::Environment::default())?;

        if config.imagekit_private_key.is_none() {
            warn!("IMAGEKIT_PRIVATE_KEY not set, uploads will fail");
        }
        if let Some(endpoint) = &config.imagekit_url_endpoint {
            info!("ImageKit URL endpoint: {}", endpoint);
        }

        Ok(config)
    }

    /// Build from an environment source, filling in defaults
    pub fn from_env(env: config::Environment) -> Result<Self> {
        config::Config::builder()
            .set_default("bind_address", "0.0.0.0:8000")?
            .set_default("service_name", "postfeed")?
            .set_default("storage_backend", "sqlite")?
            .set_default("database_url", "sqlite://./postfeed.db")?
            .set_default("db_max_connections", 5)?
            .set_default("db_timeout_secs", 5)?
            .set_default("imagekit_upload_url", DEFAULT_UPLOAD_URL)?
            .set_default("upload_folder", "/backend-uploads")?
            .set_default("upload_tags", "backend-upload")?
            .set_default("upload_timeout_secs", 30)?
            .set_default("max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES)?
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn db_timeout(&self) -> Duration {
        Duration::from_secs(self.db_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn upload_tags(&self) -> Vec<String> {
        self.upload_tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}
