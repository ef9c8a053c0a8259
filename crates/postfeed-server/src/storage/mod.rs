//! Storage layer
//!
//! SQLite (embedded) for persistent deployments, DashMap for process-local ones.

pub mod db;
pub mod memory;

pub use db::Database;
pub use memory::MemoryStore;

use crate::config::{ServerConfig, StorageBackend};
use anyhow::{Context, Result};
use postfeed_core::ports::PostStore;
use std::sync::Arc;

/// Open the store selected by configuration
pub async fn open(config: &ServerConfig) -> Result<Arc<dyn PostStore>> {
    match config.storage_backend {
        StorageBackend::Sqlite => {
            let db = Database::new(
                &config.database_url,
                config.db_max_connections,
                config.db_timeout(),
            )
            .await
            .context("Failed to initialize database")?;
            Ok(Arc::new(db))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, posts are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
