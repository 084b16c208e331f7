//! Storage layer abstraction.
//!
//! The catalog persists one JSON array per entity kind through the
//! [`KvStore`] trait. Backends:
//!
//! | Backend | Type | Location |
//! |---------|------|----------|
//! | Memory | [`MemoryKvStore`] | process memory |
//! | Filesystem | [`FilesystemKvStore`] | `<data_dir>/skillshare/<key>.json` |
//! | Redis | [`RedisKvStore`] | `GET`/`SET` on the configured server |

mod filesystem;
mod memory;
mod redis;
mod store;

pub use filesystem::FilesystemKvStore;
pub use memory::MemoryKvStore;
pub use redis::RedisKvStore;
pub use store::KvStore;

use crate::config::StoreSettings;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Backend type for the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KvBackendType {
    /// In-memory, lost on exit.
    Memory,
    /// JSON files in a directory.
    #[default]
    Filesystem,
    /// Redis server.
    Redis,
}

impl KvBackendType {
    /// Parses a backend name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Some(Self::Memory),
            "filesystem" | "fs" | "file" => Some(Self::Filesystem),
            "redis" => Some(Self::Redis),
            _ => None,
        }
    }
}

/// Factory for creating key-value stores.
pub struct KvStoreFactory;

impl KvStoreFactory {
    /// Creates a store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be initialized.
    pub fn create(settings: &StoreSettings) -> Result<Arc<dyn KvStore>> {
        Self::create_with_backend(settings.backend, settings.path.clone(), settings.url.clone())
    }

    /// Creates a store with an explicit backend type.
    ///
    /// # Arguments
    ///
    /// * `backend` - The backend type to use
    /// * `path` - Directory for the filesystem backend
    /// * `connection_url` - Connection URL for Redis
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No filesystem path is given and no data directory can be determined
    /// - Redis is selected without a URL or without the `redis` feature
    pub fn create_with_backend(
        backend: KvBackendType,
        path: Option<PathBuf>,
        connection_url: Option<String>,
    ) -> Result<Arc<dyn KvStore>> {
        let store: Arc<dyn KvStore> = match backend {
            KvBackendType::Memory => Arc::new(MemoryKvStore::new()),
            KvBackendType::Filesystem => {
                let dir = path
                    .or_else(FilesystemKvStore::default_path)
                    .ok_or_else(|| Error::OperationFailed {
                        operation: "create_filesystem_store".to_string(),
                        cause: "Could not determine data directory".to_string(),
                    })?;
                Arc::new(FilesystemKvStore::new(dir)?)
            },
            KvBackendType::Redis => {
                let url = connection_url.ok_or_else(|| {
                    Error::InvalidInput("Redis backend requires a connection URL".to_string())
                })?;
                Arc::new(RedisKvStore::new(&url, "")?)
            },
        };

        tracing::debug!(backend = store.backend_name(), "Created key-value store");
        Ok(store)
    }
}
