//! In-memory key-value store.

use super::store::{KvStore, unavailable};
use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local store backed by a `HashMap`.
///
/// Used by tests and by the `memory` backend. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryKvStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given entries.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| unavailable("memory_get", e))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| unavailable("memory_set", e))?;
        entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
