//! Key-value store trait.

use crate::Result;
use serde_json::Value;

/// An opaque get/set-by-key JSON store.
///
/// Each catalog kind lives under one key as a single JSON array. Writes
/// replace the whole value; there is no locking, so two concurrent
/// read-modify-write cycles on the same key race and the last write wins.
pub trait KvStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// `None` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StoreUnavailable`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StoreUnavailable`] if the store cannot be written.
    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

pub(crate) fn unavailable(operation: &str, cause: impl ToString) -> crate::Error {
    crate::Error::StoreUnavailable {
        operation: operation.to_string(),
        cause: cause.to_string(),
    }
}
