//! Filesystem key-value store.
//!
//! Stores each key as a JSON file: `{base_path}/{key}.json`.

use super::store::{KvStore, unavailable};
use crate::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem-based key-value store.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// target, so readers see either the old or the new array, never a torn one.
#[derive(Debug)]
pub struct FilesystemKvStore {
    /// Directory holding one file per key.
    base_path: PathBuf,
}

impl FilesystemKvStore {
    /// Creates a store rooted at `base_path`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let path = base_path.into();

        fs::create_dir_all(&path).map_err(|e| Error::OperationFailed {
            operation: "create_store_dir".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Ok(Self { base_path: path })
    }

    /// Returns the default data directory.
    ///
    /// Returns `<data_dir>/skillshare`, e.g. `~/.local/share/skillshare` on Linux.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|d| d.data_dir().join("skillshare"))
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(Error::InvalidInput(format!("invalid store key: {key}")));
        }
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

impl KvStore for FilesystemKvStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.key_path(key)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(unavailable("read_store_file", e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| unavailable("parse_store_file", e))
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.key_path(key)?;
        let tmp = self.base_path.join(format!(".{key}.json.tmp"));
        let content =
            serde_json::to_string_pretty(value).map_err(|e| Error::OperationFailed {
                operation: "serialize_store_value".to_string(),
                cause: e.to_string(),
            })?;

        fs::write(&tmp, content).map_err(|e| unavailable("write_store_file", e))?;
        fs::rename(&tmp, &path).map_err(|e| unavailable("rename_store_file", e))
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
