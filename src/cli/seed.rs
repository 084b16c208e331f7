//! Seed command: bulk-load collections into the store.

use crate::services::{CatalogService, SeedDocument, SeedReport};
use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Loads `path` (a JSON object with `commands`, `mcpServers`, `hooks` and
/// `plugins` arrays) into the store.
///
/// Each present array replaces the stored collection. Legacy entries are
/// backfilled with a first version as they are loaded.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, an entry is
/// malformed, or the store write fails.
pub fn cmd_seed(service: &CatalogService, path: &Path) -> Result<SeedReport> {
    let contents = fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: "read_seed_file".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;
    let doc: SeedDocument = serde_json::from_str(&contents)
        .map_err(|e| Error::InvalidInput(format!("invalid seed document: {e}")))?;
    let report = service.seed(doc)?;
    tracing::info!(
        commands = report.commands,
        mcp_servers = report.mcp_servers,
        hooks = report.hooks,
        plugins = report.plugins,
        "Seeded catalog"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Command;
    use crate::storage::MemoryKvStore;
    use std::sync::Arc;

    #[test]
    fn test_seed_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(
            &path,
            r#"{"commands":[{"id":"legacy","name":"Legacy","category":"Web","content":"X"}],"plugins":[]}"#,
        )
        .unwrap();

        let service = CatalogService::new(Arc::new(MemoryKvStore::new()));
        let report = cmd_seed(&service, &path).unwrap();
        assert_eq!(report.commands, 1);
        assert_eq!(report.plugins, 0);

        let command = service.get::<Command>("legacy").unwrap();
        assert_eq!(command.history.current_version(), 1);
    }

    #[test]
    fn test_seed_rejects_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(&path, "[1, 2]").unwrap();
        let service = CatalogService::new(Arc::new(MemoryKvStore::new()));
        assert!(matches!(
            cmd_seed(&service, &path),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_seed_missing_file() {
        let service = CatalogService::new(Arc::new(MemoryKvStore::new()));
        assert!(matches!(
            cmd_seed(&service, Path::new("/nonexistent/seed.json")),
            Err(Error::OperationFailed { .. })
        ));
    }
}
