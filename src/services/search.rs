//! Federated search across all catalog kinds.

use crate::models::{CatalogEntity, CatalogKind, Command, Hook, McpServerEntry, Plugin};
use crate::services::CatalogRepository;
use crate::storage::KvStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;

/// One search match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Kind of the matched entry.
    #[serde(rename = "type")]
    pub kind: CatalogKind,
    /// Entry id.
    pub id: String,
    /// Entry name.
    pub name: String,
    /// Entry description.
    pub description: String,
    /// Entry category.
    pub category: String,
}

/// Case-insensitive substring match on id, name and description.
#[must_use]
pub fn matches_query<E: CatalogEntity>(entity: &E, needle: &str) -> bool {
    [entity.id(), entity.name(), entity.description()]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn hits_for<E: CatalogEntity>(store: &Arc<dyn KvStore>, needle: &str) -> Result<Vec<SearchHit>> {
    let entities = CatalogRepository::<E>::new(Arc::clone(store)).try_list_all()?;
    Ok(entities
        .iter()
        .filter(|e| matches_query(*e, needle))
        .map(|e| SearchHit {
            kind: E::KIND,
            id: e.id().to_string(),
            name: e.name().to_string(),
            description: e.description().to_string(),
            category: e.category().to_string(),
        })
        .collect())
}

/// Searches every kind concurrently.
///
/// The four collections live under disjoint keys, so they are read on
/// separate threads. Results come back in kind order: commands, MCP
/// servers, hooks, plugins. A failure reading any collection fails the
/// whole search.
///
/// # Errors
///
/// Returns the first store error encountered.
pub fn search_all(store: &Arc<dyn KvStore>, query: &str) -> Result<Vec<SearchHit>> {
    let needle = query.trim().to_lowercase();
    let needle = needle.as_str();

    let results = thread::scope(|scope| {
        let handles = [
            scope.spawn(|| hits_for::<Command>(store, needle)),
            scope.spawn(|| hits_for::<McpServerEntry>(store, needle)),
            scope.spawn(|| hits_for::<Hook>(store, needle)),
            scope.spawn(|| hits_for::<Plugin>(store, needle)),
        ];
        handles
            .into_iter()
            .map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    Err(Error::OperationFailed {
                        operation: "search".to_string(),
                        cause: "search worker panicked".to_string(),
                    })
                })
            })
            .collect::<Vec<_>>()
    });

    let mut hits = Vec::new();
    for result in results {
        hits.extend(result?);
    }
    tracing::debug!(query, hits = hits.len(), "Search completed");
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;
    use serde_json::{Value, json};

    struct BrokenHooks(MemoryKvStore);

    impl KvStore for BrokenHooks {
        fn get(&self, key: &str) -> Result<Option<Value>> {
            if key == "hooks" {
                return Err(Error::StoreUnavailable {
                    operation: "get".into(),
                    cause: "timeout".into(),
                });
            }
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &Value) -> Result<()> {
            self.0.set(key, value)
        }

        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    fn seeded() -> MemoryKvStore {
        let store = MemoryKvStore::new();
        store
            .set(
                "commands",
                &json!([{
                    "id": "git-commit",
                    "name": "Commit",
                    "description": "Write commits",
                    "category": "Git",
                    "content": "x"
                }]),
            )
            .unwrap();
        store
            .set(
                "mcpServers",
                &json!([{
                    "id": "github",
                    "name": "GitHub",
                    "description": "Git hosting",
                    "category": "Dev",
                    "type": "stdio",
                    "config": {}
                }]),
            )
            .unwrap();
        store
            .set(
                "plugins",
                &json!([{
                    "id": "review",
                    "name": "Review",
                    "description": "Code review",
                    "marketplace": "m"
                }]),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_search_across_kinds() {
        let store: Arc<dyn KvStore> = Arc::new(seeded());
        let hits = search_all(&store, "GIT").unwrap();
        let kinds: Vec<_> = hits.iter().map(|h| h.kind).collect();
        assert_eq!(kinds, vec![CatalogKind::Command, CatalogKind::McpServer]);
    }

    #[test]
    fn test_search_failure_propagates() {
        let store: Arc<dyn KvStore> = Arc::new(BrokenHooks(seeded()));
        assert!(matches!(
            search_all(&store, "git"),
            Err(Error::StoreUnavailable { .. })
        ));
    }

    #[test]
    fn test_hit_serializes_type() {
        let store: Arc<dyn KvStore> = Arc::new(seeded());
        let hits = search_all(&store, "review").unwrap();
        let json = serde_json::to_value(&hits).unwrap();
        assert_eq!(json[0]["type"], "plugin");
    }
}
