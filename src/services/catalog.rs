//! Catalog service: the operations behind the HTTP and MCP surfaces.

use crate::models::{
    CatalogEntity, CatalogKind, Command, EntityUpdate, EntityUpload, Hook, HookSummary,
    McpServerEntry, PayloadUpdate, Plugin, Versioned, require_author,
};
use crate::services::diff::{DiffMode, VersionDiff, diff_versions};
use crate::services::install_prompt::{InstallPrompt, prompt_for_version};
use crate::services::repository::CatalogRepository;
use crate::services::search::{SearchHit, search_all};
use crate::services::versioning::{HistoryView, VersionManager, VersionView};
use crate::storage::KvStore;
use crate::{Error, Result, now_timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

/// Result of a create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceipt {
    /// Id of the new entry.
    pub id: String,
    /// Version of the new entry (1), absent for unversioned kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

/// Result of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReceipt {
    /// Id of the updated entry.
    pub id: String,
    /// Current version after the update, absent for unversioned kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Whether a version was appended.
    pub new_version: bool,
}

/// Filters for list operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive category match.
    pub category: Option<String>,
    /// Exact hook event match (hooks only).
    pub event: Option<String>,
}

impl ListFilter {
    /// Filters by category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filters by hook event.
    #[must_use]
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }
}

/// A document holding whole collections, used to seed a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedDocument {
    /// Commands.
    #[serde(default)]
    pub commands: Option<Vec<Value>>,
    /// MCP servers.
    #[serde(default)]
    pub mcp_servers: Option<Vec<Value>>,
    /// Hooks.
    #[serde(default)]
    pub hooks: Option<Vec<Value>>,
    /// Plugins.
    #[serde(default)]
    pub plugins: Option<Vec<Value>>,
}

/// Number of entries written per kind by a seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    /// Commands written.
    pub commands: usize,
    /// MCP servers written.
    pub mcp_servers: usize,
    /// Hooks written.
    pub hooks: usize,
    /// Plugins written.
    pub plugins: usize,
}

/// High-level catalog operations over a key-value store.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn KvStore>,
}

impl CatalogService {
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// Repository for entity type `E`.
    #[must_use]
    pub fn repository<E: CatalogEntity>(&self) -> CatalogRepository<E> {
        CatalogRepository::new(Arc::clone(&self.store))
    }

    /// Lists summaries, optionally filtered by category.
    #[must_use]
    pub fn list<E: CatalogEntity>(&self, category: Option<&str>) -> Vec<E::Summary> {
        let repo = self.repository::<E>();
        let entities = match category.filter(|c| !c.is_empty()) {
            Some(category) => repo.filter_by_category(category),
            None => repo.list_all(),
        };
        entities.iter().map(CatalogEntity::summary).collect()
    }

    /// Lists hook summaries filtered by category and event.
    #[must_use]
    pub fn list_hooks(&self, filter: &ListFilter) -> Vec<HookSummary> {
        let repo = self.repository::<Hook>();
        let hooks = match filter.category.as_deref().filter(|c| !c.is_empty()) {
            Some(category) => repo.filter_by_category(category),
            None => repo.list_all(),
        };
        hooks
            .iter()
            .filter(|h| {
                filter
                    .event
                    .as_deref()
                    .filter(|e| !e.is_empty())
                    .is_none_or(|e| h.event.as_str() == e)
            })
            .map(CatalogEntity::summary)
            .collect()
    }

    /// Reads one entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id does not exist.
    pub fn get<E: CatalogEntity>(&self, id: &str) -> Result<E> {
        self.repository::<E>().find_by_id(id)
    }

    /// Reads one versioned entity, optionally at a specific version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::VersionNotFound`].
    pub fn get_version<E: Versioned>(
        &self,
        id: &str,
        version: Option<u32>,
    ) -> Result<VersionView<E>> {
        let entity = self.get::<E>(id)?;
        VersionManager::resolve(&entity, version)
    }

    /// Creates an entity from an upload request.
    ///
    /// # Errors
    ///
    /// Returns a validation error, [`Error::DuplicateId`], or a store error.
    #[instrument(skip(self, upload), fields(kind = %E::KIND))]
    pub fn create<E: CatalogEntity>(&self, upload: impl EntityUpload<E>) -> Result<CreateReceipt> {
        let entity = upload.into_entity(&now_timestamp())?;
        self.repository::<E>().append(&entity)?;
        info!(id = entity.id(), "Created catalog entry");
        Ok(CreateReceipt {
            id: entity.id().to_string(),
            version: E::KIND.is_versioned().then_some(1),
        })
    }

    /// Updates a versioned entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequiredField`] without an id,
    /// [`Error::MissingAuthor`] without an author, [`Error::NotFound`] for an
    /// unknown id, or a store error.
    #[instrument(skip(self, update), fields(kind = %E::KIND))]
    pub fn update<E: Versioned>(&self, update: &impl PayloadUpdate<E>) -> Result<UpdateReceipt> {
        let id = Self::checked_target(update)?;
        let repo = self.repository::<E>();
        let mut entity = repo.find_for_update(&id)?;
        let outcome = VersionManager::update(&mut entity, update, &now_timestamp())?;
        repo.replace(&id, &entity)?;
        Ok(UpdateReceipt {
            id,
            version: Some(outcome.version),
            new_version: outcome.new_version_created,
        })
    }

    /// Updates an unversioned entity's fields.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update`].
    #[instrument(skip(self, update), fields(kind = %E::KIND))]
    pub fn update_metadata<E: CatalogEntity>(
        &self,
        update: &impl EntityUpdate<E>,
    ) -> Result<UpdateReceipt> {
        let id = Self::checked_target(update)?;
        let author = require_author(update.author())?;
        let repo = self.repository::<E>();
        let mut entity = repo.find_for_update(&id)?;
        update.merge_metadata(&mut entity);
        entity.touch(&now_timestamp(), &author);
        repo.replace(&id, &entity)?;
        Ok(UpdateReceipt {
            id,
            version: None,
            new_version: false,
        })
    }

    /// Sets or clears the owner-maintained mark on an MCP server.
    ///
    /// The configuration history is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequiredField`] without an id,
    /// [`Error::MissingAuthor`] without an author, [`Error::NotFound`] for an
    /// unknown id, or a store error.
    #[instrument(skip(self))]
    pub fn set_mcp_owned(&self, id: &str, owned: bool, author: &str) -> Result<UpdateReceipt> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::MissingRequiredField("id".to_string()));
        }
        let author = require_author(Some(author))?;
        let repo = self.repository::<McpServerEntry>();
        let mut entry = repo.find_for_update(id)?;
        entry.is_owned = Some(owned);
        entry.touch(&now_timestamp(), &author);
        repo.replace(id, &entry)?;
        info!(id, owned, "Updated MCP server ownership");
        Ok(UpdateReceipt {
            id: id.to_string(),
            version: Some(entry.history().current_version()),
            new_version: false,
        })
    }

    fn checked_target<E: CatalogEntity>(update: &impl EntityUpdate<E>) -> Result<String> {
        let id = update
            .target_id()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::MissingRequiredField("id".to_string()))?
            .to_string();
        require_author(update.author())?;
        Ok(id)
    }

    /// Version history of an entity, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id does not exist.
    pub fn history<E: Versioned>(&self, id: &str) -> Result<HistoryView<E::Payload>> {
        Ok(VersionManager::history(&self.get::<E>(id)?))
    }

    /// Diff between two versions of an entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::VersionNotFound`].
    pub fn diff<E: Versioned>(
        &self,
        id: &str,
        from: Option<u32>,
        to: Option<u32>,
        mode: DiffMode,
    ) -> Result<VersionDiff> {
        diff_versions(&self.get::<E>(id)?, from, to, mode)
    }

    /// Install prompt for an entity at `version` (latest when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::VersionNotFound`].
    pub fn install_prompt<E: Versioned + InstallPrompt>(
        &self,
        id: &str,
        version: Option<u32>,
    ) -> Result<String> {
        prompt_for_version(&self.get::<E>(id)?, version)
    }

    /// Install prompt for a plugin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id does not exist.
    pub fn plugin_install_prompt(&self, id: &str) -> Result<String> {
        Ok(self.get::<Plugin>(id)?.install_prompt())
    }

    /// Searches all kinds.
    ///
    /// # Errors
    ///
    /// Returns a store error if any collection cannot be read.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        search_all(&self.store, query)
    }

    /// Replaces the collections present in `doc`.
    ///
    /// Entries are decoded through the entity model, so legacy entries are
    /// written back with a backfilled history. Entries that do not decode
    /// are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an undecodable entry, or a store error.
    pub fn seed(&self, doc: SeedDocument) -> Result<SeedReport> {
        Ok(SeedReport {
            commands: self.seed_kind::<Command>(doc.commands)?,
            mcp_servers: self.seed_kind::<McpServerEntry>(doc.mcp_servers)?,
            hooks: self.seed_kind::<Hook>(doc.hooks)?,
            plugins: self.seed_kind::<Plugin>(doc.plugins)?,
        })
    }

    fn seed_kind<E: CatalogEntity>(&self, items: Option<Vec<Value>>) -> Result<usize> {
        let Some(items) = items else { return Ok(0) };
        let entities = items
            .into_iter()
            .map(|item| {
                serde_json::from_value::<E>(item).map_err(|e| {
                    Error::InvalidInput(format!("invalid {} entry: {e}", E::KIND.as_str()))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.repository::<E>().replace_all(&entities)?;
        info!(kind = %E::KIND, count = entities.len(), "Seeded collection");
        Ok(entities.len())
    }

    /// Checks that `kind` keeps a version history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotVersioned`] for plugins.
    pub const fn ensure_versioned(kind: CatalogKind) -> Result<()> {
        if kind.is_versioned() {
            Ok(())
        } else {
            Err(Error::NotVersioned(kind))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CommandUpdate, CommandUpload, HookEvent, HookUpload, PluginUpdate, PluginUpload,
    };
    use crate::storage::MemoryKvStore;
    use serde_json::json;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(MemoryKvStore::new()))
    }

    #[test]
    fn test_create_and_update_command() {
        let service = service();
        let receipt = service
            .create::<Command>(CommandUpload::new("demo", "Demo", "Utility", "A\nB", "alice"))
            .unwrap();
        assert_eq!(receipt.version, Some(1));

        let receipt = service
            .update::<Command>(&CommandUpdate::new("demo", "bob").with_content("A\nB\nC"))
            .unwrap();
        assert_eq!(receipt.version, Some(2));
        assert!(receipt.new_version);

        let diff = service.diff::<Command>("demo", Some(1), Some(2), DiffMode::Lcs).unwrap();
        assert_eq!(diff.delta.added, vec!["C"]);
        assert!(diff.delta.removed.is_empty());
    }

    #[test]
    fn test_update_checks_id_then_author_then_existence() {
        let service = service();
        let err = service.update::<Command>(&CommandUpdate::default()).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField(ref f) if f == "id"));

        let update = CommandUpdate {
            id: Some("ghost".into()),
            ..CommandUpdate::default()
        };
        assert!(matches!(
            service.update::<Command>(&update),
            Err(Error::MissingAuthor)
        ));

        assert!(matches!(
            service.update::<Command>(&CommandUpdate::new("ghost", "bob")),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_plugin_update_is_unversioned() {
        let service = service();
        service
            .create::<Plugin>(PluginUpload {
                id: Some("p".into()),
                name: Some("P".into()),
                marketplace: Some("m".into()),
                author_name: Some("alice".into()),
                ..PluginUpload::default()
            })
            .unwrap();
        let receipt = service
            .update_metadata::<Plugin>(&PluginUpdate {
                id: Some("p".into()),
                description: Some("new".into()),
                author_name: Some("bob".into()),
                ..PluginUpdate::default()
            })
            .unwrap();
        assert_eq!(receipt.version, None);
        let plugin = service.get::<Plugin>("p").unwrap();
        assert_eq!(plugin.description, "new");
        assert_eq!(plugin.updated_by.as_deref(), Some("bob"));
    }

    #[test]
    fn test_list_hooks_by_event() {
        let service = service();
        for (id, event) in [("a", HookEvent::PreToolUse), ("b", HookEvent::Stop)] {
            service
                .create::<Hook>(HookUpload {
                    id: Some(id.into()),
                    name: Some(id.into()),
                    event: Some(event),
                    command: Some("true".into()),
                    author_name: Some("alice".into()),
                    ..HookUpload::default()
                })
                .unwrap();
        }
        let stop = service.list_hooks(&ListFilter::default().with_event("Stop"));
        assert_eq!(stop.len(), 1);
        assert_eq!(stop[0].id, "b");
        assert_eq!(service.list_hooks(&ListFilter::default()).len(), 2);
        assert_eq!(
            service
                .list_hooks(&ListFilter::default().with_category("other"))
                .len(),
            2
        );
    }

    #[test]
    fn test_seed_backfills_legacy_entries() {
        let service = service();
        let doc: SeedDocument = serde_json::from_value(json!({
            "commands": [{"id": "legacy", "name": "Legacy", "category": "X", "content": "body"}]
        }))
        .unwrap();
        let report = service.seed(doc).unwrap();
        assert_eq!(report.commands, 1);
        assert_eq!(report.plugins, 0);

        let raw = service.store().get("commands").unwrap().unwrap();
        assert_eq!(raw[0]["currentVersion"], 1);
        assert_eq!(raw[0]["versions"][0]["updatedBy"], "unknown");
    }

    #[test]
    fn test_ensure_versioned() {
        assert!(CatalogService::ensure_versioned(CatalogKind::Hook).is_ok());
        assert!(matches!(
            CatalogService::ensure_versioned(CatalogKind::Plugin),
            Err(Error::NotVersioned(CatalogKind::Plugin))
        ));
    }
}
