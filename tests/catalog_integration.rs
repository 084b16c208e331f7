//! Catalog integration tests.
//!
//! Exercises the catalog service end to end over a filesystem store:
//! - Create/update versioning scenarios
//! - Legacy record backfill
//! - Pinned version reads and diffs
//! - Error kinds for missing entries and versions

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use serde_json::{Map, Value, json};
use skillshare::models::{
    Command, CommandUpdate, CommandUpload, Hook, HookEvent, HookUpdate, HookUpload,
    McpServerEntry, McpServerUpdate, McpServerUpload, McpTransport, Plugin, PluginUpdate,
    PluginUpload, UNKNOWN_AUTHOR,
};
use skillshare::services::{CatalogService, DiffMode, ListFilter};
use skillshare::storage::{FilesystemKvStore, KvStore};
use skillshare::{CatalogKind, Error};
use std::sync::Arc;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn service(dir: &TempDir) -> (CatalogService, Arc<dyn KvStore>) {
    let store: Arc<dyn KvStore> = Arc::new(FilesystemKvStore::new(dir.path()).unwrap());
    (CatalogService::new(Arc::clone(&store)), store)
}

fn demo_command(service: &CatalogService) {
    service
        .create::<Command>(CommandUpload::new("demo", "Demo", "Utility", "A\nB", "alice"))
        .unwrap();
}

fn config(command: &str) -> Map<String, Value> {
    let mut config = Map::new();
    config.insert("command".to_string(), json!(command));
    config.insert("args".to_string(), json!(["-y", "server"]));
    config
}

// ============================================================================
// Versioning Scenarios
// ============================================================================

#[test]
fn test_create_then_update_appends_version() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    demo_command(&service);

    let receipt = service
        .update::<Command>(&CommandUpdate::new("demo", "bob").with_content("A\nB\nC"))
        .unwrap();
    assert_eq!(receipt.version, Some(2));
    assert!(receipt.new_version);

    let command = service.get::<Command>("demo").unwrap();
    let versions = command.history.records();
    assert_eq!(command.history.current_version(), 2);
    assert_eq!(versions.len(), 2);
    let summary: Vec<(u32, &str, &str)> = versions
        .iter()
        .map(|r| (r.version, r.payload.content.as_str(), r.updated_by.as_str()))
        .collect();
    assert_eq!(summary, vec![(1, "A\nB", "alice"), (2, "A\nB\nC", "bob")]);
    assert_eq!(command.content, "A\nB\nC");

    let diff = service.diff::<Command>("demo", Some(1), Some(2), DiffMode::Lcs).unwrap();
    assert_eq!(diff.delta.added, vec!["C".to_string()]);
    assert!(diff.delta.removed.is_empty());
}

#[test]
fn test_identical_and_metadata_only_updates_do_not_version() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    demo_command(&service);
    service
        .update::<Command>(&CommandUpdate::new("demo", "bob").with_content("A\nB\nC"))
        .unwrap();

    let same = service
        .update::<Command>(&CommandUpdate::new("demo", "carol").with_content("A\nB\nC"))
        .unwrap();
    assert_eq!(same.version, Some(2));
    assert!(!same.new_version);

    let category = service
        .update::<Command>(&CommandUpdate::new("demo", "dave").with_category("NewCat"))
        .unwrap();
    assert_eq!(category.version, Some(2));

    let command = service.get::<Command>("demo").unwrap();
    assert_eq!(command.category, "NewCat");
    assert_eq!(command.history.len(), 2);
    assert_eq!(command.updated_by.as_deref(), Some("dave"));
}

#[test]
fn test_changelog_is_stored_on_new_version() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    demo_command(&service);
    service
        .update::<Command>(
            &CommandUpdate::new("demo", "bob")
                .with_content("A")
                .with_changelog("drop B"),
        )
        .unwrap();

    let history = service.history::<Command>("demo").unwrap();
    assert_eq!(history.current_version, 2);
    assert_eq!(history.versions[0].record.changelog.as_deref(), Some("drop B"));
    assert!(history.versions[0].is_latest);
    assert!(!history.versions[1].is_latest);
}

#[test]
fn test_pinned_version_read_ignores_later_versions() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    demo_command(&service);
    for (content, author) in [("A\nB\nC", "bob"), ("D", "carol")] {
        service
            .update::<Command>(&CommandUpdate::new("demo", author).with_content(content))
            .unwrap();
    }

    let view = service.get_version::<Command>("demo", Some(2)).unwrap();
    assert_eq!(view.entity.content, "A\nB\nC");
    assert_eq!(view.entity.updated_by.as_deref(), Some("bob"));
    assert_eq!(view.requested_version, Some(2));
    assert!(!view.is_latest);
}

#[test]
fn test_diff_version_against_itself_is_empty() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    demo_command(&service);
    for mode in [DiffMode::Lcs, DiffMode::SetDifference] {
        let diff = service.diff::<Command>("demo", Some(1), Some(1), mode).unwrap();
        assert_eq!(diff.added_count, 0);
        assert_eq!(diff.removed_count, 0);
    }
}

// ============================================================================
// Error Kinds
// ============================================================================

#[test]
fn test_missing_id_and_missing_version() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    demo_command(&service);
    service
        .update::<Command>(&CommandUpdate::new("demo", "bob").with_content("A\nB\nC"))
        .unwrap();

    assert!(matches!(
        service.get::<Command>("missing-id"),
        Err(Error::NotFound { kind: CatalogKind::Command, .. })
    ));
    assert!(matches!(
        service.get::<Plugin>("missing-id"),
        Err(Error::NotFound { kind: CatalogKind::Plugin, .. })
    ));
    assert!(matches!(
        service.get_version::<Command>("demo", Some(99)),
        Err(Error::VersionNotFound { version: 99, .. })
    ));
}

#[test]
fn test_duplicate_and_validation_errors() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    demo_command(&service);

    let duplicate = service
        .create::<Command>(CommandUpload::new("demo", "Other", "Utility", "X", "bob"))
        .unwrap_err();
    assert!(matches!(duplicate, Error::DuplicateId { .. }));

    let no_author = service
        .create::<Command>(CommandUpload::new("other", "Other", "Utility", "X", " "))
        .unwrap_err();
    assert!(matches!(no_author, Error::MissingAuthor));

    let update_missing = service
        .update::<Command>(&CommandUpdate::new("nope", "bob").with_content("X"))
        .unwrap_err();
    assert!(matches!(update_missing, Error::NotFound { .. }));
}

#[test]
fn test_padded_ids_resolve_to_trimmed_entry() {
    let dir = TempDir::new().unwrap();
    let (service, store) = service(&dir);

    let receipt = service
        .create::<Command>(CommandUpload::new(" demo ", "Demo", "Utility", "A", "alice"))
        .unwrap();
    assert_eq!(receipt.id, "demo");
    let stored = store.get("commands").unwrap().unwrap();
    assert_eq!(stored[0]["id"], "demo");

    assert_eq!(service.get::<Command>("demo").unwrap().id, "demo");
    assert_eq!(service.get::<Command>(" demo ").unwrap().id, "demo");

    let updated = service
        .update::<Command>(&CommandUpdate::new(" demo ", "bob").with_content("B"))
        .unwrap();
    assert_eq!(updated.id, "demo");
    assert_eq!(updated.version, Some(2));

    let duplicate = service
        .create::<Command>(CommandUpload::new("demo\t", "Demo", "Utility", "C", "carol"))
        .unwrap_err();
    assert!(matches!(duplicate, Error::DuplicateId { .. }));

    service
        .create::<Hook>(HookUpload {
            id: Some("  fmt".to_string()),
            name: Some("Format".to_string()),
            event: Some(HookEvent::PostToolUse),
            command: Some("cargo fmt".to_string()),
            author_name: Some("alice".to_string()),
            ..HookUpload::default()
        })
        .unwrap();
    assert_eq!(service.get::<Hook>("fmt").unwrap().id, "fmt");
}

#[test]
fn test_update_at_max_version_leaves_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let (service, store) = service(&dir);
    let saturated = json!([{
        "id": "worn",
        "name": "Worn",
        "description": "",
        "category": "Utility",
        "content": "a",
        "currentVersion": u32::MAX,
        "versions": [{
            "version": u32::MAX,
            "content": "a",
            "updatedAt": "",
            "updatedBy": "alice"
        }]
    }]);
    store.set("commands", &saturated).unwrap();
    let before = store.get("commands").unwrap();

    let err = service
        .update::<Command>(&CommandUpdate::new("worn", "bob").with_content("b"))
        .unwrap_err();
    assert!(matches!(err, Error::OperationFailed { .. }));
    assert_eq!(store.get("commands").unwrap(), before);
    assert_eq!(service.get::<Command>("worn").unwrap().history.current_version(), u32::MAX);
}

// ============================================================================
// Legacy Backfill
// ============================================================================

#[test]
fn test_legacy_entry_backfills_then_versions() {
    let dir = TempDir::new().unwrap();
    let (service, store) = service(&dir);
    store
        .set(
            "commands",
            &json!([{
                "id": "legacy",
                "name": "Legacy",
                "description": "",
                "category": "Web",
                "content": "old"
            }]),
        )
        .unwrap();

    let first = service.get::<Command>("legacy").unwrap();
    let second = service.get::<Command>("legacy").unwrap();
    assert_eq!(first.history, second.history);
    let v1 = &first.history.records()[0];
    assert_eq!(v1.version, 1);
    assert_eq!(v1.updated_at, "");
    assert_eq!(v1.updated_by, UNKNOWN_AUTHOR);

    service
        .update::<Command>(&CommandUpdate::new("legacy", "bob").with_content("new"))
        .unwrap();
    let command = service.get::<Command>("legacy").unwrap();
    let versions = command.history.records();
    assert_eq!(versions.len(), 2);
    assert_eq!(&versions[0], v1);
    assert_eq!(versions[1].payload.content, "new");
}

#[test]
fn test_store_is_camel_case_arrays() {
    let dir = TempDir::new().unwrap();
    let (service, store) = service(&dir);
    demo_command(&service);

    let stored = store.get("commands").unwrap().unwrap();
    let entry = &stored.as_array().unwrap()[0];
    assert_eq!(entry["installPath"], "~/.claude/commands/demo.md");
    assert_eq!(entry["currentVersion"], 1);
    assert_eq!(entry["versions"][0]["updatedBy"], "alice");
}

// ============================================================================
// Other Kinds
// ============================================================================

#[test]
fn test_mcp_config_change_versions() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    service
        .create::<McpServerEntry>(McpServerUpload {
            id: Some("fs".to_string()),
            name: Some("Filesystem".to_string()),
            transport: Some(McpTransport::Stdio),
            config: Some(config("npx")),
            author_name: Some("alice".to_string()),
            ..McpServerUpload::default()
        })
        .unwrap();

    let unchanged = service
        .update::<McpServerEntry>(&McpServerUpdate {
            id: Some("fs".to_string()),
            config: Some(config("npx")),
            author_name: Some("bob".to_string()),
            ..McpServerUpdate::default()
        })
        .unwrap();
    assert!(!unchanged.new_version);

    let changed = service
        .update::<McpServerEntry>(&McpServerUpdate {
            id: Some("fs".to_string()),
            config: Some(config("bunx")),
            author_name: Some("bob".to_string()),
            ..McpServerUpdate::default()
        })
        .unwrap();
    assert_eq!(changed.version, Some(2));

    let entry = service.get::<McpServerEntry>("fs").unwrap();
    assert_eq!(entry.category, "Other");
    assert_eq!(entry.config["command"], "bunx");
}

#[test]
fn test_set_mcp_owned_marks_entry_without_versioning() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    service
        .create::<McpServerEntry>(McpServerUpload {
            id: Some("fs".to_string()),
            name: Some("Filesystem".to_string()),
            transport: Some(McpTransport::Stdio),
            config: Some(config("npx")),
            author_name: Some("alice".to_string()),
            ..McpServerUpload::default()
        })
        .unwrap();
    assert_eq!(service.get::<McpServerEntry>("fs").unwrap().is_owned, None);

    let receipt = service.set_mcp_owned(" fs ", true, "carol").unwrap();
    assert_eq!(receipt.id, "fs");
    assert_eq!(receipt.version, Some(1));
    assert!(!receipt.new_version);

    let entry = service.get::<McpServerEntry>("fs").unwrap();
    assert_eq!(entry.is_owned, Some(true));
    assert_eq!(entry.updated_by.as_deref(), Some("carol"));
    assert_eq!(entry.history.records().len(), 1);
    let listed = service.list::<McpServerEntry>(None);
    assert_eq!(listed[0].is_owned, Some(true));

    service.set_mcp_owned("fs", false, "carol").unwrap();
    assert_eq!(service.get::<McpServerEntry>("fs").unwrap().is_owned, Some(false));

    assert!(matches!(
        service.set_mcp_owned("fs", true, " "),
        Err(Error::MissingAuthor)
    ));
    assert!(matches!(
        service.set_mcp_owned("", true, "carol"),
        Err(Error::MissingRequiredField(_))
    ));
    assert!(matches!(
        service.set_mcp_owned("nope", true, "carol"),
        Err(Error::NotFound { kind: CatalogKind::McpServer, .. })
    ));
}

#[test]
fn test_hook_versions_and_event_filter() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    for (id, event) in [("fmt", HookEvent::PostToolUse), ("guard", HookEvent::PreToolUse)] {
        service
            .create::<Hook>(HookUpload {
                id: Some(id.to_string()),
                name: Some(id.to_string()),
                event: Some(event),
                command: Some(format!("bash ~/.claude/hooks/{id}.sh")),
                author_name: Some("alice".to_string()),
                ..HookUpload::default()
            })
            .unwrap();
    }

    let pre = service.list_hooks(&ListFilter::default().with_event("PreToolUse"));
    assert_eq!(pre.len(), 1);
    assert_eq!(pre[0].id, "guard");

    let receipt = service
        .update::<Hook>(&HookUpdate {
            id: Some("fmt".to_string()),
            script_content: Some("#!/bin/sh\nexit 0".to_string()),
            author_name: Some("bob".to_string()),
            ..HookUpdate::default()
        })
        .unwrap();
    assert_eq!(receipt.version, Some(2));
}

#[test]
fn test_plugin_metadata_update() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    service
        .create::<Plugin>(PluginUpload {
            id: Some("dev".to_string()),
            name: Some("Development".to_string()),
            marketplace: Some("coding-basic-plugins".to_string()),
            author_name: Some("alice".to_string()),
            ..PluginUpload::default()
        })
        .unwrap();

    let receipt = service
        .update_metadata::<Plugin>(&PluginUpdate {
            id: Some("dev".to_string()),
            features: Some(vec!["lint".to_string()]),
            author_name: Some("bob".to_string()),
            ..PluginUpdate::default()
        })
        .unwrap();
    assert_eq!(receipt.version, None);

    let plugin = service.get::<Plugin>("dev").unwrap();
    assert_eq!(plugin.install_command, "/install-plugin dev@coding-basic-plugins");
    assert_eq!(plugin.features, vec!["lint".to_string()]);
    assert_eq!(plugin.updated_by.as_deref(), Some("bob"));
}

#[test]
fn test_search_spans_kinds() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    demo_command(&service);
    service
        .create::<Plugin>(PluginUpload {
            id: Some("demo-plugin".to_string()),
            name: Some("Demo plugin".to_string()),
            marketplace: Some("m".to_string()),
            author_name: Some("alice".to_string()),
            ..PluginUpload::default()
        })
        .unwrap();

    let hits = service.search("DEMO").unwrap();
    let kinds: Vec<_> = hits.iter().map(|hit| hit.kind).collect();
    assert!(kinds.contains(&CatalogKind::Command));
    assert!(kinds.contains(&CatalogKind::Plugin));
}
