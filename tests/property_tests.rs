//! Property-based tests for versioning and diffs.
//!
//! - Versions only grow, by exactly one per payload change
//! - Pinned reads return the content stored with that version
//! - Legacy backfill is stable across reads
//! - Diffing a text against itself is empty

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use serde_json::json;
use skillshare::models::{Command, CommandUpdate, CommandUpload};
use skillshare::services::{CatalogService, DiffMode, diff_text};
use skillshare::storage::{KvStore, MemoryKvStore};
use std::collections::HashSet;
use std::sync::Arc;

fn service() -> (CatalogService, Arc<dyn KvStore>) {
    let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    (CatalogService::new(Arc::clone(&store)), store)
}

fn content() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c]{1,2}", 1..4).prop_map(|lines| lines.join("\n"))
}

fn mode() -> impl Strategy<Value = DiffMode> {
    prop_oneof![Just(DiffMode::Lcs), Just(DiffMode::SetDifference)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_version_counts_payload_changes(
        initial in content(),
        edits in prop::collection::vec(content(), 0..8),
    ) {
        let (service, _) = service();
        service
            .create::<Command>(CommandUpload::new("demo", "Demo", "Utility", &initial, "alice"))
            .unwrap();

        let mut expected = 1;
        let mut previous = initial.clone();
        for (i, edit) in edits.iter().enumerate() {
            let update = CommandUpdate::new("demo", format!("author-{i}")).with_content(edit);
            let receipt = service.update::<Command>(&update).unwrap();
            if *edit != previous {
                expected += 1;
            }
            prop_assert_eq!(receipt.version, Some(expected));
            prop_assert_eq!(receipt.new_version, *edit != previous);
            previous.clone_from(edit);
        }

        let command = service.get::<Command>("demo").unwrap();
        prop_assert_eq!(command.history.current_version(), expected);
        let numbers: Vec<u32> = command.history.records().iter().map(|r| r.version).collect();
        prop_assert_eq!(numbers, (1..=expected).collect::<Vec<_>>());
    }

    #[test]
    fn prop_pinned_read_matches_record(
        initial in content(),
        edits in prop::collection::vec(content(), 0..6),
    ) {
        let (service, _) = service();
        service
            .create::<Command>(CommandUpload::new("demo", "Demo", "Utility", &initial, "alice"))
            .unwrap();
        for edit in &edits {
            service
                .update::<Command>(&CommandUpdate::new("demo", "bob").with_content(edit))
                .unwrap();
        }

        let command = service.get::<Command>("demo").unwrap();
        for record in command.history.records() {
            let view = service.get_version::<Command>("demo", Some(record.version)).unwrap();
            prop_assert_eq!(&view.entity.content, &record.payload.content);
            prop_assert_eq!(view.is_latest, record.version == command.history.current_version());
        }
    }

    #[test]
    fn prop_backfill_is_stable(name in "[A-Za-z ]{1,12}", body in content()) {
        let (service, store) = service();
        store
            .set(
                "commands",
                &json!([{ "id": "legacy", "name": name, "category": "Web", "content": body }]),
            )
            .unwrap();

        let first = service.get::<Command>("legacy").unwrap();
        let second = service.get::<Command>("legacy").unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.history.len(), 1);
        prop_assert_eq!(&first.history.records()[0].payload.content, &body);
    }

    #[test]
    fn prop_self_diff_is_empty(text in content(), mode in mode()) {
        let delta = diff_text(&text, &text, mode);
        prop_assert!(delta.is_unchanged());
    }

    #[test]
    fn prop_set_difference_is_disjoint(old in content(), new in content()) {
        let delta = diff_text(&old, &new, DiffMode::SetDifference);
        let old_lines: HashSet<&str> = old.split('\n').collect();
        let new_lines: HashSet<&str> = new.split('\n').collect();
        for line in &delta.added {
            prop_assert!(new_lines.contains(line.as_str()));
            prop_assert!(!old_lines.contains(line.as_str()));
        }
        for line in &delta.removed {
            prop_assert!(old_lines.contains(line.as_str()));
            prop_assert!(!new_lines.contains(line.as_str()));
        }
    }
}
