//! Version records and history normalization.
//!
//! Stored entries come in two shapes. Entries written before versioning
//! existed carry only their top-level payload fields (and sometimes a bare
//! `currentVersion`). Versioned entries carry a `versions` array. Both are
//! read through [`StoredHistory`] and normalized into a [`VersionHistory`],
//! which always holds at least one record.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Debug;

/// Author recorded when a legacy entry has no `updatedBy`.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// The versioned part of an entity.
pub trait Payload:
    Debug + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Text representation compared by the diff renderer.
    fn render(&self) -> String;
}

/// One immutable snapshot of an entity's payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord<P> {
    /// Version number, starting at 1.
    pub version: u32,
    /// Payload fields, flattened into the record.
    #[serde(flatten)]
    pub payload: P,
    /// RFC 3339 timestamp, empty for backfilled legacy records without one.
    #[serde(default)]
    pub updated_at: String,
    /// Author of this version.
    #[serde(default)]
    pub updated_by: String,
    /// Optional free-text change note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
}

/// Provenance fields read from the top level of a stored entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    /// Top-level `updatedAt`.
    pub updated_at: Option<String>,
    /// Top-level `updatedBy`.
    pub updated_by: Option<String>,
}

/// History as found in storage, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredHistory<P> {
    /// No `versions` array (or an empty one).
    Legacy {
        /// Bare `currentVersion`, if one was stored.
        current_version: Option<u32>,
    },
    /// A non-empty `versions` array.
    Versioned {
        /// Records in stored order.
        versions: Vec<VersionRecord<P>>,
    },
}

impl<P: Payload> StoredHistory<P> {
    /// Classifies the raw stored fields.
    #[must_use]
    pub fn from_fields(
        current_version: Option<u32>,
        versions: Option<Vec<VersionRecord<P>>>,
    ) -> Self {
        match versions {
            Some(versions) if !versions.is_empty() => Self::Versioned { versions },
            _ => Self::Legacy { current_version },
        }
    }

    /// Produces a normalized history.
    ///
    /// Legacy entries get a single synthesized record built from the
    /// top-level payload and provenance. The result is deterministic, so
    /// reading the same stored entry twice yields the same record.
    #[must_use]
    pub fn normalize(self, payload: &P, provenance: &Provenance) -> VersionHistory<P> {
        match self {
            Self::Versioned { versions } => VersionHistory::from_records(versions)
                .unwrap_or_else(|| VersionHistory::new(legacy_record(None, payload, provenance))),
            Self::Legacy { current_version } => {
                VersionHistory::new(legacy_record(current_version, payload, provenance))
            },
        }
    }
}

fn legacy_record<P: Payload>(
    current_version: Option<u32>,
    payload: &P,
    provenance: &Provenance,
) -> VersionRecord<P> {
    VersionRecord {
        version: current_version.filter(|v| *v >= 1).unwrap_or(1),
        payload: payload.clone(),
        updated_at: provenance.updated_at.clone().unwrap_or_default(),
        updated_by: provenance
            .updated_by
            .clone()
            .filter(|by| !by.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        changelog: None,
    }
}

/// A non-empty, insertion-ordered list of version records.
///
/// `current_version` is always the maximum version number present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionHistory<P> {
    current_version: u32,
    versions: Vec<VersionRecord<P>>,
}

impl<P: Payload> VersionHistory<P> {
    /// Starts a history with its first record.
    #[must_use]
    pub fn new(initial: VersionRecord<P>) -> Self {
        Self {
            current_version: initial.version,
            versions: vec![initial],
        }
    }

    /// Builds a history from stored records.
    ///
    /// Records with version 0 and repeated version numbers are dropped
    /// (the first occurrence wins). Returns `None` if nothing is left.
    #[must_use]
    pub fn from_records(records: Vec<VersionRecord<P>>) -> Option<Self> {
        let total = records.len();
        let mut seen = HashSet::new();
        let versions: Vec<_> = records
            .into_iter()
            .filter(|r| r.version >= 1 && seen.insert(r.version))
            .collect();
        if versions.len() != total {
            tracing::warn!(
                dropped = total - versions.len(),
                "Dropped invalid or duplicate version records"
            );
        }
        let current_version = versions.iter().map(|r| r.version).max()?;
        Some(Self {
            current_version,
            versions,
        })
    }

    /// Highest version number.
    #[must_use]
    pub const fn current_version(&self) -> u32 {
        self.current_version
    }

    /// Records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[VersionRecord<P>] {
        &self.versions
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Looks up a record by version number.
    #[must_use]
    pub fn get(&self, version: u32) -> Option<&VersionRecord<P>> {
        self.versions.iter().find(|r| r.version == version)
    }

    /// The record holding `current_version`.
    #[must_use]
    pub fn latest(&self) -> &VersionRecord<P> {
        self.get(self.current_version).unwrap_or(&self.versions[0])
    }

    /// The record immediately preceding `version`, if any.
    #[must_use]
    pub fn previous(&self, version: u32) -> Option<&VersionRecord<P>> {
        self.versions
            .iter()
            .filter(|r| r.version < version)
            .max_by_key(|r| r.version)
    }

    /// Records sorted newest first.
    #[must_use]
    pub fn newest_first(&self) -> Vec<&VersionRecord<P>> {
        let mut records: Vec<_> = self.versions.iter().collect();
        records.sort_by(|a, b| b.version.cmp(&a.version));
        records
    }

    /// Version number the next appended record will receive, or `None`
    /// once `u32::MAX` is taken.
    #[must_use]
    pub const fn next_version(&self) -> Option<u32> {
        self.current_version.checked_add(1)
    }

    /// Appends a new record at `next_version` and returns its number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the version number would
    /// overflow.
    pub fn append(
        &mut self,
        payload: P,
        updated_at: &str,
        updated_by: &str,
        changelog: Option<String>,
    ) -> Result<u32> {
        let version = self.next_version().ok_or_else(|| Error::OperationFailed {
            operation: "append_version".to_string(),
            cause: format!("version number overflow after {}", self.current_version),
        })?;
        self.versions.push(VersionRecord {
            version,
            payload,
            updated_at: updated_at.to_string(),
            updated_by: updated_by.to_string(),
            changelog,
        });
        self.current_version = version;
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Text {
        text: String,
    }

    impl Payload for Text {
        fn render(&self) -> String {
            self.text.clone()
        }
    }

    fn text(s: &str) -> Text {
        Text {
            text: s.to_string(),
        }
    }

    fn record(version: u32, s: &str) -> VersionRecord<Text> {
        VersionRecord {
            version,
            payload: text(s),
            updated_at: "2025-01-01T00:00:00.000Z".to_string(),
            updated_by: "alice".to_string(),
            changelog: None,
        }
    }

    #[test]
    fn test_legacy_backfill_defaults() {
        let history = StoredHistory::<Text>::from_fields(None, None)
            .normalize(&text("body"), &Provenance::default());

        assert_eq!(history.current_version(), 1);
        assert_eq!(history.len(), 1);
        let only = history.latest();
        assert_eq!(only.version, 1);
        assert_eq!(only.payload, text("body"));
        assert_eq!(only.updated_at, "");
        assert_eq!(only.updated_by, UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_legacy_backfill_uses_bare_current_version() {
        let provenance = Provenance {
            updated_at: Some("2024-06-01T10:00:00.000Z".to_string()),
            updated_by: Some("carol".to_string()),
        };
        let history = StoredHistory::<Text>::from_fields(Some(3), Some(Vec::new()))
            .normalize(&text("body"), &provenance);

        assert_eq!(history.current_version(), 3);
        assert_eq!(history.latest().updated_by, "carol");
        assert_eq!(history.latest().updated_at, "2024-06-01T10:00:00.000Z");
    }

    #[test]
    fn test_backfill_is_deterministic() {
        let a = StoredHistory::<Text>::from_fields(None, None)
            .normalize(&text("x"), &Provenance::default());
        let b = StoredHistory::<Text>::from_fields(None, None)
            .normalize(&text("x"), &Provenance::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_current_version_is_max() {
        let history =
            VersionHistory::from_records(vec![record(2, "b"), record(5, "e"), record(1, "a")])
                .unwrap();
        assert_eq!(history.current_version(), 5);
        assert_eq!(history.latest().payload, text("e"));
        assert_eq!(history.previous(5).unwrap().version, 2);
        assert!(history.previous(1).is_none());
    }

    #[test]
    fn test_duplicate_and_zero_versions_dropped() {
        let history =
            VersionHistory::from_records(vec![record(1, "a"), record(1, "dup"), record(0, "z")])
                .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().payload, text("a"));
        assert!(VersionHistory::from_records(vec![record(0, "z")]).is_none());
    }

    #[test]
    fn test_append_increments_from_max() {
        let mut history =
            VersionHistory::from_records(vec![record(1, "a"), record(4, "d")]).unwrap();
        let v = history
            .append(text("e"), "2025-02-02T00:00:00.000Z", "bob", Some("fix".into()))
            .unwrap();
        assert_eq!(v, 5);
        assert_eq!(history.current_version(), 5);
        assert_eq!(history.latest().changelog.as_deref(), Some("fix"));
        let order: Vec<u32> = history.newest_first().iter().map(|r| r.version).collect();
        assert_eq!(order, vec![5, 4, 1]);
    }

    #[test]
    fn test_append_at_max_version_fails() {
        let mut history = VersionHistory::from_records(vec![record(u32::MAX, "a")]).unwrap();
        assert_eq!(history.next_version(), None);

        let err = history
            .append(text("b"), "2025-02-02T00:00:00.000Z", "bob", None)
            .unwrap_err();
        assert!(matches!(err, Error::OperationFailed { .. }));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current_version(), u32::MAX);
    }

    #[test]
    fn test_record_serializes_flat_camel_case() {
        let json = serde_json::to_value(record(1, "a")).unwrap();
        assert_eq!(json["text"], "a");
        assert_eq!(json["updatedBy"], "alice");
        assert!(json.get("changelog").is_none());
        assert!(json.get("payload").is_none());
    }
}
