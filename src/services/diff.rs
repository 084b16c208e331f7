//! Line diffs between version payloads.
//!
//! Two modes are supported:
//!
//! - [`DiffMode::Lcs`]: ordered longest-common-subsequence diff over lines.
//!   Handles repeated and reordered lines.
//! - [`DiffMode::SetDifference`]: lines present in one side's line set and
//!   absent from the other's. Repeated or moved lines produce no entries.
//!
//! Blank lines never count as added or removed in either mode.

use crate::models::{Payload, Versioned};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};
use std::collections::HashSet;
use std::fmt;

/// Diff algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffMode {
    /// Longest-common-subsequence line diff.
    #[default]
    Lcs,
    /// Set difference of non-blank lines.
    #[serde(alias = "set")]
    SetDifference,
}

impl DiffMode {
    /// Returns the mode name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lcs => "lcs",
            Self::SetDifference => "set-difference",
        }
    }

    /// Parses a mode name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lcs" | "sequence" => Some(Self::Lcs),
            "set" | "set-difference" | "set_difference" | "legacy" => Some(Self::SetDifference),
            _ => None,
        }
    }
}

impl fmt::Display for DiffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run of consecutive lines with the same change tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffChunk {
    /// Lines only in the new text.
    #[serde(default, skip_serializing_if = "is_false")]
    pub added: bool,
    /// Lines only in the old text.
    #[serde(default, skip_serializing_if = "is_false")]
    pub removed: bool,
    /// The lines, joined with `\n`.
    pub value: String,
    /// Number of lines in the chunk.
    pub count: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Difference between two texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDelta {
    /// Non-blank added lines, in order.
    pub added: Vec<String>,
    /// Non-blank removed lines, in order.
    pub removed: Vec<String>,
    /// Ordered chunks (empty in set-difference mode).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chunks: Vec<DiffChunk>,
}

impl TextDelta {
    /// True when nothing was added or removed.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Difference between two versions of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDiff {
    /// Entity id.
    pub id: String,
    /// Older version.
    pub from: u32,
    /// Newer version.
    pub to: u32,
    /// Algorithm used.
    pub mode: DiffMode,
    /// Count of added lines.
    pub added_count: usize,
    /// Count of removed lines.
    pub removed_count: usize,
    /// Line-level delta.
    #[serde(flatten)]
    pub delta: TextDelta,
}

fn non_blank(line: &str) -> bool {
    !line.trim().is_empty()
}

/// Diffs two texts line by line.
#[must_use]
pub fn diff_text(old: &str, new: &str, mode: DiffMode) -> TextDelta {
    match mode {
        DiffMode::Lcs => lcs_diff(old, new),
        DiffMode::SetDifference => set_difference(old, new),
    }
}

fn lcs_diff(old: &str, new: &str) -> TextDelta {
    let old_lines: Vec<&str> = old.split('\n').collect();
    let new_lines: Vec<&str> = new.split('\n').collect();
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Lcs)
        .diff_slices(&old_lines, &new_lines);

    let mut delta = TextDelta::default();
    let mut run: Vec<&str> = Vec::new();
    let mut run_tag: Option<ChangeTag> = None;

    for change in diff.iter_all_changes() {
        let tag = change.tag();
        if run_tag.is_some_and(|t| t != tag) {
            push_chunk(&mut delta.chunks, run_tag, &mut run);
        }
        run_tag = Some(tag);
        let line = change.value();
        run.push(line);
        if non_blank(line) {
            match tag {
                ChangeTag::Insert => delta.added.push(line.to_string()),
                ChangeTag::Delete => delta.removed.push(line.to_string()),
                ChangeTag::Equal => {},
            }
        }
    }
    push_chunk(&mut delta.chunks, run_tag, &mut run);
    delta
}

fn push_chunk(chunks: &mut Vec<DiffChunk>, tag: Option<ChangeTag>, run: &mut Vec<&str>) {
    let Some(tag) = tag else { return };
    if run.is_empty() {
        return;
    }
    chunks.push(DiffChunk {
        added: tag == ChangeTag::Insert,
        removed: tag == ChangeTag::Delete,
        value: run.join("\n"),
        count: run.len(),
    });
    run.clear();
}

fn set_difference(old: &str, new: &str) -> TextDelta {
    let old_set: HashSet<&str> = old.split('\n').filter(|l| non_blank(l)).collect();
    let new_set: HashSet<&str> = new.split('\n').filter(|l| non_blank(l)).collect();

    let mut seen = HashSet::new();
    let added = new
        .split('\n')
        .filter(|l| non_blank(l) && !old_set.contains(l) && seen.insert(*l))
        .map(ToString::to_string)
        .collect();
    seen.clear();
    let removed = old
        .split('\n')
        .filter(|l| non_blank(l) && !new_set.contains(l) && seen.insert(*l))
        .map(ToString::to_string)
        .collect();

    TextDelta {
        added,
        removed,
        chunks: Vec::new(),
    }
}

/// Diffs two payloads using their rendered text.
#[must_use]
pub fn diff_payloads<P: Payload>(old: &P, new: &P, mode: DiffMode) -> TextDelta {
    diff_text(&old.render(), &new.render(), mode)
}

/// Diffs two versions of an entity.
///
/// When `from` is `None` the version preceding `to` is used; when `to` is
/// `None` the latest version is used. Diffing the first version against
/// nothing compares it with an empty text.
///
/// # Errors
///
/// Returns [`Error::VersionNotFound`] if either version does not exist.
pub fn diff_versions<E: Versioned>(
    entity: &E,
    from: Option<u32>,
    to: Option<u32>,
    mode: DiffMode,
) -> Result<VersionDiff> {
    let history = entity.history();
    let missing = |version| Error::VersionNotFound {
        kind: E::KIND,
        id: entity.id().to_string(),
        version,
    };

    let to_version = to.unwrap_or_else(|| history.current_version());
    let new = history.get(to_version).ok_or_else(|| missing(to_version))?;
    let old = match from {
        Some(v) => Some(history.get(v).ok_or_else(|| missing(v))?),
        None => history.previous(to_version),
    };

    let old_text = old.map(|r| r.payload.render()).unwrap_or_default();
    let delta = diff_text(&old_text, &new.payload.render(), mode);

    Ok(VersionDiff {
        id: entity.id().to_string(),
        from: old.map_or(0, |r| r.version),
        to: to_version,
        mode,
        added_count: delta.added.len(),
        removed_count: delta.removed.len(),
        delta,
    })
}
