//! Lifecycle hook entries.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{
    CatalogEntity, EntityUpdate, EntityUpload, Example, PayloadUpdate, Versioned, merge_non_empty,
    merge_supplied, normalized_id, present, require_author, require_fields,
};
use super::kind::CatalogKind;
use super::version::{Payload, Provenance, StoredHistory, VersionHistory, VersionRecord};
use crate::Result;

/// Claude Code lifecycle event a hook subscribes to.
///
/// Unrecognized event names are preserved as [`HookEvent::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HookEvent {
    /// Before a tool runs.
    PreToolUse,
    /// After a tool runs.
    PostToolUse,
    /// When a notification is sent.
    Notification,
    /// When the agent stops.
    Stop,
    /// Any other event name.
    Other(String),
}

impl HookEvent {
    /// Known event names.
    pub const KNOWN: &'static [&'static str] =
        &["PreToolUse", "PostToolUse", "Notification", "Stop"];

    /// Returns the event name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PreToolUse => "PreToolUse",
            Self::PostToolUse => "PostToolUse",
            Self::Notification => "Notification",
            Self::Stop => "Stop",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for HookEvent {
    fn from(name: String) -> Self {
        match name.as_str() {
            "PreToolUse" => Self::PreToolUse,
            "PostToolUse" => Self::PostToolUse,
            "Notification" => Self::Notification,
            "Stop" => Self::Stop,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for HookEvent {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<HookEvent> for String {
    fn from(event: HookEvent) -> Self {
        event.as_str().to_string()
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Versioned part of a hook: the command line and optional script body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookPayload {
    /// Command line run by Claude Code.
    #[serde(default)]
    pub command: String,
    /// Script file body, if the hook ships one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_content: Option<String>,
}

impl Payload for HookPayload {
    fn render(&self) -> String {
        match &self.script_content {
            Some(script) => format!("{}\n{script}", self.command),
            None => self.command.clone(),
        }
    }
}

/// A lifecycle hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredHook")]
pub struct Hook {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Subscribed event.
    pub event: HookEvent,
    /// Tool-name matcher for tool events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    /// Command line, mirrored from the latest version.
    pub command: String,
    /// Script body, mirrored from the latest version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_content: Option<String>,
    /// Install location of the script, e.g. `~/.claude/hooks/fmt.sh`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_path: Option<String>,
    /// Timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Usage examples.
    pub examples: Vec<Example>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Last modifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Version history.
    #[serde(flatten)]
    pub history: VersionHistory<HookPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredHook {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default = "default_event")]
    event: HookEvent,
    #[serde(default)]
    matcher: Option<String>,
    #[serde(default)]
    command: String,
    #[serde(default)]
    script_content: Option<String>,
    #[serde(default)]
    script_path: Option<String>,
    #[serde(default)]
    timeout: Option<u64>,
    #[serde(default)]
    examples: Vec<Example>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    updated_by: Option<String>,
    #[serde(default)]
    current_version: Option<u32>,
    #[serde(default)]
    versions: Option<Vec<VersionRecord<HookPayload>>>,
}

const fn default_event() -> HookEvent {
    HookEvent::PreToolUse
}

impl From<StoredHook> for Hook {
    fn from(stored: StoredHook) -> Self {
        let provenance = Provenance {
            updated_at: stored.updated_at.clone().or_else(|| stored.created_at.clone()),
            updated_by: stored.updated_by.clone(),
        };
        let top_level = HookPayload {
            command: stored.command,
            script_content: stored.script_content,
        };
        let history = StoredHistory::from_fields(stored.current_version, stored.versions)
            .normalize(&top_level, &provenance);
        let latest = history.latest().payload.clone();

        Self {
            id: stored.id,
            name: stored.name,
            description: stored.description,
            category: stored.category,
            event: stored.event,
            matcher: stored.matcher,
            command: latest.command,
            script_content: latest.script_content,
            script_path: stored.script_path,
            timeout: stored.timeout,
            examples: stored.examples,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
            updated_by: stored.updated_by,
            history,
        }
    }
}

/// List view of a hook (no command or script).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSummary {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Subscribed event.
    pub event: HookEvent,
    /// Tool-name matcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    /// Usage examples.
    #[serde(default)]
    pub examples: Vec<Example>,
    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Last modifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Latest version number.
    #[serde(default)]
    pub current_version: u32,
}

impl CatalogEntity for Hook {
    const KIND: CatalogKind = CatalogKind::Hook;
    type Summary = HookSummary;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn summary(&self) -> HookSummary {
        HookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            event: self.event.clone(),
            matcher: self.matcher.clone(),
            examples: self.examples.clone(),
            updated_at: self.updated_at.clone(),
            updated_by: self.updated_by.clone(),
            current_version: self.history.current_version(),
        }
    }

    fn touch(&mut self, updated_at: &str, updated_by: &str) {
        self.updated_at = Some(updated_at.to_string());
        self.updated_by = Some(updated_by.to_string());
    }
}

impl Versioned for Hook {
    type Payload = HookPayload;

    fn history(&self) -> &VersionHistory<HookPayload> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut VersionHistory<HookPayload> {
        &mut self.history
    }

    fn payload(&self) -> HookPayload {
        HookPayload {
            command: self.command.clone(),
            script_content: self.script_content.clone(),
        }
    }

    fn set_payload(&mut self, payload: HookPayload) {
        self.command = payload.command;
        self.script_content = payload.script_content;
    }
}

/// Request body for creating a hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookUpload {
    /// Unique id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category (defaults to `Other`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Subscribed event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<HookEvent>,
    /// Tool-name matcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    /// Command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Script body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_content: Option<String>,
    /// Script install path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_path: Option<String>,
    /// Timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Usage examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
    /// Author identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl EntityUpload<Hook> for HookUpload {
    fn into_entity(self, now: &str) -> Result<Hook> {
        require_fields(&[
            ("id", present(self.id.as_ref())),
            ("name", present(self.name.as_ref())),
            (
                "event",
                self.event.as_ref().is_some_and(|e| !e.as_str().is_empty()),
            ),
            ("command", present(self.command.as_ref())),
        ])?;
        let author = require_author(self.author_name.as_deref())?;
        let payload = HookPayload {
            command: self.command.unwrap_or_default(),
            script_content: self.script_content,
        };

        Ok(Hook {
            id: normalized_id(self.id),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category: self
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "Other".to_string()),
            event: self.event.unwrap_or_else(default_event),
            matcher: self.matcher,
            command: payload.command.clone(),
            script_content: payload.script_content.clone(),
            script_path: self.script_path,
            timeout: self.timeout,
            examples: self.examples.unwrap_or_default(),
            created_at: Some(now.to_string()),
            updated_at: Some(now.to_string()),
            updated_by: Some(author.clone()),
            history: VersionHistory::new(VersionRecord {
                version: 1,
                payload,
                updated_at: now.to_string(),
                updated_by: author,
                changelog: None,
            }),
        })
    }
}

/// Request body for updating a hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookUpdate {
    /// Id of the hook to update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// New name (ignored when empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New category (ignored when empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<HookEvent>,
    /// New matcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    /// New command line (ignored when empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// New script body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_content: Option<String>,
    /// New script path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_path: Option<String>,
    /// New timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// New examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
    /// Change note recorded on a new version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    /// Author identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl EntityUpdate<Hook> for HookUpdate {
    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn author(&self) -> Option<&str> {
        self.author_name.as_deref()
    }

    fn merge_metadata(&self, entity: &mut Hook) {
        merge_non_empty(&mut entity.name, self.name.as_ref());
        merge_supplied(&mut entity.description, self.description.as_ref());
        merge_non_empty(&mut entity.category, self.category.as_ref());
        if let Some(event) = self.event.as_ref().filter(|e| !e.as_str().is_empty()) {
            entity.event = event.clone();
        }
        if self.matcher.is_some() {
            entity.matcher.clone_from(&self.matcher);
        }
        if self.script_path.is_some() {
            entity.script_path.clone_from(&self.script_path);
        }
        if self.timeout.is_some() {
            entity.timeout = self.timeout;
        }
        merge_supplied(&mut entity.examples, self.examples.as_ref());
    }
}

impl PayloadUpdate<Hook> for HookUpdate {
    fn proposed_payload(&self, current: &HookPayload) -> HookPayload {
        HookPayload {
            command: self
                .command
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| current.command.clone()),
            script_content: self
                .script_content
                .clone()
                .or_else(|| current.script_content.clone()),
        }
    }

    fn changelog(&self) -> Option<&str> {
        self.changelog.as_deref().filter(|c| !c.trim().is_empty())
    }
}
