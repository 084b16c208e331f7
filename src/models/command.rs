//! Slash command entries.

use serde::{Deserialize, Serialize};

use super::entity::{
    CatalogEntity, EntityUpdate, EntityUpload, Example, PayloadUpdate, Versioned, merge_non_empty,
    merge_supplied, normalized_id, present, require_author, require_fields,
};
use super::kind::CatalogKind;
use super::version::{Payload, Provenance, StoredHistory, VersionHistory, VersionRecord};
use crate::Result;

/// Returns the default install path for a command id.
#[must_use]
pub fn default_command_install_path(id: &str) -> String {
    format!("~/.claude/commands/{id}.md")
}

/// Versioned part of a command: its Markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPayload {
    /// Markdown body of the command file.
    #[serde(default)]
    pub content: String,
}

impl Payload for CommandPayload {
    fn render(&self) -> String {
        self.content.clone()
    }
}

/// A slash command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredCommand")]
pub struct Command {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Markdown body, mirrored from the latest version.
    pub content: String,
    /// Where the file is installed.
    pub install_path: String,
    /// Usage examples.
    pub examples: Vec<Example>,
    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Last modifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Version history.
    #[serde(flatten)]
    pub history: VersionHistory<CommandPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCommand {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    install_path: Option<String>,
    #[serde(default)]
    examples: Vec<Example>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    updated_by: Option<String>,
    #[serde(default)]
    current_version: Option<u32>,
    #[serde(default)]
    versions: Option<Vec<VersionRecord<CommandPayload>>>,
}

impl From<StoredCommand> for Command {
    fn from(stored: StoredCommand) -> Self {
        let provenance = Provenance {
            updated_at: stored.updated_at.clone(),
            updated_by: stored.updated_by.clone(),
        };
        let top_level = CommandPayload {
            content: stored.content,
        };
        let history = StoredHistory::from_fields(stored.current_version, stored.versions)
            .normalize(&top_level, &provenance);
        let content = history.latest().payload.content.clone();
        let install_path = stored
            .install_path
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| default_command_install_path(&stored.id));

        Self {
            id: stored.id,
            name: stored.name,
            description: stored.description,
            category: stored.category,
            content,
            install_path,
            examples: stored.examples,
            updated_at: stored.updated_at,
            updated_by: stored.updated_by,
            history,
        }
    }
}

/// List view of a command (no content).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSummary {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Install path.
    pub install_path: String,
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

impl CatalogEntity for Command {
    const KIND: CatalogKind = CatalogKind::Command;
    type Summary = CommandSummary;

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

    fn summary(&self) -> CommandSummary {
        CommandSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            install_path: self.install_path.clone(),
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

impl Versioned for Command {
    type Payload = CommandPayload;

    fn history(&self) -> &VersionHistory<CommandPayload> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut VersionHistory<CommandPayload> {
        &mut self.history
    }

    fn payload(&self) -> CommandPayload {
        CommandPayload {
            content: self.content.clone(),
        }
    }

    fn set_payload(&mut self, payload: CommandPayload) {
        self.content = payload.content;
    }
}

/// Request body for creating a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandUpload {
    /// Unique id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Markdown body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Install path override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_path: Option<String>,
    /// Usage examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
    /// Author identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl CommandUpload {
    /// Creates an upload with the mandatory fields set.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            category: Some(category.into()),
            content: Some(content.into()),
            author_name: Some(author.into()),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl EntityUpload<Command> for CommandUpload {
    fn into_entity(self, now: &str) -> Result<Command> {
        require_fields(&[
            ("id", present(self.id.as_ref())),
            ("name", present(self.name.as_ref())),
            ("content", present(self.content.as_ref())),
            ("category", present(self.category.as_ref())),
        ])?;
        let author = require_author(self.author_name.as_deref())?;
        let id = normalized_id(self.id);
        let content = self.content.unwrap_or_default();
        let payload = CommandPayload {
            content: content.clone(),
        };

        Ok(Command {
            install_path: self
                .install_path
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| default_command_install_path(&id)),
            id,
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            content,
            examples: self.examples.unwrap_or_default(),
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

/// Request body for updating a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandUpdate {
    /// Id of the command to update.
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
    /// New Markdown body (ignored when empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New install path (ignored when empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_path: Option<String>,
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

impl CommandUpdate {
    /// Creates an update for `id` by `author` with no changes.
    #[must_use]
    pub fn new(id: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            author_name: Some(author.into()),
            ..Self::default()
        }
    }

    /// Sets new content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets a new category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the changelog.
    #[must_use]
    pub fn with_changelog(mut self, changelog: impl Into<String>) -> Self {
        self.changelog = Some(changelog.into());
        self
    }
}

impl EntityUpdate<Command> for CommandUpdate {
    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn author(&self) -> Option<&str> {
        self.author_name.as_deref()
    }

    fn merge_metadata(&self, entity: &mut Command) {
        merge_non_empty(&mut entity.name, self.name.as_ref());
        merge_supplied(&mut entity.description, self.description.as_ref());
        merge_non_empty(&mut entity.category, self.category.as_ref());
        merge_non_empty(&mut entity.install_path, self.install_path.as_ref());
        merge_supplied(&mut entity.examples, self.examples.as_ref());
    }
}

impl PayloadUpdate<Command> for CommandUpdate {
    fn proposed_payload(&self, current: &CommandPayload) -> CommandPayload {
        CommandPayload {
            content: self
                .content
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| current.content.clone()),
        }
    }

    fn changelog(&self) -> Option<&str> {
        self.changelog.as_deref().filter(|c| !c.trim().is_empty())
    }
}
