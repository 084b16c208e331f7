//! MCP server configuration entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::entity::{
    CatalogEntity, EntityUpdate, EntityUpload, Example, PayloadUpdate, Versioned, merge_non_empty,
    merge_supplied, normalized_id, present, require_author, require_fields,
};
use super::kind::CatalogKind;
use super::version::{Payload, Provenance, StoredHistory, VersionHistory, VersionRecord};
use crate::Result;

/// Transport an MCP server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum McpTransport {
    /// Streamable HTTP.
    Http,
    /// Local subprocess over stdio.
    #[default]
    Stdio,
    /// Server-sent events.
    Sse,
}

impl McpTransport {
    /// Returns the transport name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Stdio => "stdio",
            Self::Sse => "sse",
        }
    }
}

impl fmt::Display for McpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an MCP server configuration is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallLocation {
    /// User-wide `~/.claude.json`.
    #[default]
    Global,
    /// Project-level `.mcp.json`.
    Project,
}

impl InstallLocation {
    /// Returns the location name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Project => "project",
        }
    }
}

/// Versioned part of an MCP server: its configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpConfigPayload {
    /// Server configuration as it appears under `mcpServers.<id>`.
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl Payload for McpConfigPayload {
    fn render(&self) -> String {
        serde_json::to_string_pretty(&self.config).unwrap_or_default()
    }
}

/// An MCP server configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredMcpServer")]
pub struct McpServerEntry {
    /// Unique id, also the key under `mcpServers`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Transport.
    #[serde(rename = "type")]
    pub transport: McpTransport,
    /// Configuration, mirrored from the latest version.
    pub config: Map<String, Value>,
    /// Global or project install.
    pub install_location: InstallLocation,
    /// Manual setup steps shown to the user.
    pub setup_steps: Vec<String>,
    /// Tools the server exposes, as free-form objects.
    pub tools: Vec<Value>,
    /// Usage examples.
    pub examples: Vec<Example>,
    /// Marks entries maintained by the catalog owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_owned: Option<bool>,
    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Last modifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Version history.
    #[serde(flatten)]
    pub history: VersionHistory<McpConfigPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMcpServer {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default, rename = "type")]
    transport: McpTransport,
    #[serde(default)]
    config: Map<String, Value>,
    #[serde(default)]
    install_location: InstallLocation,
    #[serde(default)]
    setup_steps: Vec<String>,
    #[serde(default)]
    tools: Vec<Value>,
    #[serde(default)]
    examples: Vec<Example>,
    #[serde(default)]
    is_owned: Option<bool>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    updated_by: Option<String>,
    #[serde(default)]
    current_version: Option<u32>,
    #[serde(default)]
    versions: Option<Vec<VersionRecord<McpConfigPayload>>>,
}

impl From<StoredMcpServer> for McpServerEntry {
    fn from(stored: StoredMcpServer) -> Self {
        let provenance = Provenance {
            updated_at: stored.updated_at.clone(),
            updated_by: stored.updated_by.clone(),
        };
        let top_level = McpConfigPayload {
            config: stored.config,
        };
        let history = StoredHistory::from_fields(stored.current_version, stored.versions)
            .normalize(&top_level, &provenance);
        let config = history.latest().payload.config.clone();

        Self {
            id: stored.id,
            name: stored.name,
            description: stored.description,
            category: stored.category,
            transport: stored.transport,
            config,
            install_location: stored.install_location,
            setup_steps: stored.setup_steps,
            tools: stored.tools,
            examples: stored.examples,
            is_owned: stored.is_owned,
            updated_at: stored.updated_at,
            updated_by: stored.updated_by,
            history,
        }
    }
}

/// List view of an MCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServerSummary {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Transport.
    #[serde(rename = "type", default)]
    pub transport: McpTransport,
    /// Configuration.
    #[serde(default)]
    pub config: Map<String, Value>,
    /// Global or project install.
    #[serde(default)]
    pub install_location: InstallLocation,
    /// Setup steps.
    #[serde(default)]
    pub setup_steps: Vec<String>,
    /// Exposed tools.
    #[serde(default)]
    pub tools: Vec<Value>,
    /// Usage examples.
    #[serde(default)]
    pub examples: Vec<Example>,
    /// Marks owner-maintained entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_owned: Option<bool>,
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

impl CatalogEntity for McpServerEntry {
    const KIND: CatalogKind = CatalogKind::McpServer;
    type Summary = McpServerSummary;

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

    fn summary(&self) -> McpServerSummary {
        McpServerSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            transport: self.transport,
            config: self.config.clone(),
            install_location: self.install_location,
            setup_steps: self.setup_steps.clone(),
            tools: self.tools.clone(),
            examples: self.examples.clone(),
            is_owned: self.is_owned,
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

impl Versioned for McpServerEntry {
    type Payload = McpConfigPayload;

    fn history(&self) -> &VersionHistory<McpConfigPayload> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut VersionHistory<McpConfigPayload> {
        &mut self.history
    }

    fn payload(&self) -> McpConfigPayload {
        McpConfigPayload {
            config: self.config.clone(),
        }
    }

    fn set_payload(&mut self, payload: McpConfigPayload) {
        self.config = payload.config;
    }
}

/// Request body for creating an MCP server entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServerUpload {
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
    /// Transport.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub transport: Option<McpTransport>,
    /// Configuration object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
    /// Install location (defaults to global).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_location: Option<InstallLocation>,
    /// Setup steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_steps: Option<Vec<String>>,
    /// Exposed tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    /// Usage examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
    /// Owner-maintained mark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_owned: Option<bool>,
    /// Author identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl EntityUpload<McpServerEntry> for McpServerUpload {
    fn into_entity(self, now: &str) -> Result<McpServerEntry> {
        require_fields(&[
            ("id", present(self.id.as_ref())),
            ("name", present(self.name.as_ref())),
            ("type", self.transport.is_some()),
            ("config", self.config.is_some()),
        ])?;
        let author = require_author(self.author_name.as_deref())?;
        let config = self.config.unwrap_or_default();

        Ok(McpServerEntry {
            id: normalized_id(self.id),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category: self
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "Other".to_string()),
            transport: self.transport.unwrap_or_default(),
            config: config.clone(),
            install_location: self.install_location.unwrap_or_default(),
            setup_steps: self.setup_steps.unwrap_or_default(),
            tools: self.tools.unwrap_or_default(),
            examples: self.examples.unwrap_or_default(),
            is_owned: self.is_owned,
            updated_at: Some(now.to_string()),
            updated_by: Some(author.clone()),
            history: VersionHistory::new(VersionRecord {
                version: 1,
                payload: McpConfigPayload { config },
                updated_at: now.to_string(),
                updated_by: author,
                changelog: None,
            }),
        })
    }
}

/// Request body for updating an MCP server entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServerUpdate {
    /// Id of the entry to update.
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
    /// New transport.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub transport: Option<McpTransport>,
    /// New configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
    /// New install location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_location: Option<InstallLocation>,
    /// New setup steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_steps: Option<Vec<String>>,
    /// New tool list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    /// New examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
    /// New owner-maintained mark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_owned: Option<bool>,
    /// Change note recorded on a new version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    /// Author identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl EntityUpdate<McpServerEntry> for McpServerUpdate {
    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn author(&self) -> Option<&str> {
        self.author_name.as_deref()
    }

    fn merge_metadata(&self, entity: &mut McpServerEntry) {
        merge_non_empty(&mut entity.name, self.name.as_ref());
        merge_supplied(&mut entity.description, self.description.as_ref());
        merge_non_empty(&mut entity.category, self.category.as_ref());
        merge_supplied(&mut entity.transport, self.transport.as_ref());
        merge_supplied(&mut entity.install_location, self.install_location.as_ref());
        merge_supplied(&mut entity.setup_steps, self.setup_steps.as_ref());
        merge_supplied(&mut entity.tools, self.tools.as_ref());
        merge_supplied(&mut entity.examples, self.examples.as_ref());
        if self.is_owned.is_some() {
            entity.is_owned = self.is_owned;
        }
    }
}

/// Request body for setting the owner-maintained mark on an MCP server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpOwnershipUpdate {
    /// Id of the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// New mark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_owned: Option<bool>,
    /// Author identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl PayloadUpdate<McpServerEntry> for McpServerUpdate {
    fn proposed_payload(&self, current: &McpConfigPayload) -> McpConfigPayload {
        McpConfigPayload {
            config: self
                .config
                .clone()
                .unwrap_or_else(|| current.config.clone()),
        }
    }

    fn changelog(&self) -> Option<&str> {
        self.changelog.as_deref().filter(|c| !c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: &str = "2025-03-01T12:00:00.000Z";

    fn figma_upload() -> McpServerUpload {
        serde_json::from_value(json!({
            "id": "figma",
            "name": "Figma MCP",
            "type": "http",
            "config": {"type": "http", "url": "https://mcp.figma.com/mcp"},
            "installLocation": "project",
            "authorName": "alice"
        }))
        .unwrap()
    }

    #[test]
    fn test_upload_defaults() {
        let entry = figma_upload().into_entity(NOW).unwrap();
        assert_eq!(entry.category, "Other");
        assert_eq!(entry.install_location, InstallLocation::Project);
        assert_eq!(entry.transport, McpTransport::Http);
        assert_eq!(entry.history.current_version(), 1);
        assert_eq!(entry.history.latest().payload.config["url"], "https://mcp.figma.com/mcp");
    }

    #[test]
    fn test_upload_requires_type_and_config() {
        let upload = McpServerUpload {
            id: Some("x".into()),
            name: Some("X".into()),
            author_name: Some("alice".into()),
            ..McpServerUpload::default()
        };
        let err = upload.into_entity(NOW).unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: type, config");
    }

    #[test]
    fn test_render_is_pretty_json() {
        let payload = McpConfigPayload {
            config: json!({"command": "npx", "args": ["-y", "server"]})
                .as_object()
                .cloned()
                .unwrap(),
        };
        let text = payload.render();
        assert!(text.contains("\"command\": \"npx\""));
        assert!(text.lines().count() > 1);
    }

    #[test]
    fn test_owned_mark_from_upload_and_update() {
        let upload = McpServerUpload {
            is_owned: Some(true),
            ..figma_upload()
        };
        let mut entry = upload.into_entity(NOW).unwrap();
        assert_eq!(entry.is_owned, Some(true));
        assert_eq!(serde_json::to_value(&entry).unwrap()["isOwned"], true);

        let rename = McpServerUpdate {
            name: Some("Figma".into()),
            ..McpServerUpdate::default()
        };
        rename.merge_metadata(&mut entry);
        assert_eq!(entry.is_owned, Some(true));

        let release = McpServerUpdate {
            is_owned: Some(false),
            ..McpServerUpdate::default()
        };
        release.merge_metadata(&mut entry);
        assert_eq!(entry.is_owned, Some(false));
        assert_eq!(entry.history.current_version(), 1);
    }

    #[test]
    fn test_round_trip_preserves_type_field() {
        let entry = figma_upload().into_entity(NOW).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "http");
        assert_eq!(json["versions"][0]["config"]["type"], "http");
        let back: McpServerEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
