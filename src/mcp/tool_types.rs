//! Argument types for MCP tools.
//!
//! All argument types use `#[serde(deny_unknown_fields)]` so a misspelled
//! argument is reported instead of silently ignored.

use crate::models::{Example, HookEvent, InstallLocation, McpTransport};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Arguments for `list_commands`, `list_mcp_servers` and `list_plugins`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListArgs {
    /// Category filter.
    pub category: Option<String>,
}

/// Arguments for `list_hooks`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListHooksArgs {
    /// Category filter.
    pub category: Option<String>,
    /// Event filter.
    pub event: Option<String>,
}

/// Arguments for detail and install tools.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryArgs {
    /// Entry id.
    pub id: String,
    /// Pinned version.
    pub version: Option<u32>,
}

/// Arguments for `search`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchArgs {
    /// Search text.
    pub query: String,
}

/// Arguments for `diff_versions`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffArgs {
    /// Entry kind: `command`, `mcp` or `hook`.
    pub kind: String,
    /// Entry id.
    pub id: String,
    /// Base version (defaults to the one before `to`).
    pub from: Option<u32>,
    /// Target version (defaults to the latest).
    pub to: Option<u32>,
    /// `lcs` (default) or `set`.
    pub mode: Option<String>,
}

/// Arguments for `upload_command`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadCommandArgs {
    /// Markdown file to upload.
    pub file_path: String,
    /// Id (defaults to the file stem).
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Category.
    pub category: String,
    /// Description.
    pub description: Option<String>,
    /// Usage examples.
    pub examples: Option<Vec<Example>>,
    /// Author identifier.
    #[serde(rename = "authorName")]
    pub author_name: String,
}

/// Arguments for `update_command`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCommandArgs {
    /// Id of the command.
    pub id: String,
    /// File holding the new content.
    pub file_path: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Change note.
    pub changelog: Option<String>,
    /// Author identifier.
    #[serde(rename = "authorName")]
    pub author_name: String,
}

/// Arguments for `upload_mcp`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadMcpArgs {
    /// Id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Transport type.
    #[serde(rename = "type")]
    pub transport: McpTransport,
    /// Server configuration object.
    pub config: Map<String, Value>,
    /// Where the server is installed.
    #[serde(rename = "installLocation")]
    pub install_location: Option<InstallLocation>,
    /// Setup steps.
    #[serde(rename = "setupSteps")]
    pub setup_steps: Option<Vec<String>>,
    /// Author identifier.
    #[serde(rename = "authorName")]
    pub author_name: String,
}

/// Arguments for `update_mcp`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMcpArgs {
    /// Id.
    pub id: String,
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New transport type.
    #[serde(rename = "type")]
    pub transport: Option<McpTransport>,
    /// New configuration object.
    pub config: Option<Map<String, Value>>,
    /// New install location.
    #[serde(rename = "installLocation")]
    pub install_location: Option<InstallLocation>,
    /// New setup steps.
    #[serde(rename = "setupSteps")]
    pub setup_steps: Option<Vec<String>>,
    /// Change note.
    pub changelog: Option<String>,
    /// Author identifier.
    #[serde(rename = "authorName")]
    pub author_name: String,
}

/// Arguments for `upload_plugin` and `update_plugin`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginArgs {
    /// Id.
    pub id: String,
    /// Display name (required on upload).
    pub name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Marketplace (required on upload).
    pub marketplace: Option<String>,
    /// Feature list.
    pub features: Option<Vec<String>>,
    /// Bundled agents.
    pub agents: Option<Vec<String>>,
    /// Bundled skills.
    pub skills: Option<Vec<String>>,
    /// Author identifier.
    #[serde(rename = "authorName")]
    pub author_name: String,
}

/// Arguments for `upload_hook` and `update_hook`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookArgs {
    /// Id.
    pub id: String,
    /// Display name (required on upload).
    pub name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Subscribed event (required on upload).
    pub event: Option<HookEvent>,
    /// Tool-name matcher.
    pub matcher: Option<String>,
    /// Command line. Derived from `file_path` when absent.
    pub command: Option<String>,
    /// Script file to upload.
    pub file_path: Option<String>,
    /// Timeout.
    pub timeout: Option<u64>,
    /// Change note (update only).
    pub changelog: Option<String>,
    /// Author identifier.
    #[serde(rename = "authorName")]
    pub author_name: String,
}
