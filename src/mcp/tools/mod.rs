//! MCP tool implementations.
//!
//! # Module Structure
//!
//! - [`definitions`]: Tool schema definitions (JSON Schema for input validation)
//! - [`handlers`]: Tool execution logic
//!   - `browse`: list, detail, search and diff tools
//!   - `install`: tools that write into the local `.claude` directory
//!   - `publish`: upload and update tools

mod definitions;
mod handlers;

use super::backend::CatalogBackend;
use super::installer::Installer;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// What tool handlers run against.
#[derive(Clone)]
pub struct ToolContext {
    /// Catalog the tools read and write.
    pub backend: Arc<dyn CatalogBackend>,
    /// Local install target.
    pub installer: Installer,
}

/// Registry of MCP tools.
pub struct ToolRegistry {
    /// Available tools.
    tools: HashMap<String, ToolDefinition>,
    context: ToolContext,
}

impl ToolRegistry {
    /// Creates a registry with every catalog tool.
    #[must_use]
    pub fn new(backend: Arc<dyn CatalogBackend>, installer: Installer) -> Self {
        let tools = definitions::all()
            .into_iter()
            .map(|tool| (tool.name.clone(), tool))
            .collect();
        Self {
            tools,
            context: ToolContext { backend, installer },
        }
    }

    /// Returns all tool definitions, sorted by name.
    #[must_use]
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        let mut tools: Vec<_> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Gets a tool definition by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Describes the backend for logs.
    #[must_use]
    pub fn backend_description(&self) -> String {
        self.context.backend.describe()
    }

    /// Executes a tool with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool is unknown or its execution fails.
    pub fn execute(&self, name: &str, arguments: Value) -> Result<ToolResult> {
        let ctx = &self.context;
        match name {
            "list_commands" => handlers::execute_list_commands(ctx, arguments),
            "list_mcp_servers" => handlers::execute_list_mcp_servers(ctx, arguments),
            "list_plugins" => handlers::execute_list_plugins(ctx, arguments),
            "list_hooks" => handlers::execute_list_hooks(ctx, arguments),
            "get_command_detail" => handlers::execute_get_command_detail(ctx, arguments),
            "get_mcp_detail" => handlers::execute_get_mcp_detail(ctx, arguments),
            "get_plugin_detail" => handlers::execute_get_plugin_detail(ctx, arguments),
            "get_hook_detail" => handlers::execute_get_hook_detail(ctx, arguments),
            "search" => handlers::execute_search(ctx, arguments),
            "diff_versions" => handlers::execute_diff_versions(ctx, arguments),
            // Local installs
            "install_command" => handlers::execute_install_command(ctx, arguments),
            "install_mcp" => handlers::execute_install_mcp(ctx, arguments),
            "install_hook" => handlers::execute_install_hook(ctx, arguments),
            // Publishing
            "upload_command" => handlers::execute_upload_command(ctx, arguments),
            "upload_mcp" => handlers::execute_upload_mcp(ctx, arguments),
            "upload_plugin" => handlers::execute_upload_plugin(ctx, arguments),
            "upload_hook" => handlers::execute_upload_hook(ctx, arguments),
            "update_command" => handlers::execute_update_command(ctx, arguments),
            "update_mcp" => handlers::execute_update_mcp(ctx, arguments),
            "update_plugin" => handlers::execute_update_plugin(ctx, arguments),
            "update_hook" => handlers::execute_update_hook(ctx, arguments),
            _ => Err(Error::InvalidInput(format!("Unknown tool: {name}"))),
        }
    }
}

/// Definition of an MCP tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for input validation.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the result represents an error.
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    /// A successful single-text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// An error result shown to the agent.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// Concatenated text content.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Content types that can be returned by tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}
