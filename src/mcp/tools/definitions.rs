//! Tool definitions.
//!
//! JSON Schema for every tool's arguments. Property names match the
//! argument structs in [`crate::mcp::tool_types`].

use super::ToolDefinition;
use serde_json::{Value, json};

const EVENTS: [&str; 4] = ["PreToolUse", "PostToolUse", "Notification", "Stop"];

fn tool(name: &str, description: &str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn id_and_version(what: &str, version_help: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "description": format!("{what} id") },
            "version": { "type": "integer", "minimum": 1, "description": version_help }
        },
        "required": ["id"]
    })
}

fn category_filter(what: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "category": { "type": "string", "description": format!("Only {what} in this category") }
        }
    })
}

/// `list_commands`.
pub fn list_commands_tool() -> ToolDefinition {
    tool(
        "list_commands",
        "List catalog slash commands, optionally filtered by category",
        category_filter("commands"),
    )
}

/// `list_mcp_servers`.
pub fn list_mcp_servers_tool() -> ToolDefinition {
    tool(
        "list_mcp_servers",
        "List catalog MCP servers, optionally filtered by category",
        category_filter("MCP servers"),
    )
}

/// `list_plugins`.
pub fn list_plugins_tool() -> ToolDefinition {
    tool(
        "list_plugins",
        "List catalog plugins, optionally filtered by category",
        category_filter("plugins"),
    )
}

/// `list_hooks`.
pub fn list_hooks_tool() -> ToolDefinition {
    tool(
        "list_hooks",
        "List catalog hooks, optionally filtered by category and event",
        json!({
            "type": "object",
            "properties": {
                "category": { "type": "string", "description": "Only hooks in this category" },
                "event": { "type": "string", "enum": EVENTS, "description": "Only hooks for this event" }
            }
        }),
    )
}

/// `get_command_detail`.
pub fn get_command_detail_tool() -> ToolDefinition {
    tool(
        "get_command_detail",
        "Show a command with its version history. With `version`, show that version's content",
        id_and_version("Command", "Version to show (default: latest)"),
    )
}

/// `get_mcp_detail`.
pub fn get_mcp_detail_tool() -> ToolDefinition {
    tool(
        "get_mcp_detail",
        "Show an MCP server entry including its configuration",
        id_and_version("MCP server", "Version to show (default: latest)"),
    )
}

/// `get_plugin_detail`.
pub fn get_plugin_detail_tool() -> ToolDefinition {
    tool(
        "get_plugin_detail",
        "Show a plugin entry",
        json!({
            "type": "object",
            "properties": { "id": { "type": "string", "description": "Plugin id" } },
            "required": ["id"]
        }),
    )
}

/// `get_hook_detail`.
pub fn get_hook_detail_tool() -> ToolDefinition {
    tool(
        "get_hook_detail",
        "Show a hook entry including its command and script",
        id_and_version("Hook", "Version to show (default: latest)"),
    )
}

/// `install_command`.
pub fn install_command_tool() -> ToolDefinition {
    tool(
        "install_command",
        "Install a command into ~/.claude/commands/. With `version`, install that version",
        id_and_version("Command", "Version to install (default: latest)"),
    )
}

/// `install_mcp`.
pub fn install_mcp_tool() -> ToolDefinition {
    tool(
        "install_mcp",
        "Print the configuration to add for an MCP server. The user merges it into their settings",
        id_and_version("MCP server", "Version to install (default: latest)"),
    )
}

/// `install_hook`.
pub fn install_hook_tool() -> ToolDefinition {
    tool(
        "install_hook",
        "Write a hook's script into ~/.claude/hooks/ and print the settings to add",
        id_and_version("Hook", "Version to install (default: latest)"),
    )
}

/// `search`.
pub fn search_tool() -> ToolDefinition {
    tool(
        "search",
        "Search commands, MCP servers, plugins and hooks by id, name or description",
        json!({
            "type": "object",
            "properties": { "query": { "type": "string", "description": "Search text" } },
            "required": ["query"]
        }),
    )
}

/// `upload_command`.
pub fn upload_command_tool() -> ToolDefinition {
    tool(
        "upload_command",
        "Upload a local command file to the catalog",
        json!({
            "type": "object",
            "properties": {
                "file_path": { "type": "string", "description": "Command file, e.g. ~/.claude/commands/my-command.md" },
                "id": { "type": "string", "description": "Command id (default: file name without extension)" },
                "name": { "type": "string", "description": "Display name" },
                "category": { "type": "string", "description": "Category, e.g. Web, Design, Documentation" },
                "description": { "type": "string", "description": "What the command does" },
                "examples": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "input": { "type": "string" }, "description": { "type": "string" } }
                    }
                },
                "authorName": { "type": "string", "description": "Author name" }
            },
            "required": ["file_path", "name", "category", "authorName"]
        }),
    )
}

/// `update_command`.
pub fn update_command_tool() -> ToolDefinition {
    tool(
        "update_command",
        "Update an uploaded command. New file content creates a new version",
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "string", "description": "Command id" },
                "file_path": { "type": "string", "description": "File holding the new content" },
                "name": { "type": "string" },
                "category": { "type": "string" },
                "description": { "type": "string" },
                "changelog": { "type": "string", "description": "Note stored with the new version" },
                "authorName": { "type": "string", "description": "Author name" }
            },
            "required": ["id", "authorName"]
        }),
    )
}

fn mcp_properties() -> Value {
    json!({
        "id": { "type": "string", "description": "MCP server id" },
        "name": { "type": "string", "description": "Display name" },
        "description": { "type": "string" },
        "category": { "type": "string" },
        "type": { "type": "string", "enum": ["stdio", "http", "sse"], "description": "Transport" },
        "config": { "type": "object", "description": "Server configuration (command, args, url, ...)" },
        "installLocation": { "type": "string", "enum": ["global", "project"], "description": "Default: global" },
        "setupSteps": { "type": "array", "items": { "type": "string" } },
        "authorName": { "type": "string", "description": "Author name" }
    })
}

/// `upload_mcp`.
pub fn upload_mcp_tool() -> ToolDefinition {
    tool(
        "upload_mcp",
        "Upload an MCP server configuration to the catalog",
        json!({
            "type": "object",
            "properties": mcp_properties(),
            "required": ["id", "name", "type", "config", "authorName"]
        }),
    )
}

/// `update_mcp`.
pub fn update_mcp_tool() -> ToolDefinition {
    let mut properties = mcp_properties();
    properties["changelog"] =
        json!({ "type": "string", "description": "Note stored with the new version" });
    tool(
        "update_mcp",
        "Update an uploaded MCP server. A changed config creates a new version",
        json!({
            "type": "object",
            "properties": properties,
            "required": ["id", "authorName"]
        }),
    )
}

fn plugin_schema(required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "description": "Plugin id" },
            "name": { "type": "string" },
            "description": { "type": "string" },
            "category": { "type": "string" },
            "marketplace": { "type": "string", "description": "Marketplace name" },
            "features": { "type": "array", "items": { "type": "string" } },
            "agents": { "type": "array", "items": { "type": "string" } },
            "skills": { "type": "array", "items": { "type": "string" } },
            "authorName": { "type": "string", "description": "Author name" }
        },
        "required": required
    })
}

/// `upload_plugin`.
pub fn upload_plugin_tool() -> ToolDefinition {
    tool(
        "upload_plugin",
        "Upload a plugin entry to the catalog",
        plugin_schema(&["id", "name", "marketplace", "authorName"]),
    )
}

/// `update_plugin`.
pub fn update_plugin_tool() -> ToolDefinition {
    tool(
        "update_plugin",
        "Update an uploaded plugin entry",
        plugin_schema(&["id", "authorName"]),
    )
}

fn hook_schema(required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "description": "Hook id" },
            "name": { "type": "string" },
            "description": { "type": "string" },
            "category": { "type": "string" },
            "event": { "type": "string", "enum": EVENTS },
            "matcher": { "type": "string", "description": "Tool-name matcher" },
            "command": { "type": "string", "description": "Command line (derived from file_path when omitted)" },
            "file_path": { "type": "string", "description": "Script file, e.g. ~/.claude/hooks/my-hook.js" },
            "timeout": { "type": "integer", "minimum": 1 },
            "changelog": { "type": "string", "description": "Note stored with a new version" },
            "authorName": { "type": "string", "description": "Author name" }
        },
        "required": required
    })
}

/// `upload_hook`.
pub fn upload_hook_tool() -> ToolDefinition {
    tool(
        "upload_hook",
        "Upload a hook to the catalog. With file_path the script is stored too",
        hook_schema(&["id", "name", "event", "authorName"]),
    )
}

/// `update_hook`.
pub fn update_hook_tool() -> ToolDefinition {
    tool(
        "update_hook",
        "Update an uploaded hook. A changed command or script creates a new version",
        hook_schema(&["id", "authorName"]),
    )
}

/// `diff_versions`.
pub fn diff_versions_tool() -> ToolDefinition {
    tool(
        "diff_versions",
        "Show the line diff between two versions of a command, MCP server or hook",
        json!({
            "type": "object",
            "properties": {
                "kind": { "type": "string", "enum": ["command", "mcp", "hook"] },
                "id": { "type": "string" },
                "from": { "type": "integer", "minimum": 0, "description": "Base version (default: the one before `to`)" },
                "to": { "type": "integer", "minimum": 1, "description": "Target version (default: latest)" },
                "mode": { "type": "string", "enum": ["lcs", "set"], "description": "Default: lcs" }
            },
            "required": ["kind", "id"]
        }),
    )
}

/// All tool definitions.
pub fn all() -> Vec<ToolDefinition> {
    vec![
        list_commands_tool(),
        list_mcp_servers_tool(),
        list_plugins_tool(),
        list_hooks_tool(),
        get_command_detail_tool(),
        get_mcp_detail_tool(),
        get_plugin_detail_tool(),
        get_hook_detail_tool(),
        install_command_tool(),
        install_mcp_tool(),
        install_hook_tool(),
        search_tool(),
        upload_command_tool(),
        upload_mcp_tool(),
        upload_plugin_tool(),
        upload_hook_tool(),
        update_command_tool(),
        update_mcp_tool(),
        update_plugin_tool(),
        update_hook_tool(),
        diff_versions_tool(),
    ]
}
