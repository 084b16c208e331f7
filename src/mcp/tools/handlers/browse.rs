//! Read-only tools: listing, detail, search and diff.

use super::{parse_args, pretty};
use crate::mcp::tool_types::{DiffArgs, EntryArgs, ListArgs, ListHooksArgs, SearchArgs};
use crate::mcp::tools::{ToolContext, ToolResult};
use crate::models::CatalogKind;
use crate::services::{CatalogQuery, Endpoint, VersionDiff};
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write as _;

fn list(ctx: &ToolContext, kind: CatalogKind, query: &CatalogQuery) -> Result<ToolResult> {
    let entries = ctx.backend.read(Endpoint::Entries(kind), query)?;
    Ok(ToolResult::text(pretty(&entries)?))
}

fn category_query(arguments: Value) -> Result<CatalogQuery> {
    let args: ListArgs = parse_args(arguments)?;
    Ok(CatalogQuery {
        category: args.category,
        ..CatalogQuery::default()
    })
}

/// Executes `list_commands`.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the read fails.
pub fn execute_list_commands(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    list(ctx, CatalogKind::Command, &category_query(arguments)?)
}

/// Executes `list_mcp_servers`.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the read fails.
pub fn execute_list_mcp_servers(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    list(ctx, CatalogKind::McpServer, &category_query(arguments)?)
}

/// Executes `list_plugins`.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the read fails.
pub fn execute_list_plugins(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    list(ctx, CatalogKind::Plugin, &category_query(arguments)?)
}

/// Executes `list_hooks`.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the read fails.
pub fn execute_list_hooks(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: ListHooksArgs = parse_args(arguments)?;
    let query = CatalogQuery {
        category: args.category,
        event: args.event,
        ..CatalogQuery::default()
    };
    list(ctx, CatalogKind::Hook, &query)
}

/// Fields of a command view shown by `get_command_detail`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommandDetail {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    content: String,
    current_version: Option<u32>,
    requested_version: Option<u32>,
    updated_at: Option<String>,
    updated_by: Option<String>,
    #[serde(default)]
    versions: Vec<VersionLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionLine {
    version: u32,
    #[serde(default)]
    updated_at: String,
    #[serde(default)]
    updated_by: String,
    changelog: Option<String>,
}

impl CommandDetail {
    fn render(&self) -> String {
        let mut text = format!(
            "{}\n\nID: {}\nCategory: {}\nDescription: {}\n",
            self.name, self.id, self.category, self.description
        );
        if let Some(version) = self.requested_version {
            let _ = writeln!(text, "Requested version: v{version}");
        } else if let Some(version) = self.current_version {
            let _ = writeln!(text, "Current version: v{version}");
        }
        if let Some(at) = self.updated_at.as_deref().filter(|at| !at.is_empty()) {
            let _ = write!(text, "Last updated: {at}");
            if let Some(by) = self.updated_by.as_deref().filter(|by| !by.is_empty()) {
                let _ = write!(text, " by {by}");
            }
            text.push('\n');
        }

        if !self.versions.is_empty() {
            let mut versions: Vec<_> = self.versions.iter().collect();
            versions.sort_by(|a, b| b.version.cmp(&a.version));
            text.push_str("\nVersion history:\n");
            for line in versions {
                let latest = if Some(line.version) == self.current_version {
                    " (latest)"
                } else {
                    ""
                };
                let _ = write!(
                    text,
                    "  v{}{latest} | {} | {}",
                    line.version, line.updated_at, line.updated_by
                );
                if let Some(changelog) = &line.changelog {
                    let _ = write!(text, " - {changelog}");
                }
                text.push('\n');
            }
        }

        let _ = write!(text, "\n---\nContent:\n{}", self.content);
        text
    }
}

fn entry(ctx: &ToolContext, kind: CatalogKind, arguments: Value) -> Result<Value> {
    let args: EntryArgs = parse_args(arguments)?;
    ctx.backend.read(
        Endpoint::Entries(kind),
        &CatalogQuery::by_id(args.id).at_version(args.version),
    )
}

/// Executes `get_command_detail`.
///
/// # Errors
///
/// Returns an error if the command or version does not exist.
pub fn execute_get_command_detail(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let view = entry(ctx, CatalogKind::Command, arguments)?;
    let detail: CommandDetail = serde_json::from_value(view).map_err(|e| Error::OperationFailed {
        operation: "decode_command_detail".to_string(),
        cause: e.to_string(),
    })?;
    Ok(ToolResult::text(detail.render()))
}

/// Executes `get_mcp_detail`.
///
/// # Errors
///
/// Returns an error if the server or version does not exist.
pub fn execute_get_mcp_detail(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let view = entry(ctx, CatalogKind::McpServer, arguments)?;
    Ok(ToolResult::text(pretty(&view)?))
}

/// Executes `get_plugin_detail`.
///
/// # Errors
///
/// Returns an error if the plugin does not exist.
pub fn execute_get_plugin_detail(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let view = entry(ctx, CatalogKind::Plugin, arguments)?;
    Ok(ToolResult::text(pretty(&view)?))
}

/// Executes `get_hook_detail`.
///
/// # Errors
///
/// Returns an error if the hook or version does not exist.
pub fn execute_get_hook_detail(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let view = entry(ctx, CatalogKind::Hook, arguments)?;
    Ok(ToolResult::text(pretty(&view)?))
}

/// Executes `search`.
///
/// # Errors
///
/// Returns an error if the query is missing or a kind cannot be read.
pub fn execute_search(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: SearchArgs = parse_args(arguments)?;
    let query = CatalogQuery {
        q: Some(args.query.clone()),
        ..CatalogQuery::default()
    };
    let hits = ctx.backend.read(Endpoint::Search, &query)?;
    if hits.as_array().is_none_or(Vec::is_empty) {
        return Ok(ToolResult::text(format!("No results for \"{}\"", args.query)));
    }
    Ok(ToolResult::text(pretty(&hits)?))
}

/// Executes `diff_versions`.
///
/// # Errors
///
/// Returns an error for an unknown kind, a plugin, or missing versions.
pub fn execute_diff_versions(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: DiffArgs = parse_args(arguments)?;
    let kind: CatalogKind = args.kind.parse()?;
    let query = CatalogQuery {
        id: Some(args.id),
        from: args.from,
        to: args.to,
        mode: args.mode,
        ..CatalogQuery::default()
    };
    let value = ctx.backend.read(Endpoint::Diff(kind), &query)?;
    let diff: VersionDiff = serde_json::from_value(value).map_err(|e| Error::OperationFailed {
        operation: "decode_version_diff".to_string(),
        cause: e.to_string(),
    })?;
    Ok(ToolResult::text(render_diff(&diff)))
}

fn render_diff(diff: &VersionDiff) -> String {
    let mut text = format!(
        "{} v{} -> v{} ({}): +{} -{}\n",
        diff.id, diff.from, diff.to, diff.mode, diff.added_count, diff.removed_count
    );
    if diff.delta.is_unchanged() {
        text.push_str("\nNo changes");
        return text;
    }
    text.push('\n');

    if diff.delta.chunks.is_empty() {
        for line in &diff.delta.removed {
            let _ = writeln!(text, "- {line}");
        }
        for line in &diff.delta.added {
            let _ = writeln!(text, "+ {line}");
        }
        return text;
    }

    for chunk in &diff.delta.chunks {
        let marker = match (chunk.added, chunk.removed) {
            (true, _) => '+',
            (_, true) => '-',
            _ => ' ',
        };
        for line in chunk.value.split('\n') {
            let _ = writeln!(text, "{marker} {line}");
        }
    }
    text
}
