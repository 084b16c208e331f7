//! Publishing tools: upload new entries and update existing ones.
//!
//! Tool arguments are mapped onto the same request bodies the HTTP API
//! accepts, so validation happens in one place.

use super::parse_args;
use crate::mcp::installer::{
    dotted_extension, ensure_safe_file_name, hook_command_for, hook_script_path,
};
use crate::mcp::tool_types::{
    HookArgs, PluginArgs, UpdateCommandArgs, UpdateMcpArgs, UploadCommandArgs, UploadMcpArgs,
};
use crate::mcp::tools::{ToolContext, ToolResult};
use crate::models::{
    CatalogKind, CommandUpdate, CommandUpload, HookUpdate, HookUpload, McpServerUpdate,
    McpServerUpload, PluginUpdate, PluginUpload, default_command_install_path,
};
use crate::services::{WriteResponse, to_json};
use crate::{Error, Result};
use serde_json::Value;
use std::fmt::Write as _;

fn render_write(response: &WriteResponse, details: &[(&str, String)]) -> ToolResult {
    let mut text = format!("{}\n\nID: {}", response.message, response.id);
    for (label, value) in details {
        let _ = write!(text, "\n{label}: {value}");
    }
    if let Some(version) = response.version {
        let _ = write!(text, "\nCurrent version: v{version}");
    }
    ToolResult::text(text)
}

fn updated_fields(fields: &[(&str, bool)]) -> String {
    let names: Vec<_> = fields
        .iter()
        .filter(|(_, supplied)| *supplied)
        .map(|(name, _)| *name)
        .collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// Executes `upload_command`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the id is not a plain file
/// name, or the catalog rejects the upload.
pub fn execute_upload_command(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: UploadCommandArgs = parse_args(arguments)?;
    let (path, content) = ctx.installer.read_source(&args.file_path)?;
    let id = match args.id.filter(|id| !id.trim().is_empty()) {
        Some(id) => id,
        None => path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::InvalidInput(format!("cannot derive an id from {}", args.file_path))
            })?,
    };
    ensure_safe_file_name(&id)?;

    let upload = CommandUpload {
        id: Some(id.clone()),
        name: Some(args.name.clone()),
        description: args.description,
        category: Some(args.category.clone()),
        content: Some(content),
        install_path: Some(default_command_install_path(&id)),
        examples: args.examples,
        author_name: Some(args.author_name),
    };
    let response = ctx.backend.create(CatalogKind::Command, to_json(&upload)?)?;
    Ok(render_write(
        &response,
        &[("Name", args.name), ("Category", args.category)],
    ))
}

/// Executes `update_command`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the catalog rejects the
/// update.
pub fn execute_update_command(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: UpdateCommandArgs = parse_args(arguments)?;
    let content = args
        .file_path
        .as_deref()
        .map(|path| ctx.installer.read_source(path).map(|(_, content)| content))
        .transpose()?;
    let fields = updated_fields(&[
        ("content", content.is_some()),
        ("name", args.name.is_some()),
        ("category", args.category.is_some()),
        ("description", args.description.is_some()),
        ("changelog", args.changelog.is_some()),
    ]);

    let update = CommandUpdate {
        id: Some(args.id),
        name: args.name,
        description: args.description,
        category: args.category,
        content,
        changelog: args.changelog,
        author_name: Some(args.author_name),
        ..CommandUpdate::default()
    };
    let response = ctx.backend.update(CatalogKind::Command, to_json(&update)?)?;
    Ok(render_write(&response, &[("Updated fields", fields)]))
}

/// Executes `upload_mcp`.
///
/// # Errors
///
/// Returns an error if the catalog rejects the upload.
pub fn execute_upload_mcp(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: UploadMcpArgs = parse_args(arguments)?;
    let transport = args.transport;
    let upload = McpServerUpload {
        id: Some(args.id),
        name: Some(args.name.clone()),
        description: args.description,
        category: args.category,
        transport: Some(transport),
        config: Some(args.config),
        install_location: args.install_location,
        setup_steps: args.setup_steps,
        author_name: Some(args.author_name),
        ..McpServerUpload::default()
    };
    let response = ctx.backend.create(CatalogKind::McpServer, to_json(&upload)?)?;
    Ok(render_write(
        &response,
        &[("Name", args.name), ("Type", transport.to_string())],
    ))
}

/// Executes `update_mcp`.
///
/// # Errors
///
/// Returns an error if the catalog rejects the update.
pub fn execute_update_mcp(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: UpdateMcpArgs = parse_args(arguments)?;
    let fields = updated_fields(&[
        ("name", args.name.is_some()),
        ("description", args.description.is_some()),
        ("category", args.category.is_some()),
        ("type", args.transport.is_some()),
        ("config", args.config.is_some()),
        ("installLocation", args.install_location.is_some()),
        ("setupSteps", args.setup_steps.is_some()),
        ("changelog", args.changelog.is_some()),
    ]);
    let update = McpServerUpdate {
        id: Some(args.id),
        name: args.name,
        description: args.description,
        category: args.category,
        transport: args.transport,
        config: args.config,
        install_location: args.install_location,
        setup_steps: args.setup_steps,
        changelog: args.changelog,
        author_name: Some(args.author_name),
        ..McpServerUpdate::default()
    };
    let response = ctx.backend.update(CatalogKind::McpServer, to_json(&update)?)?;
    Ok(render_write(&response, &[("Updated fields", fields)]))
}

/// Executes `upload_plugin`.
///
/// # Errors
///
/// Returns an error if the catalog rejects the upload.
pub fn execute_upload_plugin(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: PluginArgs = parse_args(arguments)?;
    let details = [
        ("Name", args.name.clone().unwrap_or_default()),
        ("Marketplace", args.marketplace.clone().unwrap_or_default()),
    ];
    let upload = PluginUpload {
        id: Some(args.id),
        name: args.name,
        description: args.description,
        category: args.category,
        marketplace: args.marketplace,
        features: args.features,
        agents: args.agents,
        skills: args.skills,
        author_name: Some(args.author_name),
        ..PluginUpload::default()
    };
    let response = ctx.backend.create(CatalogKind::Plugin, to_json(&upload)?)?;
    Ok(render_write(&response, &details))
}

/// Executes `update_plugin`.
///
/// # Errors
///
/// Returns an error if the catalog rejects the update.
pub fn execute_update_plugin(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: PluginArgs = parse_args(arguments)?;
    let fields = updated_fields(&[
        ("name", args.name.is_some()),
        ("description", args.description.is_some()),
        ("category", args.category.is_some()),
        ("marketplace", args.marketplace.is_some()),
        ("features", args.features.is_some()),
        ("agents", args.agents.is_some()),
        ("skills", args.skills.is_some()),
    ]);
    let update = PluginUpdate {
        id: Some(args.id),
        name: args.name,
        description: args.description,
        category: args.category,
        marketplace: args.marketplace,
        features: args.features,
        agents: args.agents,
        skills: args.skills,
        author_name: Some(args.author_name),
        ..PluginUpdate::default()
    };
    let response = ctx.backend.update(CatalogKind::Plugin, to_json(&update)?)?;
    Ok(render_write(&response, &[("Updated fields", fields)]))
}

/// Script fields derived from a hook's `file_path` argument.
struct HookScript {
    content: String,
    path: String,
    command: String,
}

fn hook_script(ctx: &ToolContext, id: &str, file_path: &str) -> Result<HookScript> {
    ensure_safe_file_name(id)?;
    let (path, content) = ctx.installer.read_source(file_path)?;
    let extension = dotted_extension(&path);
    Ok(HookScript {
        content,
        path: hook_script_path(id, &extension),
        command: hook_command_for(id, &extension),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Executes `upload_hook`.
///
/// With `file_path`, the script is stored with the hook and `command` is
/// derived from the file extension unless given.
///
/// # Errors
///
/// Returns an error if neither `command` nor `file_path` is given, the file
/// cannot be read, or the catalog rejects the upload.
pub fn execute_upload_hook(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: HookArgs = parse_args(arguments)?;
    let script = args
        .file_path
        .as_deref()
        .map(|path| hook_script(ctx, &args.id, path))
        .transpose()?;
    let command = non_empty(args.command)
        .or_else(|| script.as_ref().map(|s| s.command.clone()))
        .ok_or_else(|| {
            Error::InvalidInput("either command or file_path is required".to_string())
        })?;

    let event = args.event.as_ref().map(ToString::to_string).unwrap_or_default();
    let upload = HookUpload {
        id: Some(args.id),
        name: args.name.clone(),
        description: args.description,
        category: args.category,
        event: args.event,
        matcher: args.matcher,
        command: Some(command.clone()),
        script_path: script.as_ref().map(|s| s.path.clone()),
        script_content: script.map(|s| s.content),
        timeout: args.timeout,
        author_name: Some(args.author_name),
        ..HookUpload::default()
    };
    let response = ctx.backend.create(CatalogKind::Hook, to_json(&upload)?)?;
    Ok(render_write(
        &response,
        &[
            ("Name", args.name.unwrap_or_default()),
            ("Event", event),
            ("Command", command),
        ],
    ))
}

/// Executes `update_hook`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the catalog rejects the
/// update.
pub fn execute_update_hook(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: HookArgs = parse_args(arguments)?;
    let script = args
        .file_path
        .as_deref()
        .map(|path| hook_script(ctx, &args.id, path))
        .transpose()?;
    let command =
        non_empty(args.command).or_else(|| script.as_ref().map(|s| s.command.clone()));
    let fields = updated_fields(&[
        ("name", args.name.is_some()),
        ("description", args.description.is_some()),
        ("category", args.category.is_some()),
        ("event", args.event.is_some()),
        ("matcher", args.matcher.is_some()),
        ("command", command.is_some()),
        ("script", script.is_some()),
        ("timeout", args.timeout.is_some()),
        ("changelog", args.changelog.is_some()),
    ]);

    let update = HookUpdate {
        id: Some(args.id),
        name: args.name,
        description: args.description,
        category: args.category,
        event: args.event,
        matcher: args.matcher,
        command,
        script_path: script.as_ref().map(|s| s.path.clone()),
        script_content: script.map(|s| s.content),
        timeout: args.timeout,
        changelog: args.changelog,
        author_name: Some(args.author_name),
        ..HookUpdate::default()
    };
    let response = ctx.backend.update(CatalogKind::Hook, to_json(&update)?)?;
    Ok(render_write(&response, &[("Updated fields", fields)]))
}
