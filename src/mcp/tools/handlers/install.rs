//! Install tools: fetch an entry and apply it to the local `.claude`
//! directory, or print the settings the user has to merge.

use super::{parse_args, str_field};
use crate::mcp::installer::ensure_safe_file_name;
use crate::mcp::tool_types::EntryArgs;
use crate::mcp::tools::{ToolContext, ToolResult};
use crate::models::CatalogKind;
use crate::services::{CatalogQuery, Endpoint, PromptResponse};
use crate::{Error, Result};
use serde_json::Value;
use std::fmt::Write as _;

fn install_prompt(ctx: &ToolContext, kind: CatalogKind, args: &EntryArgs) -> Result<String> {
    let value = ctx.backend.read(
        Endpoint::InstallPrompt(kind),
        &CatalogQuery::by_id(args.id.clone()).at_version(args.version),
    )?;
    let response: PromptResponse =
        serde_json::from_value(value).map_err(|e| Error::OperationFailed {
            operation: "decode_install_prompt".to_string(),
            cause: e.to_string(),
        })?;
    Ok(response.prompt)
}

fn version_label(view: &Value, requested: Option<u32>) -> Option<String> {
    requested.map(|v| format!("v{v}")).or_else(|| {
        view.get("currentVersion")
            .and_then(Value::as_u64)
            .map(|v| format!("v{v} (latest)"))
    })
}

/// Executes `install_command`.
///
/// # Errors
///
/// Returns an error if the command or version does not exist or the file
/// cannot be written.
pub fn execute_install_command(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: EntryArgs = parse_args(arguments)?;
    ensure_safe_file_name(&args.id)?;
    let view = ctx.backend.read(
        Endpoint::Entries(CatalogKind::Command),
        &CatalogQuery::by_id(args.id.clone()).at_version(args.version),
    )?;
    let content = str_field(&view, "content").unwrap_or_default();
    let path = ctx.installer.install_command(&args.id, content)?;

    let mut text = String::from("Command installed");
    if let Some(label) = version_label(&view, args.version) {
        let _ = write!(text, " [{label}]");
    }
    let _ = write!(
        text,
        "\n\nLocation: {}\n\nUsage: /{}",
        path.display(),
        args.id
    );

    let examples = view
        .get("examples")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if !examples.is_empty() {
        text.push_str("\n\nExamples:");
        for example in examples {
            let _ = write!(
                text,
                "\n- {}: {}",
                str_field(example, "input").unwrap_or_default(),
                str_field(example, "description").unwrap_or_default()
            );
        }
    }
    Ok(ToolResult::text(text))
}

/// Executes `install_mcp`.
///
/// # Errors
///
/// Returns an error if the server or version does not exist.
pub fn execute_install_mcp(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: EntryArgs = parse_args(arguments)?;
    Ok(ToolResult::text(install_prompt(
        ctx,
        CatalogKind::McpServer,
        &args,
    )?))
}

/// Executes `install_hook`.
///
/// Writes the hook's script when it has one, then prints the settings to
/// merge.
///
/// # Errors
///
/// Returns an error if the hook or version does not exist or the script
/// cannot be written.
pub fn execute_install_hook(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: EntryArgs = parse_args(arguments)?;
    let view = ctx.backend.read(
        Endpoint::Entries(CatalogKind::Hook),
        &CatalogQuery::by_id(args.id.clone()).at_version(args.version),
    )?;

    let mut text = String::new();
    if let (Some(script), Some(script_path)) =
        (str_field(&view, "scriptContent"), str_field(&view, "scriptPath"))
    {
        let path = ctx.installer.install_hook_script(script_path, script)?;
        let _ = write!(text, "Script installed: {}\n\n", path.display());
    }
    text.push_str(&install_prompt(ctx, CatalogKind::Hook, &args)?);
    Ok(ToolResult::text(text))
}
