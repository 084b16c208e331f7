//! Install prompts: copy-paste instructions for installing an entry.
//!
//! Prompts are pure functions of the entity. To render a pinned version,
//! resolve the version first with [`VersionManager::resolve`] and render the
//! resulting view.

use crate::Result;
use crate::models::{Command, Hook, InstallLocation, McpServerEntry, Plugin, Versioned};
use crate::services::VersionManager;
use serde_json::{Map, Value, json};
use std::fmt::Write as _;

/// An entity that can describe how to install itself.
pub trait InstallPrompt {
    /// Renders the install instructions for the entity as it stands.
    fn install_prompt(&self) -> String;
}

/// Renders the install prompt for `version`, or the latest when `None`.
///
/// # Errors
///
/// Returns [`crate::Error::VersionNotFound`] for an unknown version.
pub fn prompt_for_version<E>(entity: &E, version: Option<u32>) -> Result<String>
where
    E: Versioned + InstallPrompt,
{
    let view = VersionManager::resolve(entity, version)?;
    Ok(view.entity.install_prompt())
}

impl InstallPrompt for Command {
    fn install_prompt(&self) -> String {
        format!(
            "Please install the following custom command.\n\n\
             ## Install path\n`{path}`\n\n\
             ## File content\n```markdown\n{content}\n```\n\n\
             Save the content above to `{path}`. Create the directory if it does not exist.",
            path = self.install_path,
            content = self.content,
        )
    }
}

/// The `"<id>": {config}` object to merge under `mcpServers`.
#[must_use]
pub fn mcp_config_snippet(entry: &McpServerEntry) -> Value {
    let mut servers = Map::new();
    servers.insert(entry.id.clone(), Value::Object(entry.config.clone()));
    Value::Object(servers)
}

fn numbered(steps: &[String]) -> String {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

impl InstallPrompt for McpServerEntry {
    fn install_prompt(&self) -> String {
        let config = serde_json::to_string_pretty(&mcp_config_snippet(self)).unwrap_or_default();
        let (heading, target) = match self.install_location {
            InstallLocation::Global => (
                "Please add the following MCP server to the global configuration.",
                "Add the entry below to the `mcpServers` section of `~/.claude.json`:".to_string(),
            ),
            InstallLocation::Project => (
                "Please add the following MCP server to the project configuration.",
                "Add the entry below to `mcpServers` in the project's `.mcp.json` \
                 (or the project section of `~/.claude.json`):"
                    .to_string(),
            ),
        };

        let mut prompt = format!(
            "{heading}\n\n\
             ## MCP server\n- **Name**: {name}\n- **Type**: {transport}\n\n\
             ## Installation\n\n{target}\n\n```json\n{config}\n```\n",
            name = self.name,
            transport = self.transport,
        );
        if !self.setup_steps.is_empty() {
            let _ = write!(prompt, "\n## Additional setup\n{}\n", numbered(&self.setup_steps));
        }
        prompt
    }
}

/// The `hooks` settings object registering this hook.
#[must_use]
pub fn hook_settings_snippet(hook: &Hook) -> Value {
    let mut handler = Map::new();
    handler.insert("type".to_string(), json!("command"));
    handler.insert("command".to_string(), json!(hook.command));
    if let Some(timeout) = hook.timeout {
        handler.insert("timeout".to_string(), json!(timeout));
    }

    let mut matcher_group = Map::new();
    if let Some(matcher) = hook.matcher.as_ref().filter(|m| !m.is_empty()) {
        matcher_group.insert("matcher".to_string(), json!(matcher));
    }
    matcher_group.insert("hooks".to_string(), json!([Value::Object(handler)]));

    let mut events = Map::new();
    events.insert(hook.event.to_string(), json!([Value::Object(matcher_group)]));
    json!({ "hooks": Value::Object(events) })
}

impl InstallPrompt for Hook {
    fn install_prompt(&self) -> String {
        let settings =
            serde_json::to_string_pretty(&hook_settings_snippet(self)).unwrap_or_default();
        let mut prompt = format!(
            "Please install the following hook.\n\n\
             ## Hook\n- **Name**: {name}\n- **Event**: {event}\n",
            name = self.name,
            event = self.event,
        );
        if let Some(matcher) = self.matcher.as_ref().filter(|m| !m.is_empty()) {
            let _ = writeln!(prompt, "- **Matcher**: {matcher}");
        }

        if let (Some(script), Some(path)) = (&self.script_content, &self.script_path) {
            let _ = write!(prompt, "\n## Script\nSave the following to `{path}`");
            if path.ends_with(".sh") {
                prompt.push_str(" and make it executable (`chmod 755`)");
            }
            let _ = write!(prompt, ":\n```\n{script}\n```\n");
        }

        let _ = write!(
            prompt,
            "\n## Settings\nMerge the following into `~/.claude/settings.json`:\n```json\n{settings}\n```"
        );
        prompt
    }
}

impl InstallPrompt for Plugin {
    fn install_prompt(&self) -> String {
        format!(
            "Please install the following plugin.\n\n\
             ## Plugin\n- **Name**: {name}\n- **Marketplace**: {marketplace}\n\n\
             ## Installation\n\n\
             ### 1. Add the marketplace (first time only)\n\
             Make sure the `{marketplace}` marketplace is registered in Claude Code.\n\n\
             ### 2. Install the plugin\n```\n{install}\n```\n\n\
             ### 3. Enable the plugin\n\
             Check that the plugin is enabled in `~/.claude/settings.json`:\n\
             ```json\n{{\n  \"enabledPlugins\": {{\n    \"{id}@{marketplace}\": true\n  }}\n}}\n```",
            name = self.name,
            marketplace = self.marketplace,
            install = self.install_command,
            id = self.id,
        )
    }
}
