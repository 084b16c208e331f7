//! Catalog entity kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four kinds of catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// Slash command (Markdown file).
    #[serde(alias = "commands")]
    Command,
    /// MCP server configuration.
    #[serde(rename = "mcp", alias = "mcpServers", alias = "mcp-server")]
    McpServer,
    /// Lifecycle hook script.
    #[serde(alias = "hooks")]
    Hook,
    /// Marketplace plugin.
    #[serde(alias = "plugins")]
    Plugin,
}

impl CatalogKind {
    /// Returns all kinds in store order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Command, Self::McpServer, Self::Hook, Self::Plugin]
    }

    /// Key under which the collection array is stored.
    #[must_use]
    pub const fn store_key(&self) -> &'static str {
        match self {
            Self::Command => "commands",
            Self::McpServer => "mcpServers",
            Self::Hook => "hooks",
            Self::Plugin => "plugins",
        }
    }

    /// Path segment used by the HTTP API (`/api/<segment>`).
    #[must_use]
    pub const fn api_segment(&self) -> &'static str {
        match self {
            Self::Command => "commands",
            Self::McpServer => "mcp",
            Self::Hook => "hook",
            Self::Plugin => "plugins",
        }
    }

    /// Short machine name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::McpServer => "mcp",
            Self::Hook => "hook",
            Self::Plugin => "plugin",
        }
    }

    /// Human label used in messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Command => "Command",
            Self::McpServer => "MCP server",
            Self::Hook => "Hook",
            Self::Plugin => "Plugin",
        }
    }

    /// Whether entries of this kind keep a version history.
    #[must_use]
    pub const fn is_versioned(&self) -> bool {
        !matches!(self, Self::Plugin)
    }

    /// Parses a kind from its machine name, API segment or store key.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "command" | "commands" => Some(Self::Command),
            "mcp" | "mcp-server" | "mcp_server" | "mcpservers" | "mcp-servers" => {
                Some(Self::McpServer)
            },
            "hook" | "hooks" => Some(Self::Hook),
            "plugin" | "plugins" => Some(Self::Plugin),
            _ => None,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CatalogKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::Error::InvalidInput(format!("unknown entry kind: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("command", CatalogKind::Command; "singular")]
    #[test_case("Commands", CatalogKind::Command; "plural mixed case")]
    #[test_case("mcpServers", CatalogKind::McpServer; "store key")]
    #[test_case("mcp", CatalogKind::McpServer; "api segment")]
    #[test_case("hooks", CatalogKind::Hook; "hooks")]
    #[test_case("plugin", CatalogKind::Plugin; "plugin")]
    fn test_parse(input: &str, expected: CatalogKind) {
        assert_eq!(CatalogKind::parse(input), Some(expected));
    }

    #[test]
    fn test_parse_unknown() {
        assert!(CatalogKind::parse("skill").is_none());
        assert!("skill".parse::<CatalogKind>().is_err());
    }

    #[test]
    fn test_store_keys_are_distinct() {
        let keys: std::collections::HashSet<_> =
            CatalogKind::all().iter().map(CatalogKind::store_key).collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(CatalogKind::McpServer.store_key(), "mcpServers");
    }

    #[test]
    fn test_only_plugins_are_unversioned() {
        assert!(CatalogKind::Command.is_versioned());
        assert!(CatalogKind::McpServer.is_versioned());
        assert!(CatalogKind::Hook.is_versioned());
        assert!(!CatalogKind::Plugin.is_versioned());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&CatalogKind::McpServer).unwrap();
        assert_eq!(json, "\"mcp\"");
        let kind: CatalogKind = serde_json::from_str("\"hooks\"").unwrap();
        assert_eq!(kind, CatalogKind::Hook);
    }
}
