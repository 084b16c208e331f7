//! MCP method dispatch.
//!
//! ```text
//! McpMethod
//!   ├── Initialize       initialize
//!   ├── Initialized      notifications/initialized
//!   ├── ListTools        tools/list
//!   ├── CallTool         tools/call
//!   ├── Ping             ping
//!   └── Unknown(String)
//! ```

use std::fmt;

/// MCP method identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum McpMethod {
    /// Start a session.
    Initialize,
    /// Client acknowledgement after `initialize`.
    Initialized,
    /// List available tools.
    ListTools,
    /// Call a tool.
    CallTool,
    /// Health check.
    Ping,
    /// Anything else.
    Unknown(String),
}

impl McpMethod {
    /// Returns the protocol method name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Initialize => "initialize",
            Self::Initialized => "notifications/initialized",
            Self::ListTools => "tools/list",
            Self::CallTool => "tools/call",
            Self::Ping => "ping",
            Self::Unknown(s) => s.as_str(),
        }
    }

    /// Returns true if this is a known method.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Returns all known methods.
    #[must_use]
    pub const fn known_methods() -> &'static [Self] {
        &[
            Self::Initialize,
            Self::Initialized,
            Self::ListTools,
            Self::CallTool,
            Self::Ping,
        ]
    }
}

impl From<&str> for McpMethod {
    fn from(s: &str) -> Self {
        match s {
            "initialize" => Self::Initialize,
            "notifications/initialized" => Self::Initialized,
            "tools/list" => Self::ListTools,
            "tools/call" => Self::CallTool,
            "ping" => Self::Ping,
            unknown => Self::Unknown(unknown.to_string()),
        }
    }
}

impl fmt::Display for McpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_as_str_roundtrip() {
        for method in McpMethod::known_methods() {
            let parsed = McpMethod::from(method.as_str());
            assert_eq!(&parsed, method, "Roundtrip failed for {method}");
            assert!(parsed.is_known());
        }
    }

    #[test]
    fn test_unknown_method() {
        let method = McpMethod::from("resources/list");
        assert!(!method.is_known());
        assert_eq!(method.to_string(), "resources/list");
    }
}
