//! Tool execution handlers.
//!
//! Handlers translate tool arguments into catalog reads and writes and
//! render the results as text for the agent.

mod browse;
mod install;
mod publish;

pub use browse::{
    execute_diff_versions, execute_get_command_detail, execute_get_hook_detail,
    execute_get_mcp_detail, execute_get_plugin_detail, execute_list_commands,
    execute_list_hooks, execute_list_mcp_servers, execute_list_plugins, execute_search,
};
pub use install::{execute_install_command, execute_install_hook, execute_install_mcp};
pub use publish::{
    execute_update_command, execute_update_hook, execute_update_mcp, execute_update_plugin,
    execute_upload_command, execute_upload_hook, execute_upload_mcp, execute_upload_plugin,
};

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parses tool arguments, treating missing arguments as an empty object.
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidInput(e.to_string()))
}

fn pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::OperationFailed {
        operation: "render_tool_output".to_string(),
        cause: e.to_string(),
    })
}

/// Reads a string field of a JSON object.
fn str_field<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tool_types::ListArgs;
    use serde_json::json;

    #[test]
    fn test_parse_args_null_is_empty_object() {
        let args: ListArgs = parse_args(Value::Null).unwrap();
        assert!(args.category.is_none());
    }

    #[test]
    fn test_parse_args_rejects_unknown_field() {
        let err = parse_args::<ListArgs>(json!({ "categroy": "Web" })).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_str_field() {
        let value = json!({ "content": "A", "n": 1 });
        assert_eq!(str_field(&value, "content"), Some("A"));
        assert_eq!(str_field(&value, "n"), None);
        assert_eq!(str_field(&value, "missing"), None);
    }
}
