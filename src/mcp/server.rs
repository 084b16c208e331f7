//! MCP server over stdio.
//!
//! Newline-delimited JSON-RPC 2.0: one request per input line, one
//! response per output line. Notifications get no response.

use super::dispatch::McpMethod;
use super::tools::ToolRegistry;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Write};
use std::time::Instant;
use tracing::info_span;

/// MCP protocol version.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name.
const SERVER_NAME: &str = "skillshare";

/// Maximum accepted request line (1 MiB).
const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;

/// MCP server exposing the catalog tools.
pub struct McpServer {
    tools: ToolRegistry,
}

impl McpServer {
    /// Creates a server over a tool registry.
    #[must_use]
    pub const fn new(tools: ToolRegistry) -> Self {
        Self { tools }
    }

    /// The tool registry.
    #[must_use]
    pub const fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Serves stdin/stdout until stdin closes.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin cannot be read or stdout cannot be written.
    pub fn start(&self) -> Result<()> {
        tracing::info!(backend = %self.tools.backend_description(), "Starting MCP server on stdio");
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.serve(BufReader::new(stdin.lock()), stdout.lock())
    }

    /// Serves requests read line by line from `reader`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn serve<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<()> {
        for line in reader.lines() {
            let line = line.map_err(|e| Error::OperationFailed {
                operation: "read_stdin".to_string(),
                cause: e.to_string(),
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let Some(response) = self.handle_request(&line) else {
                continue;
            };
            writeln!(writer, "{response}").map_err(|e| Error::OperationFailed {
                operation: "write_stdout".to_string(),
                cause: e.to_string(),
            })?;
            writer.flush().map_err(|e| Error::OperationFailed {
                operation: "flush_stdout".to_string(),
                cause: e.to_string(),
            })?;
        }
        tracing::info!("stdin closed, MCP server stopping");
        Ok(())
    }

    /// Handles one JSON-RPC message.
    ///
    /// Returns `None` for notifications (messages without an `id`).
    #[must_use]
    pub fn handle_request(&self, request: &str) -> Option<String> {
        if request.len() > MAX_REQUEST_BODY_SIZE {
            tracing::warn!(
                request_size = request.len(),
                max_size = MAX_REQUEST_BODY_SIZE,
                "Request exceeds maximum size limit"
            );
            return Some(format_error(
                None,
                -32600,
                &format!(
                    "Request too large: {} bytes (max: {MAX_REQUEST_BODY_SIZE} bytes)",
                    request.len()
                ),
            ));
        }

        let start = Instant::now();
        let span = info_span!(
            "mcp.request",
            rpc.method = tracing::field::Empty,
            rpc.id = tracing::field::Empty,
            status = tracing::field::Empty
        );
        let _guard = span.enter();

        let mut method_label = "parse_error".to_string();
        let mut status_label = "error";

        let response = match serde_json::from_str::<JsonRpcRequest>(request) {
            Ok(req) => {
                method_label.clone_from(&req.method);
                span.record("rpc.method", method_label.as_str());
                if let Some(id) = &req.id {
                    span.record("rpc.id", id.to_string().as_str());
                }
                tracing::debug!(method = %method_label, "Processing MCP request");

                let result = self.dispatch_method(&req.method, req.params);
                status_label = if result.is_ok() { "success" } else { "error" };
                span.record("status", status_label);
                req.id.map(|id| format_response(Some(id), result))
            },
            Err(e) => {
                span.record("status", "parse_error");
                Some(format_error(None, -32700, &format!("Parse error: {e}")))
            },
        };

        metrics::counter!(
            "skillshare_mcp_requests_total",
            "method" => method_label.clone(),
            "status" => status_label
        )
        .increment(1);
        metrics::histogram!("skillshare_mcp_request_duration_ms", "method" => method_label)
            .record(start.elapsed().as_secs_f64() * 1000.0);

        response
    }

    fn dispatch_method(&self, method: &str, params: Option<Value>) -> DispatchResult {
        match McpMethod::from(method) {
            McpMethod::Initialize => Ok(Self::handle_initialize()),
            McpMethod::Initialized | McpMethod::Ping => Ok(json!({})),
            McpMethod::ListTools => self.handle_list_tools(),
            McpMethod::CallTool => self.handle_call_tool(params),
            McpMethod::Unknown(name) => Err((-32601, format!("Method not found: {name}"))),
        }
    }

    fn handle_initialize() -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    fn handle_list_tools(&self) -> DispatchResult {
        let tools = serde_json::to_value(self.tools.list_tools())
            .map_err(|e| (-32603, format!("Internal error: {e}")))?;
        Ok(json!({ "tools": tools }))
    }

    fn handle_call_tool(&self, params: Option<Value>) -> DispatchResult {
        let params = params.ok_or((-32602, "Missing params".to_string()))?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or((-32602, "Missing tool name".to_string()))?;

        let span = info_span!("mcp.tool.call", tool.name = name);
        let _guard = span.enter();

        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
        let result = match self.tools.execute(name, arguments) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "Tool call failed");
                super::tools::ToolResult::error(e.to_string())
            },
        };
        let status_label = if result.is_error { "error" } else { "success" };
        metrics::counter!(
            "skillshare_mcp_tool_calls_total",
            "tool" => name.to_string(),
            "status" => status_label
        )
        .increment(1);

        serde_json::to_value(&result).map_err(|e| (-32603, format!("Internal error: {e}")))
    }
}

/// Result type for method dispatch.
type DispatchResult = std::result::Result<Value, (i32, String)>;

fn format_response(id: Option<Value>, result: DispatchResult) -> String {
    match result {
        Ok(value) => {
            let response = JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(value),
                error: None,
            };
            serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
        },
        Err((code, message)) => format_error(id, code, &message),
    }
}

fn format_error(id: Option<Value>, code: i32, message: &str) -> String {
    let response = JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_string(),
            data: None,
        }),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
}

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC version (required by protocol but not used in code).
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}
