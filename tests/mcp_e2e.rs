//! MCP end-to-end tests.
//!
//! Sends JSON-RPC messages to an [`McpServer`] backed by an in-process
//! catalog and a temporary install root, then checks the tool output and
//! the files written under `.claude/`.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use serde_json::{Value, json};
use skillshare::mcp::{CatalogBackend, Installer, LocalCatalog, McpServer, ToolRegistry};
use skillshare::services::{CatalogService, CatalogSurface};
use skillshare::storage::{KvStore, MemoryKvStore};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

struct Harness {
    server: McpServer,
    home: TempDir,
    sources: TempDir,
    next_id: std::cell::Cell<u64>,
}

impl Harness {
    fn new() -> Self {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let backend: Arc<dyn CatalogBackend> = Arc::new(LocalCatalog::new(CatalogSurface::new(
            CatalogService::new(store),
        )));
        let home = TempDir::new().unwrap();
        let tools = ToolRegistry::new(backend, Installer::new(home.path()));
        Self {
            server: McpServer::new(tools),
            home,
            sources: TempDir::new().unwrap(),
            next_id: std::cell::Cell::new(1),
        }
    }

    fn source(&self, name: &str, content: &str) -> String {
        let path = self.sources.path().join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn call(&self, tool: &str, arguments: Value) -> (bool, String) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": tool, "arguments": arguments }
        });
        let response = self.server.handle_request(&request.to_string()).unwrap();
        let response: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(response["id"], id);
        let result = &response["result"];
        let text = result["content"][0]["text"].as_str().unwrap().to_string();
        (result["isError"].as_bool().unwrap_or(false), text)
    }

    fn ok(&self, tool: &str, arguments: Value) -> String {
        let (is_error, text) = self.call(tool, arguments);
        assert!(!is_error, "{tool} failed: {text}");
        text
    }
}

// ============================================================================
// Protocol
// ============================================================================

#[test]
fn test_initialize_then_list_tools() {
    let harness = Harness::new();
    let init = harness
        .server
        .handle_request(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
        .unwrap();
    let init: Value = serde_json::from_str(&init).unwrap();
    assert_eq!(init["result"]["serverInfo"]["name"], "skillshare");

    let list = harness
        .server
        .handle_request(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
        .unwrap();
    let list: Value = serde_json::from_str(&list).unwrap();
    let names: Vec<&str> = list["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"upload_command"));
    assert!(names.contains(&"diff_versions"));
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn test_upload_update_install_command() {
    let harness = Harness::new();
    let file = harness.source("review.md", "Review the diff\nBe terse");

    let text = harness.ok(
        "upload_command",
        json!({
            "file_path": file,
            "name": "Review",
            "category": "Git",
            "authorName": "alice"
        }),
    );
    assert!(text.contains("ID: review"));

    let updated = harness.source("review-v2.md", "Review the diff\nBe terse\nCite lines");
    let text = harness.ok(
        "update_command",
        json!({
            "id": "review",
            "file_path": updated,
            "changelog": "cite lines",
            "authorName": "bob"
        }),
    );
    assert!(text.contains("Current version: v2"));

    let text = harness.ok("install_command", json!({ "id": "review", "version": 1 }));
    assert!(text.contains("[v1]"));
    assert!(text.contains("Usage: /review"));
    let installed = harness.home.path().join(".claude/commands/review.md");
    assert_eq!(
        fs::read_to_string(&installed).unwrap(),
        "Review the diff\nBe terse"
    );

    harness.ok("install_command", json!({ "id": "review" }));
    assert!(fs::read_to_string(&installed).unwrap().ends_with("Cite lines"));
}

#[test]
fn test_command_detail_and_diff() {
    let harness = Harness::new();
    let file = harness.source("demo.md", "A\nB");
    harness.ok(
        "upload_command",
        json!({ "file_path": file, "name": "Demo", "category": "Utility", "authorName": "alice" }),
    );
    let file = harness.source("demo2.md", "A\nB\nC");
    harness.ok(
        "update_command",
        json!({ "id": "demo", "file_path": file, "authorName": "bob" }),
    );

    let detail = harness.ok("get_command_detail", json!({ "id": "demo" }));
    assert!(detail.contains("Current version: v2"));
    assert!(detail.contains("v2 (latest)"));

    let diff = harness.ok(
        "diff_versions",
        json!({ "kind": "command", "id": "demo", "from": 1, "to": 2 }),
    );
    assert!(diff.starts_with("demo v1 -> v2"));
    assert!(diff.contains("+ C"));

    let same = harness.ok(
        "diff_versions",
        json!({ "kind": "command", "id": "demo", "from": 2, "to": 2, "mode": "set" }),
    );
    assert!(same.contains("No changes"));
}

#[test]
fn test_missing_command_is_tool_error() {
    let harness = Harness::new();
    let (is_error, text) = harness.call("install_command", json!({ "id": "missing-id" }));
    assert!(is_error);
    assert!(text.contains("missing-id"));

    let (is_error, _) = harness.call("install_command", json!({ "id": "../escape" }));
    assert!(is_error);
}

// ============================================================================
// Hooks and MCP Servers
// ============================================================================

#[test]
fn test_upload_and_install_hook_script() {
    let harness = Harness::new();
    let script = harness.source("format.sh", "#!/bin/sh\ncargo fmt\n");

    let text = harness.ok(
        "upload_hook",
        json!({
            "id": "fmt",
            "name": "Format",
            "event": "PostToolUse",
            "matcher": "Edit",
            "file_path": script,
            "authorName": "alice"
        }),
    );
    assert!(text.contains("Command: bash ~/.claude/hooks/fmt.sh"));

    let text = harness.ok("install_hook", json!({ "id": "fmt" }));
    assert!(text.starts_with("Script installed:"));
    let installed = harness.home.path().join(".claude/hooks/fmt.sh");
    assert_eq!(fs::read_to_string(&installed).unwrap(), "#!/bin/sh\ncargo fmt\n");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&installed).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }
}

#[test]
fn test_upload_hook_requires_command_or_file() {
    let harness = Harness::new();
    let (is_error, text) = harness.call(
        "upload_hook",
        json!({ "id": "noop", "name": "Noop", "event": "Stop", "authorName": "alice" }),
    );
    assert!(is_error);
    assert!(text.contains("either command or file_path is required"));
}

#[test]
fn test_mcp_upload_update_and_install_prompt() {
    let harness = Harness::new();
    harness.ok(
        "upload_mcp",
        json!({
            "id": "fs",
            "name": "Filesystem",
            "type": "stdio",
            "config": { "command": "npx", "args": ["-y", "fs-server"] },
            "authorName": "alice"
        }),
    );
    let text = harness.ok(
        "update_mcp",
        json!({
            "id": "fs",
            "config": { "command": "bunx", "args": ["fs-server"] },
            "authorName": "bob"
        }),
    );
    assert!(text.contains("Current version: v2"));

    let prompt = harness.ok("install_mcp", json!({ "id": "fs", "version": 1 }));
    assert!(prompt.contains("npx"));
    assert!(!prompt.contains("bunx"));
}

#[test]
fn test_search_reports_no_results() {
    let harness = Harness::new();
    let text = harness.ok("search", json!({ "query": "nothing" }));
    assert_eq!(text, "No results for \"nothing\"");
}
