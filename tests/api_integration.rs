//! HTTP API integration tests.
//!
//! Drives the axum router in-process with `tower::ServiceExt::oneshot`
//! and checks status codes and response bodies for each endpoint.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use skillshare::api;
use skillshare::services::{CatalogService, CatalogSurface};
use skillshare::storage::{KvStore, MemoryKvStore};
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// Test Helpers
// ============================================================================

fn app() -> Router {
    let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    api::router(CatalogSurface::new(CatalogService::new(store)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

fn demo_upload() -> Value {
    json!({
        "id": "demo",
        "name": "Demo",
        "description": "Demo command",
        "category": "Utility",
        "content": "A\nB",
        "authorName": "alice"
    })
}

async fn app_with_demo() -> Router {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/api/commands", Some(demo_upload())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/commands",
        Some(json!({ "id": "demo", "content": "A\nB\nC", "authorName": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    app
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_health_reports_backend() {
    let (status, body) = get(&app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_list_omits_content() {
    let app = app_with_demo().await;
    let (status, body) = get(&app, "/api/commands").await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "demo");
    assert!(entries[0].get("content").is_none());
}

#[tokio::test]
async fn test_get_latest_and_pinned() {
    let app = app_with_demo().await;

    let (status, latest) = get(&app, "/api/commands?id=demo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["content"], "A\nB\nC");
    assert_eq!(latest["isLatest"], true);

    let (status, pinned) = get(&app, "/api/commands?id=demo&version=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pinned["content"], "A\nB");
    assert_eq!(pinned["updatedBy"], "alice");
    assert_eq!(pinned["requestedVersion"], 1);
    assert_eq!(pinned["isLatest"], false);
}

#[tokio::test]
async fn test_history_and_diff() {
    let app = app_with_demo().await;

    let (status, history) = get(&app, "/api/commands/history?id=demo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["currentVersion"], 2);
    assert_eq!(history["versions"].as_array().unwrap().len(), 2);

    let (status, diff) = get(&app, "/api/commands/diff?id=demo&from=1&to=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(diff["addedCount"], 1);
    assert_eq!(diff["removedCount"], 0);
}

#[tokio::test]
async fn test_install_prompt_pinned() {
    let app = app_with_demo().await;
    let (status, body) = get(&app, "/api/commands/install-prompt?id=demo&version=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], 1);
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("~/.claude/commands/demo.md"));
}

#[tokio::test]
async fn test_search_matches_name() {
    let app = app_with_demo().await;
    let (status, body) = get(&app, "/api/search?q=demo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

// ============================================================================
// Error Statuses
// ============================================================================

#[tokio::test]
async fn test_missing_entry_and_version_are_404() {
    let app = app_with_demo().await;

    let (status, body) = get(&app, "/api/commands?id=missing-id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("missing-id"));

    let (status, _) = get(&app, "/api/commands?id=demo&version=99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/api/widgets").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_upload_is_409() {
    let app = app_with_demo().await;
    let (status, _) = send(&app, Method::POST, "/api/commands", Some(demo_upload())).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_bad_requests_are_400() {
    let app = app();

    let mut upload = demo_upload();
    upload["authorName"] = json!("");
    let (status, _) = send(&app, Method::POST, "/api/commands", Some(upload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/commands",
        Some(json!({ "id": "x", "authorName": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/plugins/history?id=anything").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_update_reports_version() {
    let app = app_with_demo().await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/commands",
        Some(json!({ "id": "demo", "content": "A\nB\nC", "authorName": "carol" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["version"], 2);
    assert_eq!(body["newVersion"], false);

    let (_, body) = send(
        &app,
        Method::PUT,
        "/api/commands",
        Some(json!({ "id": "demo", "content": "D", "authorName": "carol" })),
    )
    .await;
    assert_eq!(body["version"], 3);
    assert_eq!(body["newVersion"], true);
}

#[tokio::test]
async fn test_plugin_update_has_no_version() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/plugins",
        Some(json!({
            "id": "dev",
            "name": "Development",
            "marketplace": "coding-basic-plugins",
            "authorName": "alice"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/plugins",
        Some(json!({ "id": "dev", "description": "Dev tools", "authorName": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("version").is_none());
    assert!(body.get("newVersion").is_none());
}

#[tokio::test]
async fn test_mcp_owned_mark() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/mcp",
        Some(json!({
            "id": "fs",
            "name": "Filesystem",
            "type": "stdio",
            "config": {"command": "npx"},
            "isOwned": true,
            "authorName": "alice"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], 1);

    let (_, entry) = get(&app, "/api/mcp?id=fs").await;
    assert_eq!(entry["isOwned"], true);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/mcp/owned",
        Some(json!({ "id": "fs", "isOwned": false, "authorName": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["version"], 1);
    assert_eq!(body["newVersion"], false);

    let (_, list) = get(&app, "/api/mcp").await;
    assert_eq!(list[0]["isOwned"], false);
    assert_eq!(list[0]["currentVersion"], 1);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/mcp/owned",
        Some(json!({ "id": "fs", "authorName": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/mcp/owned",
        Some(json!({ "id": "nope", "isOwned": true, "authorName": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
