//! HTTP read/write surface.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | `GET` | `/api/{kind}` | list summaries, or one entry with `?id=` (and `&version=`) |
//! | `POST` | `/api/{kind}` | create |
//! | `PUT` | `/api/{kind}` | update |
//! | `GET` | `/api/{kind}/history?id=` | version history, newest first |
//! | `GET` | `/api/{kind}/diff?id=&from=&to=&mode=` | diff between two versions |
//! | `GET` | `/api/{kind}/install-prompt?id=&version=` | install prompt |
//! | `GET` | `/api/search?q=` | search across every kind |
//! | `GET` | `/health` | liveness and backend name |
//!
//! `{kind}` is one of `commands`, `mcp`, `hook`, `plugins`. Errors are
//! returned as `{"error": "<message>"}` with a matching status code.

use crate::models::CatalogKind;
use crate::services::{CatalogQuery, CatalogSurface, Endpoint, WriteResponse};
use crate::{Error, Result};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Error response.
#[derive(Debug)]
pub enum ApiError {
    /// A catalog operation failed.
    Catalog(Error),
    /// The path names no entry kind.
    UnknownKind(String),
}

impl ApiError {
    /// Status code for the error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        let Self::Catalog(error) = self else {
            return StatusCode::NOT_FOUND;
        };
        match error {
            Error::NotFound { .. } | Error::VersionNotFound { .. } => StatusCode::NOT_FOUND,
            Error::DuplicateId { .. } => StatusCode::CONFLICT,
            Error::MissingAuthor
            | Error::MissingRequiredField(_)
            | Error::InvalidInput(_)
            | Error::NotVersioned(_) => StatusCode::BAD_REQUEST,
            Error::StoreUnavailable { .. }
            | Error::OperationFailed { .. }
            | Error::FeatureNotEnabled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::Catalog(e)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Catalog(error) => error.fmt(f),
            Self::UnknownKind(segment) => write!(f, "unknown entry kind: {segment}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Builds the router.
pub fn router(surface: CatalogSurface) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search))
        .route(
            "/api/{kind}",
            get(read_entries).post(create_entry).put(update_entry),
        )
        .route("/api/{kind}/history", get(read_history))
        .route("/api/{kind}/diff", get(read_diff))
        .route("/api/{kind}/install-prompt", get(read_install_prompt))
        .route("/api/mcp/owned", put(update_mcp_owned))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            header::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(surface)
}

/// Serves the API on `bind` until interrupted.
///
/// # Errors
///
/// Returns an error if the runtime cannot start or the address cannot be bound.
pub fn serve(surface: CatalogSurface, bind: &str) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().map_err(|e| Error::OperationFailed {
        operation: "create_runtime".to_string(),
        cause: e.to_string(),
    })?;
    let app = router(surface);

    rt.block_on(async {
        let listener = tokio::net::TcpListener::bind(bind)
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "bind".to_string(),
                cause: format!("{bind}: {e}"),
            })?;
        tracing::info!(bind, "Catalog API listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down catalog API");
            })
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "serve".to_string(),
                cause: e.to_string(),
            })
    })
}

fn kind_for(segment: &str) -> std::result::Result<CatalogKind, ApiError> {
    CatalogKind::all()
        .iter()
        .copied()
        .find(|kind| kind.api_segment() == segment)
        .ok_or_else(|| ApiError::UnknownKind(segment.to_string()))
}

fn query_or_error(
    query: std::result::Result<Query<CatalogQuery>, QueryRejection>,
) -> std::result::Result<CatalogQuery, ApiError> {
    query
        .map(|Query(q)| q)
        .map_err(|e| ApiError::Catalog(Error::InvalidInput(e.body_text())))
}

fn body_or_error(
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> std::result::Result<Value, ApiError> {
    body.map(|Json(v)| v)
        .map_err(|e| ApiError::Catalog(Error::InvalidInput(e.body_text())))
}

async fn run_blocking<T, F>(f: F) -> std::result::Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            ApiError::Catalog(Error::OperationFailed {
                operation: "spawn_blocking".to_string(),
                cause: e.to_string(),
            })
        })?
        .map_err(ApiError::Catalog)
}

async fn read(
    surface: CatalogSurface,
    endpoint: Endpoint,
    query: std::result::Result<Query<CatalogQuery>, QueryRejection>,
) -> ApiResult<Value> {
    let query = query_or_error(query)?;
    run_blocking(move || surface.read(endpoint, &query))
        .await
        .map(Json)
}

async fn health(State(surface): State<CatalogSurface>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": surface.service().store().backend_name(),
    }))
}

async fn search(
    State(surface): State<CatalogSurface>,
    query: std::result::Result<Query<CatalogQuery>, QueryRejection>,
) -> ApiResult<Value> {
    read(surface, Endpoint::Search, query).await
}

async fn read_entries(
    State(surface): State<CatalogSurface>,
    Path(kind): Path<String>,
    query: std::result::Result<Query<CatalogQuery>, QueryRejection>,
) -> ApiResult<Value> {
    read(surface, Endpoint::Entries(kind_for(&kind)?), query).await
}

async fn read_history(
    State(surface): State<CatalogSurface>,
    Path(kind): Path<String>,
    query: std::result::Result<Query<CatalogQuery>, QueryRejection>,
) -> ApiResult<Value> {
    read(surface, Endpoint::History(kind_for(&kind)?), query).await
}

async fn read_diff(
    State(surface): State<CatalogSurface>,
    Path(kind): Path<String>,
    query: std::result::Result<Query<CatalogQuery>, QueryRejection>,
) -> ApiResult<Value> {
    read(surface, Endpoint::Diff(kind_for(&kind)?), query).await
}

async fn read_install_prompt(
    State(surface): State<CatalogSurface>,
    Path(kind): Path<String>,
    query: std::result::Result<Query<CatalogQuery>, QueryRejection>,
) -> ApiResult<Value> {
    read(surface, Endpoint::InstallPrompt(kind_for(&kind)?), query).await
}

async fn create_entry(
    State(surface): State<CatalogSurface>,
    Path(kind): Path<String>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> ApiResult<WriteResponse> {
    let kind = kind_for(&kind)?;
    let body = body_or_error(body)?;
    run_blocking(move || surface.create(kind, body))
        .await
        .map(Json)
}

async fn update_entry(
    State(surface): State<CatalogSurface>,
    Path(kind): Path<String>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> ApiResult<WriteResponse> {
    let kind = kind_for(&kind)?;
    let body = body_or_error(body)?;
    run_blocking(move || surface.update(kind, body))
        .await
        .map(Json)
}

async fn update_mcp_owned(
    State(surface): State<CatalogSurface>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> ApiResult<WriteResponse> {
    let body = body_or_error(body)?;
    run_blocking(move || surface.set_mcp_owned(body))
        .await
        .map(Json)
}
