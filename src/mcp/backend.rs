//! Catalog backends for the MCP tools.
//!
//! Tools speak the same JSON read/write surface whether the catalog lives
//! in this process ([`LocalCatalog`]) or behind a remote HTTP API
//! ([`RemoteCatalog`]).

use crate::models::CatalogKind;
use crate::services::{CatalogQuery, CatalogSurface, Endpoint, WriteResponse};
use crate::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Read/write access to a catalog.
pub trait CatalogBackend: Send + Sync {
    /// Serves a read endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn read(&self, endpoint: Endpoint, query: &CatalogQuery) -> Result<Value>;

    /// Creates an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the create is rejected or fails.
    fn create(&self, kind: CatalogKind, body: Value) -> Result<WriteResponse>;

    /// Updates an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected or fails.
    fn update(&self, kind: CatalogKind, body: Value) -> Result<WriteResponse>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// In-process backend over a [`CatalogSurface`].
#[derive(Clone)]
pub struct LocalCatalog {
    surface: CatalogSurface,
}

impl LocalCatalog {
    /// Creates a local backend.
    #[must_use]
    pub const fn new(surface: CatalogSurface) -> Self {
        Self { surface }
    }
}

impl CatalogBackend for LocalCatalog {
    fn read(&self, endpoint: Endpoint, query: &CatalogQuery) -> Result<Value> {
        self.surface.read(endpoint, query)
    }

    fn create(&self, kind: CatalogKind, body: Value) -> Result<WriteResponse> {
        self.surface.create(kind, body)
    }

    fn update(&self, kind: CatalogKind, body: Value) -> Result<WriteResponse> {
        self.surface.update(kind, body)
    }

    fn describe(&self) -> String {
        format!(
            "local ({})",
            self.surface.service().store().backend_name()
        )
    }
}

/// Backend talking to a remote catalog API.
pub struct RemoteCatalog {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RemoteCatalog {
    /// Request timeout.
    pub const TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::TIMEOUT)
            .user_agent(concat!("skillshare/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::OperationFailed {
                operation: "build_http_client".to_string(),
                cause: e.to_string(),
            })?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Full URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    fn send(&self, operation: &str, request: reqwest::blocking::RequestBuilder) -> Result<Value> {
        let response = request.send().map_err(|e| Error::OperationFailed {
            operation: operation.to_string(),
            cause: e.to_string(),
        })?;
        let status = response.status();
        let body: Value = response.json().unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(body);
        }
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .map_or_else(|| status.to_string(), ToString::to_string);
        tracing::debug!(
            operation,
            status = status.as_u16(),
            %message,
            "Remote catalog rejected request"
        );
        Err(Error::OperationFailed {
            operation: operation.to_string(),
            cause: format!("{}: {message}", status.as_u16()),
        })
    }

    fn write(
        &self,
        method: reqwest::Method,
        kind: CatalogKind,
        body: &Value,
    ) -> Result<WriteResponse> {
        let path = Endpoint::Entries(kind).path();
        let operation = format!("{method} /api{path}");
        let value = self.send(
            &operation,
            self.client.request(method, self.url(&path)).json(body),
        )?;
        serde_json::from_value(value).map_err(|e| Error::OperationFailed {
            operation,
            cause: format!("unexpected response: {e}"),
        })
    }
}

impl CatalogBackend for RemoteCatalog {
    fn read(&self, endpoint: Endpoint, query: &CatalogQuery) -> Result<Value> {
        let path = endpoint.path();
        self.send(
            &format!("GET /api{path}"),
            self.client.get(self.url(&path)).query(query),
        )
    }

    fn create(&self, kind: CatalogKind, body: Value) -> Result<WriteResponse> {
        self.write(reqwest::Method::POST, kind, &body)
    }

    fn update(&self, kind: CatalogKind, body: Value) -> Result<WriteResponse> {
        self.write(reqwest::Method::PUT, kind, &body)
    }

    fn describe(&self) -> String {
        format!("remote ({})", self.base_url)
    }
}
