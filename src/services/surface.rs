//! JSON read/write surface.
//!
//! Kind-dispatched entry points shared by the HTTP API and the in-process
//! MCP backend. Requests and responses are plain JSON values so the same
//! shapes travel over HTTP and through direct calls.

use crate::models::{
    CatalogKind, Command, CommandUpdate, CommandUpload, Hook, HookUpdate, HookUpload,
    McpOwnershipUpdate, McpServerEntry, McpServerUpdate, McpServerUpload, Plugin, PluginUpdate,
    PluginUpload, Versioned,
};
use crate::services::catalog::{CatalogService, ListFilter};
use crate::services::diff::DiffMode;
use crate::services::install_prompt::InstallPrompt;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Addressable read endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Single entry or summary list.
    Entries(CatalogKind),
    /// Version history of one entry.
    History(CatalogKind),
    /// Diff between two versions.
    Diff(CatalogKind),
    /// Install prompt for one entry.
    InstallPrompt(CatalogKind),
    /// Search across every kind.
    Search,
}

impl Endpoint {
    /// Path below `/api`.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Entries(kind) => format!("/{}", kind.api_segment()),
            Self::History(kind) => format!("/{}/history", kind.api_segment()),
            Self::Diff(kind) => format!("/{}/diff", kind.api_segment()),
            Self::InstallPrompt(kind) => format!("/{}/install-prompt", kind.api_segment()),
            Self::Search => "/search".to_string(),
        }
    }
}

/// Query parameters accepted by the read endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Entry id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Pinned version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Category filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Hook event filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Diff base version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
    /// Diff target version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<u32>,
    /// Diff mode name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Search text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl CatalogQuery {
    /// Query addressing one entry.
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Pins a version.
    #[must_use]
    pub const fn at_version(mut self, version: Option<u32>) -> Self {
        self.version = version;
        self
    }

    fn required_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::MissingRequiredField("id".to_string()))
    }

    fn non_empty_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    fn diff_mode(&self) -> Result<DiffMode> {
        self.mode
            .as_deref()
            .filter(|m| !m.is_empty())
            .map(|m| {
                DiffMode::parse(m)
                    .ok_or_else(|| Error::InvalidInput(format!("unknown diff mode: {m}")))
            })
            .transpose()
            .map(Option::unwrap_or_default)
    }
}

/// Response body of a create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResponse {
    /// Always true; failures are reported as errors.
    pub success: bool,
    /// Affected entry id.
    pub id: String,
    /// Current version, for versioned kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Whether an update appended a version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<bool>,
    /// Human-readable outcome.
    pub message: String,
}

/// Install prompt response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResponse {
    /// Entry id.
    pub id: String,
    /// Pinned version, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Rendered prompt.
    pub prompt: String,
}

/// Kind-dispatched JSON operations over a [`CatalogService`].
#[derive(Clone)]
pub struct CatalogSurface {
    service: CatalogService,
}

impl CatalogSurface {
    /// Creates a surface over `service`.
    #[must_use]
    pub const fn new(service: CatalogService) -> Self {
        Self { service }
    }

    /// The wrapped service.
    #[must_use]
    pub const fn service(&self) -> &CatalogService {
        &self.service
    }

    /// Serves a read endpoint.
    ///
    /// # Errors
    ///
    /// Returns the service error for the operation, or
    /// [`Error::NotVersioned`] for version operations on plugins.
    pub fn read(&self, endpoint: Endpoint, query: &CatalogQuery) -> Result<Value> {
        match endpoint {
            Endpoint::Entries(kind) => self.entries(kind, query),
            Endpoint::History(kind) => self.history(kind, query),
            Endpoint::Diff(kind) => self.diff(kind, query),
            Endpoint::InstallPrompt(kind) => self.install_prompt(kind, query),
            Endpoint::Search => to_json(
                &self
                    .service
                    .search(query.q.as_deref().unwrap_or_default())?,
            ),
        }
    }

    fn entries(&self, kind: CatalogKind, query: &CatalogQuery) -> Result<Value> {
        let category = query.category.as_deref();
        match (kind, query.non_empty_id()) {
            (CatalogKind::Command, Some(id)) => self.versioned_entry::<Command>(id, query.version),
            (CatalogKind::McpServer, Some(id)) => {
                self.versioned_entry::<McpServerEntry>(id, query.version)
            },
            (CatalogKind::Hook, Some(id)) => self.versioned_entry::<Hook>(id, query.version),
            (CatalogKind::Plugin, Some(id)) => {
                if query.version.is_some() {
                    return Err(Error::NotVersioned(kind));
                }
                to_json(&self.service.get::<Plugin>(id)?)
            },
            (CatalogKind::Command, None) => to_json(&self.service.list::<Command>(category)),
            (CatalogKind::McpServer, None) => {
                to_json(&self.service.list::<McpServerEntry>(category))
            },
            (CatalogKind::Hook, None) => to_json(&self.service.list_hooks(&ListFilter {
                category: query.category.clone(),
                event: query.event.clone(),
            })),
            (CatalogKind::Plugin, None) => to_json(&self.service.list::<Plugin>(category)),
        }
    }

    fn versioned_entry<E: Versioned>(&self, id: &str, version: Option<u32>) -> Result<Value> {
        to_json(&self.service.get_version::<E>(id, version)?)
    }

    fn history(&self, kind: CatalogKind, query: &CatalogQuery) -> Result<Value> {
        let id = query.required_id()?;
        match kind {
            CatalogKind::Command => to_json(&self.service.history::<Command>(id)?),
            CatalogKind::McpServer => to_json(&self.service.history::<McpServerEntry>(id)?),
            CatalogKind::Hook => to_json(&self.service.history::<Hook>(id)?),
            CatalogKind::Plugin => Err(Error::NotVersioned(kind)),
        }
    }

    fn diff(&self, kind: CatalogKind, query: &CatalogQuery) -> Result<Value> {
        let id = query.required_id()?;
        let mode = query.diff_mode()?;
        let (from, to) = (query.from, query.to);
        match kind {
            CatalogKind::Command => to_json(&self.service.diff::<Command>(id, from, to, mode)?),
            CatalogKind::McpServer => {
                to_json(&self.service.diff::<McpServerEntry>(id, from, to, mode)?)
            },
            CatalogKind::Hook => to_json(&self.service.diff::<Hook>(id, from, to, mode)?),
            CatalogKind::Plugin => Err(Error::NotVersioned(kind)),
        }
    }

    fn install_prompt(&self, kind: CatalogKind, query: &CatalogQuery) -> Result<Value> {
        let id = query.required_id()?;
        let version = query.version;
        let prompt = match kind {
            CatalogKind::Command => self.versioned_prompt::<Command>(id, version)?,
            CatalogKind::McpServer => self.versioned_prompt::<McpServerEntry>(id, version)?,
            CatalogKind::Hook => self.versioned_prompt::<Hook>(id, version)?,
            CatalogKind::Plugin => {
                if version.is_some() {
                    return Err(Error::NotVersioned(kind));
                }
                self.service.plugin_install_prompt(id)?
            },
        };
        to_json(&PromptResponse {
            id: id.to_string(),
            version,
            prompt,
        })
    }

    fn versioned_prompt<E: Versioned + InstallPrompt>(
        &self,
        id: &str,
        version: Option<u32>,
    ) -> Result<String> {
        self.service.install_prompt::<E>(id, version)
    }

    /// Creates an entry from a request body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a malformed body, or the create error.
    pub fn create(&self, kind: CatalogKind, body: Value) -> Result<WriteResponse> {
        let receipt = match kind {
            CatalogKind::Command => self.service.create::<Command>(parse::<CommandUpload>(body)?)?,
            CatalogKind::McpServer => self
                .service
                .create::<McpServerEntry>(parse::<McpServerUpload>(body)?)?,
            CatalogKind::Hook => self.service.create::<Hook>(parse::<HookUpload>(body)?)?,
            CatalogKind::Plugin => self.service.create::<Plugin>(parse::<PluginUpload>(body)?)?,
        };
        Ok(WriteResponse {
            success: true,
            id: receipt.id,
            version: receipt.version,
            new_version: None,
            message: format!("{} uploaded successfully", kind.label()),
        })
    }

    /// Updates an entry from a request body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a malformed body, or the update error.
    pub fn update(&self, kind: CatalogKind, body: Value) -> Result<WriteResponse> {
        let receipt = match kind {
            CatalogKind::Command => self.service.update::<Command>(&parse::<CommandUpdate>(body)?)?,
            CatalogKind::McpServer => self
                .service
                .update::<McpServerEntry>(&parse::<McpServerUpdate>(body)?)?,
            CatalogKind::Hook => self.service.update::<Hook>(&parse::<HookUpdate>(body)?)?,
            CatalogKind::Plugin => self
                .service
                .update_metadata::<Plugin>(&parse::<PluginUpdate>(body)?)?,
        };
        let message = if receipt.new_version {
            format!(
                "{} updated successfully (version {})",
                kind.label(),
                receipt.version.unwrap_or_default()
            )
        } else {
            format!("{} updated successfully", kind.label())
        };
        Ok(WriteResponse {
            success: true,
            id: receipt.id,
            version: receipt.version,
            new_version: kind.is_versioned().then_some(receipt.new_version),
            message,
        })
    }

    /// Sets the owner-maintained mark on an MCP server from a request body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a malformed body,
    /// [`Error::MissingRequiredField`] without `isOwned`, or the update error.
    pub fn set_mcp_owned(&self, body: Value) -> Result<WriteResponse> {
        let request = parse::<McpOwnershipUpdate>(body)?;
        let owned = request
            .is_owned
            .ok_or_else(|| Error::MissingRequiredField("isOwned".to_string()))?;
        let receipt = self.service.set_mcp_owned(
            request.id.as_deref().unwrap_or_default(),
            owned,
            request.author_name.as_deref().unwrap_or_default(),
        )?;
        Ok(WriteResponse {
            success: true,
            id: receipt.id,
            version: receipt.version,
            new_version: Some(false),
            message: format!("MCP server ownership set to {owned}"),
        })
    }
}

fn parse<T: DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body)
        .map_err(|e| Error::InvalidInput(format!("invalid request body: {e}")))
}

/// Serializes a response value.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::OperationFailed {
        operation: "serialize_response".to_string(),
        cause: e.to_string(),
    })
}
