//! Read-only catalog commands.

use crate::mcp::CatalogBackend;
use crate::models::CatalogKind;
use crate::services::{CatalogQuery, Endpoint, PromptResponse};
use crate::{Error, Result};
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;

/// Runs catalog reads against a local or remote backend and prints the
/// results.
pub struct CatalogCommand {
    backend: Arc<dyn CatalogBackend>,
}

impl CatalogCommand {
    /// Creates a command runner.
    #[must_use]
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self { backend }
    }

    /// Prints the summary list of one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or the write fails.
    pub fn list<W: Write>(
        &self,
        out: &mut W,
        kind: CatalogKind,
        category: Option<String>,
        event: Option<String>,
    ) -> Result<()> {
        let query = CatalogQuery {
            category,
            event,
            ..CatalogQuery::default()
        };
        let value = self.backend.read(Endpoint::Entries(kind), &query)?;
        write_json(out, &value)
    }

    /// Prints one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry or version does not exist.
    pub fn get<W: Write>(
        &self,
        out: &mut W,
        kind: CatalogKind,
        id: &str,
        version: Option<u32>,
    ) -> Result<()> {
        let query = CatalogQuery::by_id(id).at_version(version);
        let value = self.backend.read(Endpoint::Entries(kind), &query)?;
        write_json(out, &value)
    }

    /// Prints the version history of an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist or the kind is not
    /// versioned.
    pub fn history<W: Write>(&self, out: &mut W, kind: CatalogKind, id: &str) -> Result<()> {
        let value = self
            .backend
            .read(Endpoint::History(kind), &CatalogQuery::by_id(id))?;
        write_json(out, &value)
    }

    /// Prints the diff between two versions.
    ///
    /// # Errors
    ///
    /// Returns an error if a version does not exist or the mode is unknown.
    pub fn diff<W: Write>(
        &self,
        out: &mut W,
        kind: CatalogKind,
        id: &str,
        from: Option<u32>,
        to: Option<u32>,
        mode: Option<String>,
    ) -> Result<()> {
        let query = CatalogQuery {
            from,
            to,
            mode,
            ..CatalogQuery::by_id(id)
        };
        let value = self.backend.read(Endpoint::Diff(kind), &query)?;
        write_json(out, &value)
    }

    /// Prints the install prompt for an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry or version does not exist.
    pub fn prompt<W: Write>(
        &self,
        out: &mut W,
        kind: CatalogKind,
        id: &str,
        version: Option<u32>,
    ) -> Result<()> {
        let query = CatalogQuery::by_id(id).at_version(version);
        let value = self.backend.read(Endpoint::InstallPrompt(kind), &query)?;
        let response: PromptResponse =
            serde_json::from_value(value).map_err(|e| Error::OperationFailed {
                operation: "decode_install_prompt".to_string(),
                cause: e.to_string(),
            })?;
        write_line(out, &response.prompt)
    }

    /// Prints search hits across every kind.
    ///
    /// # Errors
    ///
    /// Returns an error if a kind cannot be read.
    pub fn search<W: Write>(&self, out: &mut W, query: &str) -> Result<()> {
        let query = CatalogQuery {
            q: Some(query.to_string()),
            ..CatalogQuery::default()
        };
        let value = self.backend.read(Endpoint::Search, &query)?;
        write_json(out, &value)
    }
}

fn write_json<W: Write>(out: &mut W, value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| Error::OperationFailed {
        operation: "render_output".to_string(),
        cause: e.to_string(),
    })?;
    write_line(out, &text)
}

fn write_line<W: Write>(out: &mut W, text: &str) -> Result<()> {
    writeln!(out, "{text}").map_err(|e| Error::OperationFailed {
        operation: "write_stdout".to_string(),
        cause: e.to_string(),
    })
}
