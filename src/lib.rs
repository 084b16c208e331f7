//! # Skillshare
//!
//! A catalog and installer for Claude Code extensions: slash commands,
//! MCP server configurations, hooks and plugins.
//!
//! Skillshare keeps one JSON array per entity kind in a key-value store,
//! tracks an ordered version history for commands, MCP servers and hooks,
//! and exposes the catalog over an HTTP API and an MCP stdio server so that
//! agents can list, search, install, upload and update items.
//!
//! ## Features
//!
//! - Versioned catalog entries with legacy-record backfill on read
//! - Line-level diffs between any two versions of an entry
//! - Install prompts for the latest or a pinned version
//! - Pluggable stores (in-memory, filesystem, Redis)
//! - MCP server backed by the local store or a remote catalog API
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use skillshare::models::{Command, CommandUpdate, CommandUpload};
//! use skillshare::services::CatalogService;
//! use skillshare::storage::MemoryKvStore;
//!
//! let service = CatalogService::new(Arc::new(MemoryKvStore::new()));
//! service.create::<Command>(CommandUpload::new("demo", "Demo", "Utility", "A\nB", "alice"))?;
//! let receipt = service.update::<Command>(
//!     &CommandUpdate::new("demo", "bob").with_content("A\nB\nC"),
//! )?;
//! assert_eq!(receipt.version, Some(2));
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod api;
pub mod cli;
pub mod config;
pub mod mcp;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::SkillshareConfig;
pub use models::{CatalogKind, Command, Hook, McpServerEntry, Plugin};
pub use services::{CatalogService, DiffMode, VersionManager};
pub use storage::KvStore;

/// Error type for skillshare operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When | HTTP status |
/// |---------|-------------|-------------|
/// | `NotFound` | No entity with the requested id | 404 |
/// | `VersionNotFound` | Entity exists but the version does not | 404 |
/// | `DuplicateId` | Upload collides with an existing id | 409 |
/// | `MissingAuthor` | `authorName` absent or blank | 400 |
/// | `MissingRequiredField` | Kind-specific mandatory fields absent | 400 |
/// | `InvalidInput` | Malformed JSON, bad arguments, unsafe ids | 400 |
/// | `NotVersioned` | History requested for an unversioned kind | 400 |
/// | `StoreUnavailable` | Key-value store read or write failed | 500 |
/// | `OperationFailed` | I/O, serialization or HTTP client failures | 500 |
/// | `FeatureNotEnabled` | Backend requires a cargo feature | 500 |
#[derive(Debug, ThisError)]
pub enum Error {
    /// No entity with this id exists in its collection.
    #[error("{kind} with id \"{id}\" not found")]
    NotFound {
        /// Entity kind that was searched.
        kind: CatalogKind,
        /// Requested id.
        id: String,
    },

    /// The entity exists but has no record for the requested version.
    #[error("version {version} of {kind} \"{id}\" not found")]
    VersionNotFound {
        /// Entity kind.
        kind: CatalogKind,
        /// Entity id.
        id: String,
        /// Requested version number.
        version: u32,
    },

    /// An upload used an id that is already taken.
    #[error("{kind} with id \"{id}\" already exists")]
    DuplicateId {
        /// Entity kind.
        kind: CatalogKind,
        /// Colliding id.
        id: String,
    },

    /// The author identifier was absent or blank.
    #[error("missing required field: authorName")]
    MissingAuthor,

    /// One or more kind-specific mandatory fields were absent.
    #[error("missing required fields: {0}")]
    MissingRequiredField(String),

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A request body or tool argument does not deserialize
    /// - An unknown entity kind or diff mode is named
    /// - An id cannot be used as a local file name
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Version history was requested for a kind that does not keep one.
    #[error("{0} entries are not versioned")]
    NotVersioned(CatalogKind),

    /// The key-value store could not be read or written.
    #[error("store unavailable during '{operation}': {cause}")]
    StoreUnavailable {
        /// The store operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// An operation failed.
    ///
    /// Raised when:
    /// - Filesystem I/O errors occur during install or upload
    /// - JSON serialization fails
    /// - The remote catalog API is unreachable or answers with an error
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Feature not enabled (requires feature flag).
    #[error("feature not enabled: {0} (compile with --features {0})")]
    FeatureNotEnabled(String),
}

/// Result type alias for skillshare operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current UTC time as an RFC 3339 string with millisecond precision.
///
/// This is the timestamp format stored in `updatedAt` fields and version records.
///
/// # Examples
///
/// ```rust
/// let ts = skillshare::now_timestamp();
/// assert!(ts.ends_with('Z'));
/// ```
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
