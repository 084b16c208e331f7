//! Data models for skillshare.
//!
//! Entities are stored camelCase, one JSON array per [`CatalogKind`].
//! Versioned kinds normalize their history on deserialization, so every
//! loaded [`Command`], [`McpServerEntry`] and [`Hook`] has at least one
//! version record.

mod command;
mod entity;
mod hook;
mod kind;
mod mcp_server;
mod plugin;
mod version;

pub use command::{
    Command, CommandPayload, CommandSummary, CommandUpdate, CommandUpload,
    default_command_install_path,
};
pub use entity::{
    CatalogEntity, EntityUpdate, EntityUpload, Example, PayloadUpdate, Versioned, require_author,
};
pub use hook::{Hook, HookEvent, HookPayload, HookSummary, HookUpdate, HookUpload};
pub use kind::CatalogKind;
pub use mcp_server::{
    InstallLocation, McpConfigPayload, McpOwnershipUpdate, McpServerEntry, McpServerSummary,
    McpServerUpdate, McpServerUpload, McpTransport,
};
pub use plugin::{Plugin, PluginUpdate, PluginUpload};
pub use version::{
    Payload, Provenance, StoredHistory, UNKNOWN_AUTHOR, VersionHistory, VersionRecord,
};
