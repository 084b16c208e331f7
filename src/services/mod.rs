//! Business logic services.
//!
//! Services sit between the surfaces (HTTP, MCP, CLI) and the key-value
//! store. [`CatalogRepository`] is the only component that reads or writes
//! the store; everything else goes through it.

mod catalog;
mod diff;
mod install_prompt;
mod repository;
mod search;
mod surface;
mod versioning;

pub use catalog::{
    CatalogService, CreateReceipt, ListFilter, SeedDocument, SeedReport, UpdateReceipt,
};
pub use diff::{
    DiffChunk, DiffMode, TextDelta, VersionDiff, diff_payloads, diff_text, diff_versions,
};
pub use install_prompt::{
    InstallPrompt, hook_settings_snippet, mcp_config_snippet, prompt_for_version,
};
pub use repository::CatalogRepository;
pub use search::{SearchHit, matches_query, search_all};
pub use surface::{CatalogQuery, CatalogSurface, Endpoint, PromptResponse, WriteResponse, to_json};
pub use versioning::{
    HistoryEntry, HistoryView, PayloadChange, UpdateOutcome, VersionManager, VersionView,
};
