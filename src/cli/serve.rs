//! Server commands: the HTTP API and the MCP stdio server.

use crate::config::SkillshareConfig;
use crate::services::{CatalogService, CatalogSurface};
use crate::storage::KvStoreFactory;
use crate::{Result, api, mcp};

/// Runs the catalog HTTP API until interrupted.
///
/// `bind` overrides the configured address.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the listener fails.
pub fn cmd_serve(config: &SkillshareConfig, bind: Option<&str>) -> Result<()> {
    let store = KvStoreFactory::create(&config.store)?;
    let surface = CatalogSurface::new(CatalogService::new(store));
    api::serve(surface, bind.unwrap_or(&config.api.bind))
}

/// Runs the MCP server on stdin/stdout.
///
/// # Errors
///
/// Returns an error if the backend cannot be created or stdio fails.
pub fn cmd_mcp(config: &SkillshareConfig) -> Result<()> {
    mcp::server_from_config(config)?.start()
}
