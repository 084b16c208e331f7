//! MCP server implementation.
//!
//! Exposes the catalog to AI agents as Model Context Protocol tools over
//! stdio.
//!
//! ## Tools
//!
//! - **Browse**: `list_*`, `get_*_detail`, `search`, `diff_versions`
//! - **Install**: `install_command`, `install_mcp`, `install_hook`
//! - **Publish**: `upload_*`, `update_*`
//!
//! ## Usage
//!
//! ```bash
//! skillshare mcp
//! ```
//!
//! With `SKILLS_SHARE_API_URL` set, tools call that catalog API. Otherwise
//! they use the configured store directly.
//!
//! ### Claude Code Configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "skillshare": {
//!       "command": "skillshare",
//!       "args": ["mcp"]
//!     }
//!   }
//! }
//! ```

// Allow format_push_string - we prefer readability over micro-optimization here.
#![allow(clippy::format_push_string)]

mod backend;
mod dispatch;
mod installer;
mod server;
mod tool_types;
mod tools;

pub use backend::{CatalogBackend, LocalCatalog, RemoteCatalog};
pub use dispatch::McpMethod;
pub use installer::{
    Installer, dotted_extension, ensure_safe_file_name, hook_command_for, hook_script_path,
};
pub use server::McpServer;
pub use tools::{ToolContent, ToolContext, ToolDefinition, ToolRegistry, ToolResult};

use crate::config::SkillshareConfig;
use crate::services::{CatalogService, CatalogSurface};
use crate::storage::KvStoreFactory;
use crate::Result;
use std::sync::Arc;

/// Builds the catalog backend selected by configuration.
///
/// # Errors
///
/// Returns an error if the store or HTTP client cannot be created.
pub fn backend_from_config(config: &SkillshareConfig) -> Result<Arc<dyn CatalogBackend>> {
    if let Some(url) = config.mcp.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
        return Ok(Arc::new(RemoteCatalog::new(url)?));
    }
    let store = KvStoreFactory::create(&config.store)?;
    let surface = CatalogSurface::new(CatalogService::new(store));
    Ok(Arc::new(LocalCatalog::new(surface)))
}

/// Builds an MCP server from configuration.
///
/// # Errors
///
/// Returns an error if the backend cannot be created.
pub fn server_from_config(config: &SkillshareConfig) -> Result<McpServer> {
    let backend = backend_from_config(config)?;
    let installer = Installer::new(config.install_root());
    Ok(McpServer::new(ToolRegistry::new(backend, installer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KvBackendType;

    #[test]
    fn test_backend_from_config_local() {
        let mut config = SkillshareConfig::default();
        config.store.backend = KvBackendType::Memory;
        let backend = backend_from_config(&config).unwrap();
        assert_eq!(backend.describe(), "local (memory)");
    }

    #[test]
    fn test_backend_from_config_remote() {
        let mut config = SkillshareConfig::default();
        config.mcp.api_url = Some("http://127.0.0.1:9/".to_string());
        let backend = backend_from_config(&config).unwrap();
        assert!(backend.describe().contains("127.0.0.1:9"));
    }
}
