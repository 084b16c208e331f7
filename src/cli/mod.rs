//! CLI command implementations.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run the catalog HTTP API |
//! | `mcp` | Run the MCP server on stdio |
//! | `list` | List entries of one kind |
//! | `get` | Show one entry, optionally at a pinned version |
//! | `history` | Show the version history of an entry |
//! | `diff` | Diff two versions of an entry |
//! | `prompt` | Print the install prompt for an entry |
//! | `search` | Search every kind |
//! | `seed` | Load a JSON document of collections into the store |
//!
//! # Example Usage
//!
//! ```bash
//! skillshare seed catalog.json
//! skillshare list commands --category Web
//! skillshare diff command demo --from 1 --to 2
//! skillshare serve --bind 0.0.0.0:3000
//! ```

mod catalog;
mod seed;
mod serve;

pub use catalog::CatalogCommand;
pub use seed::cmd_seed;
pub use serve::{cmd_mcp, cmd_serve};
