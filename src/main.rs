//! Binary entry point for skillshare.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use skillshare::cli::{CatalogCommand, cmd_mcp, cmd_seed, cmd_serve};
use skillshare::config::SkillshareConfig;
use skillshare::mcp::backend_from_config;
use skillshare::observability::{self, LoggingConfig};
use skillshare::services::CatalogService;
use skillshare::storage::KvStoreFactory;
use skillshare::CatalogKind;
use std::path::PathBuf;
use std::process::ExitCode;

/// Skillshare - catalog and installer for Claude Code extensions.
#[derive(Parser)]
#[command(name = "skillshare")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "SKILLSHARE_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run the catalog HTTP API.
    Serve {
        /// Address to listen on (overrides configuration).
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Run the MCP server on stdio.
    Mcp,

    /// List entries of one kind.
    List {
        /// Entry kind: commands, mcp, hooks or plugins.
        kind: CatalogKind,

        /// Filter by category.
        #[arg(long)]
        category: Option<String>,

        /// Filter hooks by event.
        #[arg(long)]
        event: Option<String>,
    },

    /// Show one entry.
    Get {
        /// Entry kind.
        kind: CatalogKind,

        /// Entry id.
        id: String,

        /// Show this version instead of the latest.
        #[arg(long)]
        version: Option<u32>,
    },

    /// Show the version history of an entry.
    History {
        /// Entry kind.
        kind: CatalogKind,

        /// Entry id.
        id: String,
    },

    /// Diff two versions of an entry.
    Diff {
        /// Entry kind.
        kind: CatalogKind,

        /// Entry id.
        id: String,

        /// Base version (default: the one before `--to`).
        #[arg(long)]
        from: Option<u32>,

        /// Target version (default: latest).
        #[arg(long)]
        to: Option<u32>,

        /// Diff mode: lcs or set.
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Print the install prompt for an entry.
    Prompt {
        /// Entry kind.
        kind: CatalogKind,

        /// Entry id.
        id: String,

        /// Pin a version.
        #[arg(long)]
        version: Option<u32>,
    },

    /// Search every kind by id, name and description.
    Search {
        /// Search text.
        query: String,
    },

    /// Load a JSON document of collections into the store.
    Seed {
        /// File with `commands`, `mcpServers`, `hooks` and `plugins` arrays.
        file: PathBuf,
    },

    /// Set or clear the owner-maintained mark on an MCP server.
    SetMcpOwned {
        /// MCP server id.
        id: String,

        /// New mark.
        #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
        owned: bool,

        /// Author recorded on the change.
        #[arg(long)]
        author: String,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match SkillshareConfig::load(cli.config.as_deref())
        .and_then(SkillshareConfig::with_process_env)
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(LoggingConfig::from_settings(&config.logging, cli.verbose))
    {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: &SkillshareConfig) -> skillshare::Result<()> {
    let mut stdout = std::io::stdout();
    match command {
        Commands::Serve { bind } => cmd_serve(config, bind.as_deref()),
        Commands::Mcp => cmd_mcp(config),
        Commands::Seed { file } => {
            let service = CatalogService::new(KvStoreFactory::create(&config.store)?);
            let report = cmd_seed(&service, &file)?;
            println!(
                "Seeded {} commands, {} MCP servers, {} hooks, {} plugins",
                report.commands, report.mcp_servers, report.hooks, report.plugins
            );
            Ok(())
        },
        Commands::SetMcpOwned { id, owned, author } => {
            let service = CatalogService::new(KvStoreFactory::create(&config.store)?);
            let receipt = service.set_mcp_owned(&id, owned, &author)?;
            println!("MCP server {} ownership set to {owned}", receipt.id);
            Ok(())
        },
        Commands::List {
            kind,
            category,
            event,
        } => catalog(config)?.list(&mut stdout, kind, category, event),
        Commands::Get { kind, id, version } => {
            catalog(config)?.get(&mut stdout, kind, &id, version)
        },
        Commands::History { kind, id } => catalog(config)?.history(&mut stdout, kind, &id),
        Commands::Diff {
            kind,
            id,
            from,
            to,
            mode,
        } => catalog(config)?.diff(&mut stdout, kind, &id, from, to, mode),
        Commands::Prompt { kind, id, version } => {
            catalog(config)?.prompt(&mut stdout, kind, &id, version)
        },
        Commands::Search { query } => catalog(config)?.search(&mut stdout, &query),
    }
}

fn catalog(config: &SkillshareConfig) -> skillshare::Result<CatalogCommand> {
    Ok(CatalogCommand::new(backend_from_config(config)?))
}
