//! Configuration management.
//!
//! Configuration is resolved in three layers: built-in defaults, a TOML
//! file, then `SKILLSHARE_*` environment variables. The result is an
//! explicit [`SkillshareConfig`] handed to constructors; nothing below the
//! CLI reads the process environment on its own.

use crate::storage::KvBackendType;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default HTTP bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Main configuration for skillshare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillshareConfig {
    /// Key-value store selection.
    pub store: StoreSettings,
    /// HTTP API settings.
    pub api: ApiSettings,
    /// MCP server settings.
    pub mcp: McpSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Key-value store selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSettings {
    /// Backend type.
    pub backend: KvBackendType,
    /// Directory for the filesystem backend.
    pub path: Option<PathBuf>,
    /// Connection URL for the Redis backend.
    pub url: Option<String>,
}

/// HTTP API settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Socket address to bind.
    pub bind: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// MCP server settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct McpSettings {
    /// Base URL of a remote catalog API. When unset the MCP server uses the
    /// local store.
    pub api_url: Option<String>,
    /// Root under which `.claude/commands` and `.claude/hooks` live.
    /// Defaults to the home directory.
    pub install_root: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingSettings {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Filter directive, e.g. `info` or `skillshare=debug`.
    pub level: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// `[store]` section.
    pub store: Option<StoreSection>,
    /// `[api]` section.
    pub api: Option<ApiSection>,
    /// `[mcp]` section.
    pub mcp: Option<McpSection>,
    /// `[logging]` section.
    pub logging: Option<LoggingSection>,
}

/// `[store]` section.
#[derive(Debug, Deserialize, Default)]
pub struct StoreSection {
    /// Backend name.
    pub backend: Option<String>,
    /// Filesystem directory.
    pub path: Option<String>,
    /// Redis URL.
    pub url: Option<String>,
}

/// `[api]` section.
#[derive(Debug, Deserialize, Default)]
pub struct ApiSection {
    /// Bind address.
    pub bind: Option<String>,
}

/// `[mcp]` section.
#[derive(Debug, Deserialize, Default)]
pub struct McpSection {
    /// Remote catalog API URL.
    pub api_url: Option<String>,
    /// Install root.
    pub install_root: Option<String>,
}

/// `[logging]` section.
#[derive(Debug, Deserialize, Default)]
pub struct LoggingSection {
    /// Output format.
    pub format: Option<String>,
    /// Filter directive.
    pub level: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

impl SkillshareConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path` when given, otherwise the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform config dir (`~/Library/Application Support/skillshare/` on macOS)
    /// 2. `~/.config/skillshare/`
    ///
    /// Returns the default configuration if no readable file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("skillshare").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("skillshare")
                .join("config.toml"),
        ];
        candidates
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| Self::load_from_file(path).ok())
            .unwrap_or_default()
    }

    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(store) = file.store {
            if let Some(backend) = store.backend {
                config.store.backend = parse_backend(&backend)?;
            }
            config.store.path = store.path.as_deref().map(expand_home);
            config.store.url = store.url;
        }
        if let Some(bind) = file.api.and_then(|api| api.bind) {
            config.api.bind = bind;
        }
        if let Some(mcp) = file.mcp {
            config.mcp.api_url = mcp.api_url;
            config.mcp.install_root = mcp.install_root.as_deref().map(expand_home);
        }
        if let Some(logging) = file.logging {
            config.logging.format = logging.format;
            config.logging.level = logging.level;
            config.logging.file = logging.file.as_deref().map(expand_home);
        }

        Ok(config)
    }

    /// Applies `SKILLSHARE_*` overrides read through `lookup`.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `SKILLSHARE_STORE_BACKEND` | `store.backend` |
    /// | `SKILLSHARE_STORE_PATH` | `store.path` |
    /// | `SKILLSHARE_REDIS_URL` | `store.url` |
    /// | `SKILLSHARE_BIND` | `api.bind` |
    /// | `SKILLS_SHARE_API_URL` | `mcp.api_url` |
    /// | `SKILLSHARE_INSTALL_ROOT` | `mcp.install_root` |
    /// | `SKILLSHARE_LOG_FORMAT` | `logging.format` |
    /// | `SKILLSHARE_LOG_LEVEL` | `logging.level` |
    ///
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown backend name.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(backend) = get("SKILLSHARE_STORE_BACKEND") {
            self.store.backend = parse_backend(&backend)?;
        }
        if let Some(path) = get("SKILLSHARE_STORE_PATH") {
            self.store.path = Some(expand_home(&path));
        }
        if let Some(url) = get("SKILLSHARE_REDIS_URL") {
            self.store.url = Some(url);
        }
        if let Some(bind) = get("SKILLSHARE_BIND") {
            self.api.bind = bind;
        }
        if let Some(url) = get("SKILLS_SHARE_API_URL") {
            self.mcp.api_url = Some(url);
        }
        if let Some(root) = get("SKILLSHARE_INSTALL_ROOT") {
            self.mcp.install_root = Some(expand_home(&root));
        }
        if let Some(format) = get("SKILLSHARE_LOG_FORMAT") {
            self.logging.format = Some(format);
        }
        if let Some(level) = get("SKILLSHARE_LOG_LEVEL") {
            self.logging.level = Some(level);
        }

        Ok(self)
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Self::with_env_overrides`].
    pub fn with_process_env(self) -> Result<Self> {
        self.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Root directory for installed files.
    #[must_use]
    pub fn install_root(&self) -> PathBuf {
        self.mcp
            .install_root
            .clone()
            .or_else(|| directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn parse_backend(name: &str) -> Result<KvBackendType> {
    KvBackendType::parse(name)
        .ok_or_else(|| Error::InvalidInput(format!("unknown store backend: {name}")))
}

/// Expands a leading `~` to the home directory.
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    let home = || directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf());
    if path == "~" {
        return home().unwrap_or_else(|| PathBuf::from(path));
    }
    match path.strip_prefix("~/") {
        Some(rest) => home().map_or_else(|| PathBuf::from(path), |h| h.join(rest)),
        None => PathBuf::from(path),
    }
}
