//! Local filesystem side effects of the install and upload tools.

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads and writes files under an install root (normally the home
/// directory).
#[derive(Debug, Clone)]
pub struct Installer {
    root: PathBuf,
}

impl Installer {
    /// Creates an installer rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The install root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/.claude/commands`.
    #[must_use]
    pub fn commands_dir(&self) -> PathBuf {
        self.root.join(".claude").join("commands")
    }

    /// `<root>/.claude/hooks`.
    #[must_use]
    pub fn hooks_dir(&self) -> PathBuf {
        self.root.join(".claude").join("hooks")
    }

    /// Expands a leading `~` to the install root.
    #[must_use]
    pub fn expand(&self, path: &str) -> PathBuf {
        if path == "~" {
            return self.root.clone();
        }
        path.strip_prefix("~/")
            .map_or_else(|| PathBuf::from(path), |rest| self.root.join(rest))
    }

    /// Writes a command file to `<commands_dir>/<id>.md`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unsafe id, or an I/O error.
    pub fn install_command(&self, id: &str, content: &str) -> Result<PathBuf> {
        ensure_safe_file_name(id)?;
        let path = self.commands_dir().join(format!("{id}.md"));
        write_file(&path, content)?;
        tracing::info!(path = %path.display(), "Installed command");
        Ok(path)
    }

    /// Writes a hook script into the hooks directory.
    ///
    /// The file name is taken from `script_path`. Shell scripts are made
    /// executable on unix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `script_path` has no usable file
    /// name, or an I/O error.
    pub fn install_hook_script(&self, script_path: &str, content: &str) -> Result<PathBuf> {
        let file_name = Path::new(script_path)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::InvalidInput(format!("invalid script path: {script_path}")))?;
        ensure_safe_file_name(file_name)?;

        let path = self.hooks_dir().join(file_name);
        write_file(&path, content)?;
        if path.extension().is_some_and(|ext| ext == "sh") {
            make_executable(&path)?;
        }
        tracing::info!(path = %path.display(), "Installed hook script");
        Ok(path)
    }

    /// Reads a file named by a tool argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the file does not exist, or an I/O
    /// error if it cannot be read.
    pub fn read_source(&self, path: &str) -> Result<(PathBuf, String)> {
        let expanded = self.expand(path);
        if !expanded.is_file() {
            return Err(Error::InvalidInput(format!("file not found: {path}")));
        }
        let content = fs::read_to_string(&expanded).map_err(|e| Error::OperationFailed {
            operation: "read_source_file".to_string(),
            cause: format!("{}: {e}", expanded.display()),
        })?;
        Ok((expanded, content))
    }
}

/// Rejects names that could escape the target directory.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for empty names, path separators, `..`
/// or a leading dot.
pub fn ensure_safe_file_name(name: &str) -> Result<()> {
    let unsafe_name = name.is_empty()
        || name.contains(['/', '\\', '\0'])
        || name.contains("..")
        || name.starts_with('.');
    if unsafe_name {
        return Err(Error::InvalidInput(format!(
            "'{name}' cannot be used as a file name"
        )));
    }
    Ok(())
}

/// Command line that runs a hook script installed as `<id><ext>`.
#[must_use]
pub fn hook_command_for(id: &str, extension: &str) -> String {
    let script = hook_script_path(id, extension);
    match extension {
        ".js" => format!("node {script}"),
        ".sh" => format!("bash {script}"),
        ".py" => format!("python {script}"),
        _ => script,
    }
}

/// `~/.claude/hooks/<id><ext>`.
#[must_use]
pub fn hook_script_path(id: &str, extension: &str) -> String {
    format!("~/.claude/hooks/{id}{extension}")
}

/// The extension of `path` including the dot, or an empty string.
#[must_use]
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
            operation: "create_install_dir".to_string(),
            cause: format!("{}: {e}", parent.display()),
        })?;
    }
    fs::write(path, content).map_err(|e| Error::OperationFailed {
        operation: "write_install_file".to_string(),
        cause: format!("{}: {e}", path.display()),
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|e| {
        Error::OperationFailed {
            operation: "chmod_hook_script".to_string(),
            cause: format!("{}: {e}", path.display()),
        }
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
