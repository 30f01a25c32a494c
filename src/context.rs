//! Desk directory resolution for cipherdesk.
//!
//! All commands locate desk state through this module: starting from the
//! working directory, walk up until a `.cipherdesk/` directory is found, so
//! commands work from anywhere under the desk root. If no desk exists yet,
//! the working directory itself becomes the root (for `init`).

use crate::error::{DeskError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the desk state directory.
pub const DESK_DIR: &str = ".cipherdesk";

/// Resolved paths for the desk state.
///
/// All paths are absolute.
#[derive(Debug, Clone)]
pub struct DeskContext {
    /// Directory containing `.cipherdesk/`.
    pub root: PathBuf,

    /// The desk state directory (`{root}/.cipherdesk/`).
    pub desk_dir: PathBuf,

    /// Lock files directory (`{root}/.cipherdesk/locks/`).
    pub locks_dir: PathBuf,
}

impl DeskContext {
    /// Resolve the desk context from the current working directory.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            DeskError::UserError(format!("failed to get current working directory: {}", e))
        })?;
        Ok(Self::resolve_from(&cwd))
    }

    /// Resolve the desk context from a specific directory.
    ///
    /// Walks ancestors looking for an existing `.cipherdesk/` directory;
    /// falls back to `cwd` itself so `init` can create one.
    pub fn resolve_from<P: AsRef<Path>>(cwd: P) -> Self {
        let cwd = cwd.as_ref();
        let root = cwd
            .ancestors()
            .find(|dir| dir.join(DESK_DIR).is_dir())
            .unwrap_or(cwd)
            .to_path_buf();

        let desk_dir = root.join(DESK_DIR);
        let locks_dir = desk_dir.join("locks");
        Self {
            root,
            desk_dir,
            locks_dir,
        }
    }

    /// Check if the desk state directory exists.
    pub fn desk_exists(&self) -> bool {
        self.desk_dir.is_dir()
    }

    /// Ensure the desk is initialized, returning an error if not.
    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.desk_exists() {
            return Err(DeskError::UserError(format!(
                "cipherdesk is not initialized.\n\
                 Expected desk state at: {}\n\n\
                 Run `cipherdesk init` to initialize a desk here.",
                self.desk_dir.display()
            )));
        }
        Ok(())
    }

    /// Path to the workbook file.
    pub fn workbook_path(&self) -> PathBuf {
        self.desk_dir.join("workbook.json")
    }

    /// Path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.desk_dir.join("config.yaml")
    }

    /// Path to the events directory.
    pub fn events_dir(&self) -> PathBuf {
        self.desk_dir.join("events")
    }

    /// Path to the main events log file.
    pub fn events_file(&self) -> PathBuf {
        self.events_dir().join("events.ndjson")
    }

    /// Path to the inbox drop directory.
    pub fn inbox_dir(&self) -> PathBuf {
        self.desk_dir.join("inbox")
    }

    /// Path to the assignment lock file.
    pub fn assignment_lock_path(&self) -> PathBuf {
        self.locks_dir.join("assign.lock")
    }
}

/// Convenience function to resolve context and ensure the desk is initialized.
///
/// Use this in every command except `init`.
pub fn require_initialized_desk() -> Result<DeskContext> {
    let ctx = DeskContext::resolve()?;
    ctx.ensure_initialized()?;
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolves_to_cwd_when_no_desk_exists() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = DeskContext::resolve_from(temp_dir.path());

        assert_eq!(ctx.root, temp_dir.path());
        assert!(ctx.desk_dir.ends_with(".cipherdesk"));
        assert!(!ctx.desk_exists());
    }

    #[test]
    fn finds_desk_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join(DESK_DIR)).unwrap();
        let subdir = temp_dir.path().join("rounds").join("two");
        std::fs::create_dir_all(&subdir).unwrap();

        let ctx = DeskContext::resolve_from(&subdir);

        assert_eq!(ctx.root, temp_dir.path());
        assert!(ctx.desk_exists());
    }

    #[test]
    fn ensure_initialized_fails_without_desk() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = DeskContext::resolve_from(temp_dir.path());

        let err = ctx.ensure_initialized().unwrap_err();
        assert!(err.to_string().contains("cipherdesk init"));
    }

    #[test]
    fn ensure_initialized_passes_with_desk() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join(DESK_DIR)).unwrap();
        let ctx = DeskContext::resolve_from(temp_dir.path());

        ctx.ensure_initialized().unwrap();
    }

    #[test]
    fn paths_live_under_desk_dir() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = DeskContext::resolve_from(temp_dir.path());

        assert!(ctx.workbook_path().ends_with(".cipherdesk/workbook.json"));
        assert!(ctx.config_path().ends_with(".cipherdesk/config.yaml"));
        assert!(ctx.events_file().ends_with("events/events.ndjson"));
        assert!(ctx.inbox_dir().ends_with(".cipherdesk/inbox"));
        assert!(ctx.assignment_lock_path().ends_with("locks/assign.lock"));
    }
}
