//! Path resolution for quadrant configuration and data files.
//!
//! All quadrant data is stored in `~/.quadrant/`:
//! - `config.yaml` - Main configuration file
//! - `quadrant.db` - SQLite database for tasks and the sync queue
//!
//! The root can be overridden with the `QUADRANT_HOME` environment
//! variable (used by tests and scripted setups).

use std::path::PathBuf;

use crate::error::QuadrantError;

/// Paths to quadrant configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.quadrant/`
    pub root: PathBuf,
    /// Config file: `~/.quadrant/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.quadrant/quadrant.db`
    pub database: PathBuf,
}

impl Paths {
    /// Create paths based on `QUADRANT_HOME` or the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither can be determined.
    pub fn new() -> Result<Self, QuadrantError> {
        if let Ok(root) = std::env::var("QUADRANT_HOME") {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            QuadrantError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".quadrant")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("quadrant.db"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), QuadrantError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                QuadrantError::Config(format!(
                    "Failed to create directory {:?}: {}",
                    self.root, e
                ))
            })?;
        }
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::with_root(PathBuf::from(".quadrant")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-quadrant");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.database, root.join("quadrant.db"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested"));

        paths.ensure_dirs().unwrap();
        assert!(paths.root.exists());
    }
}
