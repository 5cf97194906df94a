//! Storage layout
//!
//! ChangeLogger keeps everything under one application-data folder:
//!
//! ```text
//! <data dir>/ChangeLogger/
//! ├── Repositories.config      configuration file
//! └── ChangeLogs/
//!     └── <RepositoryName>.csv one append-only log per repository
//! ```
//!
//! The default root comes from `dirs::data_dir()` (`%APPDATA%` on Windows,
//! `~/.local/share` on Linux, `~/Library/Application Support` on macOS).

use std::path::{Path, PathBuf};

/// Name of the application folder inside the platform data directory
pub const APP_DIR_NAME: &str = "ChangeLogger";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "Repositories.config";

/// Name of the log subdirectory
pub const LOG_DIR_NAME: &str = "ChangeLogs";

/// Extension of repository log files
pub const LOG_FILE_EXTENSION: &str = "csv";

/// Resolved storage locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    /// Root the layout at an explicit folder.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform data directory, or the current directory when it cannot be
    /// resolved.
    pub fn default_location() -> Self {
        let root = dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(APP_DIR_NAME));
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join(LOG_DIR_NAME)
    }

    /// `<log dir>/<name>.csv`
    pub fn log_file(&self, repository: &str) -> PathBuf {
        self.log_dir()
            .join(format!("{}.{}", repository, LOG_FILE_EXTENSION))
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::default_location()
    }
}
