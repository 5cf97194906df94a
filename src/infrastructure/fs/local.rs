//! Local File System Implementation
//!
//! Implements the FileSystem port for local disk operations.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

use fs2::FileExt;

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

/// Local file system implementation
///
/// Appends take an exclusive advisory lock on the log file for the duration
/// of the single write, so concurrent readers never see half a batch from
/// another ChangeLogger process sharing the same storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new LocalFs instance
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn read(&self, path: &Path) -> FsResult<String> {
        fs::read_to_string(path).map_err(|e| FsError::at(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        fs::write(path, content).map_err(|e| FsError::at(path, e))
    }

    fn append(&self, path: &Path, content: &str) -> FsResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| FsError::at(path, e))?;

        file.lock_exclusive().map_err(|e| FsError::at(path, e))?;
        let result = file
            .write_all(content.as_bytes())
            .and_then(|_| file.flush());
        let _ = FileExt::unlock(&file);

        result.map_err(|e| FsError::at(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> FsResult<()> {
        fs::create_dir_all(path).map_err(|e| FsError::at(path, e))
    }

    fn modified(&self, path: &Path) -> FsResult<SystemTime> {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| FsError::at(path, e))
    }
}
