//! FileSystem port - abstraction over file I/O operations
//!
//! The engine only ever needs a handful of primitives: directory existence
//! and creation, whole-file read/write, append, and modification time.
//! Keeping them behind a trait lets tests inject I/O faults.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug, Error)]
pub enum FsError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl FsError {
    /// Attach the offending path to an I/O error.
    pub fn at(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io(err),
        }
    }
}

impl From<std::io::Error> for FsError {
    fn from(err: std::io::Error) -> Self {
        FsError::at(Path::new(""), err)
    }
}

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O with locked appends
/// - `MemoryFs` - in-memory with fault injection (tests only)
pub trait FileSystem {
    /// Read file content as string
    fn read(&self, path: &Path) -> FsResult<String>;

    /// Replace file content
    fn write(&self, path: &Path, content: &str) -> FsResult<()>;

    /// Append content to a file, creating it if needed.
    ///
    /// The content is written in one piece or not at all.
    fn append(&self, path: &Path, content: &str) -> FsResult<()>;

    /// Check if anything exists at path
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is an existing directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if path is an existing regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Create directory and parents
    fn create_dir_all(&self, path: &Path) -> FsResult<()>;

    /// Last modification time
    fn modified(&self, path: &Path) -> FsResult<SystemTime>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn read(&self, path: &Path) -> FsResult<String> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        (**self).write(path, content)
    }

    fn append(&self, path: &Path, content: &str) -> FsResult<()> {
        (**self).append(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> FsResult<()> {
        (**self).create_dir_all(path)
    }

    fn modified(&self, path: &Path) -> FsResult<SystemTime> {
        (**self).modified(path)
    }
}
