//! Error types for ChangeLogger
//!
//! Every variant is recoverable: callers log it and either skip the
//! offending input or arm a retry. Nothing here is meant to reach the
//! hosting process as a fatal condition.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{FsError, WatchError};

/// Result type alias for ChangeLogger operations
pub type ChangeLoggerResult<T> = Result<T, ChangeLoggerError>;

/// Main error type for ChangeLogger operations
#[derive(Error, Debug)]
pub enum ChangeLoggerError {
    /// The configuration file could not be read at all
    #[error("could not read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: FsError,
    },

    /// A data line of the configuration file could not be parsed
    #[error("skipping configuration line {line}: {reason}")]
    ConfigLineMalformed { line: usize, reason: String },

    /// The folder declared for a repository is not an existing directory
    #[error("skipping repository '{name}': folder {path} does not exist")]
    ConfigPathInvalid { name: String, path: PathBuf },

    /// The watch backend refused a subscription
    #[error("could not watch {path}: {message}")]
    Subscribe { path: PathBuf, message: String },

    /// Appending buffered entries to a repository log failed
    #[error("could not write log for repository '{repository}': {source}")]
    Flush {
        repository: String,
        #[source]
        source: FsError,
    },

    /// A storage directory was missing and could not be recreated
    #[error("storage location {path} is unavailable: {source}")]
    StorageMissing {
        path: PathBuf,
        #[source]
        source: FsError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<WatchError> for ChangeLoggerError {
    fn from(err: WatchError) -> Self {
        ChangeLoggerError::Subscribe {
            path: err.path,
            message: err.message,
        }
    }
}
