//! ChangeLogger - folder change logging service
//!
//! ChangeLogger watches the folders listed in `Repositories.config` and
//! appends one CSV line per created, changed or deleted file to a log per
//! folder. Editing the configuration file reconfigures the running service;
//! failed log writes are retried until they succeed.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    generate_config, parse_config, start, start_with, ReconcileReport, RepositoryManager,
    ServiceHandle, ServiceMessage,
};
pub use domain::entities::{ChangeKind, DesiredState, LogEntry, RepositoryDefinition};
pub use domain::value_objects::{relative_path, ExclusionRule, Exclusions};
pub use error::{ChangeLoggerError, ChangeLoggerResult};
pub use infrastructure::{LocalFs, NotifyBackend, StorageLayout, SystemClock};
