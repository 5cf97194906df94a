//! Domain Entities
//!
//! Core domain types: the change log record and the repository definition.

mod log_entry;
mod repository;

pub use log_entry::{ChangeKind, LogEntry};
pub use repository::{
    DesiredState, RepositoryDefinition, UnknownState, EXCLUSION_SEPARATOR, FIELD_SEPARATOR,
};
