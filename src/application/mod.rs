//! Application Layer
//!
//! Everything that keeps the live repositories in step with the
//! configuration file and the file system:
//!
//! - `RepositoryManager` - Owns all mutable state, driven by messages and timers
//! - `ChangeLoggerService` - Event loop thread around the manager
//! - `config` - Parse, generate and reconcile `Repositories.config`
//! - `ConfigChangeMonitor` - Debounces configuration notifications
//! - `ResilientLogWriter` - Flushes buffers, retries failed appends
//! - `RepositoryWatchState` - Per-repository buffer and change translation

pub mod config;
pub mod manager;
pub mod monitor;
pub mod repository;
pub mod retry;
pub mod service;
pub mod writer;


pub use config::{generate_config, parse_config, ReconcileReport};
pub use manager::RepositoryManager;
pub use monitor::ConfigChangeMonitor;
pub use repository::{RepositoryMap, RepositoryWatchState};
pub use retry::RetryTimer;
pub use service::{start, start_with, ChangeLoggerService, ServiceHandle, ServiceMessage};
pub use writer::{flush_repository, ResilientLogWriter};
