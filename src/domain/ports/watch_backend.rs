//! WatchBackend port - the OS change-notification primitive
//!
//! The engine subscribes to folders (recursively) and to the configuration
//! file. Each subscription is a handle: dropping it releases the underlying
//! watch, `set_enabled` pauses or resumes delivery without recreating it.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// A raw notification for one repository folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    Created(PathBuf),
    Changed(PathBuf),
    Deleted(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
}

/// Receives raw folder events. Called from backend threads.
pub type EventSink = Box<dyn Fn(RawEvent) + Send + 'static>;

/// Receives "the watched file was touched" notifications.
pub type TouchSink = Box<dyn Fn() + Send + 'static>;

/// Result type for watch operations
pub type WatchResult<T> = Result<T, WatchError>;

/// The backend refused to watch a path
#[derive(Debug, Error)]
#[error("cannot watch {path}: {message}")]
pub struct WatchError {
    pub path: PathBuf,
    pub message: String,
}

/// Live subscription handle. Dropping it stops delivery.
pub trait Subscription: Send {
    /// Pause or resume delivery in place
    fn set_enabled(&self, enabled: bool);

    /// Whether events are currently delivered
    fn is_enabled(&self) -> bool;
}

/// Factory for subscriptions
///
/// Implementations:
/// - `NotifyBackend` - the `notify` crate's recommended watcher
/// - `RecordingBackend` - records subscriptions for tests
pub trait WatchBackend {
    /// Watch `root` recursively for create/change/delete/rename events.
    fn watch_folder(&self, root: &Path, sink: EventSink) -> WatchResult<Box<dyn Subscription>>;

    /// Watch a single file for any change (create, modify, replace).
    fn watch_file(&self, file: &Path, sink: TouchSink) -> WatchResult<Box<dyn Subscription>>;
}
