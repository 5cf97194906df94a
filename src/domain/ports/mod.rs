//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the engine.
//! Infrastructure layer provides concrete implementations.

pub mod clock;
pub mod file_system;
pub mod watch_backend;

pub use clock::Clock;
pub use file_system::{FileSystem, FsError, FsResult};
pub use watch_backend::{
    EventSink, RawEvent, Subscription, TouchSink, WatchBackend, WatchError, WatchResult,
};
