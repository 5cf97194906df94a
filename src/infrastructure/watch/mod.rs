//! Watch Backend Implementations
//!
//! Concrete implementations of the WatchBackend port.

mod notify_backend;
#[cfg(test)]
mod recording;

pub use notify_backend::NotifyBackend;
#[cfg(test)]
pub use recording::RecordingBackend;
