//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - File system implementations (Local, in-memory for tests)
//! - `watch/` - Watch backends (`notify`, recording double for tests)
//! - `storage` - Where the configuration file and logs live
//! - `clock` - Wall clock

pub mod clock;
pub mod fs;
pub mod storage;
pub mod watch;

// Re-export for convenience
pub use clock::SystemClock;
pub use fs::LocalFs;
pub use storage::StorageLayout;
pub use watch::NotifyBackend;
