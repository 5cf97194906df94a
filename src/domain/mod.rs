//! Domain Layer
//!
//! Pure types and the ports the engine consumes. Nothing in here touches the
//! file system or the OS watch primitive directly.
//!
//! ## Structure
//!
//! - `entities/` - Log entries and repository definitions
//! - `value_objects/` - Exclusion rules and relative paths
//! - `ports/` - Interfaces for file system, watch backend, and clock

pub mod entities;
pub mod ports;
pub mod value_objects;
