//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod exclusion;

pub use exclusion::{relative_path, ExclusionRule, Exclusions};
