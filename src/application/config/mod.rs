//! Configuration file handling
//!
//! - `parser` reads `Repositories.config` into definitions
//! - `template` writes it back when it has gone missing
//! - `reconciler` applies definitions to the live repository map

mod parser;
mod reconciler;
mod template;


pub use parser::{declared_name, parse_config, parse_line, ParsedConfig, ParsedLine, REQUIRED_FIELDS};
pub use reconciler::{reconcile, ReconcileReport, RepositoryLifecycle};
pub use template::{generate_config, CONFIG_TEMPLATE};
