//! Configuration file generation
//!
//! Used when the configuration file has gone missing: the fixed header is
//! written back followed by one line per live repository, so the next
//! reconciliation keeps everything that is currently watched.

use crate::domain::entities::RepositoryDefinition;

/// Header written at the top of a regenerated configuration file
pub const CONFIG_TEMPLATE: &str = "\
# ChangeLogger repositories
# Every line below defines one watched folder.
# The service re-reads this file whenever it is saved.
# Lines starting with # are ignored.
#
# Format:
# Name | WATCHING or PAUSED | exclusions separated by : | absolute folder path
#
# Exclusions: a file name (notes.md), an extension (.tmp),
# or a folder prefix relative to the watched folder (/build).
#
# Example:
# Docs | WATCHING | .tmp:/build:draft.md | /home/user/Documents
";

/// Render the template followed by one line per definition.
pub fn generate_config<'a, I>(definitions: I) -> String
where
    I: IntoIterator<Item = &'a RepositoryDefinition>,
{
    let mut out = String::from(CONFIG_TEMPLATE);
    for definition in definitions {
        out.push_str(&definition.to_config_line());
        out.push('\n');
    }
    out
}
