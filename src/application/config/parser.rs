//! Configuration file parser
//!
//! Turns the text of `Repositories.config` into repository definitions.
//! Syntax problems are collected as diagnostics; they never abort the
//! parse. Whether a declared folder exists is checked later, during
//! reconciliation, because it depends on the file system.

use std::path::PathBuf;

use crate::domain::entities::{DesiredState, RepositoryDefinition, FIELD_SEPARATOR};
use crate::domain::value_objects::Exclusions;
use crate::error::{ChangeLoggerError, ChangeLoggerResult};

/// Marker that starts a comment line
pub const COMMENT_PREFIX: char = '#';

/// Minimum number of fields in a data line
pub const REQUIRED_FIELDS: usize = 4;

/// One syntactically valid data line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// 1-based line number in the file
    pub line: usize,
    pub definition: RepositoryDefinition,
}

/// Outcome of parsing a whole configuration file
#[derive(Debug, Default)]
pub struct ParsedConfig {
    pub lines: Vec<ParsedLine>,
    /// Names of every line with enough fields and a name, whether or not
    /// the line was otherwise valid. A live repository listed here is kept.
    pub declared: Vec<String>,
    pub diagnostics: Vec<ChangeLoggerError>,
}

impl ParsedConfig {
    pub fn definitions(&self) -> impl Iterator<Item = &RepositoryDefinition> {
        self.lines.iter().map(|l| &l.definition)
    }
}

/// Parse the full configuration text.
///
/// Both `\n` and `\r\n` line endings are accepted.
pub fn parse_config(text: &str) -> ParsedConfig {
    let mut parsed = ParsedConfig::default();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        if let Some(name) = declared_name(raw) {
            if !parsed.declared.iter().any(|n| n == name) {
                parsed.declared.push(name.to_string());
            }
        }
        match parse_line(line, raw) {
            None => {}
            Some(Ok(definition)) => parsed.lines.push(ParsedLine { line, definition }),
            Some(Err(err)) => parsed.diagnostics.push(err),
        }
    }

    parsed
}

/// Parse one line. Returns `None` for blank and comment lines.
pub fn parse_line(line: usize, raw: &str) -> Option<ChangeLoggerResult<RepositoryDefinition>> {
    if raw.is_empty() || raw.starts_with(COMMENT_PREFIX) {
        return None;
    }
    Some(parse_fields(line, raw))
}

/// Name of a data line that has at least the required fields and a
/// non-empty name, even if its state token is unknown.
pub fn declared_name(raw: &str) -> Option<&str> {
    if raw.is_empty() || raw.starts_with(COMMENT_PREFIX) {
        return None;
    }
    let mut fields = raw.split(FIELD_SEPARATOR);
    let name = fields.next()?;
    if name.is_empty() || fields.count() + 1 < REQUIRED_FIELDS {
        return None;
    }
    Some(name)
}

fn parse_fields(line: usize, raw: &str) -> ChangeLoggerResult<RepositoryDefinition> {
    let fields: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
    if fields.len() < REQUIRED_FIELDS {
        return Err(malformed(
            line,
            format!(
                "expected at least {} fields separated by '{}', found {}",
                REQUIRED_FIELDS,
                FIELD_SEPARATOR,
                fields.len()
            ),
        ));
    }

    let name = fields[0];
    if name.is_empty() {
        return Err(malformed(line, "repository name is empty".to_string()));
    }

    let desired_state: DesiredState = fields[1]
        .parse()
        .map_err(|e: crate::domain::entities::UnknownState| malformed(line, e.to_string()))?;

    Ok(RepositoryDefinition::new(
        name,
        desired_state,
        Exclusions::from_field(fields[2]),
        PathBuf::from(fields[3]),
    ))
}

fn malformed(line: usize, reason: String) -> ChangeLoggerError {
    ChangeLoggerError::ConfigLineMalformed { line, reason }
}
