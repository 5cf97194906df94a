//! Log entry entity
//!
//! One line of a repository change log: `KIND,timestamp,/relative/path`.

use std::fmt;

use chrono::{DateTime, Local, SecondsFormat};

/// Kind of change recorded in a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Changed,
    Deleted,
}

impl ChangeKind {
    /// The token written to the log file
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "CREATED",
            ChangeKind::Changed => "CHANGED",
            ChangeKind::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable change record awaiting (or past) flush
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    kind: ChangeKind,
    timestamp: DateTime<Local>,
    relative_path: String,
}

impl LogEntry {
    pub fn new(kind: ChangeKind, timestamp: DateTime<Local>, relative_path: impl Into<String>) -> Self {
        Self {
            kind,
            timestamp,
            relative_path: relative_path.into(),
        }
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Render the CSV line (without trailing newline).
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{}",
            self.kind,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, false),
            self.relative_path
        )
    }
}
