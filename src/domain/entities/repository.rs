//! Repository definition entity
//!
//! A `RepositoryDefinition` is what one data line of the configuration file
//! asks for. The live counterpart lives in the application layer.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::value_objects::Exclusions;

/// Field separator of a configuration line
pub const FIELD_SEPARATOR: &str = " | ";

/// Separator of the exclusion list inside its field
pub const EXCLUSION_SEPARATOR: char = ':';

/// Desired watch state of a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesiredState {
    Watching,
    Paused,
}

impl DesiredState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesiredState::Watching => "WATCHING",
            DesiredState::Paused => "PAUSED",
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, DesiredState::Watching)
    }

    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            DesiredState::Watching
        } else {
            DesiredState::Paused
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized state token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownState(pub String);

impl fmt::Display for UnknownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown state '{}', must be WATCHING or PAUSED", self.0)
    }
}

impl std::error::Error for UnknownState {}

impl FromStr for DesiredState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WATCHING" => Ok(DesiredState::Watching),
            "PAUSED" => Ok(DesiredState::Paused),
            other => Err(UnknownState(other.to_string())),
        }
    }
}

/// One repository as declared in the configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDefinition {
    pub name: String,
    pub desired_state: DesiredState,
    pub exclusions: Exclusions,
    pub path: PathBuf,
}

impl RepositoryDefinition {
    pub fn new(
        name: impl Into<String>,
        desired_state: DesiredState,
        exclusions: Exclusions,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            desired_state,
            exclusions,
            path: path.into(),
        }
    }

    /// Render as a configuration line.
    pub fn to_config_line(&self) -> String {
        [
            self.name.clone(),
            self.desired_state.to_string(),
            self.exclusions.to_string(),
            self.path.display().to_string(),
        ]
        .join(FIELD_SEPARATOR)
    }
}
