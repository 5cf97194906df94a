//! Exclusion rules value object
//!
//! A repository carries an ordered list of exclusion patterns taken verbatim
//! from its configuration line. Two shapes exist:
//!
//! - **Prefix rules** start with a path separator (`/build`, `\build`) and
//!   match when the repository-relative path starts with them.
//! - **Name rules** (`notes.md`, `.tmp`) match the file name or the
//!   extension (with its leading dot) exactly.
//!
//! Matching is case-sensitive. Separators are normalized to `/` on both
//! sides before prefix comparison, so configuration files stay portable.

use std::fmt;
use std::path::Path;

use crate::domain::entities::EXCLUSION_SEPARATOR;

/// A single exclusion rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionRule {
    /// Matches repository-relative paths starting with this prefix
    Prefix(String),
    /// Matches an exact file name or extension
    Name(String),
}

impl ExclusionRule {
    /// Classify a raw pattern from the configuration file.
    pub fn parse(pattern: &str) -> Self {
        if pattern.starts_with('/') || pattern.starts_with('\\') {
            ExclusionRule::Prefix(normalize_separators(pattern))
        } else {
            ExclusionRule::Name(pattern.to_string())
        }
    }

    fn matches(&self, relative: &str, file_name: Option<&str>, extension: Option<&str>) -> bool {
        match self {
            ExclusionRule::Prefix(prefix) => relative.starts_with(prefix.as_str()),
            ExclusionRule::Name(name) => {
                file_name == Some(name.as_str()) || extension == Some(name.as_str())
            }
        }
    }
}

/// Ordered exclusion list of one repository.
///
/// Keeps the raw patterns so the configuration file can be regenerated
/// exactly as the user wrote it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    patterns: Vec<String>,
    rules: Vec<ExclusionRule>,
}

impl Exclusions {
    /// Build from raw patterns. Empty patterns are dropped.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.is_empty())
            .collect();
        let rules = patterns.iter().map(|p| ExclusionRule::parse(p)).collect();
        Self { patterns, rules }
    }

    /// Parse the `:`-separated field of a configuration line.
    pub fn from_field(field: &str) -> Self {
        Self::new(field.split(EXCLUSION_SEPARATOR))
    }

    /// Raw patterns, in configuration order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Parsed rules, in configuration order
    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check whether `path` (absolute) is excluded for a repository rooted at `root`.
    pub fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        if self.rules.is_empty() {
            return false;
        }

        let relative = relative_path(root, path);
        let file_name = path.file_name().and_then(|n| n.to_str());
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e));

        self.rules
            .iter()
            .any(|rule| rule.matches(&relative, file_name, extension.as_deref()))
    }
}

impl fmt::Display for Exclusions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = EXCLUSION_SEPARATOR.to_string();
        write!(f, "{}", self.patterns.join(separator.as_str()))
    }
}

/// Compute the repository-relative form of `path`: `/`-separated with a
/// leading slash. The root itself maps to `/`.
///
/// A path outside `root` is returned in its own normalized form.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = match path.strip_prefix(root) {
        Ok(rest) => rest.to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    };
    let normalized = normalize_separators(&relative);
    if normalized.starts_with('/') {
        normalized
    } else {
        format!("/{}", normalized)
    }
}

fn normalize_separators(s: &str) -> String {
    s.replace('\\', "/")
}
