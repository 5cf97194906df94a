//! Applies parsed configuration to the live repository map
//!
//! Reconciliation is a diff by repository name: new names are created,
//! known names are updated in place, and live names that no line declares
//! any more are retired. A line skipped for an unknown state or a missing
//! folder still keeps its live repository, untouched. Running it twice on
//! the same valid file is a no-op the second time.

use std::collections::HashSet;

use crate::application::repository::{RepositoryMap, RepositoryWatchState};
use crate::domain::entities::RepositoryDefinition;
use crate::domain::ports::FileSystem;
use crate::error::{ChangeLoggerError, ChangeLoggerResult};

use super::parser::{ParsedConfig, ParsedLine};

/// Creates and retires live repositories on behalf of the reconciler.
pub trait RepositoryLifecycle {
    /// Build the live state for a new definition, subscription included.
    fn create(&mut self, definition: &RepositoryDefinition)
        -> ChangeLoggerResult<RepositoryWatchState>;

    /// Dispose of a state that is no longer configured.
    fn retire(&mut self, state: RepositoryWatchState);
}

/// What a reconciliation pass changed
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub removed: Vec<String>,
    pub paused: Vec<String>,
    pub resumed: Vec<String>,
    /// Repositories whose exclusions changed
    pub updated: Vec<String>,
    /// Lines that were skipped, in file order
    pub diagnostics: Vec<ChangeLoggerError>,
}

impl ReconcileReport {
    /// Whether the pass touched any live repository
    pub fn has_changes(&self) -> bool {
        !(self.created.is_empty()
            && self.removed.is_empty()
            && self.paused.is_empty()
            && self.resumed.is_empty()
            && self.updated.is_empty())
    }
}

/// Apply `parsed` to `repositories`.
pub fn reconcile<FS, L>(
    repositories: &mut RepositoryMap,
    parsed: ParsedConfig,
    fs: &FS,
    lifecycle: &mut L,
) -> ReconcileReport
where
    FS: FileSystem + ?Sized,
    L: RepositoryLifecycle + ?Sized,
{
    let mut report = ReconcileReport {
        diagnostics: parsed.diagnostics,
        ..ReconcileReport::default()
    };
    let declared: HashSet<String> = parsed.declared.into_iter().collect();

    for ParsedLine { line, definition } in parsed.lines {
        if !fs.is_dir(&definition.path) {
            tracing::debug!(line, name = %definition.name, "declared folder is missing");
            report.diagnostics.push(ChangeLoggerError::ConfigPathInvalid {
                name: definition.name,
                path: definition.path,
            });
            continue;
        }

        if let Some(state) = repositories.get_mut(&definition.name) {
            apply_in_place(state, &definition, &mut report);
            continue;
        }

        match lifecycle.create(&definition) {
            Ok(state) => {
                tracing::info!(
                    repository = %definition.name,
                    path = %definition.path.display(),
                    state = %definition.desired_state,
                    "repository created"
                );
                repositories.insert(state);
                report.created.push(definition.name);
            }
            Err(err) => report.diagnostics.push(err),
        }
    }

    let stale: Vec<String> = repositories
        .names()
        .filter(|name| !declared.contains(*name))
        .map(str::to_string)
        .collect();
    for name in stale {
        if let Some(state) = repositories.remove(&name) {
            tracing::info!(repository = %name, "repository removed");
            lifecycle.retire(state);
            report.removed.push(name);
        }
    }

    for diagnostic in &report.diagnostics {
        tracing::warn!("{}", diagnostic);
    }

    report
}

fn apply_in_place(
    state: &mut RepositoryWatchState,
    definition: &RepositoryDefinition,
    report: &mut ReconcileReport,
) {
    if state.set_exclusions(definition.exclusions.clone()) {
        tracing::info!(
            repository = %definition.name,
            exclusions = %definition.exclusions,
            "exclusions updated"
        );
        push_once(&mut report.updated, &definition.name);
    }

    let enabled = definition.desired_state.is_enabled();
    if state.set_enabled(enabled) {
        if enabled {
            tracing::info!(repository = %definition.name, "repository resumed");
            push_once(&mut report.resumed, &definition.name);
        } else {
            tracing::info!(repository = %definition.name, "repository paused");
            push_once(&mut report.paused, &definition.name);
        }
    }

    if state.local_path() != definition.path.as_path() {
        tracing::warn!(
            repository = %definition.name,
            live = %state.local_path().display(),
            declared = %definition.path.display(),
            "folder change ignored; remove and re-add the repository to move it"
        );
    }
}

fn push_once(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}
