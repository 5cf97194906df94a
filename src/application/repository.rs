//! Live repository state and change translation
//!
//! `RepositoryWatchState` owns one folder subscription, its exclusion
//! rules, the buffer of entries waiting to be flushed, and the per-path
//! bookkeeping that suppresses duplicate modify notifications.
//!
//! `RepositoryMap` is the owned collection of live states. Only the
//! reconciler inserts or removes entries.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::domain::entities::{ChangeKind, DesiredState, LogEntry, RepositoryDefinition};
use crate::domain::ports::{Clock, FileSystem, RawEvent, Subscription};
use crate::domain::value_objects::{relative_path, Exclusions};

/// Modify notifications for a path are suppressed until its last recorded
/// write time plus this window.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(1);

/// Size above which expired debounce entries are evicted
pub const LAST_WRITE_EVICTION_THRESHOLD: usize = 4096;

/// One watched repository
pub struct RepositoryWatchState {
    name: String,
    local_path: PathBuf,
    exclusions: Exclusions,
    log_file_path: PathBuf,
    enabled: bool,
    generation: u64,
    buffer: Vec<LogEntry>,
    last_write_seen: HashMap<PathBuf, SystemTime>,
    subscription: Option<Box<dyn Subscription>>,
}

impl fmt::Debug for RepositoryWatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryWatchState")
            .field("name", &self.name)
            .field("local_path", &self.local_path)
            .field("exclusions", &self.exclusions)
            .field("log_file_path", &self.log_file_path)
            .field("enabled", &self.enabled)
            .field("generation", &self.generation)
            .field("buffered", &self.buffer.len())
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}

impl RepositoryWatchState {
    /// Create the state for a freshly accepted definition.
    pub fn new(definition: &RepositoryDefinition, log_file_path: PathBuf, generation: u64) -> Self {
        Self {
            name: definition.name.clone(),
            local_path: definition.path.clone(),
            exclusions: definition.exclusions.clone(),
            log_file_path,
            enabled: definition.desired_state.is_enabled(),
            generation,
            buffer: Vec::new(),
            last_write_seen: HashMap::new(),
            subscription: None,
        }
    }

    /// Attach the folder subscription, applying the current enabled state.
    pub fn with_subscription(mut self, subscription: Box<dyn Subscription>) -> Self {
        subscription.set_enabled(self.enabled);
        self.subscription = Some(subscription);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }

    pub fn log_file_path(&self) -> &Path {
        &self.log_file_path
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn buffer(&self) -> &[LogEntry] {
        &self.buffer
    }

    pub fn has_pending_entries(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn tracked_paths(&self) -> usize {
        self.last_write_seen.len()
    }

    /// Definition equivalent to the current live state
    pub fn definition(&self) -> RepositoryDefinition {
        RepositoryDefinition::new(
            self.name.clone(),
            DesiredState::from_enabled(self.enabled),
            self.exclusions.clone(),
            self.local_path.clone(),
        )
    }

    /// Returns `true` when the flag actually changed.
    pub(crate) fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        if let Some(subscription) = &self.subscription {
            subscription.set_enabled(enabled);
        }
        true
    }

    /// Returns `true` when the rules actually changed.
    pub(crate) fn set_exclusions(&mut self, exclusions: Exclusions) -> bool {
        if self.exclusions == exclusions {
            return false;
        }
        self.exclusions = exclusions;
        true
    }

    /// Drop flushed entries. Only the writer calls this, after a successful
    /// append of exactly `count` entries.
    pub(crate) fn clear_flushed(&mut self, count: usize) {
        self.buffer.drain(..count.min(self.buffer.len()));
    }

    /// Release the subscription.
    pub(crate) fn release(&mut self) {
        self.subscription = None;
    }

    /// Translate one raw event into buffered entries.
    ///
    /// Returns `true` when the buffer grew, which is the signal for the
    /// writer to attempt a flush.
    pub fn translate<FS, C>(&mut self, event: RawEvent, fs: &FS, clock: &C) -> bool
    where
        FS: FileSystem + ?Sized,
        C: Clock + ?Sized,
    {
        if !self.enabled {
            tracing::trace!(repository = %self.name, ?event, "paused, event ignored");
            return false;
        }

        let before = self.buffer.len();
        match event {
            RawEvent::Created(path) => self.record(ChangeKind::Created, &path, clock),
            RawEvent::Deleted(path) => self.record(ChangeKind::Deleted, &path, clock),
            RawEvent::Changed(path) => self.record_change(&path, fs, clock),
            RawEvent::Renamed { from, to } => {
                self.record(ChangeKind::Deleted, &from, clock);
                self.record(ChangeKind::Created, &to, clock);
            }
        }

        self.buffer.len() > before
    }

    fn record<C: Clock + ?Sized>(&mut self, kind: ChangeKind, path: &Path, clock: &C) {
        if self.exclusions.is_excluded(&self.local_path, path) {
            tracing::trace!(repository = %self.name, path = %path.display(), "excluded");
            return;
        }
        let entry = LogEntry::new(kind, clock.now(), relative_path(&self.local_path, path));
        tracing::debug!(repository = %self.name, line = %entry.to_line(), "buffered");
        self.buffer.push(entry);
    }

    fn record_change<FS, C>(&mut self, path: &Path, fs: &FS, clock: &C)
    where
        FS: FileSystem + ?Sized,
        C: Clock + ?Sized,
    {
        let Ok(modified) = fs.modified(path) else {
            return;
        };
        if let Some(suppressed_until) = self.last_write_seen.get(path) {
            if modified <= *suppressed_until {
                tracing::trace!(repository = %self.name, path = %path.display(), "duplicate change suppressed");
                return;
            }
        }
        if !fs.is_file(path) || self.exclusions.is_excluded(&self.local_path, path) {
            return;
        }

        self.record(ChangeKind::Changed, path, clock);
        self.last_write_seen
            .insert(path.to_path_buf(), modified + DEBOUNCE_WINDOW);
        self.evict_expired(clock);
    }

    /// Entries whose suppression window ended before the current wall clock
    /// can no longer suppress anything a later write would produce.
    fn evict_expired<C: Clock + ?Sized>(&mut self, clock: &C) {
        if self.last_write_seen.len() <= LAST_WRITE_EVICTION_THRESHOLD {
            return;
        }
        let now = SystemTime::from(clock.now());
        self.last_write_seen.retain(|_, until| *until > now);
    }
}

/// Live repositories keyed by name
#[derive(Debug, Default)]
pub struct RepositoryMap {
    repositories: BTreeMap<String, RepositoryWatchState>,
}

impl RepositoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&RepositoryWatchState> {
        self.repositories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.repositories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.repositories.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepositoryWatchState> {
        self.repositories.values()
    }

    /// Definitions describing the current live state, ordered by name
    pub fn definitions(&self) -> Vec<RepositoryDefinition> {
        self.repositories.values().map(|r| r.definition()).collect()
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut RepositoryWatchState> {
        self.repositories.get_mut(name)
    }

    pub(crate) fn insert(&mut self, state: RepositoryWatchState) {
        self.repositories.insert(state.name.clone(), state);
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<RepositoryWatchState> {
        self.repositories.remove(name)
    }

    pub(crate) fn drain(&mut self) -> Vec<RepositoryWatchState> {
        std::mem::take(&mut self.repositories).into_values().collect()
    }
}
