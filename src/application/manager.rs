//! Repository manager
//!
//! The one owner of every piece of mutable state: the repository map,
//! every buffer, the configuration monitor and the log writer. It runs on
//! the service thread and is driven by `ServiceMessage`s and timer ticks,
//! so nothing here needs a lock.

use std::sync::mpsc::Sender;
use std::time::Instant;

use crate::application::config::{
    generate_config, parse_config, reconcile, ReconcileReport, RepositoryLifecycle,
};
use crate::application::monitor::ConfigChangeMonitor;
use crate::application::repository::{RepositoryMap, RepositoryWatchState};
use crate::application::service::ServiceMessage;
use crate::application::writer::ResilientLogWriter;
use crate::domain::entities::RepositoryDefinition;
use crate::domain::ports::{Clock, FileSystem, RawEvent, Subscription, WatchBackend};
use crate::error::{ChangeLoggerError, ChangeLoggerResult};
use crate::infrastructure::storage::StorageLayout;

pub struct RepositoryManager<FS, W, C>
where
    FS: FileSystem,
    W: WatchBackend,
    C: Clock,
{
    fs: FS,
    backend: W,
    clock: C,
    layout: StorageLayout,
    repositories: RepositoryMap,
    monitor: ConfigChangeMonitor,
    writer: ResilientLogWriter,
    config_subscription: Option<Box<dyn Subscription>>,
    outbox: Sender<ServiceMessage>,
    next_generation: u64,
}

impl<FS, W, C> RepositoryManager<FS, W, C>
where
    FS: FileSystem,
    W: WatchBackend,
    C: Clock,
{
    /// `outbox` is the sending half of the channel this manager is fed
    /// from; subscriptions post their events through it.
    pub fn new(
        fs: FS,
        backend: W,
        clock: C,
        layout: StorageLayout,
        outbox: Sender<ServiceMessage>,
    ) -> Self {
        let writer = ResilientLogWriter::new(layout.log_dir());
        Self {
            fs,
            backend,
            clock,
            layout,
            repositories: RepositoryMap::new(),
            monitor: ConfigChangeMonitor::new(),
            writer,
            config_subscription: None,
            outbox,
            next_generation: 1,
        }
    }

    pub fn repositories(&self) -> &RepositoryMap {
        &self.repositories
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    pub fn monitor(&self) -> &ConfigChangeMonitor {
        &self.monitor
    }

    pub fn writer(&self) -> &ResilientLogWriter {
        &self.writer
    }

    pub fn is_config_watched(&self) -> bool {
        self.config_subscription.is_some()
    }

    /// Eager first reconciliation. A failure arms the config retry.
    pub fn start(&mut self, now: Instant) {
        tracing::info!(root = %self.layout.root().display(), "starting");
        if let Err(err) = self.apply_config(now) {
            tracing::warn!("{}; retrying", err);
        }
    }

    /// Dispatch one message. Returns `false` once shutdown was requested.
    pub fn handle(&mut self, message: ServiceMessage, now: Instant) -> bool {
        match message {
            ServiceMessage::Folder {
                repository,
                generation,
                event,
            } => self.on_folder_event(&repository, generation, event, now),
            ServiceMessage::ConfigTouched => self.on_config_touched(now),
            ServiceMessage::Shutdown => return false,
        }
        true
    }

    fn on_config_touched(&mut self, now: Instant) {
        let config = self.layout.config_file();
        let modified = match self.fs.modified(&config) {
            Ok(modified) => modified,
            Err(err) => {
                tracing::debug!(error = %err, "configuration mtime unreadable, notification ignored");
                return;
            }
        };
        if !self.monitor.should_apply(modified) {
            tracing::debug!("configuration notification debounced");
            return;
        }
        if let Err(err) = self.apply_config(now) {
            tracing::warn!("{}; retrying", err);
        }
    }

    /// Heal storage, then read and reconcile the configuration file.
    pub fn apply_config(&mut self, now: Instant) -> ChangeLoggerResult<ReconcileReport> {
        self.heal_or_warn();

        let config = self.layout.config_file();
        let text = match self.fs.read(&config) {
            Ok(text) => text,
            Err(source) => {
                self.monitor.record_outcome(false, now);
                return Err(ChangeLoggerError::ConfigRead {
                    path: config,
                    source,
                });
            }
        };

        let mut lifecycle = ManagerLifecycle {
            fs: &self.fs,
            backend: &self.backend,
            layout: &self.layout,
            outbox: &self.outbox,
            next_generation: &mut self.next_generation,
            writer: &mut self.writer,
        };
        let report = reconcile(
            &mut self.repositories,
            parse_config(&text),
            &self.fs,
            &mut lifecycle,
        );
        self.monitor.record_outcome(true, now);

        tracing::info!(
            repositories = self.repositories.len(),
            created = report.created.len(),
            removed = report.removed.len(),
            skipped = report.diagnostics.len(),
            "configuration applied"
        );
        Ok(report)
    }

    /// Recreate the storage root, the log folder and the configuration
    /// file when any of them has gone missing, and make sure the
    /// configuration file is being watched.
    pub fn heal_storage(&mut self) -> ChangeLoggerResult<()> {
        let root = self.layout.root().to_path_buf();
        let root_recreated = !self.fs.is_dir(&root);
        if root_recreated {
            self.fs
                .create_dir_all(&root)
                .map_err(|source| ChangeLoggerError::StorageMissing {
                    path: root.clone(),
                    source,
                })?;
            tracing::info!(path = %root.display(), "storage folder created");
        }

        let log_dir = self.layout.log_dir();
        if !self.fs.is_dir(&log_dir) {
            self.fs
                .create_dir_all(&log_dir)
                .map_err(|source| ChangeLoggerError::StorageMissing {
                    path: log_dir.clone(),
                    source,
                })?;
        }

        let config = self.layout.config_file();
        if !self.fs.is_file(&config) {
            let definitions = self.repositories.definitions();
            self.fs
                .write(&config, &generate_config(&definitions))
                .map_err(|source| ChangeLoggerError::StorageMissing {
                    path: config.clone(),
                    source,
                })?;
            tracing::info!(
                path = %config.display(),
                repositories = definitions.len(),
                "configuration file regenerated"
            );
        }

        if root_recreated || self.config_subscription.is_none() {
            self.subscribe_config();
        }
        Ok(())
    }

    fn subscribe_config(&mut self) {
        self.config_subscription = None;
        let config = self.layout.config_file();
        let outbox = self.outbox.clone();
        let sink = Box::new(move || {
            let _ = outbox.send(ServiceMessage::ConfigTouched);
        });
        match self.backend.watch_file(&config, sink) {
            Ok(subscription) => self.config_subscription = Some(subscription),
            Err(err) => tracing::warn!("{}", ChangeLoggerError::from(err)),
        }
    }

    fn on_folder_event(&mut self, repository: &str, generation: u64, event: RawEvent, now: Instant) {
        let Some(state) = self.repositories.get_mut(repository) else {
            tracing::debug!(repository, "event for unknown repository dropped");
            return;
        };
        if state.generation() != generation {
            tracing::debug!(repository, generation, "stale event dropped");
            return;
        }
        if !state.translate(event, &self.fs, &self.clock) {
            return;
        }

        self.heal_or_warn();
        if let Some(state) = self.repositories.get_mut(repository) {
            self.writer.on_buffer_changed(&self.fs, state, now);
        }
    }

    /// Runs before every flush and every reconciliation.
    fn heal_or_warn(&mut self) {
        if let Err(err) = self.heal_storage() {
            tracing::warn!("{}", err);
        }
    }

    /// Run whichever timers are due.
    pub fn tick(&mut self, now: Instant) {
        if self.monitor.is_due(now) {
            match self.apply_config(now) {
                Ok(_) => tracing::info!("configuration retry succeeded"),
                Err(err) => {
                    tracing::debug!("{}", err);
                    self.monitor.reschedule(now);
                }
            }
        }
        if self.writer.is_due(now) {
            self.heal_or_warn();
        }
        self.writer.tick(&self.fs, &mut self.repositories, now);
    }

    /// Earliest armed timer deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.monitor.deadline(), self.writer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Stop timers, release every subscription, and give each buffer one
    /// last flush attempt.
    pub fn shutdown(&mut self) {
        self.monitor.stop();
        self.writer.stop();
        self.config_subscription = None;
        for state in self.repositories.drain() {
            self.writer.retire(&self.fs, state);
        }
        tracing::info!("stopped");
    }
}

/// Creates repositories with subscriptions that post into the manager's
/// channel, and retires them through the writer.
struct ManagerLifecycle<'a, FS, W> {
    fs: &'a FS,
    backend: &'a W,
    layout: &'a StorageLayout,
    outbox: &'a Sender<ServiceMessage>,
    next_generation: &'a mut u64,
    writer: &'a mut ResilientLogWriter,
}

impl<FS, W> RepositoryLifecycle for ManagerLifecycle<'_, FS, W>
where
    FS: FileSystem,
    W: WatchBackend,
{
    fn create(
        &mut self,
        definition: &RepositoryDefinition,
    ) -> ChangeLoggerResult<RepositoryWatchState> {
        let generation = *self.next_generation;
        let outbox = self.outbox.clone();
        let repository = definition.name.clone();
        let sink = Box::new(move |event: RawEvent| {
            let _ = outbox.send(ServiceMessage::Folder {
                repository: repository.clone(),
                generation,
                event,
            });
        });

        let subscription = self.backend.watch_folder(&definition.path, sink)?;
        *self.next_generation += 1;

        let log_file = self.layout.log_file(&definition.name);
        Ok(RepositoryWatchState::new(definition, log_file, generation).with_subscription(subscription))
    }

    fn retire(&mut self, state: RepositoryWatchState) {
        self.writer.retire(self.fs, state);
    }
}
