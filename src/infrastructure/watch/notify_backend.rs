//! `notify`-based watch backend
//!
//! Maps `notify` events onto the four raw events the engine understands.
//! Rename handling differs per platform:
//!
//! - inotify reports the two halves (`From`, `To`) and then a paired `Both`
//!   event carrying the same tracker cookie.
//! - ReadDirectoryChangesW reports only the halves.
//! - FSEvents reports `Any` for each path involved.
//!
//! Halves become `Deleted`/`Created`, `Any` is resolved by checking whether
//! the path still exists, and a `Both` event is turned into `Renamed` only
//! when its halves were not already reported.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::domain::ports::{
    EventSink, RawEvent, Subscription, TouchSink, WatchBackend, WatchError, WatchResult,
};

/// Number of rename cookies remembered for pairing
const TRACKER_MEMORY: usize = 64;

/// Backend using `notify::RecommendedWatcher`
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifyBackend;

impl NotifyBackend {
    pub fn new() -> Self {
        Self
    }
}

struct NotifySubscription {
    _watcher: RecommendedWatcher,
    enabled: Arc<AtomicBool>,
}

impl Subscription for NotifySubscription {
    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

fn watch_error(path: &Path, err: notify::Error) -> WatchError {
    WatchError {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

impl WatchBackend for NotifyBackend {
    fn watch_folder(&self, root: &Path, sink: EventSink) -> WatchResult<Box<dyn Subscription>> {
        let enabled = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&enabled);
        let mut renames = RenameTracker::default();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if !flag.load(Ordering::SeqCst) {
                        return;
                    }
                    for raw in renames.translate(&event) {
                        sink(raw);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "folder watch reported an error"),
            },
            Config::default(),
        )
        .map_err(|e| watch_error(root, e))?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| watch_error(root, e))?;

        Ok(Box::new(NotifySubscription {
            _watcher: watcher,
            enabled,
        }))
    }

    fn watch_file(&self, file: &Path, sink: TouchSink) -> WatchResult<Box<dyn Subscription>> {
        let dir = file.parent().unwrap_or_else(|| Path::new("."));
        let target = file.file_name().map(|n| n.to_os_string());
        let enabled = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&enabled);

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if !flag.load(Ordering::SeqCst) || !touches_file(&event) {
                        return;
                    }
                    let hit = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == target);
                    if hit {
                        sink();
                    }
                }
                Err(e) => tracing::warn!(error = %e, "configuration watch reported an error"),
            },
            Config::default(),
        )
        .map_err(|e| watch_error(file, e))?;

        // Watch the folder rather than the file so editors that replace the
        // file on save keep being observed.
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| watch_error(dir, e))?;

        Ok(Box::new(NotifySubscription {
            _watcher: watcher,
            enabled,
        }))
    }
}

fn touches_file(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any
    )
}

/// Translates `notify` events, de-duplicating paired renames.
#[derive(Debug, Default)]
pub(crate) struct RenameTracker {
    seen: VecDeque<usize>,
}

impl RenameTracker {
    fn remember(&mut self, tracker: Option<usize>) {
        if let Some(cookie) = tracker {
            if self.seen.len() == TRACKER_MEMORY {
                self.seen.pop_front();
            }
            self.seen.push_back(cookie);
        }
    }

    fn already_reported(&self, tracker: Option<usize>) -> bool {
        tracker.is_some_and(|cookie| self.seen.contains(&cookie))
    }

    pub(crate) fn translate(&mut self, event: &Event) -> Vec<RawEvent> {
        let paths = event.paths.iter().cloned();
        match &event.kind {
            EventKind::Create(_) => paths.map(RawEvent::Created).collect(),
            EventKind::Remove(_) => paths.map(RawEvent::Deleted).collect(),
            EventKind::Modify(ModifyKind::Name(mode)) => match mode {
                RenameMode::From => {
                    self.remember(event.tracker());
                    paths.map(RawEvent::Deleted).collect()
                }
                RenameMode::To => {
                    self.remember(event.tracker());
                    paths.map(RawEvent::Created).collect()
                }
                RenameMode::Both => {
                    if self.already_reported(event.tracker()) || event.paths.len() < 2 {
                        return Vec::new();
                    }
                    vec![RawEvent::Renamed {
                        from: event.paths[0].clone(),
                        to: event.paths[1].clone(),
                    }]
                }
                _ => paths
                    .map(|p| {
                        if p.exists() {
                            RawEvent::Created(p)
                        } else {
                            RawEvent::Deleted(p)
                        }
                    })
                    .collect(),
            },
            EventKind::Modify(_) => paths.map(RawEvent::Changed).collect(),
            _ => Vec::new(),
        }
    }
}
