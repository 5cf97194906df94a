//! Recording watch backend for tests
//!
//! Keeps every subscription it hands out so tests can inspect which folders
//! are watched, whether they are paused, and push raw events through the
//! very sinks the engine installed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::ports::{
    EventSink, RawEvent, Subscription, TouchSink, WatchBackend, WatchError, WatchResult,
};

struct FolderRecord {
    root: PathBuf,
    sink: EventSink,
    enabled: Arc<AtomicBool>,
    released: Arc<AtomicBool>,
}

struct FileRecord {
    file: PathBuf,
    sink: TouchSink,
    released: Arc<AtomicBool>,
}

#[derive(Default)]
struct RecordingState {
    folders: Vec<FolderRecord>,
    files: Vec<FileRecord>,
    refused: HashSet<PathBuf>,
}

/// Backend double that records subscriptions
#[derive(Clone, Default)]
pub struct RecordingBackend {
    state: Arc<Mutex<RecordingState>>,
}

struct RecordedSubscription {
    enabled: Arc<AtomicBool>,
    released: Arc<AtomicBool>,
}

impl Subscription for RecordedSubscription {
    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

impl Drop for RecordedSubscription {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse future subscriptions for `path`.
    pub fn refuse(&self, path: &Path) {
        self.state.lock().unwrap().refused.insert(path.to_path_buf());
    }

    /// Total folder subscriptions ever created
    pub fn folder_subscriptions(&self) -> usize {
        self.state.lock().unwrap().folders.len()
    }

    /// Total file subscriptions ever created
    pub fn file_subscriptions(&self) -> usize {
        self.state.lock().unwrap().files.len()
    }

    /// Roots with a live (not dropped) subscription
    pub fn active_folders(&self) -> Vec<PathBuf> {
        let state = self.state.lock().unwrap();
        state
            .folders
            .iter()
            .filter(|r| !r.released.load(Ordering::SeqCst))
            .map(|r| r.root.clone())
            .collect()
    }

    /// Whether the live subscription for `root` is enabled
    pub fn is_enabled(&self, root: &Path) -> Option<bool> {
        let state = self.state.lock().unwrap();
        state
            .folders
            .iter()
            .rev()
            .find(|r| r.root == root && !r.released.load(Ordering::SeqCst))
            .map(|r| r.enabled.load(Ordering::SeqCst))
    }

    /// Deliver an event through every subscription ever made for `root`,
    /// live or not, honoring the enable switch. Returns the number of sinks
    /// that received it.
    pub fn emit_to_all(&self, root: &Path, event: RawEvent) -> usize {
        let state = self.state.lock().unwrap();
        let mut delivered = 0;
        for record in state.folders.iter().filter(|r| r.root == root) {
            if record.enabled.load(Ordering::SeqCst) {
                (record.sink)(event.clone());
                delivered += 1;
            }
        }
        delivered
    }

    /// Deliver an event through the live subscription for `root`.
    pub fn emit(&self, root: &Path, event: RawEvent) -> bool {
        let state = self.state.lock().unwrap();
        let live = state
            .folders
            .iter()
            .rev()
            .find(|r| r.root == root && !r.released.load(Ordering::SeqCst));
        match live {
            Some(record) if record.enabled.load(Ordering::SeqCst) => {
                (record.sink)(event);
                true
            }
            _ => false,
        }
    }

    /// Fire every live file subscription.
    pub fn touch_files(&self) {
        let state = self.state.lock().unwrap();
        for record in state
            .files
            .iter()
            .filter(|r| !r.released.load(Ordering::SeqCst))
        {
            (record.sink)();
        }
    }

    /// Files with a live subscription
    pub fn active_files(&self) -> Vec<PathBuf> {
        let state = self.state.lock().unwrap();
        state
            .files
            .iter()
            .filter(|r| !r.released.load(Ordering::SeqCst))
            .map(|r| r.file.clone())
            .collect()
    }
}

impl WatchBackend for RecordingBackend {
    fn watch_folder(&self, root: &Path, sink: EventSink) -> WatchResult<Box<dyn Subscription>> {
        let mut state = self.state.lock().unwrap();
        if state.refused.contains(root) {
            return Err(WatchError {
                path: root.to_path_buf(),
                message: "refused by test".to_string(),
            });
        }
        let enabled = Arc::new(AtomicBool::new(true));
        let released = Arc::new(AtomicBool::new(false));
        state.folders.push(FolderRecord {
            root: root.to_path_buf(),
            sink,
            enabled: Arc::clone(&enabled),
            released: Arc::clone(&released),
        });
        Ok(Box::new(RecordedSubscription { enabled, released }))
    }

    fn watch_file(&self, file: &Path, sink: TouchSink) -> WatchResult<Box<dyn Subscription>> {
        let mut state = self.state.lock().unwrap();
        if state.refused.contains(file) {
            return Err(WatchError {
                path: file.to_path_buf(),
                message: "refused by test".to_string(),
            });
        }
        let enabled = Arc::new(AtomicBool::new(true));
        let released = Arc::new(AtomicBool::new(false));
        state.files.push(FileRecord {
            file: file.to_path_buf(),
            sink,
            released: Arc::clone(&released),
        });
        Ok(Box::new(RecordedSubscription { enabled, released }))
    }
}
