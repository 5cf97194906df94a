//! In-memory file system for tests
//!
//! Uses `Arc<Mutex<>>` internally so it can be cloned and shared between the
//! engine under test and the assertions. Writes and appends require the
//! parent directory to exist, like a real disk.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

#[derive(Debug, Default)]
struct MemoryState {
    files: HashMap<PathBuf, (String, SystemTime)>,
    dirs: HashSet<PathBuf>,
    failing_appends: usize,
    failing_reads: usize,
    append_attempts: usize,
    clock: u64,
}

impl MemoryState {
    fn tick(&mut self) -> SystemTime {
        self.clock += 1;
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + self.clock * 10)
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.dirs.contains(parent),
            _ => true,
        }
    }
}

/// Shared in-memory file system with read and append fault injection
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` appends fail with an I/O error.
    pub fn fail_next_appends(&self, count: usize) {
        self.state.lock().unwrap().failing_appends = count;
    }

    /// Make the next `count` reads fail with an I/O error.
    pub fn fail_next_reads(&self, count: usize) {
        self.state.lock().unwrap().failing_reads = count;
    }

    /// Number of append calls seen so far, failed ones included
    pub fn append_attempts(&self) -> usize {
        self.state.lock().unwrap().append_attempts
    }

    /// Set a file's modification time explicitly.
    pub fn set_modified(&self, path: &Path, time: SystemTime) {
        let mut state = self.state.lock().unwrap();
        if let Some(entry) = state.files.get_mut(path) {
            entry.1 = time;
        }
    }

    /// Create a file (and its parent directories) with the given mtime.
    pub fn put_file(&self, path: &Path, content: &str, modified: SystemTime) {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent).unwrap();
        }
        let mut state = self.state.lock().unwrap();
        state
            .files
            .insert(path.to_path_buf(), (content.to_string(), modified));
    }

    /// Remove a file or a directory tree.
    pub fn remove(&self, path: &Path) {
        let mut state = self.state.lock().unwrap();
        state.files.retain(|p, _| !p.starts_with(path));
        state.dirs.retain(|p| !p.starts_with(path));
    }

    /// Content of a file, if present
    pub fn content(&self, path: &Path) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.files.get(path).map(|(c, _)| c.clone())
    }
}

impl FileSystem for MemoryFs {
    fn read(&self, path: &Path) -> FsResult<String> {
        {
            let mut state = self.state.lock().unwrap();
            if state.failing_reads > 0 {
                state.failing_reads -= 1;
                return Err(FsError::Io(std::io::Error::other("injected read failure")));
            }
        }
        self.content(path)
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        let mut state = self.state.lock().unwrap();
        if !state.parent_exists(path) {
            return Err(FsError::NotFound(path.to_path_buf()));
        }
        let now = state.tick();
        state
            .files
            .insert(path.to_path_buf(), (content.to_string(), now));
        Ok(())
    }

    fn append(&self, path: &Path, content: &str) -> FsResult<()> {
        let mut state = self.state.lock().unwrap();
        state.append_attempts += 1;
        if state.failing_appends > 0 {
            state.failing_appends -= 1;
            return Err(FsError::Io(std::io::Error::other("injected append failure")));
        }
        if !state.parent_exists(path) {
            return Err(FsError::NotFound(path.to_path_buf()));
        }
        let now = state.tick();
        let entry = state
            .files
            .entry(path.to_path_buf())
            .or_insert_with(|| (String::new(), now));
        entry.0.push_str(content);
        entry.1 = now;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_dir(path) || self.is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.state.lock().unwrap().dirs.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.state.lock().unwrap().files.contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> FsResult<()> {
        let mut state = self.state.lock().unwrap();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            state.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn modified(&self, path: &Path) -> FsResult<SystemTime> {
        let state = self.state.lock().unwrap();
        state
            .files
            .get(path)
            .map(|(_, t)| *t)
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }
}
