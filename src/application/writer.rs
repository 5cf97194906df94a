//! Resilient log writer
//!
//! Flushes repository buffers to their CSV logs. A flush either appends the
//! whole buffer snapshot or nothing; a failed flush leaves the buffer
//! untouched and puts the repository on the pending list, which a 100 ms
//! retry timer works through until every pending buffer has been written.
//!
//! The writer never creates storage folders. A missing log folder fails the
//! flush; the manager heals storage before every flush attempt.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::application::repository::{RepositoryMap, RepositoryWatchState};
use crate::domain::ports::{FileSystem, FsError};
use crate::error::{ChangeLoggerError, ChangeLoggerResult};

use super::retry::{RetryTimer, WRITE_RETRY_PERIOD};

/// Append the whole buffer of `state` to its log file.
///
/// Returns the number of entries written. Fails with `StorageMissing` when
/// `log_dir` does not exist.
pub fn flush_repository<FS>(
    fs: &FS,
    log_dir: &Path,
    state: &mut RepositoryWatchState,
) -> ChangeLoggerResult<usize>
where
    FS: FileSystem + ?Sized,
{
    let count = state.buffer().len();
    if count == 0 {
        return Ok(0);
    }

    if !fs.is_dir(log_dir) {
        return Err(ChangeLoggerError::StorageMissing {
            path: log_dir.to_path_buf(),
            source: FsError::NotFound(log_dir.to_path_buf()),
        });
    }

    let payload = render_payload(state);
    fs.append(state.log_file_path(), &payload)
        .map_err(|source| ChangeLoggerError::Flush {
            repository: state.name().to_string(),
            source,
        })?;

    state.clear_flushed(count);
    Ok(count)
}

fn render_payload(state: &RepositoryWatchState) -> String {
    let mut payload = String::new();
    for entry in state.buffer() {
        payload.push_str(&entry.to_line());
        payload.push('\n');
    }
    payload
}

#[derive(Debug)]
pub struct ResilientLogWriter {
    log_dir: PathBuf,
    pending: Vec<String>,
    retry: RetryTimer,
}

impl ResilientLogWriter {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            pending: Vec::new(),
            retry: RetryTimer::new(WRITE_RETRY_PERIOD),
        }
    }

    /// Repositories waiting for a retry, in the order they failed
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn is_retrying(&self) -> bool {
        self.retry.is_armed()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.retry.deadline()
    }

    /// Whether a retry tick would run at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        self.retry.is_due(now)
    }

    /// React to a grown buffer with an immediate flush attempt.
    pub fn on_buffer_changed<FS>(&mut self, fs: &FS, state: &mut RepositoryWatchState, now: Instant)
    where
        FS: FileSystem + ?Sized,
    {
        match flush_repository(fs, &self.log_dir, state) {
            Ok(count) => {
                tracing::trace!(repository = %state.name(), count, "flushed");
            }
            Err(err) => {
                tracing::warn!(
                    buffered = state.buffer().len(),
                    "{}; will retry",
                    err
                );
                self.mark_pending(state.name(), now);
            }
        }
    }

    fn mark_pending(&mut self, name: &str, now: Instant) {
        if !self.pending.iter().any(|n| n == name) {
            self.pending.push(name.to_string());
        }
        if !self.retry.is_armed() {
            self.retry.arm(now);
            tracing::debug!(period = ?self.retry.period(), "write retry armed");
        }
    }

    /// Run a retry tick if one is due.
    pub fn tick<FS>(&mut self, fs: &FS, repositories: &mut RepositoryMap, now: Instant)
    where
        FS: FileSystem + ?Sized,
    {
        if !self.retry.is_due(now) {
            return;
        }

        let log_dir = self.log_dir.as_path();
        let mut all_succeeded = true;
        self.pending.retain(|name| {
            let Some(state) = repositories.get_mut(name) else {
                tracing::debug!(repository = %name, "pending repository no longer configured");
                return false;
            };
            match flush_repository(fs, log_dir, state) {
                Ok(count) => {
                    if count > 0 {
                        tracing::info!(repository = %name, count, "retry succeeded");
                    }
                    state.has_pending_entries()
                }
                Err(err) => {
                    all_succeeded = false;
                    tracing::warn!("{}; will retry", err);
                    true
                }
            }
        });

        if self.pending.is_empty() || all_succeeded {
            self.retry.disarm();
            tracing::debug!("write retry disarmed");
        } else {
            self.retry.reschedule(now);
        }
    }

    /// Final flush attempt for a repository that is going away.
    pub fn retire<FS>(&mut self, fs: &FS, mut state: RepositoryWatchState)
    where
        FS: FileSystem + ?Sized,
    {
        self.pending.retain(|n| n != state.name());
        if let Err(err) = flush_repository(fs, &self.log_dir, &mut state) {
            tracing::warn!(
                lost = state.buffer().len(),
                "{}; buffered entries lost",
                err
            );
        }
        state.release();
    }

    pub fn stop(&mut self) {
        self.retry.disarm();
    }
}
