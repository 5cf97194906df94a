//! Configuration change monitor
//!
//! Editors tend to save a file in several steps, each raising its own
//! notification. The monitor lets a notification through only when the
//! file's modification time moved more than one second past the last one
//! it acted on, and owns the retry timer that keeps re-running
//! reconciliation while the file cannot be read.

use std::time::{Duration, Instant, SystemTime};

use super::retry::{RetryTimer, CONFIG_RETRY_PERIOD};

/// Minimum distance between two modification times that both trigger
pub const CONFIG_DEBOUNCE: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct ConfigChangeMonitor {
    last_applied: Option<SystemTime>,
    retry: RetryTimer,
}

impl Default for ConfigChangeMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigChangeMonitor {
    pub fn new() -> Self {
        Self {
            last_applied: None,
            retry: RetryTimer::new(CONFIG_RETRY_PERIOD),
        }
    }

    pub fn last_applied(&self) -> Option<SystemTime> {
        self.last_applied
    }

    /// Decide whether a notification with this modification time should
    /// trigger reconciliation, remembering it when it does.
    pub fn should_apply(&mut self, modified: SystemTime) -> bool {
        if let Some(last) = self.last_applied {
            if modified <= last + CONFIG_DEBOUNCE {
                return false;
            }
        }
        self.last_applied = Some(modified);
        true
    }

    /// Record the outcome of a reconciliation attempt.
    pub fn record_outcome(&mut self, succeeded: bool, now: Instant) {
        if succeeded {
            if self.retry.is_armed() {
                tracing::debug!("configuration retry disarmed");
            }
            self.retry.disarm();
        } else if !self.retry.is_armed() {
            self.retry.arm(now);
            tracing::debug!(period = ?self.retry.period(), "configuration retry armed");
        }
    }

    pub fn is_retrying(&self) -> bool {
        self.retry.is_armed()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.retry.is_due(now)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.retry.deadline()
    }

    /// Move the retry to its next tick after a failed attempt.
    pub fn reschedule(&mut self, now: Instant) {
        self.retry.reschedule(now);
    }

    pub fn stop(&mut self) {
        self.retry.disarm();
    }
}
