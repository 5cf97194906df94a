//! Self-disarming periodic retry timer
//!
//! A timer is just the deadline of its next tick. The service loop sleeps
//! until the earliest armed deadline, then asks each owner whether its
//! timer is due. Owners disarm the timer once their stop condition holds.

use std::time::{Duration, Instant};

/// Period of the configuration retry timer
pub const CONFIG_RETRY_PERIOD: Duration = Duration::from_secs(1);

/// Period of the log write retry timer
pub const WRITE_RETRY_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct RetryTimer {
    period: Duration,
    next_tick: Option<Instant>,
}

impl RetryTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_tick: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start ticking one period from `now`. No-op when already armed.
    pub fn arm(&mut self, now: Instant) {
        if self.next_tick.is_none() {
            self.next_tick = Some(now + self.period);
        }
    }

    pub fn disarm(&mut self) {
        self.next_tick = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_tick.is_some_and(|t| now >= t)
    }

    /// Schedule the tick after a due one. Ticks that were missed while the
    /// loop was busy collapse into one.
    pub fn reschedule(&mut self, now: Instant) {
        if let Some(t) = self.next_tick {
            let mut next = t + self.period;
            if next <= now {
                next = now + self.period;
            }
            self.next_tick = Some(next);
        }
    }
}
