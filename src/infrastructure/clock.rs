//! Wall clock implementation of the Clock port

use chrono::{DateTime, Local};

use crate::domain::ports::Clock;

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at a given instant (tests)
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedClock(pub std::sync::Arc<std::sync::Mutex<DateTime<Local>>>);

#[cfg(test)]
impl FixedClock {
    pub fn at(time: DateTime<Local>) -> Self {
        Self(std::sync::Arc::new(std::sync::Mutex::new(time)))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.0.lock().unwrap()
    }
}
