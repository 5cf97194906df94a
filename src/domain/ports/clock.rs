//! Clock port - wall clock used to stamp log entries

use chrono::{DateTime, Local};

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}
