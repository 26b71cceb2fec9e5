//! Time source for the scheduler

use chrono::{NaiveDateTime, Utc};

pub trait Clock: Send + Sync {
    /// Current time as naive UTC
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}
