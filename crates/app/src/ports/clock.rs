//! Clock port — the current wall-clock time.

use autohub_domain::time::{self, Timestamp};

/// Source of the current time for tick dispatch.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        time::now()
    }
}
