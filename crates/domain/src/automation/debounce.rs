//! Transition debounce — limits how often a motor may be commanded.

use chrono::TimeDelta;

use crate::actuator::Target;
use crate::time::Timestamp;

/// Remembers the target an actuator was last driven to.
///
/// A new command needs the last transition to be at least `min_interval`
/// old, and is suppressed whenever it repeats the remembered target. A
/// target the actuator already reports is acknowledged without a command,
/// so a manual move in between two boundaries is left alone and the next
/// opposite boundary still goes through.
#[derive(Debug, Clone)]
pub struct TransitionDebounce {
    min_interval: TimeDelta,
    target: Option<Target>,
    last_transition_at: Option<Timestamp>,
}

impl TransitionDebounce {
    #[must_use]
    pub fn new(min_interval: TimeDelta) -> Self {
        Self {
            min_interval,
            target: None,
            last_transition_at: None,
        }
    }

    #[must_use]
    pub fn last_target(&self) -> Option<Target> {
        self.target
    }

    #[must_use]
    pub fn last_transition_at(&self) -> Option<Timestamp> {
        self.last_transition_at
    }

    /// Whether commanding `target` at `now` is allowed.
    #[must_use]
    pub fn permits(&self, target: Target, now: Timestamp) -> bool {
        if self.target == Some(target) {
            return false;
        }
        self.last_transition_at.is_none_or(|at| now - at >= self.min_interval)
    }

    /// Record a command that was actually issued.
    pub fn record(&mut self, target: Target, now: Timestamp) {
        self.target = Some(target);
        self.last_transition_at = Some(now);
    }

    /// Record that the actuator already sits at `target`. The transition
    /// timestamp is left untouched.
    pub fn acknowledge(&mut self, target: Target) {
        self.target = Some(target);
    }
}
