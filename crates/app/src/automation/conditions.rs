//! Reusable predicates for [`ConditionalAutomation`](super::ConditionalAutomation).

use std::sync::Arc;

use autohub_domain::time::{TimeOfDay, Timestamp};

use super::conditional::Predicate;
use crate::ports::DaylightService;

/// True while the time of day lies in `[after, before)`.
///
/// When `after > before` the window wraps past midnight
/// (e.g. `22:00..06:00`). `after == before` never matches.
#[must_use]
pub fn time_range(after: TimeOfDay, before: TimeOfDay) -> Predicate {
    Box::new(move |now: Timestamp| {
        let time = now.time();
        if after <= before {
            time >= after && time < before
        } else {
            time >= after || time < before
        }
    })
}

/// True between sunrise and sunset.
#[must_use]
pub fn daytime(daylight: Arc<dyn DaylightService>) -> Predicate {
    Box::new(move |now: Timestamp| daylight.is_daytime(now))
}

/// True outside of daylight hours.
#[must_use]
pub fn night(daylight: Arc<dyn DaylightService>) -> Predicate {
    Box::new(move |now: Timestamp| !daylight.is_daytime(now))
}

/// True when every predicate holds. Each predicate is evaluated on every
/// call so that stateful predicates observe every tick.
#[must_use]
pub fn all_of(mut predicates: Vec<Predicate>) -> Predicate {
    Box::new(move |now: Timestamp| {
        predicates
            .iter_mut()
            .fold(true, |acc, predicate| predicate(now) && acc)
    })
}
