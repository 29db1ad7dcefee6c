//! Wall-clock time helpers.
//!
//! Automations reason in local wall-clock time: sunrise, sunset and
//! "do not open before" settings are all expressed as times of day.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::ConfigurationError;

/// Local wall-clock instant used for ticks and transition bookkeeping.
pub type Timestamp = NaiveDateTime;

/// Time of day, e.g. a sunrise or a configured skip time.
pub type TimeOfDay = NaiveTime;

/// Return the current local wall-clock time.
#[must_use]
pub fn now() -> Timestamp {
    Local::now().naive_local()
}

/// Combine a date and a time of day.
#[must_use]
pub fn at(date: NaiveDate, time: TimeOfDay) -> Timestamp {
    date.and_time(time)
}

/// Parse an `HH:MM` time of day in 24-hour format.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidTimeOfDay`] when `value` is not a
/// valid time between `00:00` and `23:59`.
pub fn parse_time_of_day(value: &str) -> Result<TimeOfDay, ConfigurationError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        ConfigurationError::InvalidTimeOfDay {
            value: value.to_string(),
        }
    })
}
