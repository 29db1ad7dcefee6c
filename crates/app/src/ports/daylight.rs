//! Daylight port — sunrise and sunset predictions.

use chrono::NaiveDate;

use autohub_domain::time::{TimeOfDay, Timestamp};

/// Predicts daylight transitions for a given date.
pub trait DaylightService: Send + Sync {
    /// Local time of sunrise on `date`.
    fn sunrise(&self, date: NaiveDate) -> TimeOfDay;

    /// Local time of sunset on `date`.
    fn sunset(&self, date: NaiveDate) -> TimeOfDay;

    /// Whether the sun is up at `at`.
    fn is_daytime(&self, at: Timestamp) -> bool {
        let date = at.date();
        let time = at.time();
        time >= self.sunrise(date) && time < self.sunset(date)
    }
}
