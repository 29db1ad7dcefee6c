//! Fixed daylight — the same sunrise and sunset every day, unless overridden.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;

use autohub_app::ports::DaylightService;
use autohub_domain::time::TimeOfDay;

/// A [`DaylightService`] with configurable times.
#[derive(Debug)]
pub struct FixedDaylight {
    sunrise: TimeOfDay,
    sunset: TimeOfDay,
    overrides: Mutex<HashMap<NaiveDate, (TimeOfDay, TimeOfDay)>>,
}

impl FixedDaylight {
    #[must_use]
    pub fn new(sunrise: TimeOfDay, sunset: TimeOfDay) -> Self {
        Self {
            sunrise,
            sunset,
            overrides: Mutex::new(HashMap::new()),
        }
    }

    /// Use different times on `date` only.
    pub fn set_for(&self, date: NaiveDate, sunrise: TimeOfDay, sunset: TimeOfDay) {
        self.overrides
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(date, (sunrise, sunset));
    }

    fn times(&self, date: NaiveDate) -> (TimeOfDay, TimeOfDay) {
        self.overrides
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&date)
            .copied()
            .unwrap_or((self.sunrise, self.sunset))
    }
}

impl DaylightService for FixedDaylight {
    fn sunrise(&self, date: NaiveDate) -> TimeOfDay {
        self.times(date).0
    }

    fn sunset(&self, date: NaiveDate) -> TimeOfDay {
        self.times(date).1
    }
}
