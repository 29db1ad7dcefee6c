//! In-memory fakes shared by the unit tests of this crate.

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime};

use autohub_domain::actuator::{ActuatorState, Target};
use autohub_domain::error::ActuatorError;
use autohub_domain::id::ActuatorId;
use autohub_domain::time::{TimeOfDay, Timestamp};

use crate::automation::ServiceContext;
use crate::ports::{Actuator, DaylightService, WeatherService};

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn tod(hour: u32, minute: u32) -> TimeOfDay {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn ts(hour: u32, minute: u32) -> Timestamp {
    day().and_time(tod(hour, minute))
}

// ── Actuator ───────────────────────────────────────────────────

pub struct FakeActuator {
    id: ActuatorId,
    state: Mutex<ActuatorState>,
    commands: Mutex<Vec<Target>>,
    failing: Mutex<bool>,
}

impl FakeActuator {
    pub fn new(state: ActuatorState) -> Arc<Self> {
        Arc::new(Self {
            id: ActuatorId::new(),
            state: Mutex::new(state),
            commands: Mutex::new(Vec::new()),
            failing: Mutex::new(false),
        })
    }

    pub fn commands(&self) -> Vec<Target> {
        self.commands.lock().unwrap().clone()
    }

    pub fn set_state(&self, state: ActuatorState) {
        *self.state.lock().unwrap() = state;
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    fn command(&self, target: Target) -> Result<(), ActuatorError> {
        if *self.failing.lock().unwrap() {
            return Err(ActuatorError::Unavailable { id: self.id });
        }
        self.commands.lock().unwrap().push(target);
        *self.state.lock().unwrap() = target.state();
        Ok(())
    }
}

impl Actuator for FakeActuator {
    fn id(&self) -> ActuatorId {
        self.id
    }

    fn open(&self) -> Result<(), ActuatorError> {
        self.command(Target::Open)
    }

    fn close(&self) -> Result<(), ActuatorError> {
        self.command(Target::Closed)
    }

    fn current_state(&self) -> ActuatorState {
        *self.state.lock().unwrap()
    }
}

// ── Daylight & weather ─────────────────────────────────────────

/// Sunrise 06:30, sunset 21:00 every day.
pub struct FakeDaylight;

impl DaylightService for FakeDaylight {
    fn sunrise(&self, _date: NaiveDate) -> TimeOfDay {
        tod(6, 30)
    }

    fn sunset(&self, _date: NaiveDate) -> TimeOfDay {
        tod(21, 0)
    }
}

#[derive(Default)]
pub struct FakeWeather {
    temperature: Mutex<Option<f32>>,
}

impl FakeWeather {
    pub fn set(&self, temperature: Option<f32>) {
        *self.temperature.lock().unwrap() = temperature;
    }
}

impl WeatherService for FakeWeather {
    fn current_outside_temperature(&self) -> Option<f32> {
        *self.temperature.lock().unwrap()
    }
}

pub fn context(weather: &Arc<FakeWeather>) -> ServiceContext {
    ServiceContext::new(Arc::new(FakeDaylight), weather.clone())
}
