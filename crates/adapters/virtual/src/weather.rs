//! Virtual weather station — holds the last reading it was given.

use std::sync::{Mutex, PoisonError};

use autohub_app::ports::WeatherService;

/// A [`WeatherService`] whose reading is set by hand. `None` means the
/// station has nothing to report.
#[derive(Debug, Default)]
pub struct VirtualWeatherStation {
    temperature: Mutex<Option<f32>>,
}

impl VirtualWeatherStation {
    #[must_use]
    pub fn new(temperature: Option<f32>) -> Self {
        Self {
            temperature: Mutex::new(temperature),
        }
    }

    pub fn set_temperature(&self, temperature: Option<f32>) {
        *self
            .temperature
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = temperature;
        tracing::debug!(?temperature, "virtual outside temperature updated");
    }
}

impl WeatherService for VirtualWeatherStation {
    fn current_outside_temperature(&self) -> Option<f32> {
        *self
            .temperature
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
