//! Weather port — outside conditions.

/// Supplies the latest outside temperature.
pub trait WeatherService: Send + Sync {
    /// Current outside temperature in °C, or `None` when no reading is
    /// available. Missing data is not an error.
    fn current_outside_temperature(&self) -> Option<f32>;
}
