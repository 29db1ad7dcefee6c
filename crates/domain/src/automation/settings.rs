//! Roller-shutter configuration — override thresholds and debounce interval.
//!
//! Both values are immutable once built. All validation happens in the
//! builders so that evaluation never has to reject a setting.

use chrono::TimeDelta;

use crate::error::ConfigurationError;
use crate::time::TimeOfDay;

/// Minimum seconds between two commanded transitions unless configured otherwise.
pub const DEFAULT_MIN_TRANSITION_INTERVAL_SECS: i64 = 300;

/// Override thresholds for a roller shutter.
///
/// Each value only takes part in the decision when its paired flag is set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecialSettings {
    skip_before_timestamp_enabled: bool,
    skip_before_timestamp: TimeOfDay,
    skip_if_frozen_enabled: bool,
    skip_if_frozen_temperature: f32,
    auto_close_if_too_hot_enabled: bool,
    auto_close_if_too_hot_temperature: f32,
}

impl SpecialSettings {
    /// Create a builder with every override disabled.
    #[must_use]
    pub fn builder() -> SpecialSettingsBuilder {
        SpecialSettingsBuilder::default()
    }

    /// The earliest time of day the shutter may open, when enabled.
    #[must_use]
    pub fn skip_before(&self) -> Option<TimeOfDay> {
        self.skip_before_timestamp_enabled
            .then_some(self.skip_before_timestamp)
    }

    /// Outside temperature below which opening is suppressed, when enabled.
    #[must_use]
    pub fn frozen_below(&self) -> Option<f32> {
        self.skip_if_frozen_enabled
            .then_some(self.skip_if_frozen_temperature)
    }

    /// Outside temperature above which the shutter is closed, when enabled.
    #[must_use]
    pub fn too_hot_above(&self) -> Option<f32> {
        self.auto_close_if_too_hot_enabled
            .then_some(self.auto_close_if_too_hot_temperature)
    }
}

/// Step-by-step builder for [`SpecialSettings`].
#[derive(Debug, Default)]
pub struct SpecialSettingsBuilder {
    skip_before: Option<TimeOfDay>,
    frozen_below: Option<f32>,
    too_hot_above: Option<f32>,
}

impl SpecialSettingsBuilder {
    /// Never open before `time`, even when the sun is already up.
    #[must_use]
    pub fn do_not_open_before(mut self, time: TimeOfDay) -> Self {
        self.skip_before = Some(time);
        self
    }

    /// Do not open while the outside temperature is below `temperature`.
    #[must_use]
    pub fn do_not_open_if_colder_than(mut self, temperature: f32) -> Self {
        self.frozen_below = Some(temperature);
        self
    }

    /// Close while the outside temperature is above `temperature`.
    #[must_use]
    pub fn close_if_hotter_than(mut self, temperature: f32) -> Self {
        self.too_hot_above = Some(temperature);
        self
    }

    /// Validate and freeze the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NonFiniteThreshold`] or
    /// [`ConfigurationError::NegativeThreshold`] for an invalid temperature.
    pub fn build(self) -> Result<SpecialSettings, ConfigurationError> {
        if let Some(value) = self.frozen_below {
            check_threshold("skip_if_frozen_temperature", value)?;
        }
        if let Some(value) = self.too_hot_above {
            check_threshold("auto_close_if_too_hot_temperature", value)?;
        }
        Ok(SpecialSettings {
            skip_before_timestamp_enabled: self.skip_before.is_some(),
            skip_before_timestamp: self.skip_before.unwrap_or_default(),
            skip_if_frozen_enabled: self.frozen_below.is_some(),
            skip_if_frozen_temperature: self.frozen_below.unwrap_or_default(),
            auto_close_if_too_hot_enabled: self.too_hot_above.is_some(),
            auto_close_if_too_hot_temperature: self.too_hot_above.unwrap_or_default(),
        })
    }
}

fn check_threshold(setting: &'static str, value: f32) -> Result<(), ConfigurationError> {
    if !value.is_finite() {
        return Err(ConfigurationError::NonFiniteThreshold { setting });
    }
    if value < 0.0 {
        return Err(ConfigurationError::NegativeThreshold { setting, value });
    }
    Ok(())
}

/// Full configuration of one roller-shutter automation.
#[derive(Debug, Clone, PartialEq)]
pub struct RollerShutterConfig {
    name: String,
    special: SpecialSettings,
    min_transition_interval: TimeDelta,
}

impl RollerShutterConfig {
    #[must_use]
    pub fn builder() -> RollerShutterConfigBuilder {
        RollerShutterConfigBuilder::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn special(&self) -> &SpecialSettings {
        &self.special
    }

    #[must_use]
    pub fn min_transition_interval(&self) -> TimeDelta {
        self.min_transition_interval
    }
}

/// Step-by-step builder for [`RollerShutterConfig`].
#[derive(Debug, Default)]
pub struct RollerShutterConfigBuilder {
    name: Option<String>,
    special: Option<SpecialSettings>,
    min_transition_interval: Option<TimeDelta>,
}

impl RollerShutterConfigBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn special(mut self, special: SpecialSettings) -> Self {
        self.special = Some(special);
        self
    }

    #[must_use]
    pub fn min_transition_interval(mut self, interval: TimeDelta) -> Self {
        self.min_transition_interval = Some(interval);
        self
    }

    /// Consume the builder, validate, and return a [`RollerShutterConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyName`] when no name was given and
    /// [`ConfigurationError::NonPositiveInterval`] for a zero or negative
    /// debounce interval.
    pub fn build(self) -> Result<RollerShutterConfig, ConfigurationError> {
        let name = self.name.unwrap_or_default();
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName);
        }
        let min_transition_interval = self
            .min_transition_interval
            .unwrap_or_else(|| TimeDelta::seconds(DEFAULT_MIN_TRANSITION_INTERVAL_SECS));
        if min_transition_interval <= TimeDelta::zero() {
            return Err(ConfigurationError::NonPositiveInterval);
        }
        Ok(RollerShutterConfig {
            name,
            special: self.special.unwrap_or_default(),
            min_transition_interval,
        })
    }
}
