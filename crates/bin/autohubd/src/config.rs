//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `autohub.toml` in the working directory, or at the path given
//! by `AUTOHUB_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use autohub_domain::automation::{
    DEFAULT_MIN_TRANSITION_INTERVAL_SECS, RollerShutterConfig, SpecialSettings,
};
use autohub_domain::error::ConfigurationError;
use autohub_domain::time::{TimeOfDay, parse_time_of_day};

const DEFAULT_PATH: &str = "autohub.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tick loop settings.
    pub scheduler: SchedulerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Sunrise and sunset used by the virtual daylight service.
    pub daylight: DaylightConfig,
    /// Reading reported by the virtual weather station.
    pub weather: WeatherConfig,
    /// One automation per roller shutter.
    pub roller_shutters: Vec<RollerShutterEntry>,
    /// One time-window automation per lamp.
    pub lamps: Vec<LampEntry>,
}

/// Tick loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between two ticks.
    pub tick_interval_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Daylight configuration, `HH:MM` local time.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DaylightConfig {
    pub sunrise: String,
    pub sunset: String,
}

/// Weather configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Outside temperature in °C. Absent means "no reading".
    pub outside_temperature: Option<f32>,
}

/// A roller shutter and its overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct RollerShutterEntry {
    /// Name of the area the shutter belongs to. Areas are created on demand.
    pub area: String,
    pub name: String,
    /// Never open before this `HH:MM` time.
    #[serde(default)]
    pub do_not_open_before: Option<String>,
    /// Do not open while colder than this, in °C.
    #[serde(default)]
    pub do_not_open_below: Option<f32>,
    /// Close while hotter than this, in °C.
    #[serde(default)]
    pub close_above: Option<f32>,
    #[serde(default = "default_min_transition_interval_secs")]
    pub min_transition_interval_secs: i64,
}

/// A lamp switched on inside a daily time window.
#[derive(Debug, Clone, Deserialize)]
pub struct LampEntry {
    pub area: String,
    pub name: String,
    /// Switch on at this `HH:MM` time.
    pub on_after: String,
    /// Switch off at this `HH:MM` time. May be earlier than `on_after` for
    /// a window spanning midnight.
    pub off_after: String,
    /// Additionally require the sun to be down.
    #[serde(default)]
    pub only_at_night: bool,
}

impl Config {
    /// Load configuration from `autohub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if any
    /// value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("AUTOHUB_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("AUTOHUB_TICK_INTERVAL_SECS")
            && let Ok(secs) = val.parse()
        {
            self.scheduler.tick_interval_secs = secs;
        }
        if let Ok(val) = std::env::var("AUTOHUB_OUTSIDE_TEMPERATURE") {
            self.weather.outside_temperature = val.parse().ok();
        }
        if let Ok(val) = std::env::var("AUTOHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    /// Check every value, including the automation entries.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.tick_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "tick_interval_secs must be non-zero".to_string(),
            ));
        }
        let (sunrise, sunset) = self.daylight.times()?;
        if sunrise >= sunset {
            return Err(ConfigError::Validation(
                "sunrise must be earlier than sunset".to_string(),
            ));
        }
        for entry in &self.roller_shutters {
            entry.to_config()?;
        }
        for entry in &self.lamps {
            entry.window()?;
        }
        Ok(())
    }

    /// Interval between two ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.tick_interval_secs)
    }
}

impl DaylightConfig {
    /// Parsed `(sunrise, sunset)`.
    ///
    /// # Errors
    ///
    /// Returns an error when either value is not a valid `HH:MM` time.
    pub fn times(&self) -> Result<(TimeOfDay, TimeOfDay), ConfigError> {
        Ok((
            parse_time_of_day(&self.sunrise)?,
            parse_time_of_day(&self.sunset)?,
        ))
    }
}

impl RollerShutterEntry {
    /// Validated automation settings for this shutter.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed time, a negative or non-finite
    /// threshold, a blank name, or a non-positive interval.
    pub fn to_config(&self) -> Result<RollerShutterConfig, ConfigError> {
        let mut special = SpecialSettings::builder();
        if let Some(time) = &self.do_not_open_before {
            special = special.do_not_open_before(parse_time_of_day(time)?);
        }
        if let Some(temperature) = self.do_not_open_below {
            special = special.do_not_open_if_colder_than(temperature);
        }
        if let Some(temperature) = self.close_above {
            special = special.close_if_hotter_than(temperature);
        }
        let interval = TimeDelta::try_seconds(self.min_transition_interval_secs).ok_or_else(|| {
            ConfigError::Validation(format!(
                "min_transition_interval_secs {} is out of range",
                self.min_transition_interval_secs
            ))
        })?;
        RollerShutterConfig::builder()
            .name(self.name.clone())
            .special(special.build()?)
            .min_transition_interval(interval)
            .build()
            .map_err(ConfigError::from)
    }
}

impl LampEntry {
    /// Parsed `(on_after, off_after)`.
    ///
    /// # Errors
    ///
    /// Returns an error when either value is not a valid `HH:MM` time or the
    /// name is blank.
    pub fn window(&self) -> Result<(TimeOfDay, TimeOfDay), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName.into());
        }
        Ok((
            parse_time_of_day(&self.on_after)?,
            parse_time_of_day(&self.off_after)?,
        ))
    }
}

fn default_min_transition_interval_secs() -> i64 {
    DEFAULT_MIN_TRANSITION_INTERVAL_SECS
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "autohub=info".to_string(),
        }
    }
}

impl Default for DaylightConfig {
    fn default() -> Self {
        Self {
            sunrise: "06:30".to_string(),
            sunset: "21:00".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Invalid automation or daylight setting.
    #[error("invalid setting")]
    Setting(#[from] ConfigurationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
