//! # autohub-adapter-virtual
//!
//! Simulated implementations of every port, for testing and demonstration.
//!
//! ## Provided adapters
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`VirtualRollerShutter`] | `Actuator` | Moves instantly to open/closed, counts commands |
//! | [`VirtualLamp`] | `Actuator` | `open` switches on, `close` switches off |
//! | [`FixedDaylight`] | `DaylightService` | Same sunrise/sunset every day, with per-date overrides |
//! | [`VirtualWeatherStation`] | `WeatherService` | Reports a settable, optional temperature |
//! | [`ManualClock`] | `Clock` | Time only moves when told to |
//!
//! Both devices support failure injection so that error paths can be
//! exercised without hardware.
//!
//! ## Dependency rule
//!
//! Depends on `autohub-app` (port traits) and `autohub-domain` only.

mod clock;
mod daylight;
mod devices;
mod weather;

pub use clock::ManualClock;
pub use daylight::FixedDaylight;
pub use devices::{VirtualLamp, VirtualRollerShutter};
pub use weather::VirtualWeatherStation;
