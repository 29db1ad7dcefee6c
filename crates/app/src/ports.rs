//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are synchronous on purpose: evaluation runs once per tick and must not
//! block, so every port is expected to answer from already-cached state. An
//! adapter that has to fetch remotely does so in the background and serves
//! the last value here.

pub mod actuator;
pub mod clock;
pub mod daylight;
pub mod weather;

pub use actuator::Actuator;
pub use clock::{Clock, SystemClock};
pub use daylight::DaylightService;
pub use weather::WeatherService;
