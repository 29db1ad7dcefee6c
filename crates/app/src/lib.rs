//! # autohub-app
//!
//! Application layer — automations, dispatch and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Clock` — current wall-clock time
//!   - `DaylightService` — sunrise, sunset and "is it daytime"
//!   - `WeatherService` — current outside temperature, when known
//!   - `Actuator` — open/close (on/off) control of one physical device
//! - Define the **`Automation` contract** and its implementations:
//!   - `RollerShutterAutomation` — daylight/temperature driven shutters
//!   - `ConditionalAutomation` — edge-triggered actions from a predicate
//! - Route ticks: `AreaRegistry` per area, `Controller` across areas,
//!   `scheduler` for the periodic loop
//!
//! ## Dependency rule
//! Depends on `autohub-domain` only (plus `tokio` for the tick loop).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod area_registry;
pub mod automation;
pub mod controller;
pub mod ports;
pub mod scheduler;

#[cfg(test)]
mod test_support;
