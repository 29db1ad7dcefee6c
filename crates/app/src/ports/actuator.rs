//! Actuator port — open/close control of one physical device.
//!
//! Shutters open and close; binary outputs (lamps, relays) map "on" to
//! [`open`](Actuator::open) and "off" to [`close`](Actuator::close).

use autohub_domain::actuator::{ActuatorState, Target};
use autohub_domain::error::ActuatorError;
use autohub_domain::id::ActuatorId;

/// Control surface of a single physical device.
pub trait Actuator: Send + Sync {
    /// Stable identity used to guarantee a single owning automation.
    fn id(&self) -> ActuatorId;

    /// Start opening (or switch on).
    ///
    /// # Errors
    ///
    /// Returns an [`ActuatorError`] when the device rejects the command.
    fn open(&self) -> Result<(), ActuatorError>;

    /// Start closing (or switch off).
    ///
    /// # Errors
    ///
    /// Returns an [`ActuatorError`] when the device rejects the command.
    fn close(&self) -> Result<(), ActuatorError>;

    /// Last known state of the device.
    fn current_state(&self) -> ActuatorState;

    /// Drive the actuator towards `target`.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying command.
    fn apply(&self, target: Target) -> Result<(), ActuatorError> {
        match target {
            Target::Open => self.open(),
            Target::Closed => self.close(),
        }
    }
}
