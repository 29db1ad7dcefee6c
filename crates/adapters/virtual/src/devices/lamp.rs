//! Virtual lamp — a binary output where `open` is on and `close` is off.

use autohub_app::ports::Actuator;
use autohub_domain::actuator::{ActuatorState, Target};
use autohub_domain::error::ActuatorError;
use autohub_domain::id::ActuatorId;

use super::DeviceCore;

/// A simulated lamp, off until switched on.
#[derive(Debug)]
pub struct VirtualLamp {
    core: DeviceCore,
}

impl VirtualLamp {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: DeviceCore::new(name.into(), ActuatorState::Closed),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.core.name
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.core.state() == ActuatorState::Open
    }

    /// Number of successful switch commands so far.
    #[must_use]
    pub fn command_count(&self) -> u64 {
        self.core.commands()
    }

    /// When `true`, every command fails with [`ActuatorError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.core.set_failing(failing);
    }
}

impl Actuator for VirtualLamp {
    fn id(&self) -> ActuatorId {
        self.core.id
    }

    fn open(&self) -> Result<(), ActuatorError> {
        self.core.command(Target::Open)
    }

    fn close(&self) -> Result<(), ActuatorError> {
        self.core.command(Target::Closed)
    }

    fn current_state(&self) -> ActuatorState {
        self.core.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_off() {
        let lamp = VirtualLamp::new("Porch");
        assert!(!lamp.is_on());
        assert_eq!(lamp.name(), "Porch");
    }

    #[test]
    fn should_switch_on_and_off() {
        let lamp = VirtualLamp::new("Porch");
        lamp.open().unwrap();
        assert!(lamp.is_on());
        lamp.close().unwrap();
        assert!(!lamp.is_on());
        assert_eq!(lamp.command_count(), 2);
    }

    #[test]
    fn should_report_unavailable_when_failing() {
        let lamp = VirtualLamp::new("Porch");
        lamp.set_failing(true);
        assert!(matches!(
            lamp.open(),
            Err(ActuatorError::Unavailable { .. })
        ));
        lamp.set_failing(false);
        lamp.open().unwrap();
        assert!(lamp.is_on());
    }
}
