//! Virtual roller shutter — reaches its end position instantly.

use autohub_app::ports::Actuator;
use autohub_domain::actuator::{ActuatorState, Target};
use autohub_domain::error::ActuatorError;
use autohub_domain::id::ActuatorId;

use super::DeviceCore;

/// A simulated roller shutter.
///
/// The position is [`ActuatorState::Unknown`] until the first command, the
/// same as a motor that was just powered on.
#[derive(Debug)]
pub struct VirtualRollerShutter {
    core: DeviceCore,
}

impl VirtualRollerShutter {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_state(name, ActuatorState::Unknown)
    }

    #[must_use]
    pub fn with_state(name: impl Into<String>, state: ActuatorState) -> Self {
        Self {
            core: DeviceCore::new(name.into(), state),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Number of successful `open`/`close` calls so far.
    #[must_use]
    pub fn command_count(&self) -> u64 {
        self.core.commands()
    }

    /// Move the shutter without a command, as a manual wall switch would.
    pub fn move_manually(&self, state: ActuatorState) {
        self.core.set_state(state);
    }

    /// When `true`, every command fails with [`ActuatorError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.core.set_failing(failing);
    }
}

impl Actuator for VirtualRollerShutter {
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
