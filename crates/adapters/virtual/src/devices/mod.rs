//! Virtual actuators — roller shutter and lamp.
//!
//! Both share a [`DeviceCore`] holding the state behind a mutex, so they can
//! be driven from the scheduler task while tests inspect them.

mod lamp;
mod roller_shutter;

pub use lamp::VirtualLamp;
pub use roller_shutter::VirtualRollerShutter;

use std::sync::{Mutex, MutexGuard, PoisonError};

use autohub_domain::actuator::{ActuatorState, Target};
use autohub_domain::error::ActuatorError;
use autohub_domain::id::ActuatorId;

#[derive(Debug, Default)]
struct CoreState {
    state: ActuatorState,
    commands: u64,
    failing: bool,
}

/// State and bookkeeping shared by the virtual actuators.
#[derive(Debug)]
struct DeviceCore {
    id: ActuatorId,
    name: String,
    inner: Mutex<CoreState>,
}

impl DeviceCore {
    fn new(name: String, state: ActuatorState) -> Self {
        Self {
            id: ActuatorId::new(),
            name,
            inner: Mutex::new(CoreState {
                state,
                ..CoreState::default()
            }),
        }
    }

    fn command(&self, target: Target) -> Result<(), ActuatorError> {
        let mut inner = self.lock();
        if inner.failing {
            tracing::warn!(actuator = %self.name, %target, "virtual device unavailable");
            return Err(ActuatorError::Unavailable { id: self.id });
        }
        inner.state = target.state();
        inner.commands += 1;
        tracing::debug!(actuator = %self.name, state = %inner.state, "virtual device moved");
        Ok(())
    }

    fn state(&self) -> ActuatorState {
        self.lock().state
    }

    fn set_state(&self, state: ActuatorState) {
        self.lock().state = state;
    }

    fn commands(&self) -> u64 {
        self.lock().commands
    }

    fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    fn lock(&self) -> MutexGuard<'_, CoreState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
