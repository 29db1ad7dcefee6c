//! The automation contract shared by every rule the controller runs.
//!
//! Automations are built first, then handed to an
//! [`AreaRegistry`](crate::area_registry::AreaRegistry) which activates them
//! and delivers one [`evaluate`](Automation::evaluate) call per tick until
//! they are unregistered.

pub mod conditional;
pub mod conditions;
pub mod roller_shutter;

use std::sync::Arc;

use autohub_domain::automation::{AutomationKind, AutomationSnapshot, Lifecycle};
use autohub_domain::error::AutohubError;
use autohub_domain::id::{ActuatorId, AreaId, AutomationId};
use autohub_domain::time::Timestamp;

use crate::ports::{DaylightService, WeatherService};

pub use conditional::{ConditionalAutomation, ConditionalAutomationBuilder};
pub use roller_shutter::RollerShutterAutomation;

/// Shared services injected into automations at construction.
#[derive(Clone)]
pub struct ServiceContext {
    pub daylight: Arc<dyn DaylightService>,
    pub weather: Arc<dyn WeatherService>,
}

impl ServiceContext {
    #[must_use]
    pub fn new(daylight: Arc<dyn DaylightService>, weather: Arc<dyn WeatherService>) -> Self {
        Self { daylight, weather }
    }
}

/// A rule that observes state and commands actuators once per tick.
pub trait Automation: Send {
    fn id(&self) -> AutomationId;

    fn area_id(&self) -> AreaId;

    fn name(&self) -> &str;

    fn kind(&self) -> AutomationKind;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Actuators this automation drives. Each actuator may belong to only
    /// one registered automation.
    fn claimed_actuators(&self) -> Vec<ActuatorId> {
        Vec::new()
    }

    /// Evaluate the rule for the tick at `now`.
    ///
    /// Called only while activated. Must not block.
    ///
    /// # Errors
    ///
    /// Any error is logged by the dispatcher and does not affect other
    /// automations or later ticks.
    fn evaluate(&mut self, now: Timestamp) -> Result<(), AutohubError>;

    /// Current read model for state reporting.
    fn snapshot(&self) -> AutomationSnapshot;

    /// Start receiving ticks.
    ///
    /// # Errors
    ///
    /// Returns [`AutohubError::Lifecycle`] when the automation was already
    /// activated or has been deactivated.
    fn activate(&mut self, now: Timestamp) -> Result<(), AutohubError> {
        self.lifecycle_mut().activate(now)?;
        tracing::info!(
            automation_id = %self.id(),
            automation = self.name(),
            kind = %self.kind(),
            "automation activated"
        );
        Ok(())
    }

    /// Stop receiving ticks. Calling it again is a no-op.
    fn deactivate(&mut self) {
        if self.lifecycle_mut().deactivate() {
            tracing::info!(
                automation_id = %self.id(),
                automation = self.name(),
                "automation deactivated"
            );
        }
    }
}
