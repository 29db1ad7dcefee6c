//! Controller — the explicit context that owns every area and automation.
//!
//! It replaces any global registry: setup code creates one [`Controller`],
//! adds areas, registers automations, and hands the controller to the
//! [`scheduler`](crate::scheduler) which calls [`Controller::tick`].
//!
//! The controller also enforces actuator ownership: an actuator can be
//! claimed by one registered automation at a time across all areas.

use std::collections::HashMap;
use std::sync::Arc;

use autohub_domain::area::Area;
use autohub_domain::automation::{AutomationSnapshot, RollerShutterConfig};
use autohub_domain::error::{AutohubError, ConfigurationError, NotFoundError};
use autohub_domain::id::{ActuatorId, AreaId, AutomationId};
use autohub_domain::time::Timestamp;

use crate::area_registry::{AreaRegistry, AutomationHandle, TickReport};
use crate::automation::{
    Automation, ConditionalAutomationBuilder, RollerShutterAutomation, ServiceContext,
};
use crate::ports::Actuator;

/// Owns the areas, their automations, and the actuator claims.
pub struct Controller {
    context: ServiceContext,
    areas: Vec<AreaRegistry>,
    claims: HashMap<ActuatorId, AutomationId>,
}

impl Controller {
    #[must_use]
    pub fn new(context: ServiceContext) -> Self {
        Self {
            context,
            areas: Vec::new(),
            claims: HashMap::new(),
        }
    }

    /// Services injected into automations built by this controller.
    #[must_use]
    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// Areas in creation order.
    #[must_use]
    pub fn areas(&self) -> &[AreaRegistry] {
        &self.areas
    }

    #[must_use]
    pub fn area(&self, id: AreaId) -> Option<&AreaRegistry> {
        self.areas.iter().find(|registry| registry.area().id == id)
    }

    /// Add an empty area.
    ///
    /// # Errors
    ///
    /// Returns [`AutohubError::Configuration`] when the area is invalid or
    /// its id is already in use.
    #[tracing::instrument(skip(self, area), fields(area_name = %area.name))]
    pub fn add_area(&mut self, area: Area) -> Result<AreaId, AutohubError> {
        area.validate()?;
        let id = area.id;
        if self.area(id).is_some() {
            return Err(ConfigurationError::DuplicateArea { id }.into());
        }
        self.areas.push(AreaRegistry::new(area));
        tracing::info!(area_id = %id, "area added");
        Ok(id)
    }

    /// Build a [`RollerShutterAutomation`] for `actuator` and register it.
    ///
    /// # Errors
    ///
    /// Returns [`AutohubError::NotFound`] for an unknown area and
    /// [`AutohubError::Configuration`] when the actuator is already claimed.
    #[tracing::instrument(skip(self, actuator, config, now), fields(name = config.name()))]
    pub fn setup_roller_shutter(
        &mut self,
        area_id: AreaId,
        actuator: Arc<dyn Actuator>,
        config: RollerShutterConfig,
        now: Timestamp,
    ) -> Result<AutomationHandle, AutohubError> {
        let automation = RollerShutterAutomation::new(area_id, config, actuator, &self.context);
        self.register(Box::new(automation), now)
    }

    /// Build a conditional automation from `builder` and register it.
    ///
    /// # Errors
    ///
    /// Returns the builder's configuration error, or any error from
    /// [`Controller::register`].
    #[tracing::instrument(skip(self, builder, now))]
    pub fn setup_conditional(
        &mut self,
        area_id: AreaId,
        builder: ConditionalAutomationBuilder,
        now: Timestamp,
    ) -> Result<AutomationHandle, AutohubError> {
        let automation = builder.build(area_id)?;
        self.register(Box::new(automation), now)
    }

    /// Register and activate an automation in its area.
    ///
    /// # Errors
    ///
    /// Returns [`AutohubError::NotFound`] when the automation's area does not
    /// exist, [`ConfigurationError::ActuatorAlreadyClaimed`] when one of its
    /// actuators belongs to another automation, and any error raised by
    /// [`AreaRegistry::register`].
    pub fn register(
        &mut self,
        automation: Box<dyn Automation>,
        now: Timestamp,
    ) -> Result<AutomationHandle, AutohubError> {
        let area_id = automation.area_id();
        let claimed = automation.claimed_actuators();
        if let Some((actuator, owner)) = claimed
            .iter()
            .find_map(|actuator| self.claims.get(actuator).map(|owner| (*actuator, *owner)))
        {
            return Err(ConfigurationError::ActuatorAlreadyClaimed { actuator, owner }.into());
        }

        let registry = self.area_mut(area_id)?;
        let handle = registry.register(automation, now)?;
        for actuator in claimed {
            self.claims.insert(actuator, handle.automation_id);
        }
        Ok(handle)
    }

    /// Deactivate and remove an automation, releasing its actuators.
    ///
    /// # Errors
    ///
    /// Returns [`AutohubError::NotFound`] when the area or the automation
    /// does not exist.
    pub fn unregister(&mut self, handle: AutomationHandle) -> Result<(), AutohubError> {
        let automation = self.area_mut(handle.area_id)?.unregister(handle)?;
        self.claims.retain(|_, owner| *owner != handle.automation_id);
        tracing::debug!(automation = automation.name(), "automation unregistered");
        Ok(())
    }

    /// Deliver one tick to every area, in creation order.
    pub fn tick(&mut self, now: Timestamp) -> TickReport {
        let mut report = TickReport::default();
        for registry in &mut self.areas {
            report.merge(registry.dispatch(now));
        }
        if report.failed > 0 {
            tracing::debug!(
                evaluated = report.evaluated,
                failed = report.failed,
                "tick completed with failures"
            );
        }
        report
    }

    /// Read models of every registered automation.
    #[must_use]
    pub fn snapshots(&self) -> Vec<AutomationSnapshot> {
        self.areas
            .iter()
            .flat_map(AreaRegistry::snapshots)
            .collect()
    }

    fn area_mut(&mut self, id: AreaId) -> Result<&mut AreaRegistry, NotFoundError> {
        self.areas
            .iter_mut()
            .find(|registry| registry.area().id == id)
            .ok_or_else(|| NotFoundError {
                entity: "Area",
                id: id.to_string(),
            })
    }
}
