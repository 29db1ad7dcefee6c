//! Edge-triggered automation — runs an action when a predicate flips.

use std::sync::Arc;

use autohub_domain::automation::{
    AutomationKind, AutomationSnapshot, Edge, EdgeDetector, Lifecycle, SnapshotDetail,
};
use autohub_domain::error::{AutohubError, ConfigurationError, EvaluationError};
use autohub_domain::id::{ActuatorId, AreaId, AutomationId};
use autohub_domain::time::Timestamp;

use super::Automation;
use crate::ports::Actuator;

/// Boolean condition evaluated once per tick.
pub type Predicate = Box<dyn FnMut(Timestamp) -> bool + Send>;

/// Side effect run on an edge.
pub type Action = Box<dyn FnMut() -> Result<(), AutohubError> + Send>;

/// Runs `on_rising` when the predicate becomes true and `on_falling` when it
/// becomes false again. Nothing happens while the value is unchanged.
pub struct ConditionalAutomation {
    id: AutomationId,
    area_id: AreaId,
    name: String,
    lifecycle: Lifecycle,
    condition: Predicate,
    on_rising: Action,
    on_falling: Option<Action>,
    claimed: Vec<ActuatorId>,
    detector: EdgeDetector,
}

impl ConditionalAutomation {
    #[must_use]
    pub fn builder() -> ConditionalAutomationBuilder {
        ConditionalAutomationBuilder::default()
    }

    /// The predicate value seen on the latest evaluated tick.
    #[must_use]
    pub fn last_value(&self) -> bool {
        self.detector.last()
    }

    fn run(&mut self, edge: Edge) -> Result<(), AutohubError> {
        let action = match edge {
            Edge::Rising => Some(&mut self.on_rising),
            Edge::Falling => self.on_falling.as_mut(),
        };
        let Some(action) = action else {
            return Ok(());
        };
        tracing::debug!(automation = %self.name, edge = edge.as_str(), "condition changed");
        action().map_err(|err| {
            EvaluationError::ActionFailed {
                edge: edge.as_str(),
                source: Box::new(err),
            }
            .into()
        })
    }
}

impl Automation for ConditionalAutomation {
    fn id(&self) -> AutomationId {
        self.id
    }

    fn area_id(&self) -> AreaId {
        self.area_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AutomationKind {
        AutomationKind::Conditional
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn claimed_actuators(&self) -> Vec<ActuatorId> {
        self.claimed.clone()
    }

    fn evaluate(&mut self, now: Timestamp) -> Result<(), AutohubError> {
        if !self.lifecycle.is_active() {
            return Ok(());
        }
        let value = (self.condition)(now);
        match self.detector.observe(value) {
            Some(edge) => self.run(edge),
            None => Ok(()),
        }
    }

    fn snapshot(&self) -> AutomationSnapshot {
        AutomationSnapshot {
            id: self.id,
            area_id: self.area_id,
            name: self.name.clone(),
            lifecycle: self.lifecycle.state(),
            detail: SnapshotDetail::Conditional {
                last_value: self.detector.last(),
            },
        }
    }
}

/// Step-by-step builder for [`ConditionalAutomation`].
#[derive(Default)]
pub struct ConditionalAutomationBuilder {
    id: Option<AutomationId>,
    name: Option<String>,
    condition: Option<Predicate>,
    on_rising: Option<Action>,
    on_falling: Option<Action>,
    claimed: Vec<ActuatorId>,
}

impl ConditionalAutomationBuilder {
    #[must_use]
    pub fn id(mut self, id: AutomationId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn condition(
        mut self,
        condition: impl FnMut(Timestamp) -> bool + Send + 'static,
    ) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    #[must_use]
    pub fn on_rising(
        mut self,
        action: impl FnMut() -> Result<(), AutohubError> + Send + 'static,
    ) -> Self {
        self.on_rising = Some(Box::new(action));
        self
    }

    #[must_use]
    pub fn on_falling(
        mut self,
        action: impl FnMut() -> Result<(), AutohubError> + Send + 'static,
    ) -> Self {
        self.on_falling = Some(Box::new(action));
        self
    }

    /// Turn `actuator` on while the condition holds and off otherwise.
    ///
    /// The actuator is claimed by the resulting automation.
    #[must_use]
    pub fn switch_actuator(mut self, actuator: Arc<dyn Actuator>) -> Self {
        self.claimed.push(actuator.id());
        let on = Arc::clone(&actuator);
        self.on_rising = Some(Box::new(move || on.open().map_err(AutohubError::from)));
        self.on_falling = Some(Box::new(move || actuator.close().map_err(AutohubError::from)));
        self
    }

    /// Validate and build the automation for `area_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AutohubError::Configuration`] when the name is blank or
    /// when the condition or the rising-edge action is missing.
    pub fn build(self, area_id: AreaId) -> Result<ConditionalAutomation, AutohubError> {
        let name = self.name.unwrap_or_default();
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName.into());
        }
        let condition = self.condition.ok_or(ConfigurationError::MissingCondition)?;
        let on_rising = self.on_rising.ok_or(ConfigurationError::MissingAction)?;
        Ok(ConditionalAutomation {
            id: self.id.unwrap_or_default(),
            area_id,
            name,
            lifecycle: Lifecycle::default(),
            condition,
            on_rising,
            on_falling: self.on_falling,
            claimed: self.claimed,
            detector: EdgeDetector::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeActuator, ts};
    use autohub_domain::actuator::{ActuatorState, Target};
    use autohub_domain::error::ActuatorError;
    use std::sync::Mutex;

    /// Records which edges fired, in tick order.
    #[derive(Clone, Default)]
    struct Spy(Arc<Mutex<Vec<(usize, &'static str)>>>);

    impl Spy {
        fn action(
            &self,
            tick: &Arc<Mutex<usize>>,
            label: &'static str,
        ) -> impl FnMut() -> Result<(), AutohubError> + Send + 'static {
            let calls = Arc::clone(&self.0);
            let tick = Arc::clone(tick);
            move || {
                calls.lock().unwrap().push((*tick.lock().unwrap(), label));
                Ok(())
            }
        }

        fn calls(&self) -> Vec<(usize, &'static str)> {
            self.0.lock().unwrap().clone()
        }
    }

    /// A condition returning `values` one per call, plus the shared call counter.
    fn scripted(
        values: &[bool],
    ) -> (
        impl FnMut(Timestamp) -> bool + Send + 'static,
        Arc<Mutex<usize>>,
    ) {
        let values = values.to_vec();
        let tick = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&tick);
        let condition = move |_now: Timestamp| {
            let mut tick = counter.lock().unwrap();
            *tick += 1;
            values[*tick - 1]
        };
        (condition, tick)
    }

    #[test]
    fn should_fire_only_on_edges_when_sequence_changes() {
        let (condition, tick) = scripted(&[false, true, true, false, true]);
        let spy = Spy::default();
        let mut automation = ConditionalAutomation::builder()
            .name("Porch light")
            .condition(condition)
            .on_rising(spy.action(&tick, "on"))
            .on_falling(spy.action(&tick, "off"))
            .build(AreaId::new())
            .unwrap();
        automation.activate(ts(0, 0)).unwrap();

        for minute in 0..5 {
            automation.evaluate(ts(12, minute)).unwrap();
        }

        assert_eq!(spy.calls(), vec![(2, "on"), (4, "off"), (5, "on")]);
        assert!(automation.last_value());
    }

    #[test]
    fn should_fire_on_first_tick_when_condition_already_true() {
        let (condition, tick) = scripted(&[true, true]);
        let spy = Spy::default();
        let mut automation = ConditionalAutomation::builder()
            .name("Always")
            .condition(condition)
            .on_rising(spy.action(&tick, "on"))
            .build(AreaId::new())
            .unwrap();
        automation.activate(ts(0, 0)).unwrap();

        automation.evaluate(ts(1, 0)).unwrap();
        automation.evaluate(ts(1, 1)).unwrap();

        assert_eq!(spy.calls(), vec![(1, "on")]);
    }

    #[test]
    fn should_update_last_value_when_falling_action_missing() {
        let (condition, tick) = scripted(&[true, false, true]);
        let spy = Spy::default();
        let mut automation = ConditionalAutomation::builder()
            .name("Rising only")
            .condition(condition)
            .on_rising(spy.action(&tick, "on"))
            .build(AreaId::new())
            .unwrap();
        automation.activate(ts(0, 0)).unwrap();

        automation.evaluate(ts(1, 0)).unwrap();
        automation.evaluate(ts(1, 1)).unwrap();
        assert!(!automation.last_value());
        automation.evaluate(ts(1, 2)).unwrap();

        assert_eq!(spy.calls(), vec![(1, "on"), (3, "on")]);
    }

    #[test]
    fn should_update_last_value_when_action_fails() {
        let (condition, _tick) = scripted(&[true, true]);
        let mut automation = ConditionalAutomation::builder()
            .name("Broken")
            .condition(condition)
            .on_rising(|| {
                Err(ActuatorError::Unavailable {
                    id: ActuatorId::new(),
                }
                .into())
            })
            .build(AreaId::new())
            .unwrap();
        automation.activate(ts(0, 0)).unwrap();

        let err = automation.evaluate(ts(1, 0)).unwrap_err();
        assert!(matches!(
            err,
            AutohubError::Evaluation(EvaluationError::ActionFailed { edge: "rising", .. })
        ));
        assert!(automation.last_value());
        automation.evaluate(ts(1, 1)).unwrap();
    }

    #[test]
    fn should_switch_actuator_on_and_off() {
        let actuator = FakeActuator::new(ActuatorState::Closed);
        let (condition, _tick) = scripted(&[true, false]);
        let mut automation = ConditionalAutomation::builder()
            .name("Hall lamp")
            .condition(condition)
            .switch_actuator(actuator.clone())
            .build(AreaId::new())
            .unwrap();
        automation.activate(ts(0, 0)).unwrap();

        automation.evaluate(ts(18, 0)).unwrap();
        automation.evaluate(ts(23, 0)).unwrap();

        assert_eq!(actuator.commands(), vec![Target::Open, Target::Closed]);
        assert_eq!(automation.claimed_actuators(), vec![actuator.id()]);
    }

    #[test]
    fn should_ignore_ticks_when_not_activated() {
        let (condition, tick) = scripted(&[true]);
        let spy = Spy::default();
        let mut automation = ConditionalAutomation::builder()
            .name("Idle")
            .condition(condition)
            .on_rising(spy.action(&tick, "on"))
            .build(AreaId::new())
            .unwrap();

        automation.evaluate(ts(1, 0)).unwrap();

        assert!(spy.calls().is_empty());
        assert!(!automation.last_value());
    }

    #[test]
    fn should_reject_missing_condition() {
        let result = ConditionalAutomation::builder()
            .name("No condition")
            .on_rising(|| Ok(()))
            .build(AreaId::new());
        assert!(matches!(
            result,
            Err(AutohubError::Configuration(
                ConfigurationError::MissingCondition
            ))
        ));
    }

    #[test]
    fn should_reject_missing_rising_action() {
        let result = ConditionalAutomation::builder()
            .name("No action")
            .condition(|_| true)
            .on_falling(|| Ok(()))
            .build(AreaId::new());
        assert!(matches!(
            result,
            Err(AutohubError::Configuration(ConfigurationError::MissingAction))
        ));
    }

    #[test]
    fn should_reject_blank_name() {
        let result = ConditionalAutomation::builder()
            .name("  ")
            .condition(|_| true)
            .on_rising(|| Ok(()))
            .build(AreaId::new());
        assert!(matches!(
            result,
            Err(AutohubError::Configuration(ConfigurationError::EmptyName))
        ));
    }
}
