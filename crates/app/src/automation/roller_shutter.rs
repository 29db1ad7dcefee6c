//! Roller-shutter automation — opens with the sun, closes at sunset, and
//! honours the heat, frost and "not before" overrides.
//!
//! Each tick reads daylight, weather and actuator state, asks
//! [`decide`] for a target and issues at most one command, gated by the
//! [`TransitionDebounce`]. The decision itself is recomputed from scratch
//! every tick, so a failed command is naturally retried on a later tick.

use std::sync::Arc;

use autohub_domain::automation::{
    AutomationKind, AutomationSnapshot, Decision, DecisionInputs, Lifecycle, RollerShutterConfig,
    SnapshotDetail, TransitionDebounce, decide,
};
use autohub_domain::error::{AutohubError, EvaluationError};
use autohub_domain::id::{ActuatorId, AreaId, AutomationId};
use autohub_domain::time::{self, Timestamp};

use super::{Automation, ServiceContext};
use crate::ports::{Actuator, DaylightService, WeatherService};

/// Drives one roller shutter from daylight and temperature.
pub struct RollerShutterAutomation {
    id: AutomationId,
    area_id: AreaId,
    config: RollerShutterConfig,
    lifecycle: Lifecycle,
    actuator: Arc<dyn Actuator>,
    daylight: Arc<dyn DaylightService>,
    weather: Arc<dyn WeatherService>,
    debounce: TransitionDebounce,
    last_decision: Option<Decision>,
}

impl RollerShutterAutomation {
    /// Build an automation for `actuator` in `area_id`.
    ///
    /// The configuration was validated when it was built, so construction
    /// cannot fail.
    #[must_use]
    pub fn new(
        area_id: AreaId,
        config: RollerShutterConfig,
        actuator: Arc<dyn Actuator>,
        context: &ServiceContext,
    ) -> Self {
        let debounce = TransitionDebounce::new(config.min_transition_interval());
        Self {
            id: AutomationId::new(),
            area_id,
            config,
            lifecycle: Lifecycle::default(),
            actuator,
            daylight: context.daylight.clone(),
            weather: context.weather.clone(),
            debounce,
            last_decision: None,
        }
    }

    /// The decision of the latest evaluated tick.
    #[must_use]
    pub fn last_decision(&self) -> Option<Decision> {
        self.last_decision
    }

    fn inputs(
        &self,
        now: Timestamp,
        activated_at: Timestamp,
    ) -> Result<DecisionInputs, EvaluationError> {
        let date = now.date();
        let previous = date
            .pred_opt()
            .ok_or(EvaluationError::CalendarOutOfRange { date })?;
        let temperature = self.weather.current_outside_temperature();
        if temperature.is_none() {
            tracing::debug!(
                automation = self.config.name(),
                "no outside temperature, applying schedule only"
            );
        }
        Ok(DecisionInputs {
            now,
            activated_at,
            sunrise: self.daylight.sunrise(date),
            sunset: self.daylight.sunset(date),
            previous_sunset: time::at(previous, self.daylight.sunset(previous)),
            temperature,
            current: self.actuator.current_state(),
        })
    }
}

impl Automation for RollerShutterAutomation {
    fn id(&self) -> AutomationId {
        self.id
    }

    fn area_id(&self) -> AreaId {
        self.area_id
    }

    fn name(&self) -> &str {
        self.config.name()
    }

    fn kind(&self) -> AutomationKind {
        AutomationKind::RollerShutter
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn claimed_actuators(&self) -> Vec<ActuatorId> {
        vec![self.actuator.id()]
    }

    fn evaluate(&mut self, now: Timestamp) -> Result<(), AutohubError> {
        let Some(activated_at) = self.lifecycle.activated_at() else {
            return Ok(());
        };
        if !self.lifecycle.is_active() {
            return Ok(());
        }

        let inputs = self.inputs(now, activated_at)?;
        let decision = decide(self.config.special(), &inputs);
        self.last_decision = Some(decision);

        let Some(target) = decision.target else {
            return Ok(());
        };
        if inputs.current.is_at(target) {
            self.debounce.acknowledge(target);
            return Ok(());
        }
        if !self.debounce.permits(target, now) {
            tracing::debug!(
                automation = self.config.name(),
                %target,
                rule = %decision.rule,
                "transition suppressed by debounce"
            );
            return Ok(());
        }

        self.actuator.apply(target)?;
        self.debounce.record(target, now);
        tracing::info!(
            automation = self.config.name(),
            actuator_id = %self.actuator.id(),
            %target,
            rule = %decision.rule,
            "roller shutter commanded"
        );
        Ok(())
    }

    fn snapshot(&self) -> AutomationSnapshot {
        AutomationSnapshot {
            id: self.id,
            area_id: self.area_id,
            name: self.config.name().to_string(),
            lifecycle: self.lifecycle.state(),
            detail: SnapshotDetail::RollerShutter {
                actuator_id: self.actuator.id(),
                actuator_state: self.actuator.current_state(),
                commanded_target: self.debounce.last_target(),
                last_transition_at: self.debounce.last_transition_at(),
                last_rule: self.last_decision.map(|decision| decision.rule),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeActuator, FakeWeather, context, tod, ts};
    use autohub_domain::actuator::{ActuatorState, Target};
    use autohub_domain::automation::{DecisionRule, SpecialSettings};
    use autohub_domain::error::ActuatorError;
    use chrono::TimeDelta;

    struct Rig {
        automation: RollerShutterAutomation,
        actuator: Arc<FakeActuator>,
        weather: Arc<FakeWeather>,
    }

    fn rig(special: SpecialSettings, state: ActuatorState, activated_at: Timestamp) -> Rig {
        let actuator = FakeActuator::new(state);
        let weather = Arc::new(FakeWeather::default());
        let config = RollerShutterConfig::builder()
            .name("Bedroom shutter")
            .special(special)
            .min_transition_interval(TimeDelta::minutes(5))
            .build()
            .unwrap();
        let mut automation = RollerShutterAutomation::new(
            AreaId::new(),
            config,
            actuator.clone(),
            &context(&weather),
        );
        automation.activate(activated_at).unwrap();
        Rig {
            automation,
            actuator,
            weather,
        }
    }

    #[test]
    fn should_not_evaluate_before_activation() {
        let actuator = FakeActuator::new(ActuatorState::Closed);
        let weather = Arc::new(FakeWeather::default());
        let config = RollerShutterConfig::builder().name("Idle").build().unwrap();
        let mut automation = RollerShutterAutomation::new(
            AreaId::new(),
            config,
            actuator.clone(),
            &context(&weather),
        );

        automation.evaluate(ts(12, 0)).unwrap();

        assert!(actuator.commands().is_empty());
        assert!(automation.last_decision().is_none());
    }

    #[test]
    fn should_open_once_at_skip_time_when_sunrise_is_earlier() {
        let special = SpecialSettings::builder()
            .do_not_open_before(tod(8, 0))
            .build()
            .unwrap();
        let mut rig = rig(special, ActuatorState::Closed, ts(5, 0));

        for (hour, minute) in [(6, 30), (7, 0), (7, 59)] {
            rig.automation.evaluate(ts(hour, minute)).unwrap();
        }
        assert!(rig.actuator.commands().is_empty());

        for minute in [0, 1, 2, 30] {
            rig.automation.evaluate(ts(8, minute)).unwrap();
        }
        assert_eq!(rig.actuator.commands(), vec![Target::Open]);
    }

    #[test]
    fn should_not_command_when_already_at_target() {
        let mut rig = rig(SpecialSettings::default(), ActuatorState::Open, ts(5, 0));
        rig.automation.evaluate(ts(9, 0)).unwrap();
        assert!(rig.actuator.commands().is_empty());
        assert_eq!(
            rig.automation.last_decision().map(|d| d.target),
            Some(Some(Target::Open))
        );
    }

    #[test]
    fn should_close_when_too_hot_and_reopen_after_cooling_down() {
        let special = SpecialSettings::builder()
            .close_if_hotter_than(26.0)
            .build()
            .unwrap();
        let mut rig = rig(special, ActuatorState::Closed, ts(5, 0));

        rig.automation.evaluate(ts(8, 0)).unwrap();
        rig.weather.set(Some(28.0));
        rig.automation.evaluate(ts(13, 0)).unwrap();
        rig.weather.set(Some(22.0));
        rig.automation.evaluate(ts(17, 0)).unwrap();

        assert_eq!(
            rig.actuator.commands(),
            vec![Target::Open, Target::Closed, Target::Open]
        );
    }

    #[test]
    fn should_issue_one_call_for_opposite_targets_inside_debounce_window() {
        let special = SpecialSettings::builder()
            .close_if_hotter_than(26.0)
            .build()
            .unwrap();
        let mut rig = rig(special, ActuatorState::Open, ts(5, 0));

        rig.weather.set(Some(27.0));
        rig.automation.evaluate(ts(12, 0)).unwrap();
        rig.actuator.set_state(ActuatorState::Open);
        rig.automation.evaluate(ts(12, 1)).unwrap();
        rig.weather.set(Some(25.0));
        rig.actuator.set_state(ActuatorState::Closed);
        rig.automation.evaluate(ts(12, 3)).unwrap();

        assert_eq!(rig.actuator.commands(), vec![Target::Closed]);
    }

    #[test]
    fn should_never_open_from_closed_while_frozen() {
        let special = SpecialSettings::builder()
            .do_not_open_if_colder_than(3.0)
            .build()
            .unwrap();
        let mut rig = rig(special, ActuatorState::Closed, ts(5, 0));
        rig.weather.set(Some(-2.0));

        for hour in 6..21 {
            rig.automation.evaluate(ts(hour, 45)).unwrap();
        }

        assert!(rig.actuator.commands().is_empty());
        assert_eq!(
            rig.automation.last_decision().map(|d| d.rule),
            Some(DecisionRule::FrostSuppression)
        );
    }

    #[test]
    fn should_open_once_thaw_arrives() {
        let special = SpecialSettings::builder()
            .do_not_open_if_colder_than(3.0)
            .build()
            .unwrap();
        let mut rig = rig(special, ActuatorState::Closed, ts(5, 0));
        rig.weather.set(Some(1.0));
        rig.automation.evaluate(ts(7, 0)).unwrap();
        rig.weather.set(Some(4.0));
        rig.automation.evaluate(ts(10, 0)).unwrap();

        assert_eq!(rig.actuator.commands(), vec![Target::Open]);
    }

    #[test]
    fn should_follow_schedule_when_temperature_is_missing() {
        let special = SpecialSettings::builder()
            .do_not_open_if_colder_than(3.0)
            .close_if_hotter_than(20.0)
            .build()
            .unwrap();
        let mut rig = rig(special, ActuatorState::Closed, ts(5, 0));

        rig.automation.evaluate(ts(7, 0)).unwrap();
        rig.automation.evaluate(ts(21, 0)).unwrap();

        assert_eq!(rig.actuator.commands(), vec![Target::Open, Target::Closed]);
    }

    #[test]
    fn should_report_actuator_failure_and_retry_on_next_tick() {
        let mut rig = rig(SpecialSettings::default(), ActuatorState::Closed, ts(5, 0));
        rig.actuator.set_failing(true);

        let result = rig.automation.evaluate(ts(7, 0));
        assert!(matches!(
            result,
            Err(AutohubError::Actuator(ActuatorError::Unavailable { .. }))
        ));
        assert!(rig.automation.debounce.last_target().is_none());

        rig.actuator.set_failing(false);
        rig.automation.evaluate(ts(7, 1)).unwrap();
        assert_eq!(rig.actuator.commands(), vec![Target::Open]);
    }

    #[test]
    fn should_reopen_next_morning_after_manual_close() {
        let mut rig = rig(SpecialSettings::default(), ActuatorState::Closed, ts(5, 0));
        rig.automation.evaluate(ts(7, 0)).unwrap();
        rig.actuator.set_state(ActuatorState::Closed);
        rig.automation.evaluate(ts(12, 0)).unwrap();
        assert_eq!(rig.actuator.commands(), vec![Target::Open]);

        rig.automation.evaluate(ts(21, 5)).unwrap();
        assert_eq!(rig.automation.debounce.last_target(), Some(Target::Closed));
        assert_eq!(rig.automation.debounce.last_transition_at(), Some(ts(7, 0)));

        let next_morning = ts(7, 0) + TimeDelta::days(1);
        rig.automation.evaluate(next_morning).unwrap();

        assert_eq!(rig.actuator.commands(), vec![Target::Open, Target::Open]);
    }

    #[test]
    fn should_leave_manual_open_alone_after_sunset_close() {
        let mut rig = rig(SpecialSettings::default(), ActuatorState::Open, ts(5, 0));
        rig.automation.evaluate(ts(21, 0)).unwrap();
        rig.actuator.set_state(ActuatorState::Open);

        rig.automation.evaluate(ts(23, 0)).unwrap();

        assert_eq!(rig.actuator.commands(), vec![Target::Closed]);
        assert_eq!(rig.actuator.current_state(), ActuatorState::Open);
    }

    #[test]
    fn should_leave_manual_open_alone_while_too_hot() {
        let special = SpecialSettings::builder()
            .close_if_hotter_than(26.0)
            .build()
            .unwrap();
        let mut rig = rig(special, ActuatorState::Open, ts(5, 0));
        rig.weather.set(Some(30.0));
        rig.automation.evaluate(ts(12, 0)).unwrap();
        rig.actuator.set_state(ActuatorState::Open);

        rig.automation.evaluate(ts(13, 0)).unwrap();

        assert_eq!(rig.actuator.commands(), vec![Target::Closed]);
    }

    #[test]
    fn should_expose_commanded_state_in_snapshot() {
        let mut rig = rig(SpecialSettings::default(), ActuatorState::Closed, ts(5, 0));
        rig.automation.evaluate(ts(7, 0)).unwrap();

        let snapshot = rig.automation.snapshot();
        assert_eq!(snapshot.kind(), AutomationKind::RollerShutter);
        assert_eq!(
            snapshot.detail,
            SnapshotDetail::RollerShutter {
                actuator_id: rig.actuator.id(),
                actuator_state: ActuatorState::Open,
                commanded_target: Some(Target::Open),
                last_transition_at: Some(ts(7, 0)),
                last_rule: Some(DecisionRule::Schedule),
            }
        );
    }
}
