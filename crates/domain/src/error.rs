//! Common error types used across the workspace.
//!
//! Each failure family has its own typed enum; [`AutohubError`] aggregates
//! them through `#[from]` so callers can propagate with `?`.

use crate::id::{ActuatorId, AreaId, AutomationId};

/// Top-level error returned by domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum AutohubError {
    /// Invalid setup parameters, rejected before activation.
    #[error("configuration error")]
    Configuration(#[from] ConfigurationError),

    /// Illegal lifecycle transition.
    #[error("lifecycle error")]
    Lifecycle(#[from] LifecycleError),

    /// Referenced area or automation does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A physical command did not succeed.
    #[error("actuator command failed")]
    Actuator(#[from] ActuatorError),

    /// Failure while computing or applying a tick's decision.
    #[error("evaluation failed")]
    Evaluation(#[from] EvaluationError),
}

/// Setup-time validation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("{setting} must not be negative (got {value})")]
    NegativeThreshold { setting: &'static str, value: f32 },

    #[error("{setting} must be a finite number")]
    NonFiniteThreshold { setting: &'static str },

    #[error("invalid time of day {value:?}, expected HH:MM between 00:00 and 23:59")]
    InvalidTimeOfDay { value: String },

    #[error("minimum transition interval must be positive")]
    NonPositiveInterval,

    #[error("a condition is required")]
    MissingCondition,

    #[error("an action for the rising edge is required")]
    MissingAction,

    #[error("area {id} already exists")]
    DuplicateArea { id: AreaId },

    #[error("automation {id} is already registered in this area")]
    DuplicateAutomation { id: AutomationId },

    #[error("actuator {actuator} is already driven by automation {owner}")]
    ActuatorAlreadyClaimed {
        actuator: ActuatorId,
        owner: AutomationId,
    },
}

/// Illegal lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("automation is already activated")]
    AlreadyActivated,

    #[error("automation was deactivated and cannot be reactivated")]
    Deactivated,
}

/// Lookup failure for an addressable object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Failure reported by an actuator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActuatorError {
    #[error("actuator {id} rejected the {command} command: {reason}")]
    CommandRejected {
        id: ActuatorId,
        command: &'static str,
        reason: String,
    },

    #[error("actuator {id} is unavailable")]
    Unavailable { id: ActuatorId },
}

/// Failures raised while evaluating a tick.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("date {date} has no previous day")]
    CalendarOutOfRange { date: chrono::NaiveDate },

    #[error("action for the {edge} edge failed")]
    ActionFailed {
        edge: &'static str,
        #[source]
        source: Box<AutohubError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_configuration_error_into_autohub_error() {
        let err: AutohubError = ConfigurationError::EmptyName.into();
        assert!(matches!(
            err,
            AutohubError::Configuration(ConfigurationError::EmptyName)
        ));
    }

    #[test]
    fn should_display_negative_threshold_with_setting_name() {
        let err = ConfigurationError::NegativeThreshold {
            setting: "skip_if_frozen_temperature",
            value: -3.0,
        };
        assert_eq!(
            err.to_string(),
            "skip_if_frozen_temperature must not be negative (got -3)"
        );
    }

    #[test]
    fn should_display_not_found_error() {
        let err = NotFoundError {
            entity: "Area",
            id: "kitchen".to_string(),
        };
        assert_eq!(err.to_string(), "Area kitchen not found");
    }

    #[test]
    fn should_expose_action_failure_source() {
        let inner = AutohubError::Actuator(ActuatorError::Unavailable {
            id: ActuatorId::new(),
        });
        let err = EvaluationError::ActionFailed {
            edge: "rising",
            source: Box::new(inner),
        };
        let source = std::error::Error::source(&err);
        assert!(source.is_some());
    }
}
