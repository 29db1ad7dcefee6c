//! Automation — rules that observe state and command actuators.
//!
//! This module holds everything about automations that needs no IO:
//! the activation [`Lifecycle`], the roller-shutter [`SpecialSettings`] and
//! [`decide`] function, the [`TransitionDebounce`] that protects motors from
//! flip-flopping, the [`EdgeDetector`] used by condition-driven automations,
//! and the [`AutomationSnapshot`] read model.

mod debounce;
mod decision;
mod edge;
mod settings;

pub use debounce::TransitionDebounce;
pub use decision::{Decision, DecisionInputs, DecisionRule, decide};
pub use edge::{Edge, EdgeDetector};
pub use settings::{
    DEFAULT_MIN_TRANSITION_INTERVAL_SECS, RollerShutterConfig, RollerShutterConfigBuilder,
    SpecialSettings, SpecialSettingsBuilder,
};

use serde::{Deserialize, Serialize};

use crate::actuator::{ActuatorState, Target};
use crate::error::LifecycleError;
use crate::id::{ActuatorId, AreaId, AutomationId};
use crate::time::Timestamp;

/// Activation state of an automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Created,
    Activated,
    Deactivated,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Activated => f.write_str("activated"),
            Self::Deactivated => f.write_str("deactivated"),
        }
    }
}

/// Tracks `Created → Activated → Deactivated` for one automation.
///
/// `Deactivated` is terminal. Deactivating is allowed from any state and
/// is a no-op when already deactivated.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    state: LifecycleState,
    activated_at: Option<Timestamp>,
}

impl Lifecycle {
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == LifecycleState::Activated
    }

    /// When the automation was activated, if it ever was.
    #[must_use]
    pub fn activated_at(&self) -> Option<Timestamp> {
        self.activated_at
    }

    /// Move to `Activated`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::AlreadyActivated`] when called twice and
    /// [`LifecycleError::Deactivated`] after deactivation.
    pub fn activate(&mut self, now: Timestamp) -> Result<(), LifecycleError> {
        match self.state {
            LifecycleState::Created => {
                self.state = LifecycleState::Activated;
                self.activated_at = Some(now);
                Ok(())
            }
            LifecycleState::Activated => Err(LifecycleError::AlreadyActivated),
            LifecycleState::Deactivated => Err(LifecycleError::Deactivated),
        }
    }

    /// Move to `Deactivated`. Returns `false` when it already was.
    pub fn deactivate(&mut self) -> bool {
        if self.state == LifecycleState::Deactivated {
            return false;
        }
        self.state = LifecycleState::Deactivated;
        true
    }
}

/// The kind of rule an automation implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationKind {
    RollerShutter,
    Conditional,
}

impl std::fmt::Display for AutomationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RollerShutter => f.write_str("roller_shutter"),
            Self::Conditional => f.write_str("conditional"),
        }
    }
}

/// Read model of an automation, exposed to state-reporting layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationSnapshot {
    pub id: AutomationId,
    pub area_id: AreaId,
    pub name: String,
    pub lifecycle: LifecycleState,
    pub detail: SnapshotDetail,
}

impl AutomationSnapshot {
    #[must_use]
    pub fn kind(&self) -> AutomationKind {
        match self.detail {
            SnapshotDetail::RollerShutter { .. } => AutomationKind::RollerShutter,
            SnapshotDetail::Conditional { .. } => AutomationKind::Conditional,
        }
    }
}

/// Kind-specific part of an [`AutomationSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotDetail {
    RollerShutter {
        actuator_id: ActuatorId,
        actuator_state: ActuatorState,
        commanded_target: Option<Target>,
        last_transition_at: Option<Timestamp>,
        last_rule: Option<DecisionRule>,
    },
    Conditional {
        last_value: bool,
    },
}
