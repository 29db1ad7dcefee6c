//! Roller-shutter decision rules.
//!
//! [`decide`] is a pure function of one tick's inputs. Rules are checked
//! top-down and the first one that matches determines the target:
//!
//! 1. heat protection closes the shutter,
//! 2. frost suppression keeps it where it is instead of opening,
//! 3. the daylight schedule opens after sunrise (or the configured skip
//!    time, whichever is later) and closes at sunset.
//!
//! Without a temperature reading only the schedule applies.

use serde::{Deserialize, Serialize};

use crate::actuator::{ActuatorState, Target};
use crate::automation::SpecialSettings;
use crate::time::{TimeOfDay, Timestamp};

/// The rule that produced a [`Decision`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    HeatProtection,
    FrostSuppression,
    Schedule,
    /// No schedule boundary has passed since activation yet.
    AwaitingBoundary,
}

impl std::fmt::Display for DecisionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HeatProtection => f.write_str("heat_protection"),
            Self::FrostSuppression => f.write_str("frost_suppression"),
            Self::Schedule => f.write_str("schedule"),
            Self::AwaitingBoundary => f.write_str("awaiting_boundary"),
        }
    }
}

/// Everything a single decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInputs {
    pub now: Timestamp,
    pub activated_at: Timestamp,
    pub sunrise: TimeOfDay,
    pub sunset: TimeOfDay,
    /// Sunset of the day before `now`, which governs the early morning.
    pub previous_sunset: Timestamp,
    pub temperature: Option<f32>,
    pub current: ActuatorState,
}

/// Outcome of [`decide`]. `target: None` means "leave the actuator alone".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub target: Option<Target>,
    pub rule: DecisionRule,
}

/// Compute the target state for one tick.
#[must_use]
pub fn decide(settings: &SpecialSettings, inputs: &DecisionInputs) -> Decision {
    if let (Some(temperature), Some(limit)) = (inputs.temperature, settings.too_hot_above())
        && temperature > limit
    {
        return Decision {
            target: Some(Target::Closed),
            rule: DecisionRule::HeatProtection,
        };
    }

    let scheduled = schedule(settings, inputs);

    if scheduled.target == Some(Target::Open)
        && let (Some(temperature), Some(limit)) = (inputs.temperature, settings.frozen_below())
        && temperature < limit
    {
        return Decision {
            target: inputs.current.as_target(),
            rule: DecisionRule::FrostSuppression,
        };
    }

    scheduled
}

fn schedule(settings: &SpecialSettings, inputs: &DecisionInputs) -> Decision {
    let today = inputs.now.date();
    let open_time = settings
        .skip_before()
        .map_or(inputs.sunrise, |skip| skip.max(inputs.sunrise));
    let open_at = today.and_time(open_time);
    let close_at = today.and_time(inputs.sunset);

    let (boundary, target) = if inputs.now >= close_at {
        (close_at, Target::Closed)
    } else if inputs.now >= open_at {
        (open_at, Target::Open)
    } else {
        (inputs.previous_sunset, Target::Closed)
    };

    if boundary < inputs.activated_at {
        return Decision {
            target: None,
            rule: DecisionRule::AwaitingBoundary,
        };
    }
    Decision {
        target: Some(target),
        rule: DecisionRule::Schedule,
    }
}
