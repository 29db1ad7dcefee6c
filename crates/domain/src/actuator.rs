//! Actuator state — the observable position of a shutter motor or lamp relay.
//!
//! Shutters are `Open`/`Closed`; binary outputs such as lamps map "on" to
//! `Open` and "off" to `Closed`.

use serde::{Deserialize, Serialize};

/// Current state reported by an actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorState {
    Open,
    Closed,
    #[default]
    Unknown,
}

impl ActuatorState {
    /// The commandable target equivalent to this state, if known.
    #[must_use]
    pub fn as_target(self) -> Option<Target> {
        match self {
            Self::Open => Some(Target::Open),
            Self::Closed => Some(Target::Closed),
            Self::Unknown => None,
        }
    }

    /// Whether the actuator already sits at `target`.
    #[must_use]
    pub fn is_at(self, target: Target) -> bool {
        self.as_target() == Some(target)
    }
}

impl std::fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// A state an automation can command an actuator into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Open,
    Closed,
}

impl Target {
    /// The state the actuator reports once the command completed.
    #[must_use]
    pub fn state(self) -> ActuatorState {
        match self {
            Self::Open => ActuatorState::Open,
            Self::Closed => ActuatorState::Closed,
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("close"),
        }
    }
}
