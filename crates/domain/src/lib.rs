//! # autohub-domain
//!
//! Pure domain model for the autohub home automation controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, wall-clock time
//! - Define **Areas** (logical groupings such as rooms)
//! - Define **Actuator state** (open/closed/unknown for shutters and lamps)
//! - Define the **Automation lifecycle** (`Created → Activated → Deactivated`)
//! - Define the **roller-shutter rules**: special settings, the per-tick
//!   decision function and transition debounce
//! - Define **edge detection** for condition-driven automations
//! - Define **snapshots** read by state-reporting layers
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod actuator;
pub mod area;
pub mod automation;
