//! Area registry — owns the automations of one area and dispatches ticks.
//!
//! Registration is the second phase of an automation's lifecycle: the
//! automation is built and configured first, then [`AreaRegistry::register`]
//! activates it and returns an [`AutomationHandle`]. Unregistering
//! deactivates it and drops it, so no further tick reaches it.
//!
//! Dispatch isolates faults: an error returned by `evaluate`, or a panic
//! raised inside it, is logged and the remaining automations still run.

use std::panic::{AssertUnwindSafe, catch_unwind};

use autohub_domain::area::Area;
use autohub_domain::automation::AutomationSnapshot;
use autohub_domain::error::{AutohubError, ConfigurationError, NotFoundError};
use autohub_domain::id::{AreaId, AutomationId};
use autohub_domain::time::Timestamp;

use crate::automation::Automation;

/// Reference to a registered automation, used to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AutomationHandle {
    pub area_id: AreaId,
    pub automation_id: AutomationId,
}

/// Outcome of one dispatch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Automations whose `evaluate` was called.
    pub evaluated: usize,
    /// Of those, how many returned an error or panicked.
    pub failed: usize,
}

impl TickReport {
    pub(crate) fn merge(&mut self, other: Self) {
        self.evaluated += other.evaluated;
        self.failed += other.failed;
    }
}

/// The automations of one [`Area`], in registration order.
pub struct AreaRegistry {
    area: Area,
    automations: Vec<Box<dyn Automation>>,
}

impl AreaRegistry {
    #[must_use]
    pub fn new(area: Area) -> Self {
        Self {
            area,
            automations: Vec::new(),
        }
    }

    #[must_use]
    pub fn area(&self) -> &Area {
        &self.area
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.automations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.automations.is_empty()
    }

    /// Look up a registered automation.
    #[must_use]
    pub fn get(&self, id: AutomationId) -> Option<&dyn Automation> {
        self.automations
            .iter()
            .find(|automation| automation.id() == id)
            .map(|automation| &**automation)
    }

    /// Activate `automation` at `now` and start delivering ticks to it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateAutomation`] when an automation
    /// with the same id is already registered, or a lifecycle error when
    /// `automation` cannot be activated.
    pub fn register(
        &mut self,
        mut automation: Box<dyn Automation>,
        now: Timestamp,
    ) -> Result<AutomationHandle, AutohubError> {
        let id = automation.id();
        if self.get(id).is_some() {
            return Err(ConfigurationError::DuplicateAutomation { id }.into());
        }
        automation.activate(now)?;
        self.automations.push(automation);
        Ok(AutomationHandle {
            area_id: self.area.id,
            automation_id: id,
        })
    }

    /// Deactivate and remove the automation behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when nothing is registered under `handle`.
    pub fn unregister(
        &mut self,
        handle: AutomationHandle,
    ) -> Result<Box<dyn Automation>, AutohubError> {
        let position = self
            .automations
            .iter()
            .position(|automation| automation.id() == handle.automation_id)
            .filter(|_| handle.area_id == self.area.id)
            .ok_or_else(|| NotFoundError {
                entity: "Automation",
                id: handle.automation_id.to_string(),
            })?;
        let mut automation = self.automations.remove(position);
        automation.deactivate();
        Ok(automation)
    }

    /// Evaluate every active automation once, in registration order.
    pub fn dispatch(&mut self, now: Timestamp) -> TickReport {
        let mut report = TickReport::default();
        for automation in &mut self.automations {
            if !automation.lifecycle().is_active() {
                continue;
            }
            report.evaluated += 1;
            match catch_unwind(AssertUnwindSafe(|| automation.evaluate(now))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    report.failed += 1;
                    tracing::warn!(
                        area = %self.area.name,
                        automation_id = %automation.id(),
                        automation = automation.name(),
                        error = %error_chain(&err),
                        "automation evaluation failed"
                    );
                }
                Err(payload) => {
                    report.failed += 1;
                    tracing::warn!(
                        area = %self.area.name,
                        automation_id = %automation.id(),
                        automation = automation.name(),
                        panic = panic_message(payload.as_ref()),
                        "automation panicked during evaluation"
                    );
                }
            }
        }
        report
    }

    #[must_use]
    pub fn snapshots(&self) -> Vec<AutomationSnapshot> {
        self.automations
            .iter()
            .map(|automation| automation.snapshot())
            .collect()
    }
}

/// Render an error followed by each of its sources, `outer: inner: root`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
