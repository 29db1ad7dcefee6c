//! Area — a logical grouping (room, floor, zone) that automations belong to.

use serde::{Deserialize, Serialize};

use crate::error::{AutohubError, ConfigurationError};
use crate::id::AreaId;

/// A logical grouping such as a room, floor, or zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
}

impl Area {
    /// Create a builder for constructing an [`Area`].
    #[must_use]
    pub fn builder() -> AreaBuilder {
        AreaBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AutohubError::Configuration`] when `name` is empty.
    pub fn validate(&self) -> Result<(), AutohubError> {
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Area`].
#[derive(Debug, Default)]
pub struct AreaBuilder {
    id: Option<AreaId>,
    name: Option<String>,
}

impl AreaBuilder {
    #[must_use]
    pub fn id(mut self, id: AreaId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Consume the builder, validate, and return an [`Area`].
    ///
    /// # Errors
    ///
    /// Returns [`AutohubError::Configuration`] if `name` is missing or empty.
    pub fn build(self) -> Result<Area, AutohubError> {
        let area = Area {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
        };
        area.validate()?;
        Ok(area)
    }
}
