//! Session configuration.

use crate::model::ConsoleModel;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Per-console session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Console model identifier (`CL/QL`, `TF`, `PM`, `DM3`, `DM7`).
    pub model: String,
    /// Interval requested from the console with `mtrstart`.
    pub meter_interval_ms: u32,
    /// Ticks an in-flight `get` may wait before it is re-sent (and, the second time, dropped).
    pub get_timeout_ticks: u32,
    /// Rotations a `set` may spend waiting for a current value before it is dropped.
    pub max_resolve_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: ConsoleModel::ClQl.identifier().to_string(),
            meter_interval_ms: 100,
            get_timeout_ticks: 50,
            max_resolve_attempts: 8,
        }
    }
}

impl SessionConfig {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// The configured console model.
    pub fn console_model(&self) -> Result<ConsoleModel> {
        ConsoleModel::from_identifier(&self.model)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown console model '{}'", self.model)))
    }

    pub fn validate(&self) -> Result<()> {
        self.console_model()?;
        if !(10..=10_000).contains(&self.meter_interval_ms) {
            return Err(Error::InvalidConfig(format!(
                "meter_interval_ms {} out of range (10-10000)",
                self.meter_interval_ms
            )));
        }
        if self.get_timeout_ticks == 0 {
            return Err(Error::InvalidConfig(
                "get_timeout_ticks must be at least 1".to_string(),
            ));
        }
        if self.max_resolve_attempts == 0 {
            return Err(Error::InvalidConfig(
                "max_resolve_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
