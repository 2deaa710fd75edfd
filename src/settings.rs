//! Functions for loading context settings.

use serde::{Deserialize, Serialize};

use crate::capabilities::Limits;
use crate::errors::*;

/// What the cache assumes about the driver state when a context is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialState {
    /// The context is fresh and holds the default state.
    Defaults,
    /// Ask the driver for every tracked value.
    Query,
    /// Assume nothing. The first sync of each group re-sends all of its values.
    Unknown,
}

impl Default for InitialState {
    fn default() -> Self {
        InitialState::Defaults
    }
}

/// A structure containing configuration data for a context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    /// Limits the caches are sized from. Queried from the driver when not set.
    pub limits: Option<Limits>,
    pub initial_state: InitialState,
}

impl ContextSettings {
    /// Loads settings from a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<ContextSettings> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
