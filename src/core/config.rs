//! Simulation configuration with documented constants
//!
//! All gameplay numbers are collected here. The config is an owned value
//! handed to the board and turn protocol; there is no process-wide copy.
//! Board dimensions belong to the scenario, not to this file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Configuration for the simulation rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    // === HEALTH ===
    /// Health ceiling applied when eating a resource
    pub max_health: i32,

    /// Health restored by consuming one resource
    pub resource_heal: i32,

    /// Health removed each time a pursuer lands a hit
    ///
    /// There is no floor: repeated hits push health negative.
    pub pursuer_damage: i32,

    /// Whether a pursuer stepping onto a resource eats it
    ///
    /// When false, resources block pursuers like obstacles do.
    pub pursuers_consume_resources: bool,

    // === DECISION MAKER ===
    /// Upper bound on one decision round-trip, in seconds
    pub decision_timeout_secs: u64,

    /// Sampling temperature passed to the language model
    pub llm_temperature: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            resource_heal: 20,
            pursuer_damage: 30,
            pursuers_consume_resources: false,

            decision_timeout_secs: 30,
            llm_temperature: 0.4,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_health <= 0 {
            return Err(SimError::Config("max_health must be positive".into()));
        }

        if self.resource_heal <= 0 || self.pursuer_damage <= 0 {
            return Err(SimError::Config(
                "resource_heal and pursuer_damage must be positive".into(),
            ));
        }

        if self.decision_timeout_secs == 0 {
            return Err(SimError::Config("decision_timeout_secs must be non-zero".into()));
        }

        Ok(())
    }
}
