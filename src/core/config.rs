//! Squad gating configuration
//!
//! The names of the custom parameters and the activation threshold are
//! collected here. Everything else about a squad is authored per unit in
//! the level editor.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, SquadError};

/// Configuration for squad gating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SquadConfig {
    /// Custom parameter holding the unit's squad number
    ///
    /// Only integer values count. A missing or non-integer value leaves the
    /// unit outside every squad.
    pub squad_id_key: String,

    /// Custom parameter set to `true` once the unit has been activated
    ///
    /// Anything other than a boolean `true` reads as "not activated".
    pub active_key: String,

    /// Number of members that must have an attack opportunity before the
    /// squad moves
    ///
    /// Capped by the size of the eligible set, so a squad down to its last
    /// member only needs that member to qualify. Must be at least 2: a lone
    /// straggler cannot be baited out while a partner still waits behind.
    pub group_threshold: usize,
}

impl Default for SquadConfig {
    fn default() -> Self {
        Self {
            squad_id_key: "GroupApproachId".to_string(),
            active_key: "isGroupApproachActive".to_string(),
            group_threshold: 2,
        }
    }
}

impl SquadConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Qualifying members required for an eligible set of `eligible` units
    pub fn required_qualifying(&self, eligible: usize) -> usize {
        self.group_threshold.min(eligible)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.group_threshold < 2 {
            return Err(SquadError::InvalidConfig(format!(
                "group_threshold must be at least 2, got {}",
                self.group_threshold
            )));
        }

        if self.squad_id_key.trim().is_empty() || self.active_key.trim().is_empty() {
            return Err(SquadError::InvalidConfig(
                "custom parameter keys must not be empty".into(),
            ));
        }

        // The activation marker would overwrite the squad number
        if self.squad_id_key == self.active_key {
            return Err(SquadError::InvalidConfig(format!(
                "squad_id_key and active_key are both '{}'",
                self.squad_id_key
            )));
        }

        Ok(())
    }
}

/// Load and validate a squad configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<SquadConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config: SquadConfig = toml::from_str(&contents)?;
    config.validate()?;
    tracing::debug!(
        "Loaded squad config from {:?} (threshold {})",
        path,
        config.group_threshold
    );
    Ok(config)
}
