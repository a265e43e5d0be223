//! Configuration loading for the influence engine.
//!
//! Settings can be loaded from a TOML file; every field falls back to its
//! default when omitted.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Complete influence engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfluenceConfig {
    /// Propagation and decay parameters
    #[serde(default)]
    pub engine: EngineConfig,
    /// Lost-sight prediction settings
    #[serde(default)]
    pub sight: SightConfig,
}

impl InfluenceConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: InfluenceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects values that would make propagation or decay diverge.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let engine = &self.engine;
        unit_range("engine.momentum", engine.momentum)?;
        unit_range("engine.decay", engine.decay)?;
        if !engine.prune_threshold.is_finite() || engine.prune_threshold < 0.0 {
            return Err(ConfigError::invalid(
                "engine.prune_threshold",
                format!("must be a non-negative number, got {}", engine.prune_threshold),
            ));
        }
        if engine.max_heat_cells == 0 {
            return Err(ConfigError::invalid("engine.max_heat_cells", "must be at least 1"));
        }

        let sight = &self.sight;
        unit_range("sight.direction_bias", sight.direction_bias)?;
        for (field, value) in [
            ("sight.seed_value", sight.seed_value),
            ("sight.player_value", sight.player_value),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a positive number, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

fn unit_range(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be within [0, 1], got {}", value),
        ))
    }
}

/// Propagation and decay parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Blend weight of the neighbor average during diffusion
    pub momentum: f32,
    /// Decay rate per second for static layers, also the per-hop flood falloff
    pub decay: f32,
    /// Entries with a smaller magnitude are dropped
    pub prune_threshold: f32,
    /// Maximum populated vertices a flood may grow a layer to
    pub max_heat_cells: usize,
    /// Clear dynamic layers at the start of every update
    pub clear_dynamic_on_update: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            momentum: 0.3,
            decay: 0.05,
            prune_threshold: 1e-3,
            max_heat_cells: 256,
            clear_dynamic_on_update: false,
        }
    }
}

/// Lost-sight prediction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SightConfig {
    /// Value seeded into the search layer where sight was lost
    pub seed_value: f32,
    /// Value seeded into the player layer when the target is seen
    pub player_value: f32,
    /// Flood depth (hops) for both sight transitions
    pub flood_iterations: usize,
    /// How strongly the search flood favors the last heading (0 = isotropic)
    pub direction_bias: f32,
    /// Keep diffusing the search layer every update while the target is lost
    pub spread_while_lost: bool,
}

impl Default for SightConfig {
    fn default() -> Self {
        Self {
            seed_value: 1.0,
            player_value: 1.0,
            flood_iterations: 6,
            direction_bias: 0.75,
            spread_while_lost: true,
        }
    }
}

/// Returns the default configuration as a TOML string.
pub fn default_config_toml() -> Result<String, ConfigError> {
    InfluenceConfig::default().to_toml()
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Error writing TOML config
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value failed validation
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
