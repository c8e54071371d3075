//! Game configuration.
//!
//! A [`GameConfig`] is a plain serde struct. Every field has a default, so a
//! JSON file only needs to list what it changes.

use std::path::{Path, PathBuf};

use parkour_physics::{MovementConfig, ParkourConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Mouse sensitivity.
    pub mouse_sensitivity: f32,

    /// Base walking/falling physics.
    pub movement: MovementConfig,

    /// Ledge and vault detection plus traversal tuning.
    pub parkour: ParkourConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            mouse_sensitivity: 2.0,
            movement: MovementConfig::default(),
            parkour: ParkourConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the movement code cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(invalid("tick_rate must be positive"));
        }

        let detector = &self.parkour.detector;
        if detector.min_ledge_height > detector.max_ledge_height {
            return Err(invalid(format!(
                "ledge height band is inverted ({} > {})",
                detector.min_ledge_height, detector.max_ledge_height
            )));
        }
        if detector.vault_obstacle_height_min > detector.vault_obstacle_height_max {
            return Err(invalid(format!(
                "vault height band is inverted ({} > {})",
                detector.vault_obstacle_height_min, detector.vault_obstacle_height_max
            )));
        }

        let traversal = &self.parkour.traversal;
        let durations = [
            ("approach_time", traversal.approach_time),
            ("grab_time", traversal.grab_time),
            ("pull_up_time", traversal.pull_up_time),
            ("vault_time", traversal.vault_time),
        ];
        for (name, value) in durations {
            if !(value > 0.0) {
                return Err(invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        Ok(())
    }

    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}
