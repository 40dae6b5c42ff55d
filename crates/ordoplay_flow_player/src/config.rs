// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player configuration.
//!
//! Settings are stored as RON. Every field has a default, so a config file
//! only needs the values it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default tracing filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "ordoplay_flow_player=info,ordoplay_state_flow=debug";

/// Player errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid RON
    #[error("Config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Config values are out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A flow failed validation
    #[error("Flow configuration error: {0}")]
    Flow(#[from] ordoplay_state_flow::ConfigError),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Settings for a player run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Simulation step in seconds
    pub fixed_timestep: f32,
    /// Simulated frame length in seconds
    pub frame_time: f32,
    /// Simulation speed multiplier (1.0 = normal speed)
    pub time_scale: f32,
    /// Most fixed steps run in a single frame
    pub max_steps_per_frame: u32,
    /// Seed for random waits; `None` draws from the OS
    pub seed: Option<u64>,
    /// Stop after this many frames even if flows are still running
    pub max_frames: u64,
    /// Tracing filter directives
    pub log_filter: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            frame_time: 1.0 / 30.0,
            time_scale: 1.0,
            max_steps_per_frame: 8,
            seed: None,
            max_frames: 600,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl PlayerConfig {
    /// Parse from a RON string
    pub fn from_ron(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&source)?;
        tracing::info!("Loaded player config from {}", path.display());
        Ok(config)
    }

    /// Serialize to a pretty RON string
    pub fn to_ron(&self) -> std::result::Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Reject values the clock cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.fixed_timestep.is_finite() || self.fixed_timestep <= 0.0 {
            return Err(PlayerError::InvalidConfig(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if !self.frame_time.is_finite() || self.frame_time < 0.0 {
            return Err(PlayerError::InvalidConfig(format!(
                "frame_time must not be negative, got {}",
                self.frame_time
            )));
        }
        if !self.time_scale.is_finite() {
            return Err(PlayerError::InvalidConfig("time_scale must be finite".to_string()));
        }
        if self.max_steps_per_frame == 0 {
            return Err(PlayerError::InvalidConfig(
                "max_steps_per_frame must be at least 1".to_string(),
            ));
        }
        if self.max_frames == 0 {
            return Err(PlayerError::InvalidConfig("max_frames must be at least 1".to_string()));
        }
        Ok(())
    }
}
