//! Game configuration
//!
//! Fixed for the lifetime of a `FlappyBirdGame`. Loaded from JSON; missing
//! fields fall back to the defaults in `consts`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
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

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Bird ===
    /// Bird edge length
    pub bird_size: f32,
    /// Initial upward velocity impulse applied on each jump
    pub jump_velocity: f32,

    // === Timing ===
    /// Wall-clock delay between ticks (milliseconds)
    pub frame_period_ms: u64,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub obstacle_min_height: u32,
    pub obstacle_max_height: u32,
    /// Heights are sampled from the range in multiples of this step
    pub obstacle_height_step: u32,
    /// Size of the rolling obstacle set
    pub obstacle_count: usize,
    /// Center-to-center stagger between consecutive obstacles
    pub obstacle_spacing: f32,
    /// Per-tick horizontal motion is `obstacle_width / obstacle_speed_divisor`
    pub obstacle_speed_divisor: f32,

    // === Collisions ===
    pub collision_tolerance: f32,

    /// Seed for obstacle layout (random when absent)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bird_size: BIRD_SIZE,
            jump_velocity: BIRD_JUMP_VELOCITY,

            frame_period_ms: FRAME_PERIOD_MS,

            obstacle_width: OBSTACLE_WIDTH,
            obstacle_min_height: OBSTACLE_MIN_HEIGHT,
            obstacle_max_height: OBSTACLE_MAX_HEIGHT,
            obstacle_height_step: OBSTACLE_HEIGHT_STEP,
            obstacle_count: OBSTACLE_COUNT,
            obstacle_spacing: OBSTACLE_SPACING,
            obstacle_speed_divisor: OBSTACLE_SPEED_DIVISOR,

            collision_tolerance: COLLISION_TOLERANCE,

            seed: None,
        }
    }
}

impl GameConfig {
    /// Delay between ticks
    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_period_ms)
    }

    /// Horizontal distance every obstacle travels per tick
    pub fn obstacle_step(&self) -> f32 {
        self.obstacle_width / self.obstacle_speed_divisor
    }

    /// Check that the configuration describes a playable game
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
            }
        }

        positive("bird_size", self.bird_size)?;
        positive("jump_velocity", self.jump_velocity)?;
        positive("obstacle_width", self.obstacle_width)?;
        positive("obstacle_speed_divisor", self.obstacle_speed_divisor)?;

        if !self.collision_tolerance.is_finite() || self.collision_tolerance < 0.0 {
            return Err(ConfigError::invalid(
                "collision_tolerance",
                "must be zero or positive",
            ));
        }
        if self.frame_period_ms == 0 {
            return Err(ConfigError::invalid("frame_period_ms", "must be non-zero"));
        }
        if self.obstacle_count == 0 {
            return Err(ConfigError::invalid("obstacle_count", "must be non-zero"));
        }
        if self.obstacle_height_step == 0 {
            return Err(ConfigError::invalid("obstacle_height_step", "must be non-zero"));
        }
        if self.obstacle_min_height == 0 || self.obstacle_min_height > self.obstacle_max_height {
            return Err(ConfigError::invalid(
                "obstacle_min_height",
                format!(
                    "range {}..={} is empty",
                    self.obstacle_min_height, self.obstacle_max_height
                ),
            ));
        }
        if self.obstacle_spacing.is_nan() || self.obstacle_spacing < self.obstacle_width {
            return Err(ConfigError::invalid(
                "obstacle_spacing",
                "must be at least the obstacle width",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a configuration file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default config ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }
}
