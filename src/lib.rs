//! Flappy Sim - A headless Flappy Bird simulation core
//!
//! Core modules:
//! - `sim`: Session simulation (physics, obstacles, collisions, snapshot stream)
//! - `config`: Data-driven game configuration
//! - `scoreboard`: Current/best score tracking across sessions
//! - `controller`: Tap routing and state publication for a front-end

pub mod config;
pub mod controller;
pub mod scoreboard;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use controller::FlappyController;
pub use scoreboard::Scoreboard;

/// Simulation constants
pub mod consts {
    /// Gravity coefficient of the motion formula `-g·t² + v0·t`
    pub const GRAVITY: f32 = 4.9;
    /// Simulated time added per tick, independent of wall-clock delay
    pub const TICK_TIME_STEP: f32 = 0.05;

    /// Bird rotation while ascending (degrees)
    pub const GOING_UP_ROTATION: f32 = -45.0;
    /// Bird rotation cap while falling (degrees)
    pub const FACING_DOWN_ROTATION: f32 = 90.0;
    /// Rotation gained per unit of elapsed time while falling
    pub const ROTATION_RATE: f32 = 30.0;

    /// Bird defaults
    pub const BIRD_SIZE: f32 = 48.0;
    pub const BIRD_JUMP_VELOCITY: f32 = 2.8;
    pub const FRAME_PERIOD_MS: u64 = 60;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    pub const OBSTACLE_MIN_HEIGHT: u32 = 80;
    pub const OBSTACLE_MAX_HEIGHT: u32 = 200;
    pub const OBSTACLE_HEIGHT_STEP: u32 = 10;
    pub const OBSTACLE_COUNT: usize = 7;
    /// Center-to-center horizontal stagger between consecutive obstacles
    pub const OBSTACLE_SPACING: f32 = 240.0;
    /// Obstacles move `width / OBSTACLE_SPEED_DIVISOR` per tick
    pub const OBSTACLE_SPEED_DIVISOR: f32 = 10.0;

    /// Overlap (per axis) that must be exceeded before boxes collide
    pub const COLLISION_TOLERANCE: f32 = 20.0;
}

/// Convert a vertical bias in `[-1, 1]` to an absolute y within `height`
#[inline]
pub fn bias_to_absolute(bias: f32, extent: f32) -> f32 {
    extent * (bias + 1.0) / 2.0
}

/// Convert an absolute coordinate within `extent` to a bias in `[-1, 1]`
#[inline]
pub fn absolute_to_bias(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    (2.0 * value / extent) - 1.0
}
