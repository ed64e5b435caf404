//! Flappy Bird simulation module
//!
//! All gameplay logic lives here:
//! - Frame-count driven physics (fixed time step per tick)
//! - Seeded RNG only
//! - Stable iteration order (by obstacle index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod game;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use game::{FlappyBirdGame, GameStream};
pub use state::{
    Bird, BirdSnapshot, Bounds, GameState, Obstacle, ObstacleOrientation, ObstacleSnapshot,
    Session,
};
pub use tick::{Termination, advance, displacement, evaluate, snapshot};
