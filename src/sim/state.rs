//! Session state and emitted snapshots
//!
//! `Session` is the mutable state of one play-through and is owned by the
//! simulation. `GameState` is the immutable snapshot handed to consumers.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::config::GameConfig;
use crate::consts::*;
use crate::{absolute_to_bias, bias_to_absolute};

/// Play-field extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Bounds with positive, finite extents; `None` otherwise
    pub fn new(width: f32, height: f32) -> Option<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }

    pub fn mid_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn mid_y(&self) -> f32 {
        self.height / 2.0
    }
}

/// Which edge of the field an obstacle is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleOrientation {
    /// Hangs from the top edge
    Top,
    /// Stands on the bottom edge
    Bottom,
}

/// The player's bird
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub size: f32,
    /// Absolute horizontal center, fixed for the session
    pub center_x: f32,
    /// Vertical position as a bias in `[-1, 1]` (top to bottom)
    pub bias: f32,
    /// Rotation in degrees
    pub rotation: f32,
    /// Time since the motion origin (last jump)
    pub time: f32,
    /// Bias at the motion origin
    pub initial_bias: f32,
}

impl Bird {
    /// A bird at the vertical center of the field, already jumping
    pub fn new(size: f32, bounds: &Bounds) -> Self {
        let mut bird = Self {
            size,
            center_x: bounds.mid_x(),
            bias: 0.0,
            rotation: 0.0,
            time: 0.0,
            initial_bias: 0.0,
        };
        bird.jump();
        bird
    }

    /// Move the motion origin to the current position and face upward
    pub fn jump(&mut self) {
        self.time = 0.0;
        self.initial_bias = self.bias;
        self.rotation = GOING_UP_ROTATION;
    }

    pub fn center(&self, bounds: &Bounds) -> Vec2 {
        Vec2::new(self.center_x, bias_to_absolute(self.bias, bounds.height))
    }

    pub fn aabb(&self, bounds: &Bounds) -> Aabb {
        Aabb::new(self.center(bounds), Vec2::splat(self.size))
    }

    pub fn lower_edge(&self, bounds: &Bounds) -> f32 {
        self.center(bounds).y + self.size / 2.0
    }

    pub fn snapshot(&self, bounds: &Bounds) -> BirdSnapshot {
        BirdSnapshot {
            size: self.size,
            center: self.center(bounds),
            vertical_bias: self.bias,
            rotation: self.rotation,
        }
    }
}

/// An obstacle in the rolling set
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub width: f32,
    pub height: f32,
    pub center: Vec2,
}

impl Obstacle {
    /// Spawn an obstacle centered at `center_x` with a random height and edge
    pub fn spawn(
        id: u32,
        center_x: f32,
        config: &GameConfig,
        bounds: &Bounds,
        rng: &mut impl Rng,
    ) -> Self {
        let mut obstacle = Self {
            id,
            width: config.obstacle_width,
            height: 0.0,
            center: Vec2::new(center_x, 0.0),
        };
        obstacle.reroll(config, bounds, rng);
        obstacle
    }

    /// Sample a new height and attach to a random edge, keeping `center.x`
    pub fn reroll(&mut self, config: &GameConfig, bounds: &Bounds, rng: &mut impl Rng) {
        let step = config.obstacle_height_step;
        let steps = (config.obstacle_max_height - config.obstacle_min_height) / step;
        let height = config.obstacle_min_height + rng.random_range(0..=steps) * step;
        self.height = height as f32;
        self.center.y = if rng.random_bool(0.5) {
            self.height / 2.0
        } else {
            bounds.height - self.height / 2.0
        };
    }

    pub fn left_edge(&self) -> f32 {
        self.center.x - self.width / 2.0
    }

    /// Trailing edge when scrolling left
    pub fn right_edge(&self) -> f32 {
        self.center.x + self.width / 2.0
    }

    pub fn orientation(&self, bounds: &Bounds) -> ObstacleOrientation {
        if self.center.y < bounds.mid_y() {
            ObstacleOrientation::Top
        } else {
            ObstacleOrientation::Bottom
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.center, Vec2::new(self.width, self.height))
    }

    /// Whether any part of the obstacle is inside the field horizontally
    pub fn is_visible(&self, bounds: &Bounds) -> bool {
        self.right_edge() > 0.0 && self.left_edge() < bounds.width
    }

    pub fn snapshot(&self, bounds: &Bounds) -> ObstacleSnapshot {
        ObstacleSnapshot {
            width: self.width,
            height: self.height,
            center: self.center,
            orientation: self.orientation(bounds),
            horizontal_bias: absolute_to_bias(self.center.x, bounds.width),
            vertical_bias: absolute_to_bias(self.center.y, bounds.height),
        }
    }
}

/// Mutable state of a single play session
#[derive(Debug, Clone)]
pub struct Session {
    pub config: GameConfig,
    pub bounds: Bounds,
    pub bird: Bird,
    /// Rolling obstacle set; its length never changes during a session
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Ticks advanced since the session started
    pub ticks: u64,
    pub rng: Pcg32,
}

impl Session {
    /// Initialize a session: bird at the center, obstacles staggered past the right edge
    pub fn new(config: &GameConfig, bounds: Bounds, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let first_x = bounds.width + config.obstacle_width / 2.0;
        let obstacles = (0..config.obstacle_count)
            .map(|i| {
                let x = first_x + i as f32 * config.obstacle_spacing;
                Obstacle::spawn(i as u32, x, config, &bounds, &mut rng)
            })
            .collect();

        Self {
            config: config.clone(),
            bounds,
            bird: Bird::new(config.bird_size, &bounds),
            obstacles,
            score: 0,
            ticks: 0,
            rng,
        }
    }

    /// Center x of the rightmost obstacle other than `index`
    pub fn rightmost_except(&self, index: usize) -> Option<f32> {
        self.obstacles
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, o)| o.center.x)
            .reduce(f32::max)
    }

    /// Snapshot of the session while it is still being played
    pub fn playing_snapshot(&self) -> GameState {
        GameState::Playing {
            bird: self.bird.snapshot(&self.bounds),
            obstacles: self
                .obstacles
                .iter()
                .filter(|o| o.is_visible(&self.bounds))
                .map(|o| o.snapshot(&self.bounds))
                .collect(),
            score: self.score,
        }
    }
}

/// Bird as seen by a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirdSnapshot {
    pub size: f32,
    /// Absolute center within the field
    pub center: Vec2,
    pub vertical_bias: f32,
    /// Degrees, negative is nose-up
    pub rotation: f32,
}

/// Obstacle as seen by a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub width: f32,
    pub height: f32,
    pub center: Vec2,
    pub orientation: ObstacleOrientation,
    pub horizontal_bias: f32,
    pub vertical_bias: f32,
}

/// Snapshot emitted once per tick
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Bounds were never set; no session ran
    #[default]
    NotStarted,
    /// Session in progress
    Playing {
        bird: BirdSnapshot,
        obstacles: Vec<ObstacleSnapshot>,
        score: u32,
    },
    /// Session ended by a collision or the bird leaving the field
    Finished { final_score: u32 },
}

impl GameState {
    /// Current or final score, if a session ran
    pub fn score(&self) -> Option<u32> {
        match self {
            GameState::NotStarted => None,
            GameState::Playing { score, .. } => Some(*score),
            GameState::Finished { final_score } => Some(*final_score),
        }
    }

    /// True for the last element of a stream
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameState::Playing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(400.0, 1000.0).unwrap()
    }

    #[test]
    fn test_bounds_validation() {
        assert!(Bounds::new(0.0, 100.0).is_none());
        assert!(Bounds::new(100.0, -1.0).is_none());
        assert!(Bounds::new(f32::NAN, 100.0).is_none());
        assert!(Bounds::new(1.0, 1.0).is_some());
    }

    #[test]
    fn test_session_initial_layout() {
        let config = GameConfig::default();
        let session = Session::new(&config, bounds(), 7);

        assert_eq!(session.obstacles.len(), OBSTACLE_COUNT);
        assert_eq!(session.score, 0);
        assert_eq!(session.bird.center_x, 200.0);
        assert_eq!(session.bird.bias, 0.0);
        assert_eq!(session.bird.center(&session.bounds).y, 500.0);
        assert_eq!(session.bird.rotation, GOING_UP_ROTATION);

        for (i, obstacle) in session.obstacles.iter().enumerate() {
            let expected_x = 440.0 + i as f32 * OBSTACLE_SPACING;
            assert_eq!(obstacle.center.x, expected_x);
            assert!(obstacle.left_edge() >= session.bounds.width);
        }
    }

    #[test]
    fn test_obstacle_heights_and_edges() {
        let config = GameConfig {
            obstacle_count: 50,
            ..Default::default()
        };
        let b = bounds();
        let session = Session::new(&config, b, 99);

        for obstacle in &session.obstacles {
            let h = obstacle.height as u32;
            assert!((80..=200).contains(&h));
            assert_eq!(h % 10, 0);

            match obstacle.orientation(&b) {
                ObstacleOrientation::Top => assert_eq!(obstacle.center.y, obstacle.height / 2.0),
                ObstacleOrientation::Bottom => {
                    assert_eq!(obstacle.center.y, b.height - obstacle.height / 2.0)
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let config = GameConfig::default();
        let a = Session::new(&config, bounds(), 1234);
        let b = Session::new(&config, bounds(), 1234);
        assert_eq!(a.obstacles, b.obstacles);
    }

    #[test]
    fn test_initial_snapshot_hides_offscreen_obstacles() {
        let session = Session::new(&GameConfig::default(), bounds(), 3);
        match session.playing_snapshot() {
            GameState::Playing { obstacles, score, bird } => {
                assert!(obstacles.is_empty());
                assert_eq!(score, 0);
                assert_eq!(bird.center, Vec2::new(200.0, 500.0));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_game_state_score() {
        assert_eq!(GameState::NotStarted.score(), None);
        assert_eq!(GameState::Finished { final_score: 4 }.score(), Some(4));
        assert!(GameState::NotStarted.is_terminal());
        assert!(GameState::Finished { final_score: 0 }.is_terminal());
    }
}
