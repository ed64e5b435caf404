//! Fixed timestep simulation tick
//!
//! Physics is frame-count driven: every tick adds `TICK_TIME_STEP` to the
//! motion time regardless of how long the frame actually took.

use super::state::{GameState, Session};
use crate::consts::*;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The bird hit the obstacle with this id
    Collision { obstacle_id: u32 },
    /// The bird's lower edge passed the bottom of the field
    OutOfBounds,
}

/// Vertical displacement `t` time units after a jump (positive is up)
#[inline]
pub fn displacement(time: f32, velocity: f32) -> f32 {
    -GRAVITY * time * time + velocity * time
}

/// Rotation after moving: pinned nose-up while rising, otherwise tipping
/// toward the nose-down cap
#[inline]
pub fn next_rotation(rotation: f32, time: f32, ascending: bool) -> f32 {
    if ascending {
        GOING_UP_ROTATION
    } else {
        (rotation + time * ROTATION_RATE).min(FACING_DOWN_ROTATION)
    }
}

/// Check terminal conditions against the current state
pub fn evaluate(session: &Session) -> Option<Termination> {
    let bounds = &session.bounds;
    let bird_box = session.bird.aabb(bounds);
    let tolerance = session.config.collision_tolerance;

    if let Some(obstacle) = session
        .obstacles
        .iter()
        .find(|o| o.aabb().collides_with(&bird_box, tolerance))
    {
        return Some(Termination::Collision {
            obstacle_id: obstacle.id,
        });
    }

    if session.bird.lower_edge(bounds) > bounds.height {
        return Some(Termination::OutOfBounds);
    }

    None
}

/// Snapshot for the current state: `Finished` when terminal, else `Playing`
pub fn snapshot(session: &Session) -> (GameState, Option<Termination>) {
    match evaluate(session) {
        Some(reason) => (
            GameState::Finished {
                final_score: session.score,
            },
            Some(reason),
        ),
        None => (session.playing_snapshot(), None),
    }
}

/// Advance the session by one tick
pub fn advance(session: &mut Session) {
    session.ticks += 1;
    move_bird(session);
    move_obstacles(session);
}

fn move_bird(session: &mut Session) {
    let velocity = session.config.jump_velocity;
    let bird = &mut session.bird;

    bird.time += TICK_TIME_STEP;
    let new_bias = bird.initial_bias - displacement(bird.time, velocity);
    bird.rotation = next_rotation(bird.rotation, bird.time, new_bias < bird.bias);
    bird.bias = new_bias;
}

fn move_obstacles(session: &mut Session) {
    let step = session.config.obstacle_step();
    let mid_x = session.bounds.mid_x();

    for obstacle in &mut session.obstacles {
        let before = obstacle.right_edge();
        obstacle.center.x -= step;
        if before >= mid_x && obstacle.right_edge() < mid_x {
            session.score += 1;
            log::debug!("Obstacle {} passed, score {}", obstacle.id, session.score);
        }
    }

    for index in 0..session.obstacles.len() {
        if session.obstacles[index].right_edge() >= 0.0 {
            continue;
        }
        // Never re-enter inside the field, even when the field is wider than the set
        let entry_x = session.bounds.width + session.config.obstacle_width / 2.0;
        let x = session
            .rightmost_except(index)
            .map_or(entry_x, |x| (x + session.config.obstacle_spacing).max(entry_x));

        let Session {
            obstacles,
            config,
            bounds,
            rng,
            ..
        } = session;
        let obstacle = &mut obstacles[index];
        obstacle.center.x = x;
        obstacle.reroll(config, bounds, rng);
        log::debug!("Recycled obstacle {} to x={:.1}", obstacle.id, x);
    }
}
