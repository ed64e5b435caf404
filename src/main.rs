//! Flappy Sim entry point
//!
//! Runs a few headless sessions with a simple autopilot and reports scores.
//!
//! Usage: `flappy-sim [config.json]`
//! - `FLAPPY_SEED`: override the obstacle seed
//! - `FLAPPY_SCOREBOARD`: JSON file holding the best score between runs
//! - `RUST_LOG=debug`: log every snapshot

use anyhow::{Context, Result};

use flappy_sim::sim::GameState;
use flappy_sim::{FlappyController, GameConfig, Scoreboard};

const FIELD_WIDTH: f32 = 400.0;
const FIELD_HEIGHT: f32 = 800.0;
const SESSIONS: u32 = 3;
/// Autopilot stops flapping after this many snapshots
const AUTOPILOT_TICKS: u32 = 200;
/// Autopilot flaps once the bird sinks below this bias
const AUTOPILOT_FLAP_BIAS: f32 = 0.25;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    log::info!("Flappy Sim starting...");

    let mut config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path).with_context(|| format!("loading config {path}"))?,
        None => GameConfig::default(),
    };
    if let Ok(seed) = std::env::var("FLAPPY_SEED") {
        config.seed = Some(seed.parse().context("FLAPPY_SEED must be an unsigned integer")?);
    }

    let scoreboard_path = std::env::var("FLAPPY_SCOREBOARD").ok();
    let scoreboard = scoreboard_path
        .as_deref()
        .map(Scoreboard::load)
        .unwrap_or_default();

    let controller = FlappyController::with_scoreboard(config, scoreboard)?;
    controller.on_bounds_set(FIELD_WIDTH, FIELD_HEIGHT);
    let mut states = controller.subscribe();

    for session in 1..=SESSIONS {
        controller.on_tap();
        let mut ticks = 0u32;

        loop {
            states.changed().await.context("simulation stopped publishing")?;
            let state = states.borrow_and_update().clone();
            log::debug!("{}", serde_json::to_string(&state)?);

            match state {
                GameState::Playing { bird, .. } => {
                    ticks += 1;
                    if ticks < AUTOPILOT_TICKS && bird.vertical_bias > AUTOPILOT_FLAP_BIAS {
                        controller.on_tap();
                    }
                }
                GameState::Finished { final_score } => {
                    println!("Session {session}: score {final_score} after {ticks} ticks");
                    break;
                }
                GameState::NotStarted => {
                    println!("Session {session}: bounds not set");
                    break;
                }
            }
        }
    }

    let board = controller.scoreboard();
    println!("Best score: {}", board.best);
    if let Some(path) = scoreboard_path {
        board.save(path);
    }
    Ok(())
}
