//! Front-end facing controller
//!
//! Maps taps to the simulation (the first tap starts a session, later taps
//! jump), republishes snapshots on a watch channel and keeps the scoreboard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::StreamExt;
use tokio::sync::watch;

use crate::config::{ConfigError, GameConfig};
use crate::scoreboard::Scoreboard;
use crate::sim::{FlappyBirdGame, GameState};

/// Drives a `FlappyBirdGame` on behalf of a UI
pub struct FlappyController {
    game: FlappyBirdGame,
    state: watch::Sender<GameState>,
    scoreboard: Arc<Mutex<Scoreboard>>,
    running: Arc<AtomicBool>,
}

impl FlappyController {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_scoreboard(config, Scoreboard::new())
    }

    /// Controller seeded with a previously saved best score
    pub fn with_scoreboard(
        config: GameConfig,
        scoreboard: Scoreboard,
    ) -> Result<Self, ConfigError> {
        let (state, _) = watch::channel(GameState::NotStarted);
        Ok(Self {
            game: FlappyBirdGame::new(config)?,
            state,
            scoreboard: Arc::new(Mutex::new(scoreboard)),
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn game(&self) -> &FlappyBirdGame {
        &self.game
    }

    pub fn on_bounds_set(&self, width: f32, height: f32) {
        self.game.set_bounds(width, height);
    }

    /// Start a session if none is running, otherwise jump
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_tap(&self) {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.start_game();
        } else {
            self.game.jump();
        }
    }

    /// Snapshots as they are emitted; starts at the latest one
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.state.subscribe()
    }

    pub fn scoreboard(&self) -> Scoreboard {
        *self.scoreboard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn start_game(&self) {
        let mut stream = self.game.start();
        let publisher = self.state.clone();
        let scoreboard = Arc::clone(&self.scoreboard);
        let running = Arc::clone(&self.running);

        tokio::spawn(async move {
            while let Some(state) = stream.next().await {
                let improved = scoreboard
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .observe(&state);
                if improved {
                    log::debug!("New best score {:?}", state.score());
                }
                let terminal = state.is_terminal();
                if terminal {
                    running.store(false, Ordering::Release);
                }
                publisher.send_replace(state);
                if terminal {
                    return;
                }
            }
            // Stream cancelled before a terminal snapshot
            running.store(false, Ordering::Release);
        });
    }
}
