//! Session driver
//!
//! `FlappyBirdGame` owns the shared simulation state and runs one tick loop
//! per session as a Tokio task. Snapshots reach the consumer through a
//! `GameStream`; dropping the stream or starting a new session cancels the loop.
//!
//! Every mutation (tick advance, jump, session reset) happens while holding the
//! same lock, and the lock is never held across an `.await`.

use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::Stream;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use super::state::{Bounds, GameState, Session};
use super::tick;
use crate::config::{ConfigError, GameConfig};

/// State shared between the game handle, the tick loop and jump callers
struct Shared {
    bounds: Option<Bounds>,
    session: Option<Session>,
    /// Draws one seed per session
    rng: Pcg32,
    /// Bumped on every `start`; loops from older generations stop
    generation: u64,
    running: Option<AbortHandle>,
}

impl Shared {
    /// Stop the active loop and discard its session
    fn cancel(&mut self) {
        if let Some(handle) = self.running.take() {
            handle.abort();
        }
        self.session = None;
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    // Every critical section leaves the state consistent
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Flappy Bird simulation
#[derive(Clone)]
pub struct FlappyBirdGame {
    config: Arc<GameConfig>,
    shared: Arc<Mutex<Shared>>,
}

impl FlappyBirdGame {
    /// Create a game; obstacle layouts are seeded from `config.seed` when set
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!("Game created with seed: {}", seed);
        Self {
            config: Arc::new(config),
            shared: Arc::new(Mutex::new(Shared {
                bounds: None,
                session: None,
                rng: Pcg32::seed_from_u64(seed),
                generation: 0,
                running: None,
            })),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Record the play-field extent used by the next session
    pub fn set_bounds(&self, width: f32, height: f32) {
        let bounds = Bounds::new(width, height);
        if bounds.is_none() {
            log::warn!("Ignoring invalid bounds {}x{}", width, height);
        }
        lock(&self.shared).bounds = bounds;
    }

    pub fn bounds(&self) -> Option<Bounds> {
        lock(&self.shared).bounds
    }

    /// Whether a session is currently being played
    pub fn is_active(&self) -> bool {
        lock(&self.shared).session.is_some()
    }

    /// Start a new session, cancelling any session still running
    ///
    /// Yields `NotStarted` once when bounds were never set. Otherwise yields a
    /// `Playing` snapshot every frame period and ends with `Finished`.
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) -> GameStream {
        let (tx, rx) = mpsc::channel(1);
        let generation = {
            let mut shared = lock(&self.shared);
            shared.cancel();
            shared.generation += 1;
            let generation = shared.generation;

            match shared.bounds {
                None => {
                    log::warn!("Bounds not set, game not started");
                    // Capacity 1 and a fresh channel: cannot be full
                    let _ = tx.try_send(GameState::NotStarted);
                }
                Some(bounds) => {
                    let seed: u64 = shared.rng.random();
                    shared.session = Some(Session::new(&self.config, bounds, seed));
                    log::info!(
                        "Session {} started ({}x{}, seed {})",
                        generation,
                        bounds.width,
                        bounds.height,
                        seed
                    );

                    let task = tokio::spawn(run_session(
                        Arc::clone(&self.shared),
                        generation,
                        self.config.frame_period(),
                        tx,
                    ));
                    shared.running = Some(task.abort_handle());
                }
            }
            generation
        };

        // Built after the lock is released: its `Drop` takes the same lock
        GameStream {
            rx,
            shared: Arc::clone(&self.shared),
            generation,
        }
    }

    /// Restart the bird's motion from its current position, facing up
    ///
    /// Ignored when no session is active.
    pub fn jump(&self) {
        match lock(&self.shared).session.as_mut() {
            Some(session) => session.bird.jump(),
            None => log::trace!("Jump ignored, no active session"),
        }
    }
}

/// Tick loop for one session
async fn run_session(
    shared: Arc<Mutex<Shared>>,
    generation: u64,
    frame_period: Duration,
    tx: mpsc::Sender<GameState>,
) {
    loop {
        let state = {
            let mut guard = lock(&shared);
            if guard.generation != generation {
                return;
            }
            let Some(session) = guard.session.as_ref() else {
                return;
            };
            let (state, reason) = tick::snapshot(session);
            if let Some(reason) = reason {
                log::info!(
                    "Session {} finished after {} ticks: {:?}, score {}",
                    generation,
                    session.ticks,
                    reason,
                    session.score
                );
                guard.session = None;
                guard.running = None;
            }
            state
        };

        let terminal = state.is_terminal();
        if tx.send(state).await.is_err() {
            log::debug!("Session {} consumer gone", generation);
            let mut guard = lock(&shared);
            if guard.generation == generation {
                guard.session = None;
                guard.running = None;
            }
            return;
        }
        if terminal {
            return;
        }

        tokio::time::sleep(frame_period).await;

        let mut guard = lock(&shared);
        if guard.generation != generation {
            return;
        }
        match guard.session.as_mut() {
            Some(session) => {
                tick::advance(session);
                log::trace!("Session {} tick {}", generation, session.ticks);
            }
            None => return,
        }
    }
}

/// Time-paced stream of snapshots for one session
///
/// Dropping the stream stops its session.
pub struct GameStream {
    rx: mpsc::Receiver<GameState>,
    shared: Arc<Mutex<Shared>>,
    generation: u64,
}

impl Stream for GameStream {
    type Item = GameState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for GameStream {
    fn drop(&mut self) {
        let mut shared = lock(&self.shared);
        if shared.generation == self.generation {
            shared.cancel();
        }
    }
}
