//! Current and best score tracking
//!
//! The best score survives sessions; the simulation itself never sees it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Score display state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Score of the running (or last finished) session
    #[serde(skip)]
    pub current: u32,
    /// Highest score seen across sessions
    pub best: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update from an emitted snapshot
    ///
    /// Returns true when the best score improved.
    pub fn observe(&mut self, state: &GameState) -> bool {
        let Some(score) = state.score() else {
            return false;
        };
        self.current = score;
        if score > self.best {
            self.best = score;
            return true;
        }
        false
    }

    /// Load the best score from a JSON file, starting fresh on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path).map(|json| serde_json::from_str::<Scoreboard>(&json)) {
            Ok(Ok(scoreboard)) => {
                log::info!("Loaded best score {}", scoreboard.best);
                scoreboard
            }
            Ok(Err(e)) => {
                log::warn!("Corrupt scoreboard {}: {}", path.display(), e);
                Self::new()
            }
            Err(_) => {
                log::info!("No scoreboard found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save the best score as JSON; failures are logged
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match serde_json::to_string(self) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => log::info!("Scoreboard saved (best {})", self.best),
                Err(e) => log::warn!("Failed to save scoreboard {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Failed to encode scoreboard: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_is_monotonic() {
        let mut board = Scoreboard::new();
        assert!(board.observe(&GameState::Finished { final_score: 3 }));
        assert_eq!(board, Scoreboard { current: 3, best: 3 });

        assert!(!board.observe(&GameState::Finished { final_score: 1 }));
        assert_eq!(board.current, 1);
        assert_eq!(board.best, 3);
    }

    #[test]
    fn test_not_started_is_ignored() {
        let mut board = Scoreboard { current: 2, best: 5 };
        assert!(!board.observe(&GameState::NotStarted));
        assert_eq!(board, Scoreboard { current: 2, best: 5 });
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("flappy-scoreboard-{}.json", std::process::id()));
        let board = Scoreboard { current: 4, best: 9 };
        board.save(&path);

        let loaded = Scoreboard::load(&path);
        assert_eq!(loaded.best, 9);
        assert_eq!(loaded.current, 0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_corrupt_starts_fresh() {
        let path = std::env::temp_dir().join(format!("flappy-corrupt-{}.json", std::process::id()));
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Scoreboard::load(&path), Scoreboard::new());
        let _ = std::fs::remove_file(&path);
    }
}
