//! High score storage
//!
//! Exactly one integer survives between runs. It is read once at startup and
//! written whenever a finished game beats it.

use std::path::PathBuf;

use crate::persistence::{self, PersistenceError};

/// Default file name, relative to the working directory
pub const HIGH_SCORE_FILE: &str = "highscore.txt";

/// Persistent home for the best score
pub trait HighScoreStore {
    /// Stored score, or 0 when nothing usable is stored
    fn load(&self) -> u64;

    fn save(&mut self, score: u64) -> Result<(), PersistenceError>;
}

/// High score kept in a plain text file
#[derive(Debug, Clone)]
pub struct FileHighScore {
    path: PathBuf,
}

impl Default for FileHighScore {
    fn default() -> Self {
        Self::new(HIGH_SCORE_FILE)
    }
}

impl FileHighScore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for FileHighScore {
    fn load(&self) -> u64 {
        match persistence::read_u64(&self.path) {
            Ok(score) => {
                log::info!("Loaded high score {}", score);
                score
            }
            Err(PersistenceError::Io { .. }) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring unreadable high score: {}", e);
                0
            }
        }
    }

    fn save(&mut self, score: u64) -> Result<(), PersistenceError> {
        persistence::write_u64(&self.path, score)?;
        log::info!("High score saved ({})", score);
        Ok(())
    }
}

/// In-memory store for tests and sessions without a writable disk
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScore {
    pub score: u64,
    pub saves: u32,
}

impl HighScoreStore for MemoryHighScore {
    fn load(&self) -> u64 {
        self.score
    }

    fn save(&mut self, score: u64) -> Result<(), PersistenceError> {
        self.score = score;
        self.saves += 1;
        Ok(())
    }
}
