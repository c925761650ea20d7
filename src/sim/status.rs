//! Player status: score, lives and the score multiplier
//!
//! Pure bookkeeping. The high score itself is persisted by the host through
//! [`crate::HighScoreStore`]; [`PlayerStatus::reset`] reports when it changed.

use serde::{Deserialize, Serialize};

pub const STARTING_LIVES: u32 = 4;
pub const MAX_MULTIPLIER: u32 = 20;
/// Seconds a multiplier survives without another scoring event
pub const MULTIPLIER_EXPIRY: f32 = 0.8;
/// Score step between extra lives
pub const EXTRA_LIFE_STEP: u64 = 2000;

/// Scoring side effect produced by a shot entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreEvent {
    /// Base points, multiplied on award
    Points(u32),
    IncreaseMultiplier,
    /// The last life is gone and the ship respawned: start over
    NewGame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub score: u64,
    pub lives: u32,
    pub high_score: u64,
    pub multiplier: u32,
    /// Seconds until the multiplier drops back to 1
    pub multiplier_time_left: f32,
    /// Score at which the next extra life is granted
    pub score_for_extra_life: u64,
}

impl Default for PlayerStatus {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PlayerStatus {
    pub fn new(high_score: u64) -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            high_score,
            multiplier: 1,
            multiplier_time_left: 0.0,
            score_for_extra_life: EXTRA_LIFE_STEP,
        }
    }

    /// Start a new game. Returns the new high score if this run beat it.
    pub fn reset(&mut self) -> Option<u64> {
        let beaten = (self.score > self.high_score).then_some(self.score);
        if let Some(score) = beaten {
            self.high_score = score;
            log::info!("New high score: {}", score);
        }

        self.score = 0;
        self.multiplier = 1;
        self.lives = STARTING_LIVES;
        self.score_for_extra_life = EXTRA_LIFE_STEP;
        self.multiplier_time_left = 0.0;
        beaten
    }

    /// Count the multiplier down; `dt` in seconds
    pub fn update(&mut self, dt: f32) {
        if self.multiplier > 1 {
            self.multiplier_time_left -= dt;
            if self.multiplier_time_left <= 0.0 {
                self.multiplier_time_left = MULTIPLIER_EXPIRY;
                self.reset_multiplier();
            }
        }
    }

    /// Award `base · multiplier` points, granting a life per threshold crossed
    pub fn add_points(&mut self, base: u32) {
        self.score += u64::from(base) * u64::from(self.multiplier);
        while self.score >= self.score_for_extra_life {
            self.score_for_extra_life += EXTRA_LIFE_STEP;
            self.lives += 1;
        }
    }

    pub fn increase_multiplier(&mut self) {
        self.multiplier_time_left = MULTIPLIER_EXPIRY;
        if self.multiplier < MAX_MULTIPLIER {
            self.multiplier += 1;
        }
    }

    pub fn reset_multiplier(&mut self) {
        self.multiplier = 1;
    }

    pub fn remove_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Apply a deferred score event. Points and multiplier bumps are dropped
    /// while the player is dead. Returns a beaten high score on `NewGame`.
    pub fn apply(&mut self, event: ScoreEvent, player_dead: bool) -> Option<u64> {
        match event {
            ScoreEvent::Points(base) if !player_dead => self.add_points(base),
            ScoreEvent::IncreaseMultiplier if !player_dead => self.increase_multiplier(),
            ScoreEvent::NewGame => return self.reset(),
            _ => {}
        }
        None
    }
}
