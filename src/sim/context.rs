//! Per-tick context
//!
//! Everything an entity may read while it updates: time, screen bounds,
//! player input and a read-only view of the player. Built once per frame and
//! shared immutably with every parallel worker.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::random::mix_seed;
use crate::Rect;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Movement direction, length at most 1
    pub movement: Vec2,
    /// Aim direction, unit length or zero when not firing
    pub aim: Vec2,
    /// Pause toggle (edge-triggered)
    pub pause: bool,
}

/// What other entities are allowed to know about the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub position: Vec2,
    pub is_dead: bool,
    /// No lives left (the next respawn restarts the game)
    pub game_over: bool,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            is_dead: true,
            game_over: false,
        }
    }
}

/// Immutable per-frame environment
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    /// Frame counter, starts at 1 on the first tick
    pub frame: u64,
    /// Seconds since the previous tick
    pub dt: f32,
    /// Seconds of unpaused play
    pub total_time: f64,
    pub bounds: Rect,
    pub seed: u64,
    pub input: TickInput,
    pub player: PlayerView,
}

impl TickContext {
    /// Context for frame `frame` with everything else at rest
    pub fn new(frame: u64, bounds: Rect, seed: u64) -> Self {
        Self {
            frame,
            dt: crate::consts::FRAME_DT,
            total_time: frame as f64 * crate::consts::FRAME_DT as f64,
            bounds,
            seed,
            input: TickInput::default(),
            player: PlayerView::default(),
        }
    }

    #[inline]
    pub fn screen_size(&self) -> Vec2 {
        self.bounds.size
    }

    /// Whole milliseconds into the current second of play
    pub fn millis_of_second(&self) -> u32 {
        ((self.total_time * 1000.0) as u64 % 1000) as u32
    }

    /// Private RNG for one worker this frame; `salt` is usually an entity id
    pub fn rng_for(&self, salt: u64) -> Pcg32 {
        Pcg32::seed_from_u64(mix_seed(self.seed, self.frame, salt))
    }

    /// Same context with a refreshed player view
    pub fn with_player(mut self, player: PlayerView) -> Self {
        self.player = player;
        self
    }
}
