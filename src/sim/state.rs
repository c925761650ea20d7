//! Game state
//!
//! Everything one running game owns: the entity manager, the particle pool,
//! the spring grid, player status and the spawner, plus the events the host
//! still has to act on.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::entity_manager::EntityManager;
use super::grid::Grid;
use super::particles::ParticlePool;
use super::spawner::EnemySpawner;
use super::status::PlayerStatus;
use crate::Rect;
use crate::audio::SoundEvent;
use crate::renderer::DrawSink;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Nothing advances until unpaused
    Paused,
}

/// Something the host should react to (play, persist, show)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEvent),
    /// The ship touched an enemy or a black hole
    PlayerKilled,
    /// A finished game beat the stored high score; persist this value
    NewHighScore(u64),
}

#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Frames simulated so far (paused frames excluded)
    pub frame: u64,
    /// Seconds of unpaused play
    pub time: f64,
    pub phase: GamePhase,
    pub bounds: Rect,
    pub status: PlayerStatus,
    pub entities: EntityManager,
    pub spawner: EnemySpawner,
    pub particles: ParticlePool,
    pub grid: Grid,
    /// Undrained host events, oldest first
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh game with the player ship at the center of the screen
    pub fn new(settings: &Settings, high_score: u64) -> Self {
        let seed = settings.seed.unwrap_or_else(time_seed);
        let bounds = Rect::from_size(settings.screen_size());

        let mut entities = EntityManager::new();
        entities.add(Entity::player(bounds));

        let grid = Grid::new(bounds, settings.grid_spacing());
        log::info!(
            "New game: seed {}, {}x{} screen, {}x{} grid, {} particles",
            seed,
            bounds.size.x,
            bounds.size.y,
            grid.columns(),
            grid.rows(),
            settings.max_particles()
        );

        Self {
            seed,
            frame: 0,
            time: 0.0,
            phase: GamePhase::Playing,
            bounds,
            status: PlayerStatus::new(high_score),
            entities,
            spawner: EnemySpawner::new(seed),
            particles: ParticlePool::new(settings.max_particles()),
            grid,
            events: Vec::new(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Hand the accumulated events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Entities first, then the grid and particles on top
    pub fn draw(&self, sink: &mut dyn DrawSink) {
        self.entities.draw(sink, self.time);
        self.grid.draw(sink);
        self.particles.draw(sink);
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
