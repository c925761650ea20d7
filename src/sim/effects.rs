//! Deferred side effects
//!
//! Parallel workers never touch the particle pool, the grid, or another
//! entity. They record what should happen into an [`Effects`] buffer, and the
//! sequential apply step replays the buffers in entity order.

use glam::Vec2;

use super::entity::Entity;
use super::grid::GridForce;
use super::particles::ParticleSpawn;
use super::state::GameEvent;
use super::status::ScoreEvent;
use crate::audio::SoundEvent;

/// Command buffer filled by one worker
#[derive(Debug, Default)]
pub struct Effects {
    pub particles: Vec<ParticleSpawn>,
    pub grid: Vec<GridForce>,
    /// Velocity changes for other entities, keyed by snapshot index
    pub impulses: Vec<(usize, Vec2)>,
    /// Entities to add once the update pass is over
    pub spawned: Vec<Entity>,
    pub score: Vec<ScoreEvent>,
    pub events: Vec<GameEvent>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn spawn_particle(&mut self, spawn: ParticleSpawn) {
        self.particles.push(spawn);
    }

    #[inline]
    pub fn grid_force(&mut self, force: GridForce) {
        self.grid.push(force);
    }

    pub fn sound(&mut self, sound: SoundEvent) {
        self.events.push(GameEvent::Sound(sound));
    }

    /// Move everything from `other` to the end of this buffer
    pub fn append(&mut self, other: &mut Effects) {
        self.particles.append(&mut other.particles);
        self.grid.append(&mut other.grid);
        self.impulses.append(&mut other.impulses);
        self.spawned.append(&mut other.spawned);
        self.score.append(&mut other.score);
        self.events.append(&mut other.events);
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
            && self.grid.is_empty()
            && self.impulses.is_empty()
            && self.spawned.is_empty()
            && self.score.is_empty()
            && self.events.is_empty()
    }
}
