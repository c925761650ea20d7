//! Enemy spawner
//!
//! Rolls for new seekers, wanderers and black holes every frame while the
//! player is alive. The odds improve slowly over time and fall back to the
//! starting value whenever the player dies.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::context::PlayerView;
use super::effects::Effects;
use super::entity::Entity;
use super::entity_manager::EntityManager;
use crate::Rect;
use crate::audio::{SoundEffect, SoundEvent};
use crate::consts::{MAX_BLACK_HOLES, MAX_ENTITIES};

/// Starting 1-in-N chance per frame for each enemy type
pub const INITIAL_INVERSE_SPAWN_CHANCE: f32 = 90.0;
/// The ramp stops here
pub const MIN_INVERSE_SPAWN_CHANCE: f32 = 30.0;
/// Ramp step per frame
pub const SPAWN_RAMP: f32 = 0.005;
pub const INVERSE_BLACK_HOLE_CHANCE: u32 = 600;
/// New enemies never appear closer than this to the player
pub const SAFE_DISTANCE: f32 = 250.0;
/// Spawn position rerolls before settling for the farthest candidate
const MAX_POSITION_ATTEMPTS: usize = 256;

#[derive(Debug, Clone)]
pub struct EnemySpawner {
    inverse_spawn_chance: f32,
    rng: Pcg32,
}

impl EnemySpawner {
    pub fn new(seed: u64) -> Self {
        Self {
            inverse_spawn_chance: INITIAL_INVERSE_SPAWN_CHANCE,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn inverse_spawn_chance(&self) -> f32 {
        self.inverse_spawn_chance
    }

    /// One frame of spawn rolls
    pub fn update(&mut self, manager: &mut EntityManager, player: PlayerView, bounds: Rect, fx: &mut Effects) {
        if !player.is_dead && manager.count() < MAX_ENTITIES {
            let odds = self.inverse_spawn_chance as u32;

            if self.roll(odds) {
                let position = self.spawn_position(player.position, bounds);
                manager.add(Entity::seeker(position));
                fx.sound(SoundEvent::random(SoundEffect::Spawn, 0.5, &mut self.rng));
            }

            if self.roll(odds) {
                let position = self.spawn_position(player.position, bounds);
                let wanderer = Entity::wanderer(position, &mut self.rng);
                manager.add(wanderer);
                fx.sound(SoundEvent::random(SoundEffect::Spawn, 0.5, &mut self.rng));
            }

            if manager.black_hole_count() < MAX_BLACK_HOLES && self.roll(INVERSE_BLACK_HOLE_CHANCE) {
                let position = self.spawn_position(player.position, bounds);
                manager.add(Entity::black_hole(position));
                log::debug!("Black hole spawned at ({:.0}, {:.0})", position.x, position.y);
            }
        }

        if self.inverse_spawn_chance > MIN_INVERSE_SPAWN_CHANCE {
            self.inverse_spawn_chance -= SPAWN_RAMP;
        }
    }

    /// 1-in-`n` chance
    fn roll(&mut self, n: u32) -> bool {
        self.rng.random_range(0..n.max(1)) == 0
    }

    /// Random whole-pixel point at least `SAFE_DISTANCE` from the player
    fn spawn_position(&mut self, player: Vec2, bounds: Rect) -> Vec2 {
        let width = (bounds.size.x as u32).max(1);
        let height = (bounds.size.y as u32).max(1);

        let mut best = bounds.min;
        let mut best_distance = -1.0;
        for _ in 0..MAX_POSITION_ATTEMPTS {
            let candidate = bounds.min
                + Vec2::new(
                    self.rng.random_range(0..width) as f32,
                    self.rng.random_range(0..height) as f32,
                );
            let distance = candidate.distance_squared(player);
            if distance >= SAFE_DISTANCE * SAFE_DISTANCE {
                return candidate;
            }
            if distance > best_distance {
                best = candidate;
                best_distance = distance;
            }
        }
        best
    }

    /// Back to the starting difficulty
    pub fn reset(&mut self) {
        self.inverse_spawn_chance = INITIAL_INVERSE_SPAWN_CHANCE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alive_at(position: Vec2) -> PlayerView {
        PlayerView {
            position,
            is_dead: false,
            game_over: false,
        }
    }

    #[test]
    fn test_spawns_keep_their_distance() {
        let bounds = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let player = bounds.center();
        let mut spawner = EnemySpawner::new(5);
        let mut manager = EntityManager::new();
        let mut fx = Effects::new();

        for _ in 0..3000 {
            spawner.update(&mut manager, alive_at(player), bounds, &mut fx);
        }
        assert!(manager.count() > 0);
        assert!(manager.black_hole_count() <= MAX_BLACK_HOLES);
        for entity in manager.entities() {
            let p = entity.body.position;
            assert!(p.distance_squared(player) >= SAFE_DISTANCE * SAFE_DISTANCE);
            assert!(bounds.contains_point(p));
        }
    }

    #[test]
    fn test_difficulty_ramps_and_resets() {
        let bounds = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let mut spawner = EnemySpawner::new(5);
        let mut manager = EntityManager::new();
        let mut fx = Effects::new();
        for _ in 0..100 {
            spawner.update(&mut manager, PlayerView::default(), bounds, &mut fx);
        }
        assert!((spawner.inverse_spawn_chance() - 89.5).abs() < 1e-3);

        for _ in 0..20_000 {
            spawner.update(&mut manager, PlayerView::default(), bounds, &mut fx);
        }
        assert!(spawner.inverse_spawn_chance() <= MIN_INVERSE_SPAWN_CHANCE);
        assert!(spawner.inverse_spawn_chance() > MIN_INVERSE_SPAWN_CHANCE - 2.0 * SPAWN_RAMP);

        spawner.reset();
        assert_eq!(spawner.inverse_spawn_chance(), INITIAL_INVERSE_SPAWN_CHANCE);
    }

    #[test]
    fn test_nothing_spawns_for_a_dead_player() {
        let bounds = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let mut spawner = EnemySpawner::new(5);
        let mut manager = EntityManager::new();
        let mut fx = Effects::new();
        for _ in 0..1000 {
            spawner.update(&mut manager, PlayerView::default(), bounds, &mut fx);
        }
        assert_eq!(manager.count(), 0);
        assert!(fx.events.is_empty());
    }

    #[test]
    fn test_population_cap() {
        let bounds = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let mut spawner = EnemySpawner::new(5);
        let mut manager = EntityManager::new();
        for i in 0..MAX_ENTITIES {
            manager.add(Entity::seeker(Vec2::new(i as f32, 0.0)));
        }
        let mut fx = Effects::new();
        for _ in 0..1000 {
            spawner.update(&mut manager, alive_at(Vec2::ZERO), bounds, &mut fx);
        }
        assert_eq!(manager.count(), MAX_ENTITIES);
    }
}
