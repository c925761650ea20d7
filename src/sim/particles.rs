//! Pooled particles
//!
//! A fixed-capacity ring buffer of reusable particle records. The live
//! particles occupy the logical window `[0, count)`, which maps to physical
//! slot `(start + i) % capacity`. When the pool is full a new particle
//! overwrites logical slot 0 (the oldest) and `start` advances, so eviction
//! is O(1) and nothing is ever shifted in memory.

use glam::Vec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Color;
use crate::renderer::{DrawSink, SpriteKind};

/// Physics category of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParticleKind {
    #[default]
    None,
    /// Faster drag (debris, exhaust)
    Enemy,
    /// Length less sensitive to speed
    Bullet,
    /// Unaffected by black holes
    IgnoreGravity,
}

/// Physics payload carried by each particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleState {
    pub velocity: Vec2,
    pub kind: ParticleKind,
    pub length_multiplier: f32,
}

impl Default for ParticleState {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            kind: ParticleKind::None,
            length_multiplier: 1.0,
        }
    }
}

impl ParticleState {
    pub fn new(velocity: Vec2, kind: ParticleKind) -> Self {
        Self {
            velocity,
            kind,
            length_multiplier: 1.0,
        }
    }

    /// Uncategorized particle flying in a random direction
    pub fn random(rng: &mut impl rand::Rng, min_velocity: f32, max_velocity: f32) -> Self {
        use super::random::RandomExt;
        Self::new(rng.next_vec2(min_velocity, max_velocity), ParticleKind::None)
    }
}

/// One particle record; slots are reused, never freed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub sprite: SpriteKind,
    pub position: Vec2,
    pub orientation: f32,
    pub scale: Vec2,
    pub tint: Color,
    /// Frames to live
    pub duration: f32,
    /// 1.0 at spawn, dead once below zero
    pub percent_life: f32,
    pub state: ParticleState,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            sprite: SpriteKind::LineParticle,
            position: Vec2::ZERO,
            orientation: 0.0,
            scale: Vec2::ONE,
            tint: Color::WHITE,
            duration: 1.0,
            percent_life: 1.0,
            state: ParticleState::default(),
        }
    }
}

/// A deferred spawn request, produced by parallel workers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpawn {
    pub sprite: SpriteKind,
    pub position: Vec2,
    pub tint: Color,
    pub duration: f32,
    pub scale: Vec2,
    pub state: ParticleState,
    pub orientation: f32,
}

impl ParticleSpawn {
    /// Spawn with uniform scale and no initial rotation
    pub fn new(
        sprite: SpriteKind,
        position: Vec2,
        tint: Color,
        duration: f32,
        scale: f32,
        state: ParticleState,
    ) -> Self {
        Self {
            sprite,
            position,
            tint,
            duration,
            scale: Vec2::splat(scale),
            state,
            orientation: 0.0,
        }
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }
}

/// Per-particle physics rule, run once per live particle per frame
pub trait ParticlePolicy: Sync {
    fn update(&self, particle: &mut Particle);
}

impl<F: Fn(&mut Particle) + Sync> ParticlePolicy for F {
    fn update(&self, particle: &mut Particle) {
        self(particle)
    }
}

/// Fixed-capacity circular particle pool
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    start: usize,
    count: usize,
}

impl ParticlePool {
    /// Allocate every slot up front
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "particle pool needs at least one slot");
        Self {
            slots: vec![Particle::default(); capacity],
            start: 0,
            count: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live particles
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Physical index of logical slot 0
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Physical slot backing logical index `i`
    #[inline]
    pub fn physical_index(&self, i: usize) -> usize {
        (self.start + i) % self.slots.len()
    }

    /// Live particle at logical index `i`
    pub fn get(&self, i: usize) -> Option<&Particle> {
        (i < self.count).then(|| &self.slots[self.physical_index(i)])
    }

    /// Live particles, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Particle> + '_ {
        (0..self.count).map(move |i| &self.slots[self.physical_index(i)])
    }

    /// Add a particle, evicting the oldest one when the pool is full
    pub fn spawn(&mut self, spawn: ParticleSpawn) {
        debug_assert!(spawn.duration > 0.0, "particle duration must be positive");

        let index = if self.count == self.capacity() {
            let oldest = self.physical_index(0);
            self.start = (self.start + 1) % self.capacity();
            oldest
        } else {
            let next = self.physical_index(self.count);
            self.count += 1;
            next
        };

        self.slots[index] = Particle {
            sprite: spawn.sprite,
            position: spawn.position,
            orientation: spawn.orientation,
            scale: spawn.scale,
            tint: spawn.tint,
            duration: spawn.duration,
            percent_life: 1.0,
            state: spawn.state,
        };
    }

    /// Spawn a batch in order
    pub fn spawn_all(&mut self, spawns: impl IntoIterator<Item = ParticleSpawn>) {
        for spawn in spawns {
            self.spawn(spawn);
        }
    }

    /// The live window as (up to) two contiguous physical slices
    fn window_mut(&mut self) -> (&mut [Particle], &mut [Particle]) {
        let capacity = self.capacity();
        let end = self.start + self.count;
        if end <= capacity {
            (&mut self.slots[self.start..end], &mut [])
        } else {
            let (wrapped, tail) = self.slots.split_at_mut(self.start);
            (tail, &mut wrapped[..end - capacity])
        }
    }

    /// Advance every live particle one frame and drop the dead ones
    pub fn update<P: ParticlePolicy + ?Sized>(&mut self, policy: &P) {
        let (head, tail) = self.window_mut();
        head.par_iter_mut().chain(tail.par_iter_mut()).for_each(|particle| {
            policy.update(particle);
            particle.percent_life -= 1.0 / particle.duration;
        });

        // Sift dead particles to the end of the window, keeping survivor order
        let mut removal_count = 0;
        for i in 0..self.count {
            let a = self.physical_index(i - removal_count);
            let b = self.physical_index(i);
            self.slots.swap(a, b);
            if self.slots[a].percent_life < 0.0 {
                removal_count += 1;
            }
        }
        self.count -= removal_count;
    }

    /// Present every live particle, rotated about its texture center
    pub fn draw(&self, sink: &mut dyn DrawSink) {
        for p in self.iter() {
            sink.draw(
                p.sprite,
                p.position,
                p.orientation,
                p.sprite.center(),
                p.scale,
                p.tint,
            );
        }
    }

    /// Forget every live particle
    pub fn clear(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::SpriteBatch;
    use proptest::prelude::*;

    fn spawn_at(x: f32, duration: f32) -> ParticleSpawn {
        ParticleSpawn::new(
            SpriteKind::LineParticle,
            Vec2::new(x, 0.0),
            Color::WHITE,
            duration,
            1.0,
            ParticleState::default(),
        )
    }

    fn idle(_: &mut Particle) {}

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut pool = ParticlePool::new(4);
        for i in 0..5 {
            pool.spawn(spawn_at(i as f32, 10.0));
        }
        assert_eq!(pool.count(), 4);
        assert_eq!(pool.start(), 1);
        let xs: Vec<f32> = pool.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_particle_dies_after_duration() {
        let mut pool = ParticlePool::new(8);
        pool.spawn(spawn_at(0.0, 4.0));

        // 4 updates leave percent_life at exactly 0: still alive
        for _ in 0..4 {
            pool.update(&idle);
        }
        assert_eq!(pool.count(), 1);
        assert_eq!(pool.get(0).unwrap().percent_life, 0.0);

        pool.update(&idle);
        assert_eq!(pool.count(), 0);
    }

    #[test]
    fn test_update_on_empty_pool_is_noop() {
        let mut pool = ParticlePool::new(16);
        pool.update(&idle);
        assert_eq!(pool.count(), 0);
        assert_eq!(pool.start(), 0);
    }

    #[test]
    fn test_compaction_keeps_survivor_order() {
        let mut pool = ParticlePool::new(8);
        for (i, duration) in [10.0, 0.5, 10.0, 0.5, 10.0].into_iter().enumerate() {
            pool.spawn(spawn_at(i as f32, duration));
        }
        pool.update(&idle);

        let xs: Vec<f32> = pool.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_compaction_across_the_wrap() {
        let mut pool = ParticlePool::new(4);
        for i in 0..6 {
            let duration = if i % 2 == 0 { 0.5 } else { 10.0 };
            pool.spawn(spawn_at(i as f32, duration));
        }
        // window wraps: start = 2, physical [4, 5, 2, 3]
        assert_eq!(pool.start(), 2);

        pool.update(&idle);
        let xs: Vec<f32> = pool.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![3.0, 5.0]);
    }

    #[test]
    fn test_policy_runs_before_decay() {
        let mut pool = ParticlePool::new(4);
        pool.spawn(spawn_at(0.0, 2.0));
        pool.update(&|p: &mut Particle| {
            assert_eq!(p.percent_life, 1.0);
            p.position.x += 1.0;
        });
        let p = pool.get(0).unwrap();
        assert_eq!(p.position.x, 1.0);
        assert_eq!(p.percent_life, 0.5);
    }

    #[test]
    fn test_draw_and_clear() {
        let mut pool = ParticlePool::new(4);
        pool.spawn(spawn_at(0.0, 5.0));
        pool.spawn(spawn_at(1.0, 5.0));

        let mut batch = SpriteBatch::new();
        pool.draw(&mut batch);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.instances()[0].origin, SpriteKind::LineParticle.center().to_array());

        pool.clear();
        assert_eq!(pool.count(), 0);
        assert!(pool.get(0).is_none());
    }

    proptest! {
        #[test]
        fn start_tracks_evictions(capacity in 1usize..32, extra in 0usize..100) {
            let mut pool = ParticlePool::new(capacity);
            for i in 0..capacity + extra {
                pool.spawn(spawn_at(i as f32, 10.0));
            }
            prop_assert_eq!(pool.count(), capacity);
            prop_assert_eq!(pool.start(), extra % capacity);
            for i in 0..capacity {
                prop_assert_eq!(pool.physical_index(i), (extra + i) % capacity);
                // logical i is the (extra + i)-th particle ever spawned
                prop_assert_eq!(pool.get(i).unwrap().position.x, (extra + i) as f32);
            }
        }
    }
}
