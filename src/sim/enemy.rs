//! Enemies: seekers and wanderers
//!
//! An enemy warps in over a grace period, then runs its behaviors once per
//! frame. Behaviors are small resumable state machines: each call does one
//! frame of work and says whether it wants to run again.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::Rng;

use super::context::TickContext;
use super::effects::Effects;
use super::entity::{Body, Entity, EntityKind};
use super::particles::{ParticleKind, ParticleSpawn, ParticleState};
use super::random::RandomExt;
use super::status::ScoreEvent;
use crate::audio::{SoundEffect, SoundEvent};
use crate::renderer::{DrawSink, SpriteKind};
use crate::{Color, normalize_angle, polar_to_cartesian, scale_to, to_angle};

/// Frames an enemy spends warping in
pub const SPAWN_GRACE_FRAMES: u32 = 60;
/// Velocity kept per frame
pub const DRAG: f32 = 0.8;
pub const SEEKER_ACCELERATION: f32 = 0.9;
pub const WANDER_ACCELERATION: f32 = 0.4;
/// Frames a wanderer keeps a heading before nudging it
const WANDER_CYCLE: u8 = 6;
pub const EXPLOSION_PARTICLES: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Seeker,
    Wanderer,
}

/// Outcome of one behavior step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Accelerate toward the living player
    FollowPlayer { acceleration: f32 },
    /// Random walk; `step` counts frames within the current heading cycle
    MoveRandomly { direction: f32, step: u8 },
}

impl Behavior {
    pub fn move_randomly(rng: &mut impl Rng) -> Self {
        Behavior::MoveRandomly {
            direction: rng.next_float(0.0, TAU),
            step: 0,
        }
    }

    /// Run one frame of this behavior
    pub fn step(&mut self, body: &mut Body, ctx: &TickContext, rng: &mut impl Rng) -> Step {
        match self {
            Behavior::FollowPlayer { acceleration } => {
                if !ctx.player.is_dead {
                    body.velocity += scale_to(ctx.player.position - body.position, *acceleration);
                }
                if body.velocity != Vec2::ZERO {
                    body.orientation = to_angle(body.velocity);
                }
            }
            Behavior::MoveRandomly { direction, step } => {
                if *step == 0 {
                    *direction = normalize_angle(*direction + rng.next_float(-0.1, 0.1));
                }

                body.velocity += polar_to_cartesian(WANDER_ACCELERATION, *direction);
                body.orientation -= 0.05;

                let size = body.size();
                let inner = ctx
                    .bounds
                    .inflate(-(size.x / 2.0) - 1.0, -(size.y / 2.0) - 1.0);
                // steer back toward the middle when pressed against an edge
                if !inner.contains_point(body.position) {
                    *direction = to_angle(ctx.bounds.center() - body.position)
                        + rng.next_float(-FRAC_PI_2, FRAC_PI_2);
                }

                *step = (*step + 1) % WANDER_CYCLE;
            }
        }
        Step::Continue
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    behaviors: Vec<Behavior>,
    time_until_start: u32,
    point_value: u32,
}

impl Entity {
    pub fn seeker(position: Vec2) -> Self {
        Self::enemy(
            SpriteKind::Seeker,
            position,
            Enemy {
                kind: EnemyKind::Seeker,
                behaviors: vec![Behavior::FollowPlayer {
                    acceleration: SEEKER_ACCELERATION,
                }],
                time_until_start: SPAWN_GRACE_FRAMES,
                point_value: 2,
            },
        )
    }

    pub fn wanderer(position: Vec2, rng: &mut impl Rng) -> Self {
        Self::enemy(
            SpriteKind::Wanderer,
            position,
            Enemy {
                kind: EnemyKind::Wanderer,
                behaviors: vec![Behavior::move_randomly(rng)],
                time_until_start: SPAWN_GRACE_FRAMES,
                point_value: 1,
            },
        )
    }

    fn enemy(sprite: SpriteKind, position: Vec2, enemy: Enemy) -> Self {
        let mut body = Body::new(sprite, position);
        body.radius = sprite.size().x / 2.0;
        body.tint = Color::TRANSPARENT;
        Self::new(body, EntityKind::Enemy(enemy))
    }
}

impl Enemy {
    /// Past the warp-in grace period
    #[inline]
    pub fn is_active(&self) -> bool {
        self.time_until_start == 0
    }

    pub fn point_value(&self) -> u32 {
        self.point_value
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Finish warping in immediately
    pub fn skip_spawn_in(&mut self) {
        self.time_until_start = 0;
    }

    pub fn update(&mut self, body: &mut Body, ctx: &TickContext, rng: &mut impl Rng) {
        if self.is_active() {
            self.behaviors
                .retain_mut(|behavior| behavior.step(body, ctx, &mut *rng) == Step::Continue);
        } else {
            self.time_until_start -= 1;
            body.tint = Color::WHITE * (1.0 - self.time_until_start as f32 / SPAWN_GRACE_FRAMES as f32);
        }

        body.position += body.velocity;
        body.clamp_to(ctx.bounds);
        body.velocity *= DRAG;
    }

    pub fn was_shot(&mut self, body: &mut Body, rng: &mut impl Rng, fx: &mut Effects) {
        body.expired = true;
        fx.score.push(ScoreEvent::Points(self.point_value));
        fx.score.push(ScoreEvent::IncreaseMultiplier);

        let hue1 = rng.next_float(0.0, 6.0);
        let hue2 = (hue1 + rng.next_float(0.0, 2.0)) % 6.0;
        let color1 = Color::from_hsv(hue1, 0.5, 1.0);
        let color2 = Color::from_hsv(hue2, 0.5, 1.0);

        fx.particles.reserve(EXPLOSION_PARTICLES);
        for _ in 0..EXPLOSION_PARTICLES {
            let speed = 18.0 * (1.0 - 1.0 / rng.next_float(1.0, 10.0));
            let state = ParticleState::new(rng.next_vec2(speed, speed), ParticleKind::Enemy);
            let tint = color1.lerp(color2, rng.random::<f32>());
            fx.spawn_particle(ParticleSpawn::new(
                SpriteKind::LineParticle,
                body.position,
                tint,
                190.0,
                1.5,
                state,
            ));
        }

        fx.sound(SoundEvent::random(SoundEffect::Explosion, 0.5, rng));
    }

    pub fn draw(&self, body: &Body, sink: &mut dyn DrawSink) {
        if !self.is_active() {
            // expanding, fading ghost while warping in
            let factor = self.time_until_start as f32 / SPAWN_GRACE_FRAMES as f32;
            body.draw_scaled(sink, Color::WHITE * factor, 2.0 - factor);
        }
        body.draw(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;
    use crate::renderer::SpriteBatch;
    use crate::sim::context::PlayerView;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx_with_player(position: Vec2) -> TickContext {
        TickContext::new(1, Rect::new(0.0, 0.0, 800.0, 600.0), 1).with_player(PlayerView {
            position,
            is_dead: false,
            game_over: false,
        })
    }

    fn split(entity: Entity) -> (Enemy, Body) {
        match entity.kind {
            EntityKind::Enemy(enemy) => (enemy, entity.body),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_spawn_in_fades_and_holds_behaviors() {
        let mut rng = Pcg32::seed_from_u64(1);
        let ctx = ctx_with_player(Vec2::new(100.0, 100.0));
        let (mut enemy, mut body) = split(Entity::seeker(Vec2::new(400.0, 300.0)));
        assert_eq!(body.tint, Color::TRANSPARENT);
        assert_eq!(body.radius, 20.0);

        for _ in 0..30 {
            enemy.update(&mut body, &ctx, &mut rng);
        }
        assert!(!enemy.is_active());
        assert!((body.tint.a - 0.5).abs() < 1e-5);
        assert_eq!(body.position, Vec2::new(400.0, 300.0));

        for _ in 0..30 {
            enemy.update(&mut body, &ctx, &mut rng);
        }
        assert!(enemy.is_active());
        assert_eq!(body.tint, Color::WHITE);

        enemy.update(&mut body, &ctx, &mut rng);
        assert!(body.position.x < 400.0 && body.position.y < 300.0);
    }

    #[test]
    fn test_seeker_ignores_dead_player() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ctx = ctx_with_player(Vec2::new(100.0, 100.0));
        ctx.player.is_dead = true;
        let (mut enemy, mut body) = split(Entity::seeker(Vec2::new(400.0, 300.0)));
        enemy.skip_spawn_in();
        enemy.update(&mut body, &ctx, &mut rng);
        assert_eq!(body.position, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_wanderer_turns_back_from_the_edge() {
        let mut rng = Pcg32::seed_from_u64(7);
        let ctx = ctx_with_player(Vec2::new(400.0, 300.0));
        let (mut enemy, mut body) = split(Entity::wanderer(Vec2::new(20.0, 300.0), &mut rng));
        enemy.skip_spawn_in();
        enemy.update(&mut body, &ctx, &mut rng);

        let Behavior::MoveRandomly { direction, step } = enemy.behaviors()[0] else {
            panic!("wanderer lost its behavior");
        };
        assert_eq!(step, 1);
        // center is straight right: heading within a quarter turn of 0
        assert!(direction.abs() <= FRAC_PI_2 + 1e-5);
        assert_eq!(enemy.kind, EnemyKind::Wanderer);
        assert_eq!(enemy.point_value(), 1);
    }

    #[test]
    fn test_shot_awards_and_explodes() {
        let mut rng = Pcg32::seed_from_u64(1);
        let (mut enemy, mut body) = split(Entity::seeker(Vec2::new(400.0, 300.0)));
        let mut fx = Effects::new();
        enemy.was_shot(&mut body, &mut rng, &mut fx);
        assert!(body.expired);
        assert_eq!(fx.score, vec![ScoreEvent::Points(2), ScoreEvent::IncreaseMultiplier]);
        assert_eq!(fx.particles.len(), EXPLOSION_PARTICLES);
        assert_eq!(fx.events.len(), 1);
    }

    #[test]
    fn test_spawning_enemy_draws_ghost() {
        let (mut enemy, body) = split(Entity::seeker(Vec2::ZERO));
        let mut batch = SpriteBatch::new();
        enemy.draw(&body, &mut batch);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.instances()[0].scale, [1.0, 1.0]);

        enemy.skip_spawn_in();
        batch.clear();
        enemy.draw(&body, &mut batch);
        assert_eq!(batch.len(), 1);
    }
}
