//! Black holes
//!
//! Stationary hazards. They pull nearby entities in (and push bullets away),
//! spray orbiting particles, suck the grid toward themselves and take ten hits
//! to destroy.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::context::TickContext;
use super::effects::Effects;
use super::entity::{Body, Entity, EntityKind, Probe, ProbeClass};
use super::grid::GridForce;
use super::particles::{ParticleKind, ParticleSpawn, ParticleState};
use super::random::RandomExt;
use super::status::ScoreEvent;
use crate::audio::{SoundEffect, SoundEvent};
use crate::renderer::{DrawSink, SpriteKind};
use crate::{Color, polar_to_cartesian, scale_to};

pub const HIT_POINTS: i32 = 10;
/// Radius within which entities feel the hole
pub const INFLUENCE_RADIUS: f32 = 250.0;
pub const POINT_VALUE: u32 = 5;
pub const BURST_PARTICLES: usize = 150;

#[derive(Debug, Clone, PartialEq)]
pub struct BlackHole {
    hit_points: i32,
    spray_angle: f32,
}

impl Default for BlackHole {
    fn default() -> Self {
        Self {
            hit_points: HIT_POINTS,
            spray_angle: 0.0,
        }
    }
}

impl Entity {
    pub fn black_hole(position: Vec2) -> Self {
        let mut body = Body::new(SpriteKind::BlackHole, position);
        body.radius = SpriteKind::BlackHole.size().x / 2.0;
        Self::new(body, EntityKind::BlackHole(BlackHole::default()))
    }
}

impl BlackHole {
    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    /// Hits absorbed so far
    pub fn hits_taken(&self) -> u32 {
        (HIT_POINTS - self.hit_points).max(0) as u32
    }

    pub fn update(
        &mut self,
        body: &mut Body,
        index: usize,
        ctx: &TickContext,
        snapshot: &[Probe],
        rng: &mut impl Rng,
        fx: &mut Effects,
    ) {
        for (target, probe) in nearby(snapshot, body.position, INFLUENCE_RADIUS) {
            if target == index {
                continue;
            }
            let impulse = match probe.class {
                ProbeClass::Enemy { active: false } | ProbeClass::Player { dead: true } => continue,
                // bullets are repelled, everything else attracted
                ProbeClass::Bullet => scale_to(probe.position - body.position, 0.3),
                _ => {
                    // strength fades linearly from 2 at the center to 0 at the rim
                    let d_pos = body.position - probe.position;
                    scale_to(d_pos, 2.0 * (1.0 - d_pos.length() / INFLUENCE_RADIUS))
                }
            };
            fx.impulses.push((target, impulse));
        }

        // the spray toggles on and off every quarter second
        if (ctx.millis_of_second() / 250) % 2 == 0 {
            let spray_vel = polar_to_cartesian(rng.next_float(12.0, 15.0), self.spray_angle);
            let tint = Color::from_hsv(5.0, 0.5, 0.8);
            let position =
                body.position + 2.0 * Vec2::new(spray_vel.y, -spray_vel.x) + rng.next_vec2(4.0, 8.0);
            fx.spawn_particle(ParticleSpawn::new(
                SpriteKind::LineParticle,
                position,
                tint,
                190.0,
                1.5,
                ParticleState::new(spray_vel, ParticleKind::Enemy),
            ));
        }

        self.spray_angle -= TAU / 50.0;

        fx.grid_force(GridForce::Implosive {
            force: (self.spray_angle / 2.0).sin() * 10.0 + 20.0,
            position: body.position.extend(0.0),
            radius: 200.0,
        });
    }

    pub fn was_shot(&mut self, body: &mut Body, ctx: &TickContext, rng: &mut impl Rng, fx: &mut Effects) {
        self.hit_points -= 1;
        if self.hit_points <= 0 {
            body.expired = true;
            fx.score.push(ScoreEvent::Points(POINT_VALUE));
            fx.score.push(ScoreEvent::IncreaseMultiplier);
            log::debug!("Black hole destroyed at ({:.0}, {:.0})", body.position.x, body.position.y);
        }

        let hue = (3.0 * ctx.total_time % 6.0) as f32;
        let tint = Color::from_hsv(hue, 0.25, 1.0);
        let start_offset = rng.next_float(0.0, TAU / BURST_PARTICLES as f32);

        fx.particles.reserve(BURST_PARTICLES);
        for i in 0..BURST_PARTICLES {
            let angle = TAU * i as f32 / BURST_PARTICLES as f32 + start_offset;
            let spray_vel = polar_to_cartesian(rng.next_float(8.0, 16.0), angle);
            fx.spawn_particle(ParticleSpawn::new(
                SpriteKind::LineParticle,
                body.position + 2.0 * spray_vel,
                tint,
                90.0,
                1.5,
                ParticleState::new(spray_vel, ParticleKind::IgnoreGravity),
            ));
        }

        fx.sound(SoundEvent::random(SoundEffect::Explosion, 0.5, rng));
    }

    /// Collapse regardless of remaining hit points
    pub fn kill(&mut self, body: &mut Body, ctx: &TickContext, rng: &mut impl Rng, fx: &mut Effects) {
        self.hit_points = 0;
        self.was_shot(body, ctx, rng, fx);
    }

    /// Pulsing sprite
    pub fn draw(&self, body: &Body, sink: &mut dyn DrawSink, time: f64) {
        let scale = 1.0 + 0.1 * (10.0 * time).sin() as f32;
        body.draw_scaled(sink, body.tint, scale);
    }
}

/// Live snapshot entries within `radius` of `position`, with their indices
pub fn nearby(snapshot: &[Probe], position: Vec2, radius: f32) -> impl Iterator<Item = (usize, &Probe)> {
    snapshot
        .iter()
        .enumerate()
        .filter(move |(_, probe)| !probe.expired && probe.position.distance_squared(position) < radius * radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn probe(x: f32, class: ProbeClass) -> Probe {
        Probe {
            position: Vec2::new(x, 300.0),
            expired: false,
            class,
        }
    }

    #[test]
    fn test_pulls_enemies_and_repels_bullets() {
        let ctx = TickContext::new(1, Rect::new(0.0, 0.0, 800.0, 600.0), 1);
        let mut rng = Pcg32::seed_from_u64(1);
        let entity = Entity::black_hole(Vec2::new(300.0, 300.0));
        let mut body = entity.body;
        let mut hole = entity.as_black_hole().cloned().unwrap();

        let snapshot = [
            probe(300.0, ProbeClass::BlackHole),
            probe(200.0, ProbeClass::Enemy { active: true }),
            probe(400.0, ProbeClass::Bullet),
            probe(250.0, ProbeClass::Enemy { active: false }),
            probe(600.0, ProbeClass::Enemy { active: true }),
            probe(350.0, ProbeClass::Player { dead: false }),
        ];
        let mut fx = Effects::new();
        hole.update(&mut body, 0, &ctx, &snapshot, &mut rng, &mut fx);

        let targets: Vec<usize> = fx.impulses.iter().map(|(i, _)| *i).collect();
        assert_eq!(targets, vec![1, 2, 5]);
        // lerp(2, 0, 100/250) = 1.2 toward the hole
        assert!((fx.impulses[0].1.x - 1.2).abs() < 1e-5);
        assert!((fx.impulses[1].1.x - 0.3).abs() < 1e-5);
        assert!(fx.impulses[2].1.x < 0.0);

        assert_eq!(fx.grid.len(), 1);
    }

    #[test]
    fn test_spray_follows_quarter_seconds() {
        let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let entity = Entity::black_hole(Vec2::new(300.0, 300.0));
        let mut body = entity.body;
        let mut hole = BlackHole::default();

        let mut ctx = TickContext::new(1, bounds, 1);
        ctx.total_time = 10.1;
        let mut fx = Effects::new();
        hole.update(&mut body, 0, &ctx, &[], &mut rng, &mut fx);
        assert_eq!(fx.particles.len(), 1);

        ctx.total_time = 10.3;
        let mut fx = Effects::new();
        hole.update(&mut body, 0, &ctx, &[], &mut rng, &mut fx);
        assert!(fx.particles.is_empty());
        assert!((hole.spray_angle + 2.0 * TAU / 50.0).abs() < 1e-5);
    }

    #[test]
    fn test_destroyed_after_ten_hits() {
        let ctx = TickContext::new(1, Rect::new(0.0, 0.0, 800.0, 600.0), 1);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut body = Entity::black_hole(Vec2::new(300.0, 300.0)).body;
        let mut hole = BlackHole::default();
        let mut fx = Effects::new();

        for _ in 0..9 {
            hole.was_shot(&mut body, &ctx, &mut rng, &mut fx);
        }
        assert!(!body.expired);
        assert!(fx.score.is_empty());
        assert_eq!(hole.hits_taken(), 9);

        hole.was_shot(&mut body, &ctx, &mut rng, &mut fx);
        assert!(body.expired);
        assert_eq!(fx.score, vec![ScoreEvent::Points(5), ScoreEvent::IncreaseMultiplier]);
        assert!(
            fx.particles
                .iter()
                .all(|p| p.state.kind == ParticleKind::IgnoreGravity && p.duration == 90.0)
        );
    }

    #[test]
    fn test_kill_is_instant() {
        let ctx = TickContext::new(1, Rect::new(0.0, 0.0, 800.0, 600.0), 1);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut body = Entity::black_hole(Vec2::ZERO).body;
        let mut hole = BlackHole::default();
        let mut fx = Effects::new();
        hole.kill(&mut body, &ctx, &mut rng, &mut fx);
        assert!(body.expired);
        assert_eq!(hole.hit_points(), -1);
        assert_eq!(fx.particles.len(), BURST_PARTICLES);
    }
}
