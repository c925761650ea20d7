//! Per-particle physics
//!
//! Runs on every live particle every frame (tens of thousands), so it stays
//! branch-light and allocation-free: integrate, fade, stretch, bounce off the
//! screen edges, fall toward black holes, then drag.

use glam::Vec2;

use super::particles::{Particle, ParticleKind, ParticlePolicy};
use crate::to_angle;

/// Below this Manhattan speed a velocity is flushed to zero
const VELOCITY_EPSILON: f32 = 1e-11;
/// Black holes swirl particles closer than this
const SWIRL_RADIUS: f32 = 400.0;

/// Particle rules for the arena: screen edges plus the current black holes
#[derive(Debug, Clone, Default)]
pub struct ArenaPolicy {
    pub screen: Vec2,
    pub black_holes: Vec<Vec2>,
}

impl ArenaPolicy {
    pub fn new(screen: Vec2, black_holes: Vec<Vec2>) -> Self {
        Self {
            screen,
            black_holes,
        }
    }
}

impl ParticlePolicy for ArenaPolicy {
    fn update(&self, particle: &mut Particle) {
        update_particle(particle, self.screen, &self.black_holes);
    }
}

/// Advance one particle by a frame
pub fn update_particle(particle: &mut Particle, screen: Vec2, black_holes: &[Vec2]) {
    let mut vel = particle.state.velocity;
    let speed = vel.length();

    particle.position += vel;

    // fade when life or speed runs low
    let alpha = (particle.percent_life * 2.0).min(speed).clamp(0.0, 1.0);
    let alpha = alpha * alpha;
    particle.tint.a = alpha;

    // bullet sparks stretch less with speed than everything else
    let stretch = match particle.state.kind {
        ParticleKind::Bullet => 0.1 * speed + 0.1,
        _ => 0.2 * speed + 0.1,
    };
    particle.scale.x = particle.state.length_multiplier * stretch.min(1.0).min(alpha);

    particle.orientation = to_angle(vel);

    let pos = particle.position;
    if pos.x < 0.0 {
        vel.x = vel.x.abs();
    } else if pos.x > screen.x {
        vel.x = -vel.x.abs();
    }
    if pos.y < 0.0 {
        vel.y = vel.y.abs();
    } else if pos.y > screen.y {
        vel.y = -vel.y.abs();
    }

    if particle.state.kind != ParticleKind::IgnoreGravity {
        for &hole in black_holes {
            let d_pos = hole - pos;
            let distance = d_pos.length();
            if distance <= 0.0 {
                continue;
            }
            let n = d_pos / distance;
            vel += 10_000.0 * n / (distance * distance + 10_000.0);

            if distance < SWIRL_RADIUS {
                vel += 45.0 * Vec2::new(n.y, -n.x) / (distance + 100.0);
            }
        }
    }

    if vel.x.abs() + vel.y.abs() < VELOCITY_EPSILON {
        vel = Vec2::ZERO;
    } else if particle.state.kind == ParticleKind::Enemy {
        vel *= 0.94;
    } else {
        // position stands in for a random source; workers share no RNG
        vel *= 0.96 + pos.x.abs() % 0.04;
    }

    particle.state.velocity = vel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::SpriteKind;
    use crate::sim::particles::ParticleState;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn particle(position: Vec2, velocity: Vec2, kind: ParticleKind) -> Particle {
        Particle {
            sprite: SpriteKind::LineParticle,
            position,
            state: ParticleState::new(velocity, kind),
            duration: 60.0,
            ..Particle::default()
        }
    }

    #[test]
    fn test_integrates_and_orients() {
        let mut p = particle(Vec2::new(100.0, 100.0), Vec2::new(0.0, 5.0), ParticleKind::Enemy);
        update_particle(&mut p, SCREEN, &[]);
        assert_eq!(p.position, Vec2::new(100.0, 105.0));
        assert!((p.orientation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!((p.state.velocity.y - 5.0 * 0.94).abs() < 1e-5);
    }

    #[test]
    fn test_fade_follows_life_and_speed() {
        let mut p = particle(Vec2::new(100.0, 100.0), Vec2::new(0.5, 0.0), ParticleKind::None);
        update_particle(&mut p, SCREEN, &[]);
        assert!((p.tint.a - 0.25).abs() < 1e-6);

        let mut p = particle(Vec2::new(100.0, 100.0), Vec2::new(9.0, 0.0), ParticleKind::None);
        p.percent_life = 0.25;
        update_particle(&mut p, SCREEN, &[]);
        assert!((p.tint.a - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_bullet_sparks_stretch_less() {
        let mut spark = particle(Vec2::new(100.0, 100.0), Vec2::new(2.0, 0.0), ParticleKind::Bullet);
        let mut debris = particle(Vec2::new(100.0, 100.0), Vec2::new(2.0, 0.0), ParticleKind::None);
        update_particle(&mut spark, SCREEN, &[]);
        update_particle(&mut debris, SCREEN, &[]);
        assert!((spark.scale.x - 0.3).abs() < 1e-5);
        assert!((debris.scale.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bounces_off_right_edge() {
        let mut p = particle(Vec2::new(798.0, 300.0), Vec2::new(4.0, 0.0), ParticleKind::Enemy);
        update_particle(&mut p, SCREEN, &[]);
        assert!(p.state.velocity.x < 0.0);
    }

    #[test]
    fn test_black_hole_pulls_unless_ignored() {
        let hole = [Vec2::new(300.0, 300.0)];

        let mut p = particle(Vec2::new(100.0, 300.0), Vec2::ZERO, ParticleKind::Enemy);
        update_particle(&mut p, SCREEN, &hole);
        assert!(p.state.velocity.x > 0.0);
        // swirl adds a tangential component inside 400 units
        assert!(p.state.velocity.y.abs() > 0.0);

        let mut p = particle(Vec2::new(100.0, 300.0), Vec2::ZERO, ParticleKind::IgnoreGravity);
        update_particle(&mut p, SCREEN, &hole);
        assert_eq!(p.state.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_tiny_velocity_flushed() {
        let mut p = particle(Vec2::new(100.0, 100.0), Vec2::new(1e-13, 0.0), ParticleKind::None);
        update_particle(&mut p, SCREEN, &[]);
        assert_eq!(p.state.velocity, Vec2::ZERO);
    }
}
