//! Player bullets

use glam::Vec2;
use rand::Rng;

use super::context::TickContext;
use super::effects::Effects;
use super::entity::{Body, Entity, EntityKind};
use super::grid::GridForce;
use super::particles::{ParticleKind, ParticleSpawn, ParticleState};
use super::random::RandomExt;
use crate::Color;
use crate::renderer::SpriteKind;
use crate::to_angle;

pub const BULLET_RADIUS: f32 = 8.0;
/// Sparks thrown when a bullet leaves the screen
pub const SPARK_PARTICLES: usize = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bullet;

impl Entity {
    pub fn bullet(position: Vec2, velocity: Vec2) -> Self {
        let mut body = Body::new(SpriteKind::Bullet, position);
        body.velocity = velocity;
        body.orientation = to_angle(velocity);
        body.radius = BULLET_RADIUS;
        Self::new(body, EntityKind::Bullet(Bullet))
    }
}

impl Bullet {
    pub fn update(&mut self, body: &mut Body, ctx: &TickContext, rng: &mut impl Rng, fx: &mut Effects) {
        if body.velocity.length_squared() > 0.0 {
            body.orientation = to_angle(body.velocity);
        }

        body.position += body.velocity;
        fx.grid_force(GridForce::Explosive {
            force: 0.5 * body.velocity.length(),
            position: body.position.extend(0.0),
            radius: 80.0,
        });

        if !ctx.bounds.contains_point(body.position) {
            body.expired = true;
            fx.particles.reserve(SPARK_PARTICLES);
            for _ in 0..SPARK_PARTICLES {
                fx.spawn_particle(ParticleSpawn::new(
                    SpriteKind::LineParticle,
                    body.position,
                    Color::LIGHT_BLUE,
                    50.0,
                    1.0,
                    ParticleState::new(rng.next_vec2(0.0, 9.0), ParticleKind::Bullet),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn split(entity: Entity) -> Body {
        assert!(matches!(entity.kind, EntityKind::Bullet(_)));
        entity.body
    }

    #[test]
    fn test_flies_and_pushes_the_grid() {
        let ctx = TickContext::new(1, Rect::new(0.0, 0.0, 800.0, 600.0), 1);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut body = split(Entity::bullet(Vec2::new(100.0, 100.0), Vec2::new(0.0, 11.0)));
        let mut fx = Effects::new();
        Bullet.update(&mut body, &ctx, &mut rng, &mut fx);

        assert_eq!(body.position, Vec2::new(100.0, 111.0));
        assert!(!body.expired);
        assert!(fx.particles.is_empty());
        assert_eq!(
            fx.grid,
            vec![GridForce::Explosive {
                force: 5.5,
                position: glam::Vec3::new(100.0, 111.0, 0.0),
                radius: 80.0,
            }]
        );
    }

    #[test]
    fn test_off_screen_expires_with_sparks() {
        let ctx = TickContext::new(1, Rect::new(0.0, 0.0, 800.0, 600.0), 1);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut body = split(Entity::bullet(Vec2::new(803.0, 300.0), Vec2::new(5.0, 0.0)));
        let mut fx = Effects::new();
        Bullet.update(&mut body, &ctx, &mut rng, &mut fx);

        assert!(body.expired);
        assert_eq!(fx.particles.len(), SPARK_PARTICLES);
        assert!(
            fx.particles
                .iter()
                .all(|p| p.state.kind == ParticleKind::Bullet && p.state.velocity.length() <= 9.0)
        );
    }
}
