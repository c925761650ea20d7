//! Player ship
//!
//! The one entity driven by input. It flies, fires twin bullets along the aim
//! direction, trails exhaust, and explodes/respawns when killed.

use glam::{Vec2, Vec3};
use rand::Rng;

use super::context::TickContext;
use super::effects::Effects;
use super::entity::{Body, Entity, EntityKind};
use super::grid::GridForce;
use super::particles::{ParticleKind, ParticleSpawn, ParticleState};
use super::random::RandomExt;
use super::status::ScoreEvent;
use crate::audio::{SoundEffect, SoundEvent};
use crate::renderer::colors::{EXHAUST_MID, EXHAUST_SIDE, PLAYER_EXPLOSION};
use crate::renderer::{DrawSink, SpriteKind};
use crate::{Color, Rect, scale_to, to_angle};

pub const PLAYER_RADIUS: f32 = 10.0;
/// Frames between volleys
pub const COOLDOWN_FRAMES: u32 = 6;
pub const BULLET_SPEED: f32 = 11.0;
/// Movement per frame at full stick
pub const MOVE_SPEED: f32 = 8.0;
/// Respawn delay after losing a life
pub const RESPAWN_FRAMES: u32 = 120;
/// Respawn delay after losing the last life
pub const GAME_OVER_FRAMES: u32 = 300;
pub const EXPLOSION_PARTICLES: usize = 1200;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerShip {
    cooldown_remaining: u32,
    frames_until_respawn: u32,
}

impl Entity {
    /// The player ship, centered on screen
    pub fn player(bounds: Rect) -> Self {
        let mut body = Body::new(SpriteKind::Player, bounds.center());
        body.radius = PLAYER_RADIUS;
        Self::new(body, EntityKind::Player(PlayerShip::default()))
    }
}

impl PlayerShip {
    pub fn is_dead(&self) -> bool {
        self.frames_until_respawn > 0
    }

    pub fn frames_until_respawn(&self) -> u32 {
        self.frames_until_respawn
    }

    pub fn update(&mut self, body: &mut Body, ctx: &TickContext, rng: &mut impl Rng, fx: &mut Effects) {
        if self.is_dead() {
            self.frames_until_respawn -= 1;
            if self.frames_until_respawn > 0 {
                return;
            }

            if ctx.player.game_over {
                fx.score.push(ScoreEvent::NewGame);
                body.position = ctx.bounds.center();
            }
            fx.grid_force(GridForce::Directed {
                force: Vec3::new(0.0, 0.0, 5000.0),
                position: body.position.extend(0.0),
                radius: 50.0,
            });
            return;
        }

        let aim = ctx.input.aim;
        if aim.length_squared() > 0.0 && self.cooldown_remaining == 0 {
            self.cooldown_remaining = COOLDOWN_FRAMES;
            self.fire(body.position, to_angle(aim), rng, fx);
        }
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);

        body.velocity += MOVE_SPEED * ctx.input.movement;
        body.position += body.velocity;
        body.clamp_to(ctx.bounds);

        if body.velocity.length_squared() > 0.0 {
            body.orientation = to_angle(body.velocity);
        }

        self.make_exhaust_fire(body, ctx, rng, fx);
        body.velocity = Vec2::ZERO;
    }

    /// Two parallel bullets from the wing tips
    fn fire(&self, position: Vec2, aim_angle: f32, rng: &mut impl Rng, fx: &mut Effects) {
        let spread = rng.next_float(-0.04, 0.04) + rng.next_float(-0.04, 0.04);
        let velocity = crate::polar_to_cartesian(BULLET_SPEED, aim_angle + spread);
        let rotation = Vec2::from_angle(aim_angle);

        for offset in [Vec2::new(35.0, -8.0), Vec2::new(35.0, 8.0)] {
            fx.spawned
                .push(Entity::bullet(position + rotation.rotate(offset), velocity));
        }
        fx.sound(SoundEvent::random(SoundEffect::Shot, 0.2, rng));
    }

    fn make_exhaust_fire(&self, body: &Body, ctx: &TickContext, rng: &mut impl Rng, fx: &mut Effects) {
        if body.velocity.length_squared() <= 0.1 {
            return;
        }

        let heading = Vec2::from_angle(body.orientation);
        let t = ctx.total_time as f32;
        // main stream flows backwards at 3 px/frame, the side streams sway
        let base_vel = scale_to(body.velocity, -3.0);
        let perp_vel = Vec2::new(base_vel.y, -base_vel.x) * (0.6 * (t * 10.0).sin());
        let pos = body.position + heading.rotate(Vec2::new(-25.0, 0.0));
        const ALPHA: f32 = 0.7;

        let exhaust = |sprite, tint: Color, velocity| {
            ParticleSpawn::new(
                sprite,
                pos,
                tint * ALPHA,
                60.0,
                1.0,
                ParticleState::new(velocity, ParticleKind::Enemy),
            )
            .with_scale(Vec2::new(0.5, 1.0))
        };

        let vel_mid = base_vel + rng.next_vec2(0.0, 1.0);
        fx.spawn_particle(exhaust(SpriteKind::LineParticle, Color::WHITE, vel_mid));
        fx.spawn_particle(exhaust(SpriteKind::Glow, EXHAUST_MID, vel_mid));

        let vel1 = base_vel + perp_vel + rng.next_vec2(0.0, 0.3);
        let vel2 = base_vel - perp_vel + rng.next_vec2(0.0, 0.3);
        fx.spawn_particle(exhaust(SpriteKind::LineParticle, Color::WHITE, vel1));
        fx.spawn_particle(exhaust(SpriteKind::LineParticle, Color::WHITE, vel2));
        fx.spawn_particle(exhaust(SpriteKind::Glow, EXHAUST_SIDE, vel1));
        fx.spawn_particle(exhaust(SpriteKind::Glow, EXHAUST_SIDE, vel2));
    }

    /// Blow up. The caller has already taken the life away; `game_over` picks
    /// the longer respawn delay.
    pub fn kill(&mut self, body: &Body, game_over: bool, rng: &mut impl Rng, fx: &mut Effects) {
        self.frames_until_respawn = if game_over {
            GAME_OVER_FRAMES
        } else {
            RESPAWN_FRAMES
        };
        log::debug!(
            "Player killed at ({:.0}, {:.0}), respawn in {} frames",
            body.position.x,
            body.position.y,
            self.frames_until_respawn
        );

        fx.particles.reserve(EXPLOSION_PARTICLES);
        for _ in 0..EXPLOSION_PARTICLES {
            let speed = 18.0 * (1.0 - 1.0 / rng.next_float(1.0, 10.0));
            let tint = Color::WHITE.lerp(PLAYER_EXPLOSION, rng.random::<f32>());
            let state = ParticleState::new(rng.next_vec2(speed, speed), ParticleKind::None);
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
        if !self.is_dead() {
            body.draw(sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::context::{PlayerView, TickInput};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (PlayerShip, Body, TickContext) {
        let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
        let entity = Entity::player(bounds);
        let ship = entity.as_player().cloned().unwrap();
        let mut ctx = TickContext::new(1, bounds, 3);
        ctx.player = PlayerView {
            position: entity.body.position,
            is_dead: false,
            game_over: false,
        };
        (ship, entity.body, ctx)
    }

    #[test]
    fn test_fires_two_bullets_then_cools_down() {
        let (mut ship, mut body, mut ctx) = setup();
        let mut rng = Pcg32::seed_from_u64(1);
        ctx.input = TickInput {
            aim: Vec2::X,
            ..TickInput::default()
        };

        let mut fx = Effects::new();
        ship.update(&mut body, &ctx, &mut rng, &mut fx);
        assert_eq!(fx.spawned.len(), 2);
        assert_eq!(fx.events.len(), 1);
        for bullet in &fx.spawned {
            assert!(bullet.body.velocity.x > 10.0);
            assert!((bullet.body.position.x - (body.position.x + 35.0)).abs() < 1e-3);
        }

        for _ in 0..COOLDOWN_FRAMES - 1 {
            ship.update(&mut body, &ctx, &mut rng, &mut fx);
        }
        assert_eq!(fx.spawned.len(), 2);
        ship.update(&mut body, &ctx, &mut rng, &mut fx);
        assert_eq!(fx.spawned.len(), 4);
    }

    #[test]
    fn test_moves_clamps_and_trails_exhaust() {
        let (mut ship, mut body, mut ctx) = setup();
        let mut rng = Pcg32::seed_from_u64(1);
        ctx.input.movement = Vec2::X;
        body.position = Vec2::new(775.0, 300.0);

        let mut fx = Effects::new();
        ship.update(&mut body, &ctx, &mut rng, &mut fx);
        assert_eq!(body.position.x, 780.0);
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(fx.particles.len(), 6);
        assert!(fx.particles.iter().all(|p| p.state.kind == ParticleKind::Enemy));
    }

    #[test]
    fn test_kill_and_respawn() {
        let (mut ship, mut body, ctx) = setup();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut fx = Effects::new();

        ship.kill(&body, false, &mut rng, &mut fx);
        assert!(ship.is_dead());
        assert_eq!(fx.particles.len(), EXPLOSION_PARTICLES);

        let mut fx = Effects::new();
        for _ in 0..RESPAWN_FRAMES - 1 {
            ship.update(&mut body, &ctx, &mut rng, &mut fx);
        }
        assert!(ship.is_dead());
        assert!(fx.grid.is_empty());

        ship.update(&mut body, &ctx, &mut rng, &mut fx);
        assert!(!ship.is_dead());
        assert_eq!(fx.grid.len(), 1);
        assert!(fx.score.is_empty());
    }

    #[test]
    fn test_game_over_respawn_starts_new_game() {
        let (mut ship, mut body, mut ctx) = setup();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut fx = Effects::new();
        body.position = Vec2::new(50.0, 50.0);
        ship.kill(&body, true, &mut rng, &mut fx);
        assert_eq!(ship.frames_until_respawn(), GAME_OVER_FRAMES);

        ctx.player.game_over = true;
        let mut fx = Effects::new();
        for _ in 0..GAME_OVER_FRAMES {
            ship.update(&mut body, &ctx, &mut rng, &mut fx);
        }
        assert_eq!(fx.score, vec![ScoreEvent::NewGame]);
        assert_eq!(body.position, ctx.bounds.center());
    }
}
