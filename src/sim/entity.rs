//! Entity model
//!
//! Every object in the arena shares a [`Body`] (position, velocity,
//! orientation, collision radius, expiry flag, look). What it *is* lives in
//! the [`EntityKind`] tag, so the manager can bucket entities and dispatch
//! behavior with a `match` instead of inspecting types at runtime.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::black_hole::BlackHole;
use super::bullet::Bullet;
use super::context::TickContext;
use super::effects::Effects;
use super::enemy::Enemy;
use super::player::PlayerShip;
use crate::Color;
use crate::renderer::{DrawSink, SpriteKind};

/// Default collision radius
pub const DEFAULT_RADIUS: f32 = 20.0;

// Per-entity RNG streams within a frame
pub(crate) const STREAM_UPDATE: u32 = 0;
pub(crate) const STREAM_KILL: u32 = 1;
pub(crate) const STREAM_SHOT: u32 = 2;

/// Stable entity identifier, assigned by the manager on insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// State common to every entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub orientation: f32,
    /// Circle used for collision tests
    pub radius: f32,
    /// Destroyed; removed at the next compaction
    pub expired: bool,
    pub tint: Color,
    pub sprite: SpriteKind,
    pub scale: f32,
}

impl Body {
    pub fn new(sprite: SpriteKind, position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            orientation: 0.0,
            radius: DEFAULT_RADIUS,
            expired: false,
            tint: Color::WHITE,
            sprite,
            scale: 1.0,
        }
    }

    /// Nominal sprite size
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.sprite.size()
    }

    /// Keep the whole sprite on screen
    pub fn clamp_to(&mut self, bounds: crate::Rect) {
        let half = self.size() / 2.0;
        self.position = self
            .position
            .clamp(bounds.min + half, (bounds.max() - half).max(bounds.min + half));
    }

    pub fn draw(&self, sink: &mut dyn DrawSink) {
        self.draw_scaled(sink, self.tint, self.scale);
    }

    pub fn draw_scaled(&self, sink: &mut dyn DrawSink, tint: Color, scale: f32) {
        sink.draw(
            self.sprite,
            self.position,
            self.orientation,
            self.sprite.center(),
            Vec2::splat(scale),
            tint,
        );
    }
}

/// Which typed view of the manager an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Enemy,
    Bullet,
    BlackHole,
}

/// Variant-specific state
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Player(PlayerShip),
    Enemy(Enemy),
    Bullet(Bullet),
    BlackHole(BlackHole),
}

/// Read-only summary of an entity, shared with every worker during the
/// update pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub position: Vec2,
    pub expired: bool,
    pub class: ProbeClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeClass {
    Player { dead: bool },
    Enemy { active: bool },
    Bullet,
    BlackHole,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub body: Body,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(body: Body, kind: EntityKind) -> Self {
        Self {
            id: EntityId::default(),
            body,
            kind,
        }
    }

    /// Typed view this entity is indexed under; the player has none
    pub fn bucket(&self) -> Option<Bucket> {
        match self.kind {
            EntityKind::Player(_) => None,
            EntityKind::Enemy(_) => Some(Bucket::Enemy),
            EntityKind::Bullet(_) => Some(Bucket::Bullet),
            EntityKind::BlackHole(_) => Some(Bucket::BlackHole),
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.body.expired
    }

    /// Takes part in collisions: alive, and past any spawn-in grace
    pub fn is_active(&self) -> bool {
        !self.body.expired
            && match &self.kind {
                EntityKind::Enemy(enemy) => enemy.is_active(),
                EntityKind::Player(ship) => !ship.is_dead(),
                _ => true,
            }
    }

    pub fn as_player(&self) -> Option<&PlayerShip> {
        match &self.kind {
            EntityKind::Player(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_black_hole(&self) -> Option<&BlackHole> {
        match &self.kind {
            EntityKind::BlackHole(hole) => Some(hole),
            _ => None,
        }
    }

    pub fn probe(&self) -> Probe {
        let class = match &self.kind {
            EntityKind::Player(ship) => ProbeClass::Player {
                dead: ship.is_dead(),
            },
            EntityKind::Enemy(enemy) => ProbeClass::Enemy {
                active: enemy.is_active(),
            },
            EntityKind::Bullet(_) => ProbeClass::Bullet,
            EntityKind::BlackHole(_) => ProbeClass::BlackHole,
        };
        Probe {
            position: self.body.position,
            expired: self.body.expired,
            class,
        }
    }

    /// This entity's private RNG for one purpose this frame
    pub fn rng(&self, ctx: &TickContext, stream: u32) -> Pcg32 {
        ctx.rng_for((u64::from(self.id.0) << 32) | u64::from(stream))
    }

    /// Per-frame behavior. `index` is this entity's slot in `snapshot`.
    pub fn update(&mut self, index: usize, ctx: &TickContext, snapshot: &[Probe], fx: &mut Effects) {
        let mut rng = self.rng(ctx, STREAM_UPDATE);
        let body = &mut self.body;
        match &mut self.kind {
            EntityKind::Player(ship) => ship.update(body, ctx, &mut rng, fx),
            EntityKind::Enemy(enemy) => enemy.update(body, ctx, &mut rng),
            EntityKind::Bullet(bullet) => bullet.update(body, ctx, &mut rng, fx),
            EntityKind::BlackHole(hole) => hole.update(body, index, ctx, snapshot, &mut rng, fx),
        }
    }

    /// Hit by a bullet, a black hole or the player's death blast.
    /// Players and bullets ignore it; expired entities cannot be shot again.
    pub fn was_shot(&mut self, ctx: &TickContext, fx: &mut Effects) {
        if self.body.expired {
            return;
        }
        let stream = match &self.kind {
            EntityKind::BlackHole(hole) => STREAM_SHOT + hole.hits_taken(),
            _ => STREAM_SHOT,
        };
        let mut rng = self.rng(ctx, stream);
        let body = &mut self.body;
        match &mut self.kind {
            EntityKind::Enemy(enemy) => enemy.was_shot(body, &mut rng, fx),
            EntityKind::BlackHole(hole) => hole.was_shot(body, ctx, &mut rng, fx),
            EntityKind::Player(_) | EntityKind::Bullet(_) => {}
        }
    }

    /// Destroy outright, ignoring any remaining hit points
    pub fn kill(&mut self, ctx: &TickContext, fx: &mut Effects) {
        if self.body.expired {
            return;
        }
        let mut rng = self.rng(ctx, STREAM_KILL);
        let body = &mut self.body;
        match &mut self.kind {
            EntityKind::Enemy(enemy) => enemy.was_shot(body, &mut rng, fx),
            EntityKind::BlackHole(hole) => hole.kill(body, ctx, &mut rng, fx),
            EntityKind::Bullet(_) => body.expired = true,
            // the player has lives; see `EntityManager::kill_player`
            EntityKind::Player(_) => {}
        }
    }

    /// Push away from an overlapping neighbor at `other`
    pub fn handle_collision(&mut self, other: Vec2) {
        self.body.velocity += separation(self.body.position, other);
    }

    pub fn draw(&self, sink: &mut dyn DrawSink, time: f64) {
        match &self.kind {
            EntityKind::Player(ship) => ship.draw(&self.body, sink),
            EntityKind::Enemy(enemy) => enemy.draw(&self.body, sink),
            EntityKind::Bullet(_) => self.body.draw(sink),
            EntityKind::BlackHole(hole) => hole.draw(&self.body, sink, time),
        }
    }
}

/// Repulsion felt at `position` from a neighbor at `other`
#[inline]
pub fn separation(position: Vec2, other: Vec2) -> Vec2 {
    let d = position - other;
    10.0 * d / (d.length_squared() + 1.0)
}
