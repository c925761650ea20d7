//! Entity manager
//!
//! Owns every live entity plus three typed index views (enemies, bullets,
//! black holes) and the player slot. A frame runs in fixed phases:
//!
//! 1. Collisions: parallel read-only passes, each applied sequentially.
//! 2. Update: every entity steps in parallel against a frozen snapshot and
//!    records its side effects into its own buffer.
//! 3. Apply: buffers are folded in entity order (impulses, new entities,
//!    score).
//! 4. Reconcile: queued entities are merged and expired ones compacted out
//!    of every view at once.
//!
//! The containers only change in phases 3 and 4, which are single-threaded.

use glam::Vec2;
use rayon::prelude::*;

use super::collision;
use super::context::{PlayerView, TickContext};
use super::effects::Effects;
use super::entity::{Bucket, Entity, EntityId, EntityKind, Probe, STREAM_KILL};
use super::state::GameEvent;
use super::status::PlayerStatus;
use crate::renderer::DrawSink;

#[derive(Debug, Default)]
pub struct EntityManager {
    entities: Vec<Entity>,
    enemies: Vec<usize>,
    bullets: Vec<usize>,
    black_holes: Vec<usize>,
    player: Option<usize>,
    /// Entities added while an update pass is running
    pending: Vec<Entity>,
    updating: bool,
    next_id: u32,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert now, or after the running update pass
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        self.next_id += 1;
        entity.id = EntityId(self.next_id);
        let id = entity.id;

        if self.updating {
            self.pending.push(entity);
        } else {
            self.insert(entity);
        }
        id
    }

    fn insert(&mut self, entity: Entity) {
        let index = self.entities.len();
        self.index(index, &entity);
        self.entities.push(entity);
    }

    fn index(&mut self, index: usize, entity: &Entity) {
        match entity.bucket() {
            Some(Bucket::Enemy) => self.enemies.push(index),
            Some(Bucket::Bullet) => self.bullets.push(index),
            Some(Bucket::BlackHole) => self.black_holes.push(index),
            None => {
                if matches!(entity.kind, EntityKind::Player(_)) {
                    self.player = Some(index);
                }
            }
        }
    }

    pub fn count(&self) -> usize {
        self.entities.len()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn bullet_count(&self) -> usize {
        self.bullets.len()
    }

    pub fn black_hole_count(&self) -> usize {
        self.black_holes.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.enemies.iter().map(|&i| &self.entities[i])
    }

    pub fn bullets(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.bullets.iter().map(|&i| &self.entities[i])
    }

    pub fn black_holes(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.black_holes.iter().map(|&i| &self.entities[i])
    }

    pub fn black_hole_positions(&self) -> Vec<Vec2> {
        self.black_holes().map(|e| e.body.position).collect()
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.map(|i| &self.entities[i])
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    fn player_is_dead(&self) -> bool {
        self.player()
            .and_then(Entity::as_player)
            .is_none_or(|ship| ship.is_dead())
    }

    /// What enemies and the spawner may know about the player
    pub fn player_view(&self, status: &PlayerStatus) -> PlayerView {
        match self.player() {
            Some(entity) => PlayerView {
                position: entity.body.position,
                is_dead: self.player_is_dead(),
                game_over: status.is_game_over(),
            },
            None => PlayerView {
                game_over: status.is_game_over(),
                ..PlayerView::default()
            },
        }
    }

    /// Live entities within `radius` of `position`
    pub fn get_nearby_entities(&self, position: Vec2, radius: f32) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| !e.is_expired() && e.body.position.distance_squared(position) < radius * radius)
            .collect()
    }

    /// Run one frame. Side effects meant for the particle pool, the grid and
    /// the host are appended to `fx`. Returns whether the player died.
    pub fn update(&mut self, ctx: &TickContext, status: &mut PlayerStatus, fx: &mut Effects) -> bool {
        self.updating = true;

        let player_killed = self.handle_collisions(ctx, status, fx);

        let ctx = ctx.with_player(self.player_view(status));
        let snapshot: Vec<Probe> = self.entities.iter().map(Entity::probe).collect();

        let mut buffers: Vec<Effects> = self
            .entities
            .par_iter_mut()
            .enumerate()
            .map(|(index, entity)| {
                let mut own = Effects::new();
                if !entity.is_expired() {
                    entity.update(index, &ctx, &snapshot, &mut own);
                }
                own
            })
            .collect();

        for own in &mut buffers {
            for (target, impulse) in own.impulses.drain(..) {
                self.entities[target].body.velocity += impulse;
            }
            for entity in own.spawned.drain(..) {
                self.add(entity);
            }
            let player_dead = self.player_is_dead();
            for event in own.score.drain(..) {
                if let Some(high_score) = status.apply(event, player_dead) {
                    fx.events.push(GameEvent::NewHighScore(high_score));
                }
            }
            fx.append(own);
        }

        self.updating = false;

        for entity in std::mem::take(&mut self.pending) {
            self.insert(entity);
        }
        self.compact();

        player_killed
    }

    /// Drop expired entities from every view at once
    fn compact(&mut self) {
        self.entities.retain(|e| !e.is_expired());
        self.enemies.clear();
        self.bullets.clear();
        self.black_holes.clear();
        self.player = None;

        let entities = std::mem::take(&mut self.entities);
        for (index, entity) in entities.iter().enumerate() {
            self.index(index, entity);
        }
        self.entities = entities;
    }

    /// The four collision passes, in order. Returns whether the player died.
    fn handle_collisions(&mut self, ctx: &TickContext, status: &mut PlayerStatus, fx: &mut Effects) -> bool {
        // enemies push each other apart
        let impulses = collision::separation_impulses(&self.entities, &self.enemies);
        for (&i, impulse) in self.enemies.iter().zip(impulses) {
            self.entities[i].body.velocity += impulse;
        }

        // bullets destroy enemies, one enemy per bullet
        let hits = collision::bullet_hits(&self.entities, &self.enemies, &self.bullets);
        for (k, bullets) in hits.into_iter().enumerate() {
            let enemy = self.enemies[k];
            for bullet in bullets {
                if self.entities[enemy].is_expired() {
                    break;
                }
                if self.entities[bullet].is_expired() {
                    continue;
                }
                self.entities[bullet].body.expired = true;
                self.shoot(enemy, ctx, status, fx);
            }
        }

        let mut player_killed = false;

        if let Some(player) = self.player {
            if collision::player_hit(&self.entities, player, &self.enemies) {
                self.kill_player(ctx, status, fx);
                player_killed = true;
            }
        }

        let contacts = collision::black_hole_contacts(
            &self.entities,
            &self.black_holes,
            &self.enemies,
            &self.bullets,
            self.player,
        );
        for (k, contact) in contacts.into_iter().enumerate() {
            let hole = self.black_holes[k];
            for enemy in contact.enemies {
                self.shoot(enemy, ctx, status, fx);
            }
            for bullet in contact.bullets {
                if self.entities[hole].is_expired() || self.entities[bullet].is_expired() {
                    continue;
                }
                self.entities[bullet].body.expired = true;
                self.shoot(hole, ctx, status, fx);
            }
            if contact.player && !player_killed && !self.player_is_dead() {
                self.kill_player(ctx, status, fx);
                player_killed = true;
            }
        }

        player_killed
    }

    /// Shoot one entity and settle its score right away
    fn shoot(&mut self, index: usize, ctx: &TickContext, status: &mut PlayerStatus, fx: &mut Effects) {
        let mut shot = Effects::new();
        self.entities[index].was_shot(ctx, &mut shot);
        self.settle(&mut shot, status, fx);
    }

    fn settle(&self, shot: &mut Effects, status: &mut PlayerStatus, fx: &mut Effects) {
        let player_dead = self.player_is_dead();
        for event in shot.score.drain(..) {
            if let Some(high_score) = status.apply(event, player_dead) {
                fx.events.push(GameEvent::NewHighScore(high_score));
            }
        }
        fx.append(shot);
    }

    /// Take a life, blow up the ship and clear the board
    fn kill_player(&mut self, ctx: &TickContext, status: &mut PlayerStatus, fx: &mut Effects) {
        let Some(player) = self.player else {
            return;
        };

        status.remove_life();
        let game_over = status.is_game_over();

        let entity = &mut self.entities[player];
        let mut rng = entity.rng(ctx, STREAM_KILL);
        if let EntityKind::Player(ship) = &mut entity.kind {
            ship.kill(&entity.body, game_over, &mut rng, fx);
        }
        fx.events.push(GameEvent::PlayerKilled);

        // the ship is dead now, so none of this scores
        let mut blast = Effects::new();
        for k in 0..self.enemies.len() {
            let enemy = self.enemies[k];
            self.entities[enemy].kill(ctx, &mut blast);
        }
        for k in 0..self.black_holes.len() {
            let hole = self.black_holes[k];
            self.entities[hole].kill(ctx, &mut blast);
        }
        self.settle(&mut blast, status, fx);
    }

    /// Draw every entity in insertion order
    pub fn draw(&self, sink: &mut dyn DrawSink, time: f64) {
        for entity in &self.entities {
            entity.draw(sink, time);
        }
    }
}
