//! Collision detection between entities
//!
//! Everything here is circle-circle and read-only. Each pass runs in parallel
//! over the entity slice and returns what it found; the entity manager then
//! applies the results one by one, re-checking expiry as it goes, so the
//! outcome never depends on thread scheduling.

use glam::Vec2;
use rayon::prelude::*;

use super::entity::{Body, Entity, separation};

/// Circles overlap and neither side is already destroyed
#[inline]
pub fn is_colliding(a: &Body, b: &Body) -> bool {
    let radius = a.radius + b.radius;
    !a.expired && !b.expired && a.position.distance_squared(b.position) < radius * radius
}

/// Total push each enemy receives from the enemies overlapping it.
///
/// Returned in `enemies` order. Every pair contributes equal and opposite
/// amounts to its two members, and each enemy only ever writes its own sum.
pub fn separation_impulses(entities: &[Entity], enemies: &[usize]) -> Vec<Vec2> {
    enemies
        .par_iter()
        .map(|&i| {
            let me = &entities[i];
            if !me.is_active() {
                return Vec2::ZERO;
            }
            enemies
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| &entities[j])
                .filter(|other| other.is_active() && is_colliding(&me.body, &other.body))
                .fold(Vec2::ZERO, |acc, other| {
                    acc + separation(me.body.position, other.body.position)
                })
        })
        .collect()
}

/// For each enemy, the bullets overlapping it, in bullet order
pub fn bullet_hits(entities: &[Entity], enemies: &[usize], bullets: &[usize]) -> Vec<Vec<usize>> {
    enemies
        .par_iter()
        .map(|&i| {
            let enemy = &entities[i];
            if !enemy.is_active() {
                return Vec::new();
            }
            bullets
                .iter()
                .copied()
                .filter(|&b| is_colliding(&enemy.body, &entities[b].body))
                .collect()
        })
        .collect()
}

/// Whether any active enemy touches the living player.
///
/// Stops at the first contact found; at most one death comes out of it.
pub fn player_hit(entities: &[Entity], player: usize, enemies: &[usize]) -> bool {
    let ship = &entities[player];
    if !ship.is_active() {
        return false;
    }
    enemies.par_iter().any(|&i| {
        let enemy = &entities[i];
        enemy.is_active() && is_colliding(&ship.body, &enemy.body)
    })
}

/// Everything one black hole is touching
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoleContacts {
    /// Active enemies to destroy
    pub enemies: Vec<usize>,
    /// Bullets to absorb, each costing the hole a hit point
    pub bullets: Vec<usize>,
    pub player: bool,
}

/// Contacts for every black hole, in `holes` order
pub fn black_hole_contacts(
    entities: &[Entity],
    holes: &[usize],
    enemies: &[usize],
    bullets: &[usize],
    player: Option<usize>,
) -> Vec<HoleContacts> {
    holes
        .par_iter()
        .map(|&h| {
            let hole = &entities[h].body;
            let touching = |&i: &usize| is_colliding(hole, &entities[i].body);

            HoleContacts {
                enemies: enemies
                    .iter()
                    .copied()
                    .filter(|&i| entities[i].is_active() && touching(&i))
                    .collect(),
                bullets: bullets.iter().copied().filter(touching).collect(),
                player: player.is_some_and(|p| entities[p].is_active() && touching(&p)),
            }
        })
        .collect()
}
