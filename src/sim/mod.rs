//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, one stream per entity per frame
//! - Parallel passes either own disjoint elements or only read, and their
//!   results are applied in entity order
//! - No rendering or platform dependencies beyond the `DrawSink` seam

pub mod black_hole;
pub mod bullet;
pub mod collision;
pub mod context;
pub mod effects;
pub mod enemy;
pub mod entity;
pub mod entity_manager;
pub mod grid;
pub mod particle_physics;
pub mod particles;
pub mod player;
pub mod random;
pub mod spawner;
pub mod state;
pub mod status;
pub mod tick;

pub use context::{PlayerView, TickContext, TickInput};
pub use effects::Effects;
pub use entity::{Body, Entity, EntityId, EntityKind};
pub use entity_manager::EntityManager;
pub use grid::{Grid, GridForce};
pub use particle_physics::ArenaPolicy;
pub use particles::{Particle, ParticleKind, ParticlePool, ParticleSpawn, ParticleState};
pub use spawner::EnemySpawner;
pub use state::{GameEvent, GamePhase, GameState};
pub use status::{PlayerStatus, ScoreEvent};
pub use tick::tick;
