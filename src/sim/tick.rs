//! Fixed timestep simulation tick
//!
//! One call advances the whole world by one frame, in a fixed order: status
//! timers, entities (collisions, then behavior), the spawner, and finally the
//! particle pool and the grid, which consume what the entities produced.

use super::context::{TickContext, TickInput};
use super::effects::Effects;
use super::particle_physics::ArenaPolicy;
use super::state::{GamePhase, GameState};

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.phase = match state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
        };
        log::info!("Game {:?} at frame {}", state.phase, state.frame);
    }

    if state.phase == GamePhase::Paused {
        return;
    }

    state.frame += 1;
    state.time += dt as f64;

    let mut ctx = TickContext::new(state.frame, state.bounds, state.seed);
    ctx.dt = dt;
    ctx.total_time = state.time;
    ctx.input = *input;
    ctx.player = state.entities.player_view(&state.status);

    state.status.update(dt);

    let mut fx = Effects::new();
    if state.entities.update(&ctx, &mut state.status, &mut fx) {
        log::debug!(
            "Player killed at frame {} ({} lives left)",
            state.frame,
            state.status.lives
        );
        state.spawner.reset();
    }

    let player = state.entities.player_view(&state.status);
    state.spawner.update(&mut state.entities, player, state.bounds, &mut fx);

    let Effects {
        particles,
        grid,
        events,
        ..
    } = fx;
    state.particles.spawn_all(particles);
    for force in &grid {
        state.grid.apply(force);
    }
    state.events.extend(events);

    let policy = ArenaPolicy::new(state.bounds.size, state.entities.black_hole_positions());
    state.particles.update(&policy);
    state.grid.update();

    log::trace!(
        "frame {}: {} entities, {} particles",
        state.frame,
        state.entities.count(),
        state.particles.count()
    );
}
