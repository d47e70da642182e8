//! Fixed timestep simulation tick
//!
//! Advances the world deterministically: marshalled input, entity motion,
//! spawning, collision resolution, then the game-over check, in that order
//! on every tick.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameEvent, GameState, Stone};
use crate::consts::*;

/// Input captured for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Latest tilt reading, if the sensor produced one
    pub tilt: Option<f32>,
    /// Taps drained from the input queue since the previous tick
    pub taps: u32,
}

/// Advance the game state by one fixed timestep.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    // Phase 0: apply marshalled input. A tap fires while the game is
    // active and restarts once it is over; taps after a restart in the
    // same drain fire into the fresh run.
    if let Some(tilt) = input.tilt {
        state.player.set_acceleration(tilt);
    }
    for _ in 0..input.taps {
        if state.game_over {
            state.restart();
        } else {
            state.fire();
        }
    }

    state.player.update(dt);

    for bullet in &mut state.bullets {
        bullet.update(dt);
    }
    state.bullets.retain(|b| !b.off_screen());

    // Stones: advance, charge a life for any that slip past the bottom,
    // then sweep the ones whose explosion has finished. A missed stone is
    // not removed here; it still plays its full explosion first.
    for stone in &mut state.stones {
        stone.update(dt);
        if !stone.is_exploding() && stone.pos.y > state.screen_height {
            state.player.decrease_lives();
            state.events.push(GameEvent::StoneMissed);
            stone.force_destroy();
        }
    }
    state.stones.retain(|s| !s.is_spent());

    state.spawn_timer += dt;
    if state.spawn_timer >= STONE_SPAWN_INTERVAL {
        spawn_stone(state);
        state.spawn_timer = 0.0;
    }

    collide_bullets_with_stones(state);
    collide_stones_with_player(state);

    if state.player.lives() <= 0 && !state.game_over {
        state.game_over = true;
        state.events.push(GameEvent::GameOver);
        log::info!("game over at tick {}", state.time_ticks);
    }
}

/// Spawn one stone at the top edge: random x with a clear band at the
/// right, random health in [1, 3]. Each spawn draws from its own RNG
/// stream derived from the run seed, so equal seeds place equal stones.
fn spawn_stone(state: &mut GameState) {
    let stream = (state.spawn_count as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(state.seed);
    let mut rng = Pcg32::seed_from_u64(stream);

    let x = rng.random_range(0.0..state.screen_width - STONE_SPAWN_MARGIN);
    let health = rng.random_range(STONE_MIN_HEALTH..=STONE_MAX_HEALTH);

    state.stones.push(Stone::new(x, 0.0, health));
    state.spawn_count += 1;
    log::debug!("stone {} spawned at x={x:.0} health={health}", state.spawn_count);
}

/// Bullet pass: each bullet damages at most one stone per tick, scanning
/// stones in order and skipping exploding ones. Removals are applied
/// after the scan so the lists are never mutated mid-iteration.
fn collide_bullets_with_stones(state: &mut GameState) {
    let mut spent = vec![false; state.bullets.len()];

    for (i, bullet) in state.bullets.iter().enumerate() {
        let bullet_bounds = bullet.bounds();
        for stone in &mut state.stones {
            if stone.is_exploding() {
                continue;
            }
            if bullet_bounds.intersects(&stone.bounds()) {
                stone.decrease_health();
                spent[i] = true;
                if stone.health() <= 0 {
                    state.events.push(GameEvent::StoneDestroyed);
                }
                break;
            }
        }
    }

    let mut spent = spent.into_iter();
    state.bullets.retain(|_| !spent.next().unwrap());
}

/// Ram pass: one life per overlapping stone per tick. The stone takes a
/// hit too, which starts its explosion once its health runs out. Runs
/// after the bullet pass, so a stone can take both in the same tick.
fn collide_stones_with_player(state: &mut GameState) {
    let player_bounds = state.player.bounds();
    for stone in &mut state.stones {
        if stone.is_exploding() {
            continue;
        }
        if player_bounds.intersects(&stone.bounds()) {
            state.player.decrease_lives();
            stone.decrease_health();
            state.events.push(GameEvent::PlayerHit);
        }
    }
}
