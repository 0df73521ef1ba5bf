//! Contact resolution between surface agents, bolts and pickups
//!
//! Everything here is a squared-distance test: agents are points on the
//! sphere and the radii are small enough that chord distance is fine.

use glam::Vec3;
use rand::Rng;

use super::pickup::Pickup;
use super::projectile::ProjectileHit;
use super::state::{GameEvent, GamePhase, GameState};

/// Whether two points are closer than `sqrt(radius_sq)`
#[inline]
pub fn overlaps(a: Vec3, b: Vec3, radius_sq: f32) -> bool {
    a.distance_squared(b) < radius_sq
}

/// Apply the consequences of a bolt striking an enemy
///
/// Every hit scores and rolls for a pickup drop, lethal or not. The pool has
/// already applied the damage and removed a killed enemy.
pub fn resolve_projectile_hit(state: &mut GameState, hit: ProjectileHit) {
    state.events.push(GameEvent::EnemyHit {
        enemy_id: hit.enemy_id,
        position: hit.position,
    });
    if hit.killed {
        state.events.push(GameEvent::EnemyKilled {
            enemy_id: hit.enemy_id,
            position: hit.position,
        });
    }
    state.add_score(state.tuning.score_per_hit);

    // Compare instead of random_bool so an unvalidated chance can't panic
    let roll: f64 = state.rng.random();
    if roll < state.tuning.drop_chance {
        spawn_pickup(state, hit.position);
    }
}

/// Drop a pickup at a surface point
pub fn spawn_pickup(state: &mut GameState, anchor: Vec3) {
    let id = state.next_entity_id();
    let pickup = Pickup::new(id, anchor, &state.tuning);
    state.events.push(GameEvent::PickupSpawned {
        pickup_id: id,
        position: pickup.position,
    });
    log::debug!("Pickup {} dropped at {:?}", id, anchor);
    state.pickups.push(pickup);
}

/// Collect every pickup the player is touching
pub fn collect_pickups(state: &mut GameState) {
    let player_pos = state.player.body.position;
    let radius_sq = state.tuning.pickup_radius_sq;

    for i in (0..state.pickups.len()).rev() {
        if !overlaps(player_pos, state.pickups[i].position, radius_sq) {
            continue;
        }
        let pickup = state.pickups.remove(i);
        state.player.empower(&state.tuning);
        state.add_score(state.tuning.score_per_pickup);
        state.events.push(GameEvent::PickupCollected {
            pickup_id: pickup.id,
            position: pickup.position,
        });
    }
}

/// Damage the player for each touching enemy and shove the enemy away
pub fn resolve_player_contacts(state: &mut GameState) {
    let player_pos = state.player.body.position;
    let radius_sq = state.tuning.player_enemy_radius_sq;
    let (force, duration) = (state.tuning.knock_force, state.tuning.knock_time);

    for i in (0..state.enemies.len()).rev() {
        let enemy = &mut state.enemies[i];
        if !enemy.is_alive() || !overlaps(player_pos, enemy.body.position, radius_sq) {
            continue;
        }
        enemy.knockback(player_pos, force, duration);
        damage_player(state);
        if state.is_game_over() {
            break;
        }
    }
}

/// Take one life unless the player is invulnerable
///
/// Returns true if a life was lost. Reaching zero lives ends the match; this
/// happens at most once because a finished match ignores further damage.
pub fn damage_player(state: &mut GameState) -> bool {
    if state.is_game_over() || !state.player.hit(&state.tuning) {
        return false;
    }

    state.set_lives(state.lives.saturating_sub(1));
    state.events.push(GameEvent::PlayerHit { lives: state.lives });

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            score: state.score,
            level: state.level,
        });
        log::info!("Game over: score {} at level {}", state.score, state.level);
    }
    true
}
