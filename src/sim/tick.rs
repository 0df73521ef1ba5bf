//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::{Vec2, Vec3};

use super::autopilot::autopilot_input;
use super::collision;
use super::enemy::Enemy;
use super::sphere::random_surface_point;
use super::state::{GameEvent, GamePhase, GameState, TickContext};
use crate::consts::MAX_SPAWN_ATTEMPTS;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Analog stick: x turns (positive = right), y thrusts (positive = forward)
    pub axis: Vec2,
    /// Thrust button
    pub thrust: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Fire button (held fires at the cooldown rate)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot flies the ship
    pub idle_mode: bool,
}

impl TickInput {
    /// Combined turn command in [-1, 1]; opposing buttons cancel
    pub fn turn_axis(&self) -> f32 {
        let buttons = self.turn_right as i32 - self.turn_left as i32;
        (buttons as f32 + self.axis.x).clamp(-1.0, 1.0)
    }

    /// Thrust amount in [0, 1]
    pub fn thrust_amount(&self) -> f32 {
        if self.thrust {
            1.0
        } else {
            self.axis.y.clamp(0.0, 1.0)
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Active => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused at tick {}", state.time_ticks);
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Active,
            _ => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        _ => {}
    }

    // A zero-length step leaves the match untouched
    if dt <= 0.0 {
        return;
    }

    let autopilot;
    let input = if input.idle_mode {
        autopilot = autopilot_input(state);
        &autopilot
    } else {
        input
    };

    state.time_ticks += 1;
    state.elapsed += dt;

    let ctx = TickContext {
        tuning: &state.tuning,
        dt,
        elapsed: state.elapsed,
    };

    // Player
    let shots = state.player.update(&ctx, input, &mut state.projectiles);
    if shots > 0 {
        state.events.push(GameEvent::LaserFired {
            shots,
            origin: state.player.body.position,
        });
    }

    // Projectiles (killed enemies leave the list here)
    let mut hits = Vec::new();
    state
        .projectiles
        .advance(dt, ctx.tuning, &mut state.enemies, |hit| hits.push(hit));

    // Enemies
    let target = state.player.body.position;
    for enemy in &mut state.enemies {
        enemy.update(&ctx, target);
    }

    // Pickups
    for pickup in &mut state.pickups {
        pickup.update(dt, ctx.tuning);
    }

    // Collisions
    for hit in hits {
        collision::resolve_projectile_hit(state, hit);
    }
    collision::collect_pickups(state);
    collision::resolve_player_contacts(state);

    if state.is_game_over() {
        return;
    }

    // Progression
    if state.enemies.is_empty() {
        state.phase = GamePhase::Cleared;
        state.events.push(GameEvent::WaveCleared { level: state.level });
        log::info!("Level {} cleared (score {})", state.level, state.score);
        advance_level(state);
    }
}

/// Move from a cleared wave to the next level
pub fn advance_level(state: &mut GameState) {
    // Leftover pickups would otherwise carry into the next wave
    state.pickups.clear();
    state.level += 1;
    state.events.push(GameEvent::LevelChanged(state.level));
    state.set_lives(state.lives.saturating_add(1));
    spawn_wave(state);
}

/// Place the enemies for the current level and enter the active phase
pub fn spawn_wave(state: &mut GameState) {
    state.phase = GamePhase::Spawning;

    let level = state.level;
    let count = state.tuning.wave_size(level);
    let radius = state.tuning.surface_radius;
    let player = state.player.body;

    for i in 0..count {
        let position = if i == 0 {
            // First one in plain sight
            player.position + player.forward * radius * state.tuning.first_enemy_offset
        } else {
            spawn_point(state, player.position)
        };
        let id = state.next_entity_id();
        let enemy = Enemy::new(id, position, level, &state.tuning);
        state.enemies.push(enemy);
    }

    state.events.push(GameEvent::WaveSpawned {
        level,
        enemies: count,
    });
    log::info!(
        "Level {}: spawned {} enemies (speed {:.2}, health {})",
        level,
        count,
        state.tuning.enemy_speed(level),
        state.tuning.enemy_health(level)
    );
    state.phase = GamePhase::Active;
}

/// Uniform surface point far enough from the player
fn spawn_point(state: &mut GameState, player: Vec3) -> Vec3 {
    let radius = state.tuning.surface_radius;
    let min_sq = state.tuning.spawn_min_separation_sq;

    let mut candidate = random_surface_point(&mut state.rng, radius);
    let mut attempts = 1;
    while candidate.distance_squared(player) < min_sq {
        if attempts >= MAX_SPAWN_ATTEMPTS {
            // Antipode is as far as it gets
            log::warn!("Spawn sampling gave up after {} attempts", attempts);
            return -player;
        }
        candidate = random_surface_point(&mut state.rng, radius);
        attempts += 1;
    }
    candidate
}
