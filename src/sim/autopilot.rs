//! Attract-mode pilot
//!
//! Produces the input a (not very good) player would give: hunt the nearest
//! saucer, detour for power-ups when nothing is close.

use glam::{Vec2, Vec3};

use super::sphere::{signed_turn_angle, tangent_direction};
use super::state::GameState;
use super::tick::TickInput;

/// Enemies closer than this (squared) take priority over pickups
const THREAT_DISTANCE_SQ: f32 = 36.0;
/// Don't thrust into an enemy closer than this (squared)
const STANDOFF_DISTANCE_SQ: f32 = 9.0;
/// Turn input per radian of heading error
const TURN_GAIN: f32 = 3.0;
/// Fire when the target is within this heading error (radians)
const FIRE_CONE: f32 = 0.15;
/// Thrust only while roughly facing the target (radians)
const THRUST_CONE: f32 = 0.6;

/// Build the input for one tick of autopilot
pub fn autopilot_input(state: &GameState) -> TickInput {
    let body = &state.player.body;
    let position = body.position;

    let nearest_enemy = nearest(
        position,
        state
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| e.body.position),
    );
    let nearest_pickup = nearest(position, state.pickups.iter().map(|p| p.anchor));

    let (target, hunting) = match (nearest_enemy, nearest_pickup) {
        (Some(enemy), Some(pickup)) if position.distance_squared(enemy) > THREAT_DISTANCE_SQ => {
            (pickup, false)
        }
        (Some(enemy), _) => (enemy, true),
        (None, Some(pickup)) => (pickup, false),
        (None, None) => return TickInput::default(),
    };

    let normal = body.normal();
    let Some(heading) = tangent_direction(target - position, normal) else {
        return TickInput::default();
    };

    // Slight weave so demo runs don't settle into a perfect orbit
    let weave = (state.elapsed * 0.7).sin() * 0.05;
    let error = signed_turn_angle(body.forward, heading, normal) + weave;

    let distance_sq = position.distance_squared(target);
    let keep_back = hunting && distance_sq < STANDOFF_DISTANCE_SQ;

    TickInput {
        axis: Vec2::new((error * TURN_GAIN).clamp(-1.0, 1.0), 0.0),
        thrust: error.abs() < THRUST_CONE && !keep_back,
        fire: hunting && error.abs() < FIRE_CONE,
        ..Default::default()
    }
}

fn nearest(from: Vec3, points: impl Iterator<Item = Vec3>) -> Option<Vec3> {
    points.min_by(|a, b| {
        from.distance_squared(*a)
            .partial_cmp(&from.distance_squared(*b))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::spawn_pickup;
    use crate::sim::enemy::Enemy;

    fn empty_state() -> GameState {
        let mut state = GameState::new(21);
        state.enemies.clear();
        state
    }

    #[test]
    fn test_idle_without_targets() {
        let state = empty_state();
        let input = autopilot_input(&state);
        assert!(!input.fire && !input.thrust);
        assert_eq!(input.turn_axis(), 0.0);
    }

    #[test]
    fn test_fires_at_enemy_dead_ahead() {
        let mut state = empty_state();
        let r = state.tuning.surface_radius;
        // Player at the north pole facing +Z
        let pos = Vec3::new(0.0, r, 4.0).normalize() * r;
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, pos, 1, &state.tuning));

        let input = autopilot_input(&state);
        assert!(input.fire);
        assert!(input.thrust);
        assert!(input.turn_axis().abs() < 0.2);
    }

    #[test]
    fn test_turns_toward_enemy_on_the_right() {
        let mut state = empty_state();
        let r = state.tuning.surface_radius;
        // Right of +Z at the north pole is +X
        let pos = Vec3::new(4.0, r, 0.0).normalize() * r;
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, pos, 1, &state.tuning));

        let input = autopilot_input(&state);
        assert!(input.turn_axis() > 0.9);
        assert!(!input.fire);
    }

    #[test]
    fn test_prefers_pickup_when_enemies_are_far() {
        let mut state = empty_state();
        let r = state.tuning.surface_radius;
        let id = state.next_entity_id();
        // Enemy on the far side of the planet
        state.enemies.push(Enemy::new(id, -Vec3::Y * r, 1, &state.tuning));
        spawn_pickup(&mut state, Vec3::new(-3.0, r, 0.0).normalize() * r);

        let input = autopilot_input(&state);
        // Pickup lies to the left
        assert!(input.turn_axis() < -0.9);
        assert!(!input.fire);
    }
}
