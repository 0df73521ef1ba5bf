//! Stardust - An arcade shooter on the surface of a tiny planet
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spherical motion, combat, waves)
//! - `tuning`: Data-driven game balance
//! - `audio`: Audio sink with gesture-gated initialization
//! - `session`: Fixed timestep host loop and event dispatch

pub mod audio;
pub mod error;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use session::{HudSink, RenderSink, Session};
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
///
/// These are the defaults behind [`Tuning`]; gameplay code reads the tuning
/// values so a JSON file can override them.
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Longest real frame the host will catch up on (spiral of death guard)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Planet geometry
    pub const PLANET_RADIUS: f32 = 13.5;
    /// Agents hover slightly above the planet mesh
    pub const SURFACE_RADIUS: f32 = PLANET_RADIUS + 0.4;

    /// Below this length a tangent move counts as stationary
    pub const MOVE_EPSILON: f32 = 1e-5;
    /// Below this squared length a direction is too short to normalize
    pub const DIRECTION_EPSILON_SQ: f32 = 1e-8;

    /// Player kinematics
    pub const PLAYER_ACCELERATION: f32 = 24.0;
    pub const PLAYER_DRAG: f32 = 1.6;
    pub const PLAYER_TURN_RATE: f32 = 4.2; // rad/s around the surface normal
    pub const PLAYER_FIRE_RATE: f32 = 0.12; // seconds between shots
    pub const PLAYER_MIN_FIRE_COOLDOWN: f32 = 0.05;
    pub const PLAYER_COOLDOWN_PER_POWER: f32 = 0.02;
    pub const PLAYER_INVULNERABLE_TIME: f32 = 1.2;
    pub const PLAYER_MAX_POWER: u8 = 3;

    /// Spread angles (radians, about the surface normal)
    pub const SPREAD_NARROW: f32 = 0.06;
    pub const SPREAD_WIDE: f32 = 0.1;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 22.0;
    pub const PROJECTILE_LIFETIME: f32 = 1.6;
    pub const PROJECTILE_MUZZLE_OFFSET: f32 = 0.8;
    /// Projectiles further than surface radius + margin from the center expire
    pub const PROJECTILE_DESPAWN_MARGIN: f32 = 6.0;
    pub const PROJECTILE_HIT_RADIUS_SQ: f32 = 0.9;

    /// Enemies
    pub const ENEMY_BASE_SPEED: f32 = 3.5;
    pub const ENEMY_SPEED_PER_LEVEL: f32 = 0.3;
    pub const ENEMY_MAX_SPEED_BONUS: f32 = 3.0;
    pub const ENEMY_BASE_HEALTH: i32 = 2;
    pub const ENEMY_HEALTH_PER_LEVEL: f32 = 0.4;
    pub const ENEMY_WOBBLE: f32 = 0.6;
    /// Fraction of the steering error left after 1 / ENEMY_STEER_RATE seconds
    pub const ENEMY_STEER_RESIDUAL: f32 = 0.0001;
    pub const ENEMY_STEER_RATE: f32 = 4.0;
    pub const ENEMY_KNOCK_FORCE: f32 = 6.0;
    pub const ENEMY_KNOCK_TIME: f32 = 0.2;

    /// Collision radii (squared)
    pub const PLAYER_ENEMY_RADIUS_SQ: f32 = 1.4;
    pub const PICKUP_RADIUS_SQ: f32 = 0.8;

    /// Pickups
    pub const PICKUP_DROP_CHANCE: f64 = 0.18;
    pub const PICKUP_BOB_AMPLITUDE: f32 = 0.25;
    pub const PICKUP_BOB_HEIGHT: f32 = 0.2;
    pub const PICKUP_BOB_FREQUENCY: f32 = 3.0;
    pub const PICKUP_SPIN_RATE: f32 = 1.8;

    /// Scoring and lives
    pub const SCORE_PER_HIT: u64 = 100;
    pub const SCORE_PER_PICKUP: u64 = 250;
    pub const STARTING_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;

    /// Waves
    pub const WAVE_BASE_SIZE: i32 = 4;
    pub const WAVE_SIZE_PER_LEVEL: i32 = 2;
    pub const SPAWN_MIN_SEPARATION_SQ: f32 = 25.0;
    /// First enemy offset in front of the player, as a fraction of the radius
    pub const FIRST_ENEMY_OFFSET: f32 = 0.3;
    pub const MAX_SPAWN_ATTEMPTS: u32 = 64;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert spherical (r, theta around +Y, phi from +Y) to cartesian
#[inline]
pub fn spherical_to_cartesian(r: f32, theta: f32, phi: f32) -> Vec3 {
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-0.5) - (-0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_spherical_poles() {
        let north = spherical_to_cartesian(2.0, 1.0, 0.0);
        assert!((north - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
        let equator = spherical_to_cartesian(2.0, 0.0, PI / 2.0);
        assert!((equator - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }
}
