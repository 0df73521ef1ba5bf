//! Data-driven game balance
//!
//! Every gameplay constant lives here so it can be overridden from a JSON
//! file without recompiling. Missing keys fall back to [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Radius of the sphere agents move on
    pub surface_radius: f32,

    // === Player ===
    pub player_acceleration: f32,
    pub player_drag: f32,
    pub player_turn_rate: f32,
    pub fire_rate: f32,
    pub min_fire_cooldown: f32,
    pub cooldown_per_power: f32,
    pub invulnerable_time: f32,
    pub max_power: u8,
    pub spread_narrow: f32,
    pub spread_wide: f32,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub muzzle_offset: f32,
    pub despawn_margin: f32,
    pub projectile_hit_radius_sq: f32,

    // === Enemies ===
    pub enemy_base_speed: f32,
    pub enemy_speed_per_level: f32,
    pub enemy_max_speed_bonus: f32,
    pub enemy_base_health: i32,
    pub enemy_health_per_level: f32,
    pub enemy_wobble: f32,
    pub enemy_steer_residual: f32,
    pub enemy_steer_rate: f32,
    pub knock_force: f32,
    pub knock_time: f32,

    // === Collisions ===
    pub player_enemy_radius_sq: f32,
    pub pickup_radius_sq: f32,

    // === Pickups ===
    pub drop_chance: f64,
    pub pickup_bob_amplitude: f32,
    pub pickup_bob_height: f32,
    pub pickup_bob_frequency: f32,
    pub pickup_spin_rate: f32,

    // === Scoring ===
    pub score_per_hit: u64,
    pub score_per_pickup: u64,
    pub starting_lives: u8,
    pub max_lives: u8,

    // === Waves ===
    pub wave_base_size: i32,
    pub wave_size_per_level: i32,
    pub spawn_min_separation_sq: f32,
    pub first_enemy_offset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            surface_radius: SURFACE_RADIUS,

            player_acceleration: PLAYER_ACCELERATION,
            player_drag: PLAYER_DRAG,
            player_turn_rate: PLAYER_TURN_RATE,
            fire_rate: PLAYER_FIRE_RATE,
            min_fire_cooldown: PLAYER_MIN_FIRE_COOLDOWN,
            cooldown_per_power: PLAYER_COOLDOWN_PER_POWER,
            invulnerable_time: PLAYER_INVULNERABLE_TIME,
            max_power: PLAYER_MAX_POWER,
            spread_narrow: SPREAD_NARROW,
            spread_wide: SPREAD_WIDE,

            projectile_speed: PROJECTILE_SPEED,
            projectile_lifetime: PROJECTILE_LIFETIME,
            muzzle_offset: PROJECTILE_MUZZLE_OFFSET,
            despawn_margin: PROJECTILE_DESPAWN_MARGIN,
            projectile_hit_radius_sq: PROJECTILE_HIT_RADIUS_SQ,

            enemy_base_speed: ENEMY_BASE_SPEED,
            enemy_speed_per_level: ENEMY_SPEED_PER_LEVEL,
            enemy_max_speed_bonus: ENEMY_MAX_SPEED_BONUS,
            enemy_base_health: ENEMY_BASE_HEALTH,
            enemy_health_per_level: ENEMY_HEALTH_PER_LEVEL,
            enemy_wobble: ENEMY_WOBBLE,
            enemy_steer_residual: ENEMY_STEER_RESIDUAL,
            enemy_steer_rate: ENEMY_STEER_RATE,
            knock_force: ENEMY_KNOCK_FORCE,
            knock_time: ENEMY_KNOCK_TIME,

            player_enemy_radius_sq: PLAYER_ENEMY_RADIUS_SQ,
            pickup_radius_sq: PICKUP_RADIUS_SQ,

            drop_chance: PICKUP_DROP_CHANCE,
            pickup_bob_amplitude: PICKUP_BOB_AMPLITUDE,
            pickup_bob_height: PICKUP_BOB_HEIGHT,
            pickup_bob_frequency: PICKUP_BOB_FREQUENCY,
            pickup_spin_rate: PICKUP_SPIN_RATE,

            score_per_hit: SCORE_PER_HIT,
            score_per_pickup: SCORE_PER_PICKUP,
            starting_lives: STARTING_LIVES,
            max_lives: MAX_LIVES,

            wave_base_size: WAVE_BASE_SIZE,
            wave_size_per_level: WAVE_SIZE_PER_LEVEL,
            spawn_min_separation_sq: SPAWN_MIN_SEPARATION_SQ,
            first_enemy_offset: FIRST_ENEMY_OFFSET,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a JSON tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starter tuning file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("surface_radius", self.surface_radius)?;
        positive("projectile_speed", self.projectile_speed)?;
        positive("projectile_lifetime", self.projectile_lifetime)?;
        positive("projectile_hit_radius_sq", self.projectile_hit_radius_sq)?;
        positive("min_fire_cooldown", self.min_fire_cooldown)?;
        non_negative("player_drag", self.player_drag)?;
        non_negative("player_enemy_radius_sq", self.player_enemy_radius_sq)?;
        non_negative("pickup_radius_sq", self.pickup_radius_sq)?;
        non_negative("enemy_steer_rate", self.enemy_steer_rate)?;
        non_negative("knock_time", self.knock_time)?;
        non_negative("despawn_margin", self.despawn_margin)?;

        if !(0.0..=1.0).contains(&self.drop_chance) {
            return Err(TuningError::OutOfRange {
                name: "drop_chance",
                value: self.drop_chance,
                expected: "[0, 1]",
            });
        }
        if !(self.enemy_steer_residual > 0.0 && self.enemy_steer_residual < 1.0) {
            return Err(TuningError::OutOfRange {
                name: "enemy_steer_residual",
                value: self.enemy_steer_residual as f64,
                expected: "(0, 1)",
            });
        }
        if self.max_lives == 0 || self.max_lives > MAX_LIVES {
            return Err(TuningError::OutOfRange {
                name: "max_lives",
                value: self.max_lives as f64,
                expected: "[1, 5]",
            });
        }
        if self.starting_lives == 0 || self.starting_lives > self.max_lives {
            return Err(TuningError::OutOfRange {
                name: "starting_lives",
                value: self.starting_lives as f64,
                expected: "[1, max_lives]",
            });
        }
        if self.enemy_base_health < 1 {
            return Err(TuningError::OutOfRange {
                name: "enemy_base_health",
                value: self.enemy_base_health as f64,
                expected: "[1, ∞)",
            });
        }
        // Separation must be reachable: the farthest point is the antipode
        let diameter = 2.0 * self.surface_radius;
        if self.spawn_min_separation_sq < 0.0 || self.spawn_min_separation_sq >= diameter * diameter
        {
            return Err(TuningError::OutOfRange {
                name: "spawn_min_separation_sq",
                value: self.spawn_min_separation_sq as f64,
                expected: "[0, (2 * surface_radius)²)",
            });
        }
        Ok(())
    }

    /// Enemy count for a wave at the given level
    pub fn wave_size(&self, level: u32) -> usize {
        (self.wave_base_size + self.wave_size_per_level * level as i32).max(1) as usize
    }

    /// Enemy chase speed for a level
    pub fn enemy_speed(&self, level: u32) -> f32 {
        self.enemy_base_speed
            + (level as f32 * self.enemy_speed_per_level).min(self.enemy_max_speed_bonus)
    }

    /// Enemy starting health for a level
    pub fn enemy_health(&self, level: u32) -> i32 {
        self.enemy_base_health + (level as f32 * self.enemy_health_per_level).floor() as i32
    }

    /// Fire cooldown after a volley at the given power level
    pub fn fire_cooldown(&self, power: u8) -> f32 {
        (self.fire_rate - power as f32 * self.cooldown_per_power).max(self.min_fire_cooldown)
    }

    /// Distance from the sphere center past which projectiles expire
    pub fn despawn_radius(&self) -> f32 {
        self.surface_radius + self.despawn_margin
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value: value as f64,
            expected: "(0, ∞)",
        })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), TuningError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value: value as f64,
            expected: "[0, ∞)",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "drop_chance": 0.5, "wave_base_size": 2 }"#).unwrap();
        assert_eq!(tuning.drop_chance, 0.5);
        assert_eq!(tuning.wave_base_size, 2);
        assert_eq!(tuning.surface_radius, SURFACE_RADIUS);
    }

    #[test]
    fn test_rejects_bad_drop_chance() {
        let err = Tuning::from_json(r#"{ "drop_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                name: "drop_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unreachable_separation() {
        let tuning = Tuning {
            spawn_min_separation_sq: 4.0 * SURFACE_RADIUS * SURFACE_RADIUS,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_default() {
        let json = Tuning::default().to_json().unwrap();
        assert!(json.contains("\"score_per_hit\": 100"));
        assert_eq!(Tuning::from_json(&json).unwrap(), Tuning::default());
    }

    #[test]
    fn test_rejects_negative_rates() {
        let bad = [
            Tuning {
                enemy_steer_rate: -1.0,
                ..Default::default()
            },
            Tuning {
                knock_time: -0.1,
                ..Default::default()
            },
            Tuning {
                despawn_margin: -2.0,
                ..Default::default()
            },
        ];
        for tuning in &bad {
            assert!(matches!(
                tuning.validate(),
                Err(TuningError::OutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_level_scaling() {
        let tuning = Tuning::default();
        assert_eq!(tuning.wave_size(1), 6);
        assert_eq!(tuning.wave_size(2), 8);
        assert!((tuning.enemy_speed(1) - 3.8).abs() < 1e-5);
        // Speed bonus caps at +3
        assert!((tuning.enemy_speed(50) - 6.5).abs() < 1e-5);
        assert_eq!(tuning.enemy_health(1), 2);
        assert_eq!(tuning.enemy_health(5), 4);
        assert!((tuning.fire_cooldown(0) - 0.12).abs() < 1e-6);
        assert!((tuning.fire_cooldown(3) - 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_wave_size_never_below_one() {
        let tuning = Tuning {
            wave_base_size: -10,
            ..Default::default()
        };
        assert_eq!(tuning.wave_size(1), 1);
    }
}
