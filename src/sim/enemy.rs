//! Saucers that chase the player across the planet

use glam::Vec3;

use super::sphere::{SurfaceState, geodesic_step, project_tangent, tangent_direction};
use super::state::TickContext;
use crate::tuning::Tuning;

/// Velocities slower than this keep the previous facing
const FACING_MIN_SPEED_SQ: f32 = 1e-4;

/// An enemy saucer
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    /// Position, velocity and facing on the sphere
    pub body: SurfaceState,
    /// Chase speed (units/s)
    pub speed: f32,
    /// Hit points; removed from play at <= 0
    pub health: i32,
    /// Seconds of suspended steering after a knockback
    pub knock_timer: f32,
}

impl Enemy {
    /// Spawn at `position` with stats scaled for `level`
    pub fn new(id: u32, position: Vec3, level: u32, tuning: &Tuning) -> Self {
        Self {
            id,
            body: SurfaceState::new(position, Vec3::ZERO, tuning.surface_radius),
            speed: tuning.enemy_speed(level),
            health: tuning.enemy_health(level),
            knock_timer: 0.0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Steer toward `target` and advance along the surface
    pub fn update(&mut self, ctx: &TickContext, target: Vec3) {
        if !self.is_alive() || ctx.dt <= 0.0 {
            return;
        }
        let tuning = ctx.tuning;
        let dt = ctx.dt;
        let normal = self.body.normal();

        let desired = self.desired_velocity(tuning, target, normal, ctx.elapsed);

        if self.knock_timer > 0.0 {
            self.knock_timer -= dt;
        } else {
            let t = 1.0 - tuning.enemy_steer_residual.powf(dt * tuning.enemy_steer_rate);
            self.body.velocity = self.body.velocity.lerp(desired, t);
        }
        self.body.confine_velocity();

        geodesic_step(&mut self.body, tuning.surface_radius, dt);

        // Face the direction of travel
        if self.body.velocity.length_squared() > FACING_MIN_SPEED_SQ {
            if let Some(forward) = tangent_direction(self.body.velocity, self.body.normal()) {
                self.body.forward = forward;
            }
        }
        self.body.reorthonormalize();
    }

    /// Tangent chase velocity plus a slow wobble so packs don't stack up
    fn desired_velocity(&self, tuning: &Tuning, target: Vec3, normal: Vec3, time: f32) -> Vec3 {
        let pos = self.body.position;
        let mut desired = tangent_direction(target - pos, normal)
            .map(|dir| dir * self.speed)
            .unwrap_or(Vec3::ZERO);

        desired.x += (time * 2.0 + pos.z).sin() * tuning.enemy_wobble;
        desired.z += (time * 1.8 + pos.x).cos() * tuning.enemy_wobble;
        project_tangent(desired, normal)
    }

    /// Subtract `amount` health. Returns true if this hit killed the enemy.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health -= amount as i32;
        !self.is_alive()
    }

    /// Shove away from `source` along the surface and suspend steering
    pub fn knockback(&mut self, source: Vec3, force: f32, duration: f32) {
        let normal = self.body.normal();
        if let Some(dir) = tangent_direction(self.body.position - source, normal) {
            self.body.velocity += dir * force;
        }
        self.knock_timer = duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn ctx(tuning: &Tuning, dt: f32, elapsed: f32) -> TickContext<'_> {
        TickContext { tuning, dt, elapsed }
    }

    fn enemy_at(tuning: &Tuning, pos: Vec3) -> Enemy {
        Enemy::new(1, pos, 1, tuning)
    }

    #[test]
    fn test_damage_kills_at_zero() {
        let tuning = Tuning::default();
        let mut enemy = enemy_at(&tuning, Vec3::X);
        assert_eq!(enemy.health, 2);
        assert!(!enemy.apply_damage(1));
        assert!(enemy.is_alive());
        assert!(enemy.apply_damage(1));
        assert!(!enemy.is_alive());
        // Already dead: further damage reports no new kill
        assert!(!enemy.apply_damage(1));
    }

    #[test]
    fn test_chases_target() {
        let tuning = Tuning {
            enemy_wobble: 0.0,
            ..Default::default()
        };
        let r = tuning.surface_radius;
        let target = Vec3::Y * r;
        let mut enemy = enemy_at(&tuning, Vec3::X * r);
        let start = enemy.body.position.distance(target);
        let c = ctx(&tuning, SIM_DT, 0.0);
        for _ in 0..120 {
            enemy.update(&c, target);
        }
        assert!(enemy.body.position.distance(target) < start - 2.0);
        // Facing follows travel
        assert!(enemy.body.forward.dot(enemy.body.velocity.normalize()) > 0.99);
    }

    #[test]
    fn test_stays_on_surface_with_wobble() {
        let tuning = Tuning::default();
        let r = tuning.surface_radius;
        let mut enemy = enemy_at(&tuning, Vec3::new(3.0, -5.0, 9.0));
        let target = Vec3::new(-r, 0.0, 0.0);
        for i in 0..2000 {
            enemy.update(&ctx(&tuning, SIM_DT, i as f32 * SIM_DT), target);
            let n = enemy.body.normal();
            assert!((enemy.body.position.length() - r).abs() < 1e-4);
            assert!(enemy.body.velocity.dot(n).abs() < 1e-3);
            assert!(enemy.body.forward.dot(n).abs() < 1e-3);
        }
    }

    #[test]
    fn test_knockback_pushes_away_and_suspends_steering() {
        let tuning = Tuning {
            enemy_wobble: 0.0,
            ..Default::default()
        };
        let r = tuning.surface_radius;
        let player = Vec3::Y * r;
        let mut enemy = enemy_at(&tuning, Vec3::new(0.0, r, 1.0));
        enemy.knockback(player, 6.0, 0.2);
        assert!((enemy.knock_timer - 0.2).abs() < 1e-6);
        assert!(enemy.body.velocity.dot(Vec3::Z) > 5.0);

        // During the knock window the enemy keeps drifting away
        let c = ctx(&tuning, SIM_DT, 0.0);
        for _ in 0..12 {
            enemy.update(&c, player);
        }
        assert!(enemy.body.velocity.length() > 5.0);
        assert!(enemy.body.position.distance(player) > 1.5);
    }

    #[test]
    fn test_knockback_degenerate_direction_keeps_velocity() {
        let tuning = Tuning::default();
        let r = tuning.surface_radius;
        let mut enemy = enemy_at(&tuning, Vec3::Y * r);
        enemy.body.velocity = Vec3::X;
        // Source directly below the enemy: no tangent direction
        enemy.knockback(Vec3::ZERO, 6.0, 0.2);
        assert_eq!(enemy.body.velocity, Vec3::X);
        assert!(!enemy.body.velocity.is_nan());
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let tuning = Tuning::default();
        let mut enemy = enemy_at(&tuning, Vec3::new(1.0, 2.0, 3.0));
        enemy.body.velocity = project_tangent(Vec3::X * 2.0, enemy.body.normal());
        enemy.knock_timer = 0.1;
        let before = enemy.clone();
        enemy.update(&ctx(&tuning, 0.0, 5.0), Vec3::Y * tuning.surface_radius);
        assert_eq!(enemy.body, before.body);
        assert_eq!(enemy.health, before.health);
        assert_eq!(enemy.knock_timer, before.knock_timer);
    }

    #[test]
    fn test_target_at_own_position_does_not_nan() {
        let tuning = Tuning::default();
        let r = tuning.surface_radius;
        let mut enemy = enemy_at(&tuning, Vec3::Z * r);
        for _ in 0..10 {
            enemy.update(&ctx(&tuning, SIM_DT, 0.0), enemy.body.position);
        }
        assert!(!enemy.body.position.is_nan());
        assert!(!enemy.body.forward.is_nan());
    }
}
