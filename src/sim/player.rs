//! The player's ship
//!
//! Asteroids-style controls on a sphere: turn about the surface normal,
//! thrust along the facing direction, fire a spread that widens with power.

use glam::Vec3;

use super::projectile::ProjectilePool;
use super::sphere::{SurfaceState, geodesic_step, project_tangent, rotate_about};
use super::state::TickContext;
use super::tick::TickInput;
use crate::tuning::Tuning;

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    /// Position, velocity and facing on the sphere
    pub body: SurfaceState,
    /// Seconds until the next volley may fire (may go negative)
    pub fire_cooldown: f32,
    /// Spread level from pickups (0..=max_power)
    pub power: u8,
    /// Seconds of remaining damage immunity
    pub invulnerable_timer: f32,
}

impl Player {
    /// Spawn at the north pole facing +Z
    pub fn new(radius: f32) -> Self {
        Self {
            body: SurfaceState::new(Vec3::Y * radius, Vec3::Z, radius),
            fire_cooldown: 0.0,
            power: 0,
            invulnerable_timer: 0.0,
        }
    }

    /// Advance one tick. Returns the number of projectiles fired.
    pub fn update(
        &mut self,
        ctx: &TickContext,
        input: &TickInput,
        projectiles: &mut ProjectilePool,
    ) -> u32 {
        let tuning = ctx.tuning;
        let dt = ctx.dt;

        if dt > 0.0 {
            self.steer(tuning, input, dt);
        }

        let mut fired = 0;
        self.fire_cooldown -= dt;
        if input.fire && dt > 0.0 && self.fire_cooldown <= 0.0 {
            fired = self.fire(tuning, projectiles);
        }

        if self.invulnerable_timer > 0.0 {
            self.invulnerable_timer -= dt;
        }
        fired
    }

    fn steer(&mut self, tuning: &Tuning, input: &TickInput, dt: f32) {
        let normal = self.body.normal();

        let turn = input.turn_axis();
        if turn != 0.0 {
            let turned = rotate_about(self.body.forward, normal, tuning.player_turn_rate * turn * dt);
            if let Some(forward) = project_tangent(turned, normal).try_normalize() {
                self.body.forward = forward;
            }
        }

        let thrust = input.thrust_amount();
        if thrust > 0.0 {
            self.body.velocity += self.body.forward * tuning.player_acceleration * thrust * dt;
        }

        // Damping applies with or without thrust
        self.body.velocity *= (-dt * tuning.player_drag).exp();
        self.body.confine_velocity();

        geodesic_step(&mut self.body, tuning.surface_radius, dt);
        self.body.reorthonormalize();
    }

    /// Directions for one volley at the current power level
    pub fn volley_directions(&self, tuning: &Tuning) -> Vec<Vec3> {
        let forward = self.body.forward;
        let normal = self.body.normal();
        match self.power {
            0 => vec![forward],
            1 => vec![
                rotate_about(forward, normal, tuning.spread_narrow),
                rotate_about(forward, normal, -tuning.spread_narrow),
            ],
            _ => vec![
                forward,
                rotate_about(forward, normal, tuning.spread_wide),
                rotate_about(forward, normal, -tuning.spread_wide),
            ],
        }
    }

    fn fire(&mut self, tuning: &Tuning, projectiles: &mut ProjectilePool) -> u32 {
        let origin = self.body.position;
        let mut fired = 0;
        for dir in self.volley_directions(tuning) {
            if projectiles.fire(origin, dir, tuning) {
                fired += 1;
            }
        }
        self.fire_cooldown = tuning.fire_cooldown(self.power);
        fired
    }

    /// Whether damage is currently ignored
    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0.0
    }

    /// Take a hit. No-op (returns false) while invulnerable.
    pub fn hit(&mut self, tuning: &Tuning) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.invulnerable_timer = tuning.invulnerable_time;
        true
    }

    /// Raise the spread level (capped)
    pub fn empower(&mut self, tuning: &Tuning) {
        self.power = self.power.saturating_add(1).min(tuning.max_power);
    }
}
