//! Motion on the surface of a sphere
//!
//! The tricky part of Stardust: agents live on a planet, so "straight ahead"
//! is a great circle. Positions are advanced by rotating the position vector
//! (a geodesic step) instead of adding velocity, which keeps the radius exact
//! and carries the facing direction along the curvature.

use glam::{Mat3, Quat, Vec3};
use rand::Rng;
use serde::Serialize;

use crate::consts::{DIRECTION_EPSILON_SQ, MOVE_EPSILON};
use crate::spherical_to_cartesian;

/// Kinematic state shared by every surface-bound agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    /// Point on the sphere (‖position‖ == surface radius)
    pub position: Vec3,
    /// Tangent velocity (units/s)
    pub velocity: Vec3,
    /// Unit tangent facing direction
    pub forward: Vec3,
}

impl SurfaceState {
    /// Place an agent at `position` (projected onto the sphere) facing `forward`
    ///
    /// If `forward` has no tangent component an arbitrary tangent is chosen.
    pub fn new(position: Vec3, forward: Vec3, radius: f32) -> Self {
        let normal = position.try_normalize().unwrap_or(Vec3::Y);
        let forward = project_tangent(forward, normal)
            .try_normalize()
            .unwrap_or_else(|| normal.any_orthonormal_vector());
        Self {
            position: normal * radius,
            velocity: Vec3::ZERO,
            forward,
        }
    }

    /// Outward unit normal at the current position
    #[inline]
    pub fn normal(&self) -> Vec3 {
        surface_normal(self.position)
    }

    /// Drop any radial component from the velocity
    pub fn confine_velocity(&mut self) {
        self.velocity = project_tangent(self.velocity, self.normal());
    }

    /// Orthonormal facing frame at the current position
    pub fn basis(&self) -> Basis {
        Basis::from_forward(self.forward, self.normal()).unwrap_or_else(|| {
            let normal = self.normal();
            let forward = normal.any_orthonormal_vector();
            Basis {
                right: normal.cross(forward),
                up: normal,
                forward,
            }
        })
    }

    /// Re-derive `forward` through the orientation basis
    ///
    /// Small rotation errors otherwise accumulate into a non-orthogonal frame.
    pub fn reorthonormalize(&mut self) {
        if let Some(basis) = Basis::from_forward(self.forward, self.normal()) {
            self.forward = basis.forward;
        }
    }
}

/// Right-handed orientation frame `(right, up = normal, forward)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Basis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl Basis {
    /// Build a frame from a facing direction and the surface normal
    ///
    /// Returns `None` when `forward` is (nearly) parallel to the normal.
    pub fn from_forward(forward: Vec3, normal: Vec3) -> Option<Self> {
        let right = normal.cross(forward).try_normalize()?;
        let forward = right.cross(normal).try_normalize()?;
        Some(Self {
            right,
            up: normal,
            forward,
        })
    }

    /// Rotation matrix with columns (right, up, forward)
    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_cols(self.right, self.up, self.forward)
    }

    /// Rotation taking local +X/+Y/+Z to right/up/forward
    pub fn rotation(&self) -> Quat {
        Quat::from_mat3(&self.to_mat3()).normalize()
    }
}

/// Outward unit normal at a point (falls back to +Y at the center)
#[inline]
pub fn surface_normal(position: Vec3) -> Vec3 {
    position.try_normalize().unwrap_or(Vec3::Y)
}

/// Remove the component of `v` along `normal`
#[inline]
pub fn project_tangent(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// Normalized tangent direction of `v`, or `None` if too short
#[inline]
pub fn tangent_direction(v: Vec3, normal: Vec3) -> Option<Vec3> {
    let t = project_tangent(v, normal);
    if t.length_squared() < DIRECTION_EPSILON_SQ {
        None
    } else {
        Some(t.normalize())
    }
}

/// Rotate `v` by `angle` radians about a unit `axis`
#[inline]
pub fn rotate_about(v: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    Quat::from_axis_angle(axis, angle) * v
}

/// Advance `state` along the sphere by `velocity * dt` (geodesic step)
///
/// Returns `false` when the tangent move is too small to rotate; the state is
/// then left untouched.
pub fn geodesic_step(state: &mut SurfaceState, radius: f32, dt: f32) -> bool {
    let normal = state.normal();
    let tangent_move = project_tangent(state.velocity * dt, normal);
    let distance = tangent_move.length();
    if distance < MOVE_EPSILON {
        return false;
    }

    // a = r × t moves r toward t for a positive angle
    let Some(axis) = state.position.cross(tangent_move).try_normalize() else {
        return false;
    };
    let rotation = Quat::from_axis_angle(axis, distance / radius);

    state.position = (rotation * state.position).normalize() * radius;
    let new_normal = state.normal();

    // Carry forward and velocity along the curvature
    let forward = project_tangent(rotation * state.forward, new_normal);
    if let Some(forward) = forward.try_normalize() {
        state.forward = forward;
    }
    state.velocity = project_tangent(rotation * state.velocity, new_normal);
    true
}

/// Uniform random point on a sphere (inverse-transform sampling)
pub fn random_surface_point<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let u: f32 = rng.random();
    let v: f32 = rng.random();
    let theta = std::f32::consts::TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    spherical_to_cartesian(radius, theta, phi)
}

/// Signed angle from `from` to `to` about `normal` (positive turns toward right)
pub fn signed_turn_angle(from: Vec3, to: Vec3, normal: Vec3) -> f32 {
    let right = normal.cross(from);
    let x = to.dot(from);
    let y = to.dot(right);
    y.atan2(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const R: f32 = 13.9;

    fn agent() -> SurfaceState {
        SurfaceState::new(Vec3::new(0.0, R, 0.0), Vec3::Z, R)
    }

    #[test]
    fn test_step_keeps_radius_and_tangency() {
        let mut s = agent();
        s.velocity = Vec3::new(3.0, 0.0, 4.0);
        for _ in 0..10_000 {
            geodesic_step(&mut s, R, 1.0 / 120.0);
            let n = s.normal();
            assert!((s.position.length() - R).abs() < 1e-4);
            assert!(s.velocity.dot(n).abs() < 1e-3);
            assert!(s.forward.dot(n).abs() < 1e-3);
            assert!((s.forward.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_step_moves_along_velocity() {
        let mut s = agent();
        s.velocity = Vec3::Z * 5.0;
        assert!(geodesic_step(&mut s, R, 0.1));
        // Arc length 0.5 toward +Z from the north pole
        let angle = 0.5 / R;
        assert!((s.position.z - R * angle.sin()).abs() < 1e-4);
        assert!((s.position.y - R * angle.cos()).abs() < 1e-4);
        // Speed is preserved
        assert!((s.velocity.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_full_great_circle_returns_home() {
        let mut s = agent();
        s.velocity = Vec3::Z * 10.0;
        let circumference = std::f32::consts::TAU * R;
        let steps = 1200;
        let dt = circumference / 10.0 / steps as f32;
        for _ in 0..steps {
            geodesic_step(&mut s, R, dt);
        }
        assert!((s.position - Vec3::new(0.0, R, 0.0)).length() < 1e-2);
        assert!((s.forward - Vec3::Z).length() < 1e-2);
    }

    #[test]
    fn test_zero_velocity_is_noop() {
        let mut s = agent();
        let before = s;
        assert!(!geodesic_step(&mut s, R, 1.0));
        assert_eq!(s, before);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut s = agent();
        s.velocity = Vec3::X * 4.0;
        let before = s;
        assert!(!geodesic_step(&mut s, R, 0.0));
        assert_eq!(s, before);
    }

    #[test]
    fn test_basis_is_orthonormal_and_right_handed() {
        let s = SurfaceState::new(Vec3::new(1.0, 2.0, -3.0), Vec3::new(0.3, 0.1, 0.9), R);
        let b = s.basis();
        assert!(b.right.dot(b.up).abs() < 1e-5);
        assert!(b.right.dot(b.forward).abs() < 1e-5);
        assert!(b.up.dot(b.forward).abs() < 1e-5);
        assert!((b.to_mat3().determinant() - 1.0).abs() < 1e-4);
        // Local +Z maps to forward
        assert!((b.rotation() * Vec3::Z - b.forward).length() < 1e-4);
    }

    #[test]
    fn test_basis_degenerate_forward() {
        assert!(Basis::from_forward(Vec3::Y, Vec3::Y).is_none());
        // SurfaceState::new picks an arbitrary tangent instead
        let s = SurfaceState::new(Vec3::Y * R, Vec3::Y, R);
        assert!(s.forward.dot(Vec3::Y).abs() < 1e-5);
        assert!((s.forward.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tangent_direction_rejects_radial() {
        assert!(tangent_direction(Vec3::Y * 5.0, Vec3::Y).is_none());
        let d = tangent_direction(Vec3::new(1.0, 5.0, 0.0), Vec3::Y).unwrap();
        assert!((d - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_signed_turn_angle() {
        // normal +Y, forward +Z: right is +Y × +Z = +X
        let a = signed_turn_angle(Vec3::Z, Vec3::X, Vec3::Y);
        assert!((a - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        let b = signed_turn_angle(Vec3::Z, -Vec3::X, Vec3::Y);
        assert!((b + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_random_points_on_sphere() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut mean = Vec3::ZERO;
        for _ in 0..2000 {
            let p = random_surface_point(&mut rng, R);
            assert!((p.length() - R).abs() < 1e-3);
            mean += p;
        }
        // Uniform sampling averages near the center
        assert!((mean / 2000.0).length() < 1.0);
    }
}
