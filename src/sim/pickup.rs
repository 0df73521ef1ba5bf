//! Power-up crystals dropped by destroyed saucers

use glam::Vec3;

use super::sphere::surface_normal;
use crate::tuning::Tuning;

/// A floating power-up
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: u32,
    /// Drop location the pickup bobs above
    pub anchor: Vec3,
    /// Current (bobbing) position
    pub position: Vec3,
    /// Seconds since spawn
    pub age: f32,
    /// Spin angle for rendering (radians)
    pub spin: f32,
}

impl Pickup {
    pub fn new(id: u32, anchor: Vec3, tuning: &Tuning) -> Self {
        let mut pickup = Self {
            id,
            anchor,
            position: anchor,
            age: 0.0,
            spin: 0.0,
        };
        pickup.place(tuning);
        pickup
    }

    /// Bob along the local normal and spin
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        self.age += dt;
        self.spin = crate::normalize_angle(self.spin + dt * tuning.pickup_spin_rate);
        self.place(tuning);
    }

    fn place(&mut self, tuning: &Tuning) {
        let height = (self.age * tuning.pickup_bob_frequency).sin() * tuning.pickup_bob_amplitude
            + tuning.pickup_bob_height;
        self.position = self.anchor + surface_normal(self.anchor) * height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bobs_along_normal() {
        let tuning = Tuning::default();
        let anchor = Vec3::X * tuning.surface_radius;
        let mut pickup = Pickup::new(1, anchor, &tuning);
        assert!((pickup.position - anchor - Vec3::X * 0.2).length() < 1e-5);

        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for _ in 0..240 {
            pickup.update(1.0 / 120.0, &tuning);
            let offset = pickup.position - anchor;
            // Only moves radially
            assert!(offset.y.abs() < 1e-6 && offset.z.abs() < 1e-6);
            min = min.min(offset.x);
            max = max.max(offset.x);
        }
        assert!((max - 0.45).abs() < 0.01);
        assert!((min + 0.05).abs() < 0.01);
    }
}
