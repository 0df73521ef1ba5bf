//! Laser bolts and the pool that recycles them
//!
//! Bolts fly in straight lines through space (they leave the curved surface
//! tangentially), so they are not tangent-constrained like agents.

use glam::Vec3;

use super::enemy::Enemy;
use crate::tuning::Tuning;

/// A laser bolt in flight
#[derive(Debug, Clone, Default)]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds before forced expiry
    pub ttl: f32,
}

/// A bolt struck an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileHit {
    pub enemy_id: u32,
    /// Enemy position at the moment of impact
    pub position: Vec3,
    /// The hit brought the enemy to zero health (it has been removed)
    pub killed: bool,
}

/// Recycling allocator for projectiles
///
/// Grows on demand; expired bolts go to a free list and are reused by the
/// next `fire`.
#[derive(Debug, Clone, Default)]
pub struct ProjectilePool {
    active: Vec<Projectile>,
    free: Vec<Projectile>,
    fired: u64,
    expired: u64,
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch a bolt from `origin` along `direction`
    ///
    /// Returns false (and fires nothing) for a zero-length direction.
    pub fn fire(&mut self, origin: Vec3, direction: Vec3, tuning: &Tuning) -> bool {
        let Some(dir) = direction.try_normalize() else {
            return false;
        };
        let mut p = self.free.pop().unwrap_or_default();
        p.position = origin + dir * tuning.muzzle_offset;
        p.velocity = dir * tuning.projectile_speed;
        p.ttl = tuning.projectile_lifetime;
        self.active.push(p);
        self.fired += 1;
        true
    }

    /// Move bolts, expire stale ones and resolve hits against `enemies`
    ///
    /// Newest bolts are processed first. Each bolt damages at most one enemy.
    /// Killed enemies are removed from `enemies` before `on_hit` is called.
    pub fn advance<F>(&mut self, dt: f32, tuning: &Tuning, enemies: &mut Vec<Enemy>, mut on_hit: F)
    where
        F: FnMut(ProjectileHit),
    {
        let despawn_radius_sq = tuning.despawn_radius() * tuning.despawn_radius();

        for i in (0..self.active.len()).rev() {
            let p = &mut self.active[i];
            p.position += p.velocity * dt;
            p.ttl -= dt;

            if p.position.length_squared() > despawn_radius_sq {
                p.ttl = -1.0;
            } else {
                for j in (0..enemies.len()).rev() {
                    let enemy = &mut enemies[j];
                    if !enemy.is_alive() {
                        continue;
                    }
                    if enemy.body.position.distance_squared(p.position)
                        < tuning.projectile_hit_radius_sq
                    {
                        let killed = enemy.apply_damage(1);
                        let hit = ProjectileHit {
                            enemy_id: enemy.id,
                            position: enemy.body.position,
                            killed,
                        };
                        if killed {
                            enemies.swap_remove(j);
                        }
                        p.ttl = -1.0;
                        on_hit(hit);
                        break;
                    }
                }
            }

            if p.ttl <= 0.0 {
                self.recycle(i);
            }
        }
    }

    fn recycle(&mut self, index: usize) {
        // `remove` keeps the remaining bolts in firing order
        let p = self.active.remove(index);
        self.free.push(p);
        self.expired += 1;
    }

    /// Return every bolt to the free list
    pub fn clear(&mut self) {
        self.expired += self.active.len() as u64;
        self.free.append(&mut self.active);
    }

    /// Bolts in flight (oldest first)
    pub fn active(&self) -> &[Projectile] {
        &self.active
    }

    /// Recycled bolts waiting for reuse
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Total bolts fired over the pool's life
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Total bolts expired over the pool's life
    pub fn expired(&self) -> u64 {
        self.expired
    }
}
