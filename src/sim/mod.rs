//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (reverse index, removal in place)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod enemy;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod sphere;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use enemy::Enemy;
pub use pickup::Pickup;
pub use player::Player;
pub use projectile::{Projectile, ProjectileHit, ProjectilePool};
pub use sphere::{Basis, SurfaceState, geodesic_step};
pub use state::{
    AgentPose, FrameSnapshot, GameEvent, GamePhase, GameState, PickupPose, ProjectilePose,
    TickContext,
};
pub use tick::{TickInput, advance_level, spawn_wave, tick};
