//! Match state and core simulation types
//!
//! Everything one match needs lives in [`GameState`]; it is owned by the host
//! and mutated only by [`super::tick`].

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::enemy::Enemy;
use super::pickup::Pickup;
use super::player::Player;
use super::projectile::ProjectilePool;
use super::sphere::Basis;
use crate::tuning::Tuning;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Enemies for the current level are being placed
    Spawning,
    /// Active gameplay
    Active,
    /// Wave destroyed, level about to advance
    Cleared,
    /// Game is paused
    Paused,
    /// Out of lives (terminal)
    GameOver,
}

/// Something that happened during a tick, for audio/HUD/VFX sinks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    LaserFired { shots: u32, origin: Vec3 },
    EnemyHit { enemy_id: u32, position: Vec3 },
    EnemyKilled { enemy_id: u32, position: Vec3 },
    PickupSpawned { pickup_id: u32, position: Vec3 },
    PickupCollected { pickup_id: u32, position: Vec3 },
    PlayerHit { lives: u8 },
    ScoreChanged(u64),
    LivesChanged(u8),
    LevelChanged(u32),
    WaveSpawned { level: u32, enemies: usize },
    WaveCleared { level: u32 },
    GameOver { score: u64, level: u32 },
}

/// Per-tick context handed down to entity updates
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub tuning: &'a Tuning,
    /// Fixed timestep (seconds)
    pub dt: f32,
    /// Simulation time since match start (seconds)
    pub elapsed: f32,
}

/// Complete match state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Match RNG (spawn placement, pickup drops)
    pub(crate) rng: Pcg32,
    /// Balance values for this match
    pub tuning: Tuning,
    /// Current level (1-based)
    pub level: u32,
    /// Score
    pub score: u64,
    /// Player lives (0..=max_lives)
    pub lives: u8,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation time (seconds)
    pub elapsed: f32,
    /// Current phase
    pub phase: GamePhase,
    /// The player's ship
    pub player: Player,
    /// Live enemies (no order guarantee)
    pub enemies: Vec<Enemy>,
    /// Uncollected pickups
    pub pickups: Vec<Pickup>,
    /// Laser bolts
    pub projectiles: ProjectilePool,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new match with default tuning and spawn the first wave
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new match with custom tuning and spawn the first wave
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(tuning.surface_radius),
            lives: tuning.starting_lives,
            tuning,
            level: 1,
            score: 0,
            time_ticks: 0,
            elapsed: 0.0,
            phase: GamePhase::Spawning,
            enemies: Vec::new(),
            pickups: Vec::new(),
            projectiles: ProjectilePool::new(),
            events: Vec::new(),
            next_id: 1,
        };

        super::tick::spawn_wave(&mut state);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Add to the score (never decreases)
    pub fn add_score(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        self.score = self.score.saturating_add(amount);
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    /// Set lives, clamped to [0, max_lives]
    pub fn set_lives(&mut self, lives: u8) {
        let lives = lives.min(self.tuning.max_lives);
        if lives != self.lives {
            self.lives = lives;
            self.events.push(GameEvent::LivesChanged(lives));
        }
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.time_ticks,
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            level: self.level,
            player: AgentPose {
                id: 0,
                position: self.player.body.position,
                basis: self.player.body.basis(),
                health: None,
            },
            player_invulnerable: self.player.is_invulnerable(),
            player_power: self.player.power,
            enemies: self
                .enemies
                .iter()
                .map(|e| AgentPose {
                    id: e.id,
                    position: e.body.position,
                    basis: e.body.basis(),
                    health: Some(e.health),
                })
                .collect(),
            projectiles: self
                .projectiles
                .active()
                .iter()
                .map(|p| ProjectilePose {
                    position: p.position,
                    direction: p.velocity.normalize_or_zero(),
                })
                .collect(),
            pickups: self
                .pickups
                .iter()
                .map(|p| PickupPose {
                    id: p.id,
                    position: p.position,
                    spin: p.spin,
                })
                .collect(),
        }
    }
}

/// Placement of a surface agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgentPose {
    pub id: u32,
    pub position: Vec3,
    pub basis: Basis,
    /// Enemy hit points (None for the player)
    pub health: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectilePose {
    pub position: Vec3,
    /// Unit direction of travel
    pub direction: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PickupPose {
    pub id: u32,
    pub position: Vec3,
    pub spin: f32,
}

/// Everything the renderer needs for one frame
///
/// Serializes to JSON for hosts that mirror the match out of process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub player: AgentPose,
    pub player_invulnerable: bool,
    pub player_power: u8,
    pub enemies: Vec<AgentPose>,
    pub projectiles: Vec<ProjectilePose>,
    pub pickups: Vec<PickupPose>,
}
