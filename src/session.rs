//! Host-side driver
//!
//! Turns variable real frame times into fixed simulation ticks and fans the
//! match events out to audio and HUD sinks. Rendering pulls a snapshot.

use crate::audio::{AudioBackend, AudioManager};
use crate::consts::{MAX_FRAME_DT, SIM_DT};
use crate::sim::{FrameSnapshot, GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Receives HUD values when they change
pub trait HudSink {
    fn score_changed(&mut self, score: u64);
    fn lives_changed(&mut self, lives: u8);
    fn level_changed(&mut self, level: u32);
    fn game_over(&mut self, _score: u64, _level: u32) {}
}

/// Receives one read-only frame per render
pub trait RenderSink {
    fn render(&mut self, frame: &FrameSnapshot);
}

/// HUD that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHud;

impl HudSink for NullHud {
    fn score_changed(&mut self, _score: u64) {}
    fn lives_changed(&mut self, _lives: u8) {}
    fn level_changed(&mut self, _level: u32) {}
}

/// Fixed timestep accumulator
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    /// Add a real frame's duration, return how many ticks are due
    ///
    /// Long frames (tab switches, debugger pauses) are clamped so the sim
    /// never tries to catch up on more than [`MAX_FRAME_DT`].
    pub fn advance(&mut self, real_dt: f32) -> u32 {
        let dt = if real_dt.is_finite() {
            real_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator >= SIM_DT {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        ticks
    }

    /// Fraction of a tick left over (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// One running game: match state, clock, input and sinks
pub struct Session<B: AudioBackend, H: HudSink> {
    state: GameState,
    tuning: Tuning,
    clock: FixedStep,
    input: TickInput,
    audio: AudioManager<B>,
    hud: H,
}

impl<B: AudioBackend, H: HudSink> Session<B, H> {
    pub fn new(seed: u64, tuning: Tuning, audio: AudioManager<B>, hud: H) -> Self {
        let mut session = Self {
            state: GameState::with_tuning(seed, tuning.clone()),
            tuning,
            clock: FixedStep::default(),
            input: TickInput::default(),
            audio,
            hud,
        };
        session.publish_hud();
        session.dispatch_events();
        session.audio.start_music();
        session
    }

    /// Input held for the following ticks
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Advance by a real frame time; returns the number of ticks run
    pub fn frame(&mut self, real_dt: f32) -> u32 {
        let ticks = self.clock.advance(real_dt);
        for _ in 0..ticks {
            tick(&mut self.state, &self.input, SIM_DT);
            // Pause is an edge, not a level
            self.input.pause = false;
            self.dispatch_events();
        }
        ticks
    }

    /// Hand the current frame to a renderer
    pub fn render(&self, sink: &mut impl RenderSink) {
        sink.render(&self.state.snapshot());
    }

    /// Throw away the current match and start a fresh one
    pub fn restart(&mut self, seed: u64) {
        log::info!("Restarting with seed {}", seed);
        self.state = GameState::with_tuning(seed, self.tuning.clone());
        self.clock.reset();
        self.input = TickInput::default();
        self.publish_hud();
        self.dispatch_events();
        self.audio.start_music();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &AudioManager<B> {
        &self.audio
    }

    /// Volume controls and gesture-time initialization
    pub fn audio_mut(&mut self) -> &mut AudioManager<B> {
        &mut self.audio
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    /// Interpolation factor between the last two ticks
    pub fn alpha(&self) -> f32 {
        self.clock.alpha()
    }

    fn publish_hud(&mut self) {
        self.hud.score_changed(self.state.score);
        self.hud.lives_changed(self.state.lives);
        self.hud.level_changed(self.state.level);
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::LaserFired { .. } => self.audio.laser_fired(),
                GameEvent::EnemyHit { position, .. } => self.audio.explosion_at(position),
                GameEvent::PickupCollected { .. } => self.audio.pickup_collected(),
                GameEvent::PlayerHit { .. } => self.audio.player_hit(),
                GameEvent::ScoreChanged(score) => self.hud.score_changed(score),
                GameEvent::LivesChanged(lives) => self.hud.lives_changed(lives),
                GameEvent::LevelChanged(level) => self.hud.level_changed(level),
                GameEvent::GameOver { score, level } => {
                    self.audio.stop_music();
                    self.hud.game_over(score, level);
                }
                GameEvent::EnemyKilled { .. }
                | GameEvent::PickupSpawned { .. }
                | GameEvent::WaveSpawned { .. }
                | GameEvent::WaveCleared { .. } => log::trace!("{:?}", event),
            }
        }
    }
}
