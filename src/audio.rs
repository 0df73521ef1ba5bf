//! Audio sink
//!
//! The simulation never talks to audio directly; the session turns match
//! events into calls on [`AudioManager`], which forwards them to whatever
//! [`AudioBackend`] the host provides. Hosts that need a user gesture before
//! sound can start (browsers) call [`AudioManager::init_on_gesture`] from the
//! gesture handler; until then every call is a no-op.

use glam::Vec3;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired a volley
    Laser,
    /// Bolt struck an enemy
    Explosion,
    /// Pickup collected
    Pickup,
    /// Player lost a life
    PlayerHit,
}

/// Something that can actually make noise
pub trait AudioBackend {
    /// Play a one-shot effect at `volume` (0..=1), optionally positioned in the world
    fn play(&mut self, effect: SoundEffect, volume: f32, at: Option<Vec3>);
    /// Start (or restart) the background loop
    fn start_music(&mut self, volume: f32);
    fn stop_music(&mut self);
}

/// Backend that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32, at: Option<Vec3>) {
        match at {
            Some(pos) => log::debug!("sfx {:?} vol {:.2} at {:?}", effect, volume, pos),
            None => log::debug!("sfx {:?} vol {:.2}", effect, volume),
        }
    }

    fn start_music(&mut self, volume: f32) {
        log::debug!("music start vol {:.2}", volume);
    }

    fn stop_music(&mut self) {
        log::debug!("music stop");
    }
}

/// Lifecycle: nothing plays until a backend is attached
#[derive(Debug)]
enum AudioState<B> {
    Uninitialized,
    Ready(B),
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager<B: AudioBackend> {
    state: AudioState<B>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_playing: bool,
}

impl<B: AudioBackend> Default for AudioManager<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new() -> Self {
        Self {
            state: AudioState::Uninitialized,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
            music_playing: false,
        }
    }

    /// Attach the backend (call from the first user gesture)
    ///
    /// Later calls are ignored; the first backend stays in place.
    pub fn init_on_gesture(&mut self, backend: B) {
        if self.is_ready() {
            log::debug!("Audio already initialized");
            return;
        }
        self.state = AudioState::Ready(backend);
        log::info!("Audio initialized");
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, AudioState::Ready(_))
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect, at: Option<Vec3>) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let AudioState::Ready(backend) = &mut self.state else {
            return;
        };
        backend.play(effect, vol, at);
    }

    pub fn laser_fired(&mut self) {
        self.play(SoundEffect::Laser, None);
    }

    pub fn explosion_at(&mut self, position: Vec3) {
        self.play(SoundEffect::Explosion, Some(position));
    }

    pub fn pickup_collected(&mut self) {
        self.play(SoundEffect::Pickup, None);
    }

    pub fn player_hit(&mut self) {
        self.play(SoundEffect::PlayerHit, None);
    }

    /// Start the background loop (no-op until initialized or when already playing)
    pub fn start_music(&mut self) {
        if self.music_playing {
            return;
        }
        let vol = if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        };
        let AudioState::Ready(backend) = &mut self.state else {
            return;
        };
        backend.start_music(vol);
        self.music_playing = true;
    }

    pub fn stop_music(&mut self) {
        if !self.music_playing {
            return;
        }
        if let AudioState::Ready(backend) = &mut self.state {
            backend.stop_music();
        }
        self.music_playing = false;
    }

    /// Access the backend once initialized
    pub fn backend(&self) -> Option<&B> {
        match &self.state {
            AudioState::Ready(backend) => Some(backend),
            AudioState::Uninitialized => None,
        }
    }
}
