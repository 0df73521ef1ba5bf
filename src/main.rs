//! Stardust entry point
//!
//! Headless attract-mode run: the autopilot plays one match and the HUD and
//! audio cues go to the log. Usage: `stardust [seed] [tuning.json]`.

#[cfg(not(target_arch = "wasm32"))]
use stardust::audio::{AudioManager, LogBackend};
#[cfg(not(target_arch = "wasm32"))]
use stardust::sim::TickInput;
#[cfg(not(target_arch = "wasm32"))]
use stardust::{HudSink, Session, Tuning};

/// Simulated seconds per run
#[cfg(not(target_arch = "wasm32"))]
const RUN_SECONDS: f32 = 120.0;
/// Host frame rate the run pretends to have
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct LogHud;

#[cfg(not(target_arch = "wasm32"))]
impl HudSink for LogHud {
    fn score_changed(&mut self, score: u64) {
        log::info!("Score: {}", score);
    }

    fn lives_changed(&mut self, lives: u8) {
        log::info!("Lives: {}", lives);
    }

    fn level_changed(&mut self, level: u32) {
        log::info!("Level: {}", level);
    }

    fn game_over(&mut self, score: u64, level: u32) {
        log::info!("GAME OVER - score {} on level {}", score, level);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid seed {:?}", arg);
            0
        }),
        None => 0,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load(&path).unwrap_or_else(|e| {
            log::error!("Failed to load tuning from {}: {} - using defaults", path, e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    log::info!("Stardust (headless) starting with seed {}", seed);

    // No gesture to wait for on the command line
    let mut audio = AudioManager::new();
    audio.init_on_gesture(LogBackend);

    let mut session = Session::new(seed, tuning, audio, LogHud);
    session.set_input(TickInput {
        idle_mode: true,
        ..Default::default()
    });

    let mut elapsed = 0.0;
    while elapsed < RUN_SECONDS && !session.state().is_game_over() {
        session.frame(FRAME_DT);
        elapsed += FRAME_DT;
    }

    let state = session.state();
    println!(
        "seed {}: score {} level {} lives {} after {:.1}s ({} shots fired)",
        seed,
        state.score,
        state.level,
        state.lives,
        state.elapsed,
        state.projectiles.fired()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `Session` from their own frame callback
}
