//! Cube Pong headless runner
//!
//! Plays a CPU-vs-CPU match at a fixed 60 Hz step and prints the final
//! snapshot as JSON. Settings come from the path in `CUBE_PONG_SETTINGS`
//! (or the first argument); a missing or broken file falls back to defaults.

use cube_pong::GameMode;
use cube_pong::settings::Settings;
use cube_pong::sim::{GameEvent, GameState, TickInput, tick};

const FRAME: f32 = 1.0 / 60.0;
/// Ten minutes of play
const MAX_TICKS: u64 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CUBE_PONG_SETTINGS").ok())
        .unwrap_or_else(|| "cube-pong.json".to_string());
    let mut settings = Settings::load_or_default(&path);
    settings.mode = GameMode::Watch;

    let mut state = match GameState::new(settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Cannot start match: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Cube Pong (headless) running with seed {}", state.seed);

    let input = TickInput::default();
    for _ in 0..MAX_TICKS {
        tick(&mut state, &input, FRAME);
        for event in state.drain_events() {
            if let GameEvent::Scored { scorer, near, far } = event {
                log::info!("{:?} scores: {} - {}", scorer, near, far);
            }
        }
        if state.phase().is_terminal() {
            break;
        }
    }

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless runner is native only
}
