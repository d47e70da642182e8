//! Stonefall entry point
//!
//! Headless demo run: drives the loop with a scripted tilt sweep and
//! periodic taps, standing in for the accelerometer and touch screen of a
//! real platform shell. Run with `RUST_LOG=info` to watch the HUD lines.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use stonefall::audio::LogAudio;
use stonefall::consts::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};
use stonefall::render::{LogRenderer, NullRenderer, Renderer};
use stonefall::sim::GameState;
use stonefall::{GameLoop, Settings};

fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".stonefall_settings.json")
}

fn main() {
    env_logger::init();

    let settings = Settings::load(&settings_path());

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xC0FFEE);
    log::info!("starting demo run with seed {seed}");

    let state = GameState::new(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT, seed);
    let renderer: Box<dyn Renderer> = if settings.hud_log {
        Box::new(LogRenderer::default())
    } else {
        Box::new(NullRenderer)
    };
    let mut game = GameLoop::new(state, renderer, Box::new(LogAudio), settings.clone());
    let input = game.input();

    game.start();

    // Ten seconds of play: sweep the tilt back and forth, tap twice a
    // second.
    for step in 0..100u32 {
        let t = step as f32 / 10.0;
        input.set_tilt((t * 0.8).sin() * 4.0);
        if step % 5 == 0 {
            input.tap();
        }
        thread::sleep(Duration::from_millis(100));
    }

    game.stop();

    if let Some(state) = game.state() {
        log::info!(
            "demo finished: ticks={} lives={} stones={} game_over={}",
            state.time_ticks,
            state.player.lives(),
            state.stones.len(),
            state.game_over
        );
    }

    settings.save(&settings_path());
}
