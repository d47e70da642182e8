//! Render port
//!
//! The loop hands the renderer a consistent snapshot of the world once per
//! tick and never waits on the result. A missing or failing renderer must
//! not change gameplay, so the trait has no error channel.

use crate::sim::GameState;

/// HUD literals every renderer draws
pub const LIVES_LABEL: &str = "Lives: ";
pub const GAME_OVER_TEXT: &str = "GAME OVER";
pub const RESTART_PROMPT: &str = "Tap to restart";

pub trait Renderer: Send {
    /// Draw the current frame: background, ship, bullets, stones (with
    /// explosion phase), and the HUD.
    fn draw(&mut self, state: &GameState);
}

/// Discards every frame. Used headless and in tests.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _state: &GameState) {}
}

/// Emits a HUD log line once per second instead of drawing pixels.
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
}

impl Renderer for LogRenderer {
    fn draw(&mut self, state: &GameState) {
        self.frames += 1;
        if self.frames % 60 != 0 {
            return;
        }
        if state.game_over {
            log::info!("{GAME_OVER_TEXT} - {RESTART_PROMPT}");
        } else {
            log::info!(
                "{LIVES_LABEL}{}  stones={} bullets={} ship_x={:.0}",
                state.player.lives(),
                state.stones.len(),
                state.bullets.len(),
                state.player.pos.x,
            );
        }
    }
}
