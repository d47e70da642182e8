//! Fixed-cadence game loop
//!
//! One simulation thread owns the state and both output ports. `start`
//! spawns it; `stop` clears the running flag and blocks until the thread
//! has fully exited, taking the state back so a later `start` resumes the
//! same run. All entity mutation happens on the loop thread; input
//! crosses over through the [`InputHub`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::audio::{AudioSink, cue_for_event};
use crate::consts::SIM_DT;
use crate::input::InputHub;
use crate::render::Renderer;
use crate::settings::Settings;
use crate::sim::{GameState, tick};

/// Per-tick time budget at the 60 Hz cadence
const TICK_BUDGET: Duration = Duration::from_micros(16_667);

/// Everything the loop thread owns while running
struct LoopCore {
    state: GameState,
    renderer: Box<dyn Renderer>,
    audio: Box<dyn AudioSink>,
    settings: Settings,
}

pub struct GameLoop {
    input: Arc<InputHub>,
    running: Arc<AtomicBool>,
    /// Present while stopped
    core: Option<LoopCore>,
    /// Present while running
    thread: Option<JoinHandle<LoopCore>>,
}

impl GameLoop {
    pub fn new(
        state: GameState,
        renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioSink>,
        settings: Settings,
    ) -> Self {
        Self {
            input: Arc::new(InputHub::new()),
            running: Arc::new(AtomicBool::new(false)),
            core: Some(LoopCore {
                state,
                renderer,
                audio,
                settings,
            }),
            thread: None,
        }
    }

    /// Handle for the platform shell to feed tilt readings and taps.
    pub fn input(&self) -> Arc<InputHub> {
        Arc::clone(&self.input)
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Read-only view of the world, available while the loop is stopped.
    pub fn state(&self) -> Option<&GameState> {
        self.core.as_ref().map(|core| &core.state)
    }

    /// Spawn the simulation thread. No-op if already running.
    pub fn start(&mut self) {
        let Some(core) = self.core.take() else {
            return;
        };
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let input = Arc::clone(&self.input);
        self.thread = Some(thread::spawn(move || run_loop(core, input, running)));
        log::info!("game loop started");
    }

    /// Stop the simulation thread, blocking until it has exited. The
    /// state comes back intact for a later `start`. No-op if stopped.
    pub fn stop(&mut self) {
        let Some(handle) = self.thread.take() else {
            return;
        };
        self.running.store(false, Ordering::SeqCst);
        match handle.join() {
            Ok(core) => self.core = Some(core),
            Err(_) => log::error!("game loop thread panicked"),
        }
        log::info!("game loop stopped");
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(mut core: LoopCore, input: Arc<InputHub>, running: Arc<AtomicBool>) -> LoopCore {
    let volume = core.settings.effective_volume();

    while running.load(Ordering::SeqCst) {
        let tick_start = Instant::now();

        let tick_input = input.drain();
        tick(&mut core.state, &tick_input, SIM_DT);

        for event in core.state.drain_events() {
            if let Some((cue, cue_volume)) = cue_for_event(event) {
                core.audio.play(cue, cue_volume * volume);
            }
        }

        core.renderer.draw(&core.state);

        let elapsed = tick_start.elapsed();
        if elapsed < TICK_BUDGET {
            thread::sleep(TICK_BUDGET - elapsed);
        }
    }

    core
}
