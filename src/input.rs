//! Cross-thread input marshalling
//!
//! The platform shell (sensor callbacks, touch handlers) writes from its
//! own threads; the loop thread reads once per tick. Tilt is a
//! last-writer-wins slot, taps are queued and drained so none are lost
//! between ticks. Entity collections are never touched from here.

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;

use crate::sim::TickInput;

/// Discrete control events produced by the platform shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Screen tap: fire while playing, restart after game over
    Tap,
}

/// Shared handle between input producers and the loop thread
pub struct InputHub {
    tilt: Mutex<f32>,
    events_tx: Sender<ControlEvent>,
    events_rx: Receiver<ControlEvent>,
}

impl Default for InputHub {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHub {
    pub fn new() -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            tilt: Mutex::new(0.0),
            events_tx,
            events_rx,
        }
    }

    /// Record the latest tilt reading; unread older values are dropped.
    pub fn set_tilt(&self, tilt: f32) {
        *self.tilt.lock() = tilt;
    }

    /// Queue a tap for the next tick.
    pub fn tap(&self) {
        let _ = self.events_tx.send(ControlEvent::Tap);
    }

    /// Snapshot the input for one tick: the current tilt plus every tap
    /// queued since the previous drain.
    pub fn drain(&self) -> TickInput {
        let mut taps = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                ControlEvent::Tap => taps += 1,
            }
        }
        TickInput {
            tilt: Some(*self.tilt.lock()),
            taps,
        }
    }
}
