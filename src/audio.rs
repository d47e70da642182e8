//! Audio port
//!
//! Cues are fire-and-forget: the loop requests a sound and moves on
//! without awaiting completion. No sound is never fatal, so sinks swallow
//! their own failures and the trait has no error channel.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Bullet leaving the ship
    Shoot,
    /// Stone destroyed, rammed into the ship, or missed
    Explosion,
    /// Lives ran out
    GameOver,
}

/// Map a simulation event to the cue and volume to play, if any.
/// Shots are quiet, bullet kills a little louder, ram and miss
/// explosions loudest.
pub fn cue_for_event(event: GameEvent) -> Option<(AudioCue, f32)> {
    match event {
        GameEvent::ShotFired => Some((AudioCue::Shoot, 0.5)),
        GameEvent::StoneDestroyed => Some((AudioCue::Explosion, 0.7)),
        GameEvent::StoneMissed | GameEvent::PlayerHit => Some((AudioCue::Explosion, 1.0)),
        GameEvent::GameOver => Some((AudioCue::GameOver, 1.0)),
    }
}

pub trait AudioSink: Send {
    /// Request a cue at the given volume in [0.0, 1.0]. Must not block
    /// the caller.
    fn play(&mut self, cue: AudioCue, volume: f32);
}

/// Silence. Used headless and in tests.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue, _volume: f32) {}
}

/// Logs cues instead of playing them.
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue, volume: f32) {
        log::debug!("audio cue {cue:?} at volume {volume:.1}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_event_maps_to_its_cue() {
        assert_eq!(
            cue_for_event(GameEvent::ShotFired),
            Some((AudioCue::Shoot, 0.5))
        );
        assert_eq!(
            cue_for_event(GameEvent::StoneDestroyed),
            Some((AudioCue::Explosion, 0.7))
        );
        assert_eq!(
            cue_for_event(GameEvent::StoneMissed),
            Some((AudioCue::Explosion, 1.0))
        );
        assert_eq!(
            cue_for_event(GameEvent::PlayerHit),
            Some((AudioCue::Explosion, 1.0))
        );
        assert_eq!(
            cue_for_event(GameEvent::GameOver),
            Some((AudioCue::GameOver, 1.0))
        );
    }
}
