//! Sound cues
//!
//! The simulation only records which cue to play; a [`SoundSink`] owned by
//! the host turns it into actual audio.

use serde::{Deserialize, Serialize};

use crate::sim::Model;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// A boss entered the world
    BossSpawned,
    /// The boss was destroyed
    BossDefeated,
    /// Enough experience for an egghancement
    EgghancementUnlocked,
    /// The egg ran out of health
    EggDefeated,
}

/// Playback backend
pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Headless sink that only logs cues
#[derive(Debug, Default)]
pub struct LogSink {
    played: Vec<SoundEffect>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far, oldest first
    pub fn played(&self) -> &[SoundEffect] {
        &self.played
    }
}

impl SoundSink for LogSink {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("Sound: {:?}", effect);
        self.played.push(effect);
    }
}

/// Forward the pending cue (if any) to `sink` and clear it
pub fn dispatch_sound(model: &mut Model, sink: &mut impl SoundSink) -> Option<SoundEffect> {
    let effect = model.sound.take()?;
    sink.play(effect);
    Some(effect)
}
