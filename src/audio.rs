//! Sound-effect notifications
//!
//! The simulation never plays audio itself. It names an effect and hands it to
//! a `SoundPlayer`; playback is fire-and-forget.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Observer ran into an obstacle
    ObstacleHit,
    /// Observer was struck by a thrown projectile
    ProjectileHit,
    /// Observer picked up a collectable
    Collect,
}

impl SoundEffect {
    /// Asset name the audio backend resolves
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::ObstacleHit => "tree_hit",
            // Same thud as running into a tree
            SoundEffect::ProjectileHit => "tree_hit",
            SoundEffect::Collect => "collect",
        }
    }
}

/// Receiver for sound-effect requests
pub trait SoundPlayer {
    /// Request an effect; must not block
    fn play(&mut self, effect: SoundEffect);
}

/// Player that only logs requested effects
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSoundPlayer;

impl LogSoundPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl SoundPlayer for LogSoundPlayer {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("sound: {}", effect.name());
    }
}

/// Player that remembers every request, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingSoundPlayer {
    pub played: Vec<SoundEffect>,
}

impl RecordingSoundPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, effect: SoundEffect) -> usize {
        self.played.iter().filter(|&&e| e == effect).count()
    }
}

impl SoundPlayer for RecordingSoundPlayer {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }
}
