//! Sound events
//!
//! The simulation only decides *what* should be heard; playback belongs to
//! the host mixer behind [`AudioSink`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::random::RandomExt;

/// Sound effect families. Each has several recorded variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player gun fire
    Shot,
    /// Enemy, black hole or player destroyed
    Explosion,
    /// Enemy warp-in
    Spawn,
}

impl SoundEffect {
    /// Number of recorded variants for this family
    pub const fn variants(self) -> u8 {
        match self {
            SoundEffect::Shot => 4,
            SoundEffect::Explosion => 8,
            SoundEffect::Spawn => 8,
        }
    }
}

/// A request to play one clip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundEvent {
    pub effect: SoundEffect,
    /// Which recording of the family, `0..effect.variants()`
    pub variant: u8,
    /// 0.0 - 1.0
    pub volume: f32,
    /// -1.0 (octave down) - 1.0 (octave up)
    pub pitch: f32,
    /// -1.0 (left) - 1.0 (right)
    pub pan: f32,
}

impl SoundEvent {
    pub fn new(effect: SoundEffect, variant: u8, volume: f32, pitch: f32) -> Self {
        Self {
            effect,
            variant: variant % effect.variants(),
            volume,
            pitch,
            pan: 0.0,
        }
    }

    /// Random recording of `effect` with a slight pitch wobble
    pub fn random(effect: SoundEffect, volume: f32, rng: &mut impl Rng) -> Self {
        let variant = rng.random_range(0..effect.variants());
        Self::new(effect, variant, volume, rng.next_float(-0.2, 0.2))
    }
}

/// Host-side audio output
pub trait AudioSink {
    fn play(&mut self, sound: &SoundEvent);
}

/// Audio sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: u64,
}

impl AudioSink for LogAudio {
    fn play(&mut self, sound: &SoundEvent) {
        self.played += 1;
        log::trace!(
            "play {:?}#{} vol={:.2} pitch={:.2}",
            sound.effect,
            sound.variant,
            sound.volume,
            sound.pitch
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_wraps_into_family() {
        let shot = SoundEvent::new(SoundEffect::Shot, 6, 0.2, 0.0);
        assert_eq!(shot.variant, 2);
        assert_eq!(shot.pan, 0.0);
    }

    #[test]
    fn test_random_pick_stays_in_range() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            let boom = SoundEvent::random(SoundEffect::Explosion, 0.5, &mut rng);
            assert!(boom.variant < 8);
            assert!((-0.2..0.2).contains(&boom.pitch));
        }
    }
}
