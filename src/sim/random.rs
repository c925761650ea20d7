//! Seeded random helpers
//!
//! Every random draw in the simulation goes through a `Pcg32` seeded from the
//! run seed, so a replay with the same seed and inputs is identical.

use glam::Vec2;
use rand::Rng;

use crate::polar_to_cartesian;

/// Float and vector draws in the shapes gameplay code wants
pub trait RandomExt: Rng {
    /// Uniform in `[min, max)`; `min == max` is allowed and returns `min`
    fn next_float(&mut self, min: f32, max: f32) -> f32 {
        self.random::<f32>() * (max - min) + min
    }

    /// Random direction with a length in `[min_length, max_length)`
    fn next_vec2(&mut self, min_length: f32, max_length: f32) -> Vec2 {
        let theta = self.random::<f32>() * std::f32::consts::TAU;
        let length = self.next_float(min_length, max_length);
        polar_to_cartesian(length, theta)
    }
}

impl<R: Rng + ?Sized> RandomExt for R {}

/// Mix a run seed with a frame number and a per-worker salt
pub fn mix_seed(seed: u64, frame: u64, salt: u64) -> u64 {
    // splitmix64 finalizer over the combined words
    let mut z = seed
        ^ frame.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ salt.wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
