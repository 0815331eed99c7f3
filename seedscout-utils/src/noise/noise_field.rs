use crate::random::LegacyRandom;

use super::{ImprovedNoise, clamp};

/// Octave frequencies in cycles per block, paired with their amplitudes.
const OCTAVES: [(f64, f64); 2] = [(1.0 / 16.0, 1.0), (1.0 / 8.0, 0.5)];

/// A two-octave Perlin field normalized to `[-1, 1]`.
///
/// Low enough in frequency that neighbouring blocks sample similar values,
/// which is what makes ore veins come out contiguous.
#[derive(Debug, Clone)]
pub struct NoiseField {
    octaves: [ImprovedNoise; 2],
}

impl NoiseField {
    /// Builds the field for `seed`. The permutation tables are shuffled once
    /// here; sampling never touches the random source again.
    #[must_use]
    pub fn new(seed: i64) -> Self {
        let mut random = LegacyRandom::from_seed(seed);
        let first = ImprovedNoise::new(&mut random);
        let second = ImprovedNoise::new(&mut random);
        Self {
            octaves: [first, second],
        }
    }

    /// Samples the field at a block position.
    #[must_use]
    pub fn sample(&self, x: i32, y: i32, z: i32) -> f64 {
        let (x, y, z) = (f64::from(x), f64::from(y), f64::from(z));
        let mut total = 0.0;
        let mut amplitude_sum = 0.0;
        for (noise, (frequency, amplitude)) in self.octaves.iter().zip(OCTAVES) {
            total += noise.noise(x * frequency, y * frequency, z * frequency) * amplitude;
            amplitude_sum += amplitude;
        }
        clamp(total / amplitude_sum, -1.0, 1.0)
    }
}

/// One-shot sample of the field for `seed`.
///
/// Builds the permutation tables on every call; hold a [`NoiseField`] when
/// sampling more than once.
#[must_use]
pub fn sample(seed: i64, x: i32, y: i32, z: i32) -> f64 {
    NoiseField::new(seed).sample(x, y, z)
}
