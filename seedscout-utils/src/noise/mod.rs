//! Gradient noise used to give ore densities spatially coherent veins.

mod improved_noise;
mod math;
mod noise_field;

pub use improved_noise::ImprovedNoise;
pub use math::{clamp, floor, lerp, lerp2, lerp3, smoothstep};
pub use noise_field::{NoiseField, sample};
