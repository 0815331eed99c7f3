//! Random number generation matching `java.util.Random`.
//!
//! Every prediction downstream of the seed depends on the exact call
//! sequence of these generators, so the implementations here are bit-exact
//! with the Java ones.

pub mod legacy_random;
pub mod worldgen;

pub use legacy_random::LegacyRandom;

/// A source of pseudo-random values.
pub trait Random {
    /// Returns the next uniformly distributed `i32`.
    fn next_i32(&mut self) -> i32;

    /// Returns a value in `0..bound`. `bound` must be positive.
    fn next_i32_bounded(&mut self, bound: i32) -> i32;

    /// Returns the next uniformly distributed `i64`.
    fn next_i64(&mut self) -> i64;

    /// Returns a value in `[0, 1)` with 24 bits of precision.
    fn next_f32(&mut self) -> f32;

    /// Returns a value in `[0, 1)` with 53 bits of precision.
    fn next_f64(&mut self) -> f64;

    /// Returns the next uniformly distributed boolean.
    fn next_bool(&mut self) -> bool;

    /// Returns a value in `min..=max`.
    fn next_i32_between(&mut self, min: i32, max: i32) -> i32 {
        self.next_i32_bounded(max - min + 1) + min
    }

    /// Returns a value in `min..max`.
    fn next_i32_between_exclusive(&mut self, min: i32, max: i32) -> i32 {
        min + self.next_i32_bounded(max - min)
    }
}
