//! # SeedScout Utils
//!
//! Leaf utilities shared by the prediction engine: the Java-compatible
//! random generator, seed normalization, gradient noise and position types.
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    clippy::unwrap_used
)]
#![allow(
    clippy::single_call_fn,
    clippy::multiple_inherent_impl,
    clippy::shadow_unrelated,
    clippy::missing_errors_doc,
    clippy::needless_pass_by_value
)]

/// Noise generation and the math helpers it relies on.
pub mod noise;
/// Java-compatible random number generation.
pub mod random;
/// Conversion of user supplied seed text into world seeds.
pub mod seed;
/// Block and chunk position types.
pub mod types;

pub use types::{BlockPos, ChunkPos};
