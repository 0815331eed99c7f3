//! Seed derivation helpers used by world generation.
//!
//! These reproduce how the game derives per-chunk, per-feature and
//! per-region seeds from the world seed, so that a [`LegacyRandom`] seeded
//! with their output walks the same stream the game would.

use crate::random::{LegacyRandom, Random};

/// Positional hash of a block coordinate.
#[must_use]
pub fn get_seed(x: i32, y: i32, z: i32) -> i64 {
    let mut l = i64::from(x.wrapping_mul(3_129_871))
        ^ i64::from(z).wrapping_mul(116_129_781)
        ^ i64::from(y);
    l = l
        .wrapping_mul(l)
        .wrapping_mul(42_317_861)
        .wrapping_add(l.wrapping_mul(11));
    l >> 16
}

/// Seed used to decorate the chunk whose minimum block corner is
/// (`block_x`, `block_z`).
#[must_use]
pub fn decoration_seed(world_seed: i64, block_x: i32, block_z: i32) -> i64 {
    let mut random = LegacyRandom::from_seed(world_seed);
    let a = random.next_i64() | 1;
    let b = random.next_i64() | 1;
    (i64::from(block_x).wrapping_mul(a))
        .wrapping_add(i64::from(block_z).wrapping_mul(b))
        ^ world_seed
}

/// Seed of the `index`-th feature in generation step `step`.
#[must_use]
pub fn feature_seed(decoration_seed: i64, index: i32, step: i32) -> i64 {
    decoration_seed
        .wrapping_add(i64::from(index))
        .wrapping_add(10_000 * i64::from(step))
}

/// Seed of a structure placement region.
#[must_use]
pub fn large_feature_seed(world_seed: i64, region_x: i32, region_z: i32, salt: i32) -> i64 {
    i64::from(region_x)
        .wrapping_mul(341_873_128_712)
        .wrapping_add(i64::from(region_z).wrapping_mul(132_897_987_541))
        .wrapping_add(world_seed)
        .wrapping_add(i64::from(salt))
}

/// Stafford's variant 13 of the `SplitMix64` finalizer.
///
/// Seeds that differ in a few low bits produce visibly correlated first
/// outputs from [`LegacyRandom`]; running them through this mixer first
/// spreads the difference over all 64 bits.
#[must_use]
pub fn mix_stafford13(z: u64) -> u64 {
    let z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    let z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
