//! Coarse biome approximation.
//!
//! Real biome generation runs several climate noises through a parameter
//! tree. For ranking purposes a much cheaper model is enough: the chunk plane
//! is split into square biome regions and each region draws one label from a
//! fixed weighted table, using a random stream hashed from the region's
//! coordinates.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use seedscout_utils::random::worldgen::{large_feature_seed, mix_stafford13};
use seedscout_utils::random::{LegacyRandom, Random};

/// Biome regions are `2^REGION_SHIFT` chunks on a side.
pub const REGION_SHIFT: i32 = 2;

/// Fraction of overworld chunks classified as [`BiomeLabel::Badlands`].
pub const BADLANDS_FREQUENCY: f64 = 0.05;

const BIOME_SALT: i32 = 0x0B10_3E00;

/// Overworld labels and their share of regions. Sums to 1.
const OVERWORLD_WEIGHTS: [(BiomeLabel, f64); 11] = [
    (BiomeLabel::Badlands, BADLANDS_FREQUENCY),
    (BiomeLabel::Ocean, 0.20),
    (BiomeLabel::Plains, 0.18),
    (BiomeLabel::Forest, 0.14),
    (BiomeLabel::Desert, 0.10),
    (BiomeLabel::Taiga, 0.08),
    (BiomeLabel::Jungle, 0.06),
    (BiomeLabel::Swamp, 0.06),
    (BiomeLabel::Savanna, 0.05),
    (BiomeLabel::SnowyPlains, 0.05),
    (BiomeLabel::Beach, 0.03),
];

/// A game dimension. Ores and structures each belong to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// The overworld.
    Overworld,
    /// The nether.
    Nether,
    /// The end.
    End,
}

/// A coarse biome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeLabel {
    /// Grassland.
    Plains,
    /// Any forest.
    Forest,
    /// Sand desert.
    Desert,
    /// Mesa terrain, the rare bonus biome for gold.
    Badlands,
    /// Jungle.
    Jungle,
    /// Swamp.
    Swamp,
    /// Taiga.
    Taiga,
    /// Snowy plains and tundra.
    SnowyPlains,
    /// Savanna.
    Savanna,
    /// Any ocean.
    Ocean,
    /// Beach.
    Beach,
    /// Any nether biome.
    Nether,
    /// Any end biome.
    End,
    /// Could not be classified.
    Unknown,
}

impl BiomeLabel {
    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Plains => "plains",
            Self::Forest => "forest",
            Self::Desert => "desert",
            Self::Badlands => "badlands",
            Self::Jungle => "jungle",
            Self::Swamp => "swamp",
            Self::Taiga => "taiga",
            Self::SnowyPlains => "snowy plains",
            Self::Savanna => "savanna",
            Self::Ocean => "ocean",
            Self::Beach => "beach",
            Self::Nether => "nether",
            Self::End => "end",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this label is dry overworld land.
    #[must_use]
    pub const fn is_land(self) -> bool {
        !matches!(
            self,
            Self::Ocean | Self::Beach | Self::Nether | Self::End | Self::Unknown
        )
    }
}

impl Display for BiomeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies chunks into [`BiomeLabel`]s for one seed.
#[derive(Debug, Clone, Copy)]
pub struct BiomeEstimator {
    seed: i64,
}

impl BiomeEstimator {
    /// Creates an estimator for `seed`.
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self { seed }
    }

    /// Classifies an overworld chunk.
    #[must_use]
    pub fn classify(&self, chunk_x: i32, chunk_z: i32) -> BiomeLabel {
        let region_x = chunk_x >> REGION_SHIFT;
        let region_z = chunk_z >> REGION_SHIFT;
        let hashed = mix_stafford13(
            large_feature_seed(self.seed, region_x, region_z, BIOME_SALT) as u64,
        );
        let roll = LegacyRandom::from_seed(hashed as i64).next_f64();

        let mut cumulative = 0.0;
        for (label, weight) in OVERWORLD_WEIGHTS {
            cumulative += weight;
            if roll < cumulative {
                return label;
            }
        }
        BiomeLabel::Unknown
    }

    /// Classifies a chunk of the given dimension.
    #[must_use]
    pub fn classify_in(&self, dimension: Dimension, chunk_x: i32, chunk_z: i32) -> BiomeLabel {
        match dimension {
            Dimension::Overworld => self.classify(chunk_x, chunk_z),
            Dimension::Nether => BiomeLabel::Nether,
            Dimension::End => BiomeLabel::End,
        }
    }
}
