//! Ore profiles and the ore density model.
//!
//! Each ore owns a static [`OreProfile`]: where it can generate, a table of
//! Y bands with base probabilities, and an optional biome bonus. The density
//! model scales the band's base probability by three pseudo-random terms:
//! one per chunk, one per block, and a smooth noise term that clusters high
//! values into veins.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use seedscout_utils::noise::NoiseField;
use seedscout_utils::random::worldgen::{decoration_seed, feature_seed, get_seed};
use seedscout_utils::random::{LegacyRandom, Random};
use seedscout_utils::seed::java_string_hash;
use seedscout_utils::{BlockPos, ChunkPos};

use crate::biome::{BiomeLabel, Dimension};

/// Weight of the per-chunk random term.
pub const CHUNK_WEIGHT: f64 = 0.30;
/// Weight of the per-block random term.
pub const COORDINATE_WEIGHT: f64 = 0.20;
/// Weight of the vein noise term.
pub const NOISE_WEIGHT: f64 = 0.30;

/// Decoration step that underground ores generate in.
const ORE_STEP: i32 = 6;

/// An inclusive Y range with its base probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YBand {
    /// Lowest Y of the band.
    pub min_y: i32,
    /// Highest Y of the band.
    pub max_y: i32,
    /// Probability before the random terms are applied.
    pub base: f64,
}

impl YBand {
    const fn new(min_y: i32, max_y: i32, base: f64) -> Self {
        Self { min_y, max_y, base }
    }

    /// Whether `y` lies in this band.
    #[must_use]
    pub const fn contains(&self, y: i32) -> bool {
        self.min_y <= y && y <= self.max_y
    }
}

/// Extra density in a biome, restricted to a Y range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeBonus {
    /// Biome the bonus applies in.
    pub biome: BiomeLabel,
    /// Lowest Y of the bonus range.
    pub min_y: i32,
    /// Highest Y of the bonus range.
    pub max_y: i32,
    /// Factor applied to the probability.
    pub multiplier: f64,
}

/// Static description of where an ore generates.
#[derive(Debug)]
pub struct OreProfile {
    /// Identifier, also the source of the ore's random salt.
    pub key: &'static str,
    /// Human readable name.
    pub name: &'static str,
    /// Dimension the ore generates in.
    pub dimension: Dimension,
    /// Lowest valid Y.
    pub min_y: i32,
    /// Highest valid Y.
    pub max_y: i32,
    /// Bands partitioning `min_y..=max_y`, ordered bottom to top.
    pub bands: &'static [YBand],
    /// Biome specific bonus, if any.
    pub bonus: Option<BiomeBonus>,
    /// Extra scarcity factor applied after everything else.
    pub rarity: f64,
}

impl OreProfile {
    /// The band containing `y`, if `y` is in range.
    #[must_use]
    pub fn band_at(&self, y: i32) -> Option<&YBand> {
        self.bands.iter().find(|band| band.contains(y))
    }

    /// Whether `y` is in the valid range.
    #[must_use]
    pub const fn contains_y(&self, y: i32) -> bool {
        self.min_y <= y && y <= self.max_y
    }

    /// Centre of the band with the highest base probability.
    #[must_use]
    pub fn optimal_y(&self) -> i32 {
        self.bands
            .iter()
            .fold(None::<&YBand>, |best, band| match best {
                Some(best) if best.base >= band.base => Some(best),
                _ => Some(band),
            })
            .map_or(self.min_y, |band| (band.min_y + band.max_y).div_euclid(2))
    }
}

static DIAMOND: OreProfile = OreProfile {
    key: "diamond",
    name: "Diamond",
    dimension: Dimension::Overworld,
    min_y: -64,
    max_y: 16,
    bands: &[
        YBand::new(-64, -50, 0.80),
        YBand::new(-49, -30, 0.60),
        YBand::new(-29, 0, 0.35),
        YBand::new(1, 16, 0.15),
    ],
    bonus: None,
    rarity: 1.0,
};

static GOLD: OreProfile = OreProfile {
    key: "gold",
    name: "Gold",
    dimension: Dimension::Overworld,
    min_y: -64,
    max_y: 256,
    bands: &[
        YBand::new(-64, -48, 0.35),
        YBand::new(-47, -16, 0.70),
        YBand::new(-15, 31, 0.45),
        YBand::new(32, 256, 0.05),
    ],
    bonus: Some(BiomeBonus {
        biome: BiomeLabel::Badlands,
        min_y: 32,
        max_y: 256,
        multiplier: 6.0,
    }),
    rarity: 1.0,
};

static NETHERITE: OreProfile = OreProfile {
    key: "netherite",
    name: "Ancient Debris",
    dimension: Dimension::Nether,
    min_y: 8,
    max_y: 22,
    bands: &[
        YBand::new(8, 12, 0.50),
        YBand::new(13, 17, 0.80),
        YBand::new(18, 22, 0.50),
    ],
    bonus: None,
    rarity: 0.35,
};

static IRON: OreProfile = OreProfile {
    key: "iron",
    name: "Iron",
    dimension: Dimension::Overworld,
    min_y: -64,
    max_y: 320,
    bands: &[
        YBand::new(-64, -25, 0.40),
        YBand::new(-24, 56, 0.65),
        YBand::new(57, 79, 0.30),
        YBand::new(80, 320, 0.55),
    ],
    bonus: None,
    rarity: 1.0,
};

static REDSTONE: OreProfile = OreProfile {
    key: "redstone",
    name: "Redstone",
    dimension: Dimension::Overworld,
    min_y: -64,
    max_y: 15,
    bands: &[
        YBand::new(-64, -59, 0.85),
        YBand::new(-58, -32, 0.65),
        YBand::new(-31, 15, 0.30),
    ],
    bonus: None,
    rarity: 1.0,
};

static COAL: OreProfile = OreProfile {
    key: "coal",
    name: "Coal",
    dimension: Dimension::Overworld,
    min_y: 0,
    max_y: 320,
    bands: &[
        YBand::new(0, 95, 0.75),
        YBand::new(96, 136, 0.55),
        YBand::new(137, 320, 0.25),
    ],
    bonus: None,
    rarity: 1.0,
};

static LAPIS: OreProfile = OreProfile {
    key: "lapis",
    name: "Lapis Lazuli",
    dimension: Dimension::Overworld,
    min_y: -64,
    max_y: 64,
    bands: &[
        YBand::new(-64, -33, 0.35),
        YBand::new(-32, 32, 0.60),
        YBand::new(33, 64, 0.20),
    ],
    bonus: None,
    rarity: 1.0,
};

/// An ore the engine can search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OreType {
    /// Diamond ore.
    Diamond,
    /// Gold ore.
    Gold,
    /// Ancient debris, the source of netherite.
    Netherite,
    /// Iron ore.
    Iron,
    /// Redstone ore.
    Redstone,
    /// Coal ore.
    Coal,
    /// Lapis lazuli ore.
    Lapis,
}

impl OreType {
    /// Every ore type, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Diamond,
        Self::Gold,
        Self::Netherite,
        Self::Iron,
        Self::Redstone,
        Self::Coal,
        Self::Lapis,
    ];

    /// The static profile of this ore.
    #[must_use]
    pub fn profile(self) -> &'static OreProfile {
        match self {
            Self::Diamond => &DIAMOND,
            Self::Gold => &GOLD,
            Self::Netherite => &NETHERITE,
            Self::Iron => &IRON,
            Self::Redstone => &REDSTONE,
            Self::Coal => &COAL,
            Self::Lapis => &LAPIS,
        }
    }

    /// Position in [`OreType::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.profile().name
    }
}

impl Display for OreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "ancient_debris" {
            return Ok(Self::Netherite);
        }
        Self::ALL
            .into_iter()
            .find(|ore| ore.profile().key == wanted)
            .ok_or_else(|| format!("unknown ore type: {s}"))
    }
}

/// A predicted ore location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OreLocation {
    /// Block position of the sample.
    pub pos: BlockPos,
    /// Chunk containing the sample.
    pub chunk: ChunkPos,
    /// The ore.
    pub ore: OreType,
    /// Estimated probability, in `[0, 1]`.
    pub probability: f64,
    /// Biome of the chunk.
    pub biome: BiomeLabel,
}

/// Ore density for one seed.
///
/// Holds one noise field per ore so each ore gets independent veins.
#[derive(Debug, Clone)]
pub struct OreDensityModel {
    seed: i64,
    salts: [i64; OreType::ALL.len()],
    fields: Vec<NoiseField>,
}

impl OreDensityModel {
    /// Builds the model for `seed`.
    #[must_use]
    pub fn new(seed: i64) -> Self {
        let salts = OreType::ALL.map(|ore| i64::from(java_string_hash(ore.profile().key)));
        let fields = salts.iter().map(|salt| NoiseField::new(seed ^ salt)).collect();
        Self {
            seed,
            salts,
            fields,
        }
    }

    /// The seed this model was built for.
    #[must_use]
    pub const fn seed(&self) -> i64 {
        self.seed
    }

    /// Probability of finding `ore` at the given block in `biome`.
    ///
    /// Zero outside the ore's valid Y range, otherwise in `[0, 1]`.
    #[must_use]
    pub fn probability(&self, ore: OreType, x: i32, y: i32, z: i32, biome: BiomeLabel) -> f64 {
        let profile = ore.profile();
        let Some(band) = profile.band_at(y) else {
            return 0.0;
        };

        let mix = CHUNK_WEIGHT * self.chunk_term(ore, ChunkPos::from_block(x, z))
            + COORDINATE_WEIGHT * self.coordinate_term(ore, x, y, z)
            + NOISE_WEIGHT * self.noise_term(ore, x, y, z);

        let mut probability = band.base * mix;
        let bonus = profile
            .bonus
            .filter(|bonus| bonus.biome == biome && (bonus.min_y..=bonus.max_y).contains(&y));
        if let Some(bonus) = bonus {
            probability *= bonus.multiplier;
        }
        (probability * profile.rarity).clamp(0.0, 1.0)
    }

    /// Uniform value shared by every block of the chunk.
    fn chunk_term(&self, ore: OreType, chunk: ChunkPos) -> f64 {
        let decoration = decoration_seed(self.seed, chunk.min_block_x(), chunk.min_block_z());
        let seed = feature_seed(decoration, ore.index() as i32, ORE_STEP);
        LegacyRandom::from_seed(seed).next_f64()
    }

    /// Uniform value for the single block.
    fn coordinate_term(&self, ore: OreType, x: i32, y: i32, z: i32) -> f64 {
        let seed = get_seed(x, y, z) ^ self.seed ^ self.salts[ore.index()];
        LegacyRandom::from_seed(seed).next_f64()
    }

    /// Vein noise remapped to `[0, 1]`.
    fn noise_term(&self, ore: OreType, x: i32, y: i32, z: i32) -> f64 {
        (self.fields[ore.index()].sample(x, y, z) + 1.0) * 0.5
    }
}
