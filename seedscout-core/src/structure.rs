//! Structure profiles and the spacing grid model.
//!
//! The game places structures on a grid: the chunk plane is split into
//! square cells of `spacing` chunks and each cell gets exactly one candidate
//! chunk, offset from the cell corner by a random amount below
//! `spacing - separation`. That keeps instances at least `separation` chunks
//! apart while still looking irregular. The candidate only hosts the
//! structure if its biome allows it.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use seedscout_utils::random::worldgen::large_feature_seed;
use seedscout_utils::random::{LegacyRandom, Random};
use seedscout_utils::{BlockPos, ChunkPos};

use crate::biome::{BiomeEstimator, BiomeLabel, Dimension};

/// Y used for structures that sit on the surface.
pub const SURFACE_Y: i32 = 64;

/// How the candidate offset is drawn inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadType {
    /// Uniform over the offset range.
    Linear,
    /// Average of two uniform draws, biased towards the cell centre.
    Triangular,
}

/// Biomes a structure may generate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiomeSet {
    /// Any biome of the structure's dimension.
    Any,
    /// Any dry overworld land.
    Land,
    /// Only the listed biomes.
    Only(&'static [BiomeLabel]),
}

impl BiomeSet {
    /// Whether `biome` is in this set.
    #[must_use]
    pub fn allows(self, biome: BiomeLabel) -> bool {
        match self {
            Self::Any => true,
            Self::Land => biome.is_land(),
            Self::Only(biomes) => biomes.contains(&biome),
        }
    }
}

/// Approximate height of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureHeight {
    /// On the terrain surface.
    Surface,
    /// At a fixed Y.
    Fixed(i32),
}

impl StructureHeight {
    /// The Y reported for this height.
    #[must_use]
    pub const fn y(self) -> i32 {
        match self {
            Self::Surface => SURFACE_Y,
            Self::Fixed(y) => y,
        }
    }
}

/// Display-only rarity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Found almost everywhere.
    Common,
    /// Found in most regions.
    Uncommon,
    /// Worth a search.
    Rare,
    /// Often thousands of blocks apart.
    VeryRare,
}

/// Static placement rules of a structure.
#[derive(Debug)]
pub struct StructureProfile {
    /// Identifier.
    pub key: &'static str,
    /// Human readable name.
    pub name: &'static str,
    /// Side of a spacing cell, in chunks.
    pub spacing: i32,
    /// Minimum distance between two instances, in chunks.
    pub separation: i32,
    /// Salt mixed into the cell seed.
    pub salt: i32,
    /// Distribution of the candidate offset.
    pub spread: SpreadType,
    /// Dimension the structure generates in.
    pub dimension: Dimension,
    /// Biomes the candidate chunk must be in.
    pub biomes: BiomeSet,
    /// Approximate height.
    pub height: StructureHeight,
    /// Chance that an eligible candidate actually generates.
    pub frequency: f64,
    /// Rarity class for display.
    pub rarity: Rarity,
}

impl StructureProfile {
    /// Range of the candidate offset inside a cell, in chunks.
    ///
    /// Candidates of neighbouring cells are at least
    /// `spacing - jitter + 1` chunks apart.
    #[must_use]
    pub const fn jitter(&self) -> i32 {
        self.spacing - self.separation
    }
}

const VILLAGE_BIOMES: &[BiomeLabel] = &[
    BiomeLabel::Plains,
    BiomeLabel::Desert,
    BiomeLabel::Savanna,
    BiomeLabel::Taiga,
    BiomeLabel::SnowyPlains,
];

macro_rules! profile {
    (
        $key:literal, $name:literal, $spacing:literal / $separation:literal, salt $salt:literal,
        $spread:ident, $dimension:ident, $biomes:expr, $height:expr, $frequency:literal, $rarity:ident
    ) => {
        StructureProfile {
            key: $key,
            name: $name,
            spacing: $spacing,
            separation: $separation,
            salt: $salt,
            spread: SpreadType::$spread,
            dimension: Dimension::$dimension,
            biomes: $biomes,
            height: $height,
            frequency: $frequency,
            rarity: Rarity::$rarity,
        }
    };
}

static PROFILES: [StructureProfile; 17] = [
    profile!("village", "Village", 34 / 8, salt 10_387_312,
        Linear, Overworld, BiomeSet::Only(VILLAGE_BIOMES), StructureHeight::Surface, 1.0, Common),
    profile!("desert_pyramid", "Desert Pyramid", 32 / 8, salt 14_357_617,
        Linear, Overworld, BiomeSet::Only(&[BiomeLabel::Desert]), StructureHeight::Surface, 1.0, Uncommon),
    profile!("jungle_pyramid", "Jungle Temple", 32 / 8, salt 14_357_619,
        Linear, Overworld, BiomeSet::Only(&[BiomeLabel::Jungle]), StructureHeight::Surface, 1.0, Uncommon),
    profile!("swamp_hut", "Swamp Hut", 32 / 8, salt 14_357_620,
        Linear, Overworld, BiomeSet::Only(&[BiomeLabel::Swamp]), StructureHeight::Surface, 1.0, Uncommon),
    profile!("igloo", "Igloo", 32 / 8, salt 14_357_618,
        Linear, Overworld, BiomeSet::Only(&[BiomeLabel::SnowyPlains]), StructureHeight::Surface, 1.0, Rare),
    profile!("pillager_outpost", "Pillager Outpost", 32 / 8, salt 165_745_296,
        Linear, Overworld, BiomeSet::Only(VILLAGE_BIOMES), StructureHeight::Surface, 0.2, Uncommon),
    profile!("ocean_monument", "Ocean Monument", 32 / 5, salt 10_387_313,
        Triangular, Overworld, BiomeSet::Only(&[BiomeLabel::Ocean]), StructureHeight::Fixed(39), 1.0, Rare),
    profile!("woodland_mansion", "Woodland Mansion", 80 / 20, salt 10_387_319,
        Triangular, Overworld, BiomeSet::Only(&[BiomeLabel::Forest]), StructureHeight::Surface, 1.0, VeryRare),
    profile!("ocean_ruin", "Ocean Ruin", 20 / 8, salt 14_357_621,
        Linear, Overworld, BiomeSet::Only(&[BiomeLabel::Ocean]), StructureHeight::Fixed(45), 1.0, Common),
    profile!("shipwreck", "Shipwreck", 24 / 4, salt 165_745_295,
        Linear, Overworld, BiomeSet::Only(&[BiomeLabel::Ocean, BiomeLabel::Beach]), StructureHeight::Fixed(55), 1.0, Common),
    profile!("buried_treasure", "Buried Treasure", 1 / 0, salt 0,
        Linear, Overworld, BiomeSet::Only(&[BiomeLabel::Beach]), StructureHeight::Fixed(60), 0.01, Uncommon),
    profile!("ruined_portal", "Ruined Portal", 40 / 15, salt 34_222_645,
        Linear, Overworld, BiomeSet::Any, StructureHeight::Surface, 1.0, Common),
    profile!("ancient_city", "Ancient City", 24 / 8, salt 20_083_232,
        Linear, Overworld, BiomeSet::Land, StructureHeight::Fixed(-51), 1.0, Rare),
    profile!("trail_ruins", "Trail Ruins", 34 / 8, salt 83_469_867,
        Linear, Overworld, BiomeSet::Only(&[BiomeLabel::Taiga, BiomeLabel::Jungle, BiomeLabel::Forest]),
        StructureHeight::Fixed(55), 1.0, Rare),
    profile!("nether_fortress", "Nether Fortress", 27 / 4, salt 30_084_232,
        Linear, Nether, BiomeSet::Any, StructureHeight::Fixed(64), 1.0, Uncommon),
    profile!("bastion_remnant", "Bastion Remnant", 27 / 4, salt 30_084_233,
        Linear, Nether, BiomeSet::Any, StructureHeight::Fixed(40), 1.0, Uncommon),
    profile!("end_city", "End City", 20 / 11, salt 10_387_313,
        Triangular, End, BiomeSet::Any, StructureHeight::Fixed(60), 1.0, Rare),
];

/// A structure the engine can search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    /// Village.
    Village,
    /// Desert pyramid.
    DesertPyramid,
    /// Jungle temple.
    JunglePyramid,
    /// Witch hut.
    SwampHut,
    /// Igloo.
    Igloo,
    /// Pillager outpost.
    PillagerOutpost,
    /// Ocean monument.
    OceanMonument,
    /// Woodland mansion.
    WoodlandMansion,
    /// Ocean ruin.
    OceanRuin,
    /// Shipwreck.
    Shipwreck,
    /// Buried treasure.
    BuriedTreasure,
    /// Ruined portal.
    RuinedPortal,
    /// Ancient city.
    AncientCity,
    /// Trail ruins.
    TrailRuins,
    /// Nether fortress.
    NetherFortress,
    /// Bastion remnant.
    BastionRemnant,
    /// End city.
    EndCity,
}

impl StructureType {
    /// Every structure type, in declaration order.
    pub const ALL: [Self; 17] = [
        Self::Village,
        Self::DesertPyramid,
        Self::JunglePyramid,
        Self::SwampHut,
        Self::Igloo,
        Self::PillagerOutpost,
        Self::OceanMonument,
        Self::WoodlandMansion,
        Self::OceanRuin,
        Self::Shipwreck,
        Self::BuriedTreasure,
        Self::RuinedPortal,
        Self::AncientCity,
        Self::TrailRuins,
        Self::NetherFortress,
        Self::BastionRemnant,
        Self::EndCity,
    ];

    /// The static profile of this structure.
    #[must_use]
    pub fn profile(self) -> &'static StructureProfile {
        &PROFILES[self as usize]
    }

    /// Human readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.profile().name
    }
}

impl Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StructureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|structure| structure.profile().key == wanted)
            .ok_or_else(|| format!("unknown structure type: {s}"))
    }
}

/// A predicted structure location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StructureLocation {
    /// Centre of the candidate chunk, at the structure's approximate Y.
    pub pos: BlockPos,
    /// The candidate chunk.
    pub chunk: ChunkPos,
    /// The structure.
    pub structure: StructureType,
    /// Estimated probability, in `(0, 1]`.
    pub probability: f64,
    /// Biome of the chunk.
    pub biome: BiomeLabel,
}

/// Structure placement for one seed.
#[derive(Debug, Clone, Copy)]
pub struct StructureSpacingModel {
    seed: i64,
    biomes: BiomeEstimator,
}

impl StructureSpacingModel {
    /// Builds the model for `seed`.
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self {
            seed,
            biomes: BiomeEstimator::new(seed),
        }
    }

    /// The spacing cell containing `chunk`.
    #[must_use]
    pub fn cell_of(structure: StructureType, chunk: ChunkPos) -> ChunkPos {
        let spacing = structure.profile().spacing;
        ChunkPos::new(chunk.x.div_euclid(spacing), chunk.z.div_euclid(spacing))
    }

    fn cell_random(&self, structure: StructureType, cell: ChunkPos) -> (ChunkPos, LegacyRandom) {
        let profile = structure.profile();
        let mut random =
            LegacyRandom::from_seed(large_feature_seed(self.seed, cell.x, cell.z, profile.salt));
        let range = profile.jitter();
        let mut offset = || match profile.spread {
            SpreadType::Linear => random.next_i32_bounded(range),
            SpreadType::Triangular => {
                (random.next_i32_bounded(range) + random.next_i32_bounded(range)) / 2
            }
        };
        let offset_x = offset();
        let offset_z = offset();
        let candidate = ChunkPos::new(
            cell.x * profile.spacing + offset_x,
            cell.z * profile.spacing + offset_z,
        );
        (candidate, random)
    }

    /// The only chunk of `chunk`'s spacing cell that may host `structure`.
    #[must_use]
    pub fn candidate(&self, structure: StructureType, chunk_x: i32, chunk_z: i32) -> ChunkPos {
        let cell = Self::cell_of(structure, ChunkPos::new(chunk_x, chunk_z));
        self.cell_random(structure, cell).0
    }

    /// Resolves the structure in `chunk`, if the chunk hosts one.
    #[must_use]
    pub fn locate(&self, structure: StructureType, chunk: ChunkPos) -> Option<StructureLocation> {
        let profile = structure.profile();
        let cell = Self::cell_of(structure, chunk);
        let (candidate, mut random) = self.cell_random(structure, cell);
        if candidate != chunk {
            return None;
        }
        let biome = self.biomes.classify_in(profile.dimension, chunk.x, chunk.z);
        if !profile.biomes.allows(biome) {
            return None;
        }
        let roll = random.next_f64();
        Some(StructureLocation {
            pos: chunk.center_block(profile.height.y()),
            chunk,
            structure,
            probability: (profile.frequency * (0.5 + 0.5 * roll)).clamp(0.0, 1.0),
            biome,
        })
    }

    /// Probability that `structure` is in the chunk; zero when ineligible.
    #[must_use]
    pub fn evaluate(&self, structure: StructureType, chunk_x: i32, chunk_z: i32) -> f64 {
        self.locate(structure, ChunkPos::new(chunk_x, chunk_z))
            .map_or(0.0, |location| location.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: i64 = 8_674_308_105_921_866_736;

    fn eligible_chunks(
        model: &StructureSpacingModel,
        structure: StructureType,
        extent: i32,
    ) -> Vec<ChunkPos> {
        let mut found = Vec::new();
        for x in -extent..extent {
            for z in -extent..extent {
                if model.evaluate(structure, x, z) > 0.0 {
                    found.push(ChunkPos::new(x, z));
                }
            }
        }
        found
    }

    #[test]
    fn test_profiles_match_variants() {
        assert_eq!(PROFILES.len(), StructureType::ALL.len());
        for structure in StructureType::ALL {
            let profile = structure.profile();
            assert!(profile.spacing > profile.separation, "{structure}");
            assert!(profile.separation >= 0, "{structure}");
            assert!(profile.frequency > 0.0 && profile.frequency <= 1.0);
            assert_eq!(structure.to_string(), profile.name);
        }
    }

    #[test]
    fn test_candidate_is_inside_its_cell() {
        let model = StructureSpacingModel::new(SEED);
        for structure in StructureType::ALL {
            let spacing = structure.profile().spacing;
            for x in (-300..300).step_by(37) {
                for z in (-300..300).step_by(41) {
                    let candidate = model.candidate(structure, x, z);
                    assert_eq!(
                        StructureSpacingModel::cell_of(structure, candidate),
                        StructureSpacingModel::cell_of(structure, ChunkPos::new(x, z)),
                    );
                    assert!(candidate.x.rem_euclid(spacing) < structure.profile().jitter());
                }
            }
        }
    }

    #[test]
    fn test_spacing_is_respected() {
        let model = StructureSpacingModel::new(SEED);
        for structure in [
            StructureType::Village,
            StructureType::RuinedPortal,
            StructureType::OceanMonument,
            StructureType::NetherFortress,
            StructureType::EndCity,
        ] {
            let profile = structure.profile();
            let minimum = profile.spacing - profile.jitter();
            let found = eligible_chunks(&model, structure, 160);
            assert!(!found.is_empty(), "no {structure} found");
            for (i, a) in found.iter().enumerate() {
                for b in &found[i + 1..] {
                    assert!(
                        a.chebyshev_distance(*b) >= minimum,
                        "{structure} at {a} and {b} closer than {minimum}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_one_candidate_per_cell() {
        let model = StructureSpacingModel::new(SEED);
        let found = eligible_chunks(&model, StructureType::RuinedPortal, 120);
        let mut cells: Vec<ChunkPos> = found
            .iter()
            .map(|chunk| StructureSpacingModel::cell_of(StructureType::RuinedPortal, *chunk))
            .collect();
        let before = cells.len();
        cells.sort_unstable();
        cells.dedup();
        assert_eq!(before, cells.len());
    }

    #[test]
    fn test_desert_structure_never_in_ocean() {
        let model = StructureSpacingModel::new(SEED);
        let biomes = BiomeEstimator::new(SEED);
        let mut checked_ocean = 0;
        for x in -150..150 {
            for z in -150..150 {
                let biome = biomes.classify(x, z);
                let p = model.evaluate(StructureType::DesertPyramid, x, z);
                if biome == BiomeLabel::Ocean {
                    checked_ocean += 1;
                    assert_eq!(p, 0.0, "desert pyramid in ocean chunk {x} {z}");
                }
                if p > 0.0 {
                    assert_eq!(biome, BiomeLabel::Desert);
                }
            }
        }
        assert!(checked_ocean > 0);
    }

    #[test]
    fn test_any_biome_structures_fill_every_cell() {
        let model = StructureSpacingModel::new(SEED);
        for x in -10..10 {
            for z in -10..10 {
                let candidate = model.candidate(StructureType::NetherFortress, x * 27, z * 27);
                let location = model.locate(StructureType::NetherFortress, candidate);
                let location = location.expect("fortress candidate must be eligible");
                assert_eq!(location.biome, BiomeLabel::Nether);
                assert_eq!(location.pos.y, 64);
                assert!(location.probability >= 0.5 && location.probability <= 1.0);
            }
        }
    }

    #[test]
    fn test_frequency_scales_probability() {
        let model = StructureSpacingModel::new(SEED);
        let found = eligible_chunks(&model, StructureType::PillagerOutpost, 200);
        for chunk in found {
            let p = model.evaluate(StructureType::PillagerOutpost, chunk.x, chunk.z);
            assert!(p > 0.0 && p <= 0.2, "outpost probability {p}");
        }
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let a = StructureSpacingModel::new(SEED);
        let b = StructureSpacingModel::new(SEED);
        for x in -60..60 {
            assert_eq!(
                a.evaluate(StructureType::Village, x, -x).to_bits(),
                b.evaluate(StructureType::Village, x, -x).to_bits()
            );
        }
    }

    #[test]
    fn test_parse_structure_type() {
        assert_eq!("village".parse::<StructureType>(), Ok(StructureType::Village));
        assert_eq!(
            "Desert Pyramid".parse::<StructureType>(),
            Ok(StructureType::DesertPyramid)
        );
        assert_eq!(
            "end-city".parse::<StructureType>(),
            Ok(StructureType::EndCity)
        );
        assert!("stronghold".parse::<StructureType>().is_err());
    }
}
