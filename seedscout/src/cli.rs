//! Command-line arguments.

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Parser;
use seedscout_core::{OreType, SearchRequest, StructureType};
use seedscout_utils::BlockPos;

/// Predicts where ores and structures are likely to be for a world seed.
///
/// Results are printed to stdout as JSON; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "seedscout", version, about)]
pub struct CliArgs {
    /// World seed, as a number or as text.
    #[arg(long, allow_hyphen_values = true)]
    pub seed: String,

    /// Centre X.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub x: i32,

    /// Centre Y.
    #[arg(long, default_value_t = -59, allow_negative_numbers = true)]
    pub y: i32,

    /// Centre Z.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub z: i32,

    /// Search radius in blocks.
    #[arg(long, default_value_t = 100)]
    pub radius: i32,

    /// Ore to search for. Repeatable.
    #[arg(long = "ore", value_name = "ORE")]
    pub ores: Vec<OreType>,

    /// Structure to search for. Repeatable.
    #[arg(long = "structure", value_name = "STRUCTURE")]
    pub structures: Vec<StructureType>,

    /// Scan a wide region for netherite only.
    #[arg(long)]
    pub comprehensive: bool,

    /// JSON5 settings file, created with defaults if missing.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

impl CliArgs {
    /// The search request described by these arguments.
    #[must_use]
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            seed: self.seed.clone(),
            center: BlockPos::new(self.x, self.y, self.z),
            radius: self.radius,
            ore_types: self.ores.iter().copied().collect::<BTreeSet<_>>(),
            structure_types: self.structures.iter().copied().collect::<BTreeSet<_>>(),
            comprehensive: self.comprehensive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_arguments() {
        let args = CliArgs::try_parse_from(["seedscout", "--seed", "hello", "--ore", "diamond"])
            .expect("parses");
        let request = args.to_request();
        assert_eq!(request.seed, "hello");
        assert_eq!(request.center, BlockPos::new(0, -59, 0));
        assert_eq!(request.radius, 100);
        assert_eq!(request.ore_types, BTreeSet::from([OreType::Diamond]));
        assert!(request.structure_types.is_empty());
        assert!(!request.comprehensive);
        assert!(!args.pretty);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_negative_coordinates_and_seed() {
        let args = CliArgs::try_parse_from([
            "seedscout",
            "--seed",
            "-42",
            "--x",
            "-300",
            "--z",
            "-16",
            "--y",
            "12",
        ])
        .expect("parses");
        let request = args.to_request();
        assert_eq!(request.seed, "-42");
        assert_eq!(request.center, BlockPos::new(-300, 12, -16));
    }

    #[test]
    fn test_repeated_selections() {
        let args = CliArgs::try_parse_from([
            "seedscout",
            "--seed",
            "1",
            "--ore",
            "gold",
            "--ore",
            "ancient_debris",
            "--ore",
            "gold",
            "--structure",
            "desert-pyramid",
            "--structure",
            "village",
            "--comprehensive",
        ])
        .expect("parses");
        let request = args.to_request();
        assert_eq!(
            request.ore_types,
            BTreeSet::from([OreType::Gold, OreType::Netherite])
        );
        assert_eq!(
            request.structure_types,
            BTreeSet::from([StructureType::Village, StructureType::DesertPyramid])
        );
        assert!(request.comprehensive);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert!(CliArgs::try_parse_from(["seedscout", "--seed", "1", "--ore", "emerald"]).is_err());
        assert!(
            CliArgs::try_parse_from(["seedscout", "--seed", "1", "--structure", "castle"]).is_err()
        );
        assert!(CliArgs::try_parse_from(["seedscout", "--ore", "diamond"]).is_err());
    }
}
