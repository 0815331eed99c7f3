//! # SeedScout Core
//!
//! Statistical prediction of ore and structure locations from a world seed.
//! Everything here is a pure function of the seed and the request: the same
//! inputs always produce the same ranked results.
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
    clippy::struct_excessive_bools,
    clippy::needless_pass_by_value
)]

/// Coarse biome classification of chunks.
pub mod biome;
/// Search tuning loaded from JSON5.
pub mod config;
/// Errors surfaced to callers.
pub mod error;
/// Ore profiles and the ore density model.
pub mod ore;
/// Sampling, ranking and truncation of candidate locations.
pub mod search;
/// Structure profiles and the spacing grid model.
pub mod structure;

pub use biome::{BiomeEstimator, BiomeLabel, Dimension};
pub use config::SearchSettings;
pub use error::SearchError;
pub use ore::{OreDensityModel, OreLocation, OreType};
pub use search::{SearchEngine, SearchProgress, SearchRequest, SearchResults};
pub use structure::{StructureLocation, StructureSpacingModel, StructureType};
