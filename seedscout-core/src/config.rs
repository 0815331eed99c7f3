use std::{fs, io, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::ore::OreType;

/// Largest comprehensive grid, in columns from the centre along each axis.
const MAX_COMPREHENSIVE_STEPS: i32 = 4096;

const DEFAULT_CONFIG: &str = include_str!("../../package-content/seedscout_config.json5");

/// Errors raised while loading [`SearchSettings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("config io error: {0}")]
    Io(#[from] io::Error),
    /// The config file is not valid JSON5 for these settings.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json5::Error),
    /// A setting is out of range.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Tuning knobs of the search engine.
///
/// The defaults are the documented search behaviour; a config file only
/// needs to list the fields it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSettings {
    /// Largest accepted search radius, in blocks.
    pub max_radius: i32,
    /// Horizontal distance between sampled ore columns, in blocks.
    pub ore_stride: i32,
    /// Vertical distance between ore samples within a column.
    pub ore_y_stride: i32,
    /// Minimum probability for an ore sample to be kept.
    pub ore_threshold: f64,
    /// Ore results kept in normal mode.
    pub max_ore_results: usize,
    /// Chunk stride of the structure scan.
    pub structure_chunk_stride: i32,
    /// Structure results kept.
    pub max_structure_results: usize,
    /// The ore comprehensive mode searches for.
    pub comprehensive_ore: OreType,
    /// Half the side of the comprehensive scan square, in blocks.
    pub comprehensive_half_extent: i32,
    /// Horizontal distance between comprehensive columns, in blocks.
    pub comprehensive_stride: i32,
    /// Minimum probability kept in comprehensive mode.
    pub comprehensive_threshold: f64,
    /// Ore results kept in comprehensive mode.
    pub max_comprehensive_results: usize,
    /// Columns evaluated between cancellation checks.
    pub batch_columns: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_radius: 1000,
            ore_stride: 8,
            ore_y_stride: 1,
            ore_threshold: 0.15,
            max_ore_results: 100,
            structure_chunk_stride: 4,
            max_structure_results: 100,
            comprehensive_ore: OreType::Netherite,
            comprehensive_half_extent: 1024,
            comprehensive_stride: 16,
            comprehensive_threshold: 0.05,
            max_comprehensive_results: 500,
            batch_columns: 256,
        }
    }
}

impl SearchSettings {
    /// Parses settings from JSON5 text.
    pub fn from_json5(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json5::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json5(&fs::read_to_string(path)?)
    }

    /// Reads settings from `path`, writing the default file there first if
    /// it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG)?;
        log::info!("Wrote default search settings to {}", path.display());
        Ok(Self::default())
    }

    /// Checks that every setting is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_radius < 1 {
            return Err(ConfigError::Invalid("max_radius must be at least 1"));
        }
        if self.ore_stride < 1 || self.ore_y_stride < 1 || self.comprehensive_stride < 1 {
            return Err(ConfigError::Invalid("strides must be at least 1"));
        }
        if self.structure_chunk_stride < 1 {
            return Err(ConfigError::Invalid(
                "structure_chunk_stride must be at least 1",
            ));
        }
        if self.comprehensive_half_extent < 1 {
            return Err(ConfigError::Invalid(
                "comprehensive_half_extent must be at least 1",
            ));
        }
        if self.comprehensive_half_extent / self.comprehensive_stride > MAX_COMPREHENSIVE_STEPS {
            return Err(ConfigError::Invalid(
                "comprehensive_half_extent / comprehensive_stride must be at most 4096",
            ));
        }
        if !(0.0..=1.0).contains(&self.ore_threshold)
            || !(0.0..=1.0).contains(&self.comprehensive_threshold)
        {
            return Err(ConfigError::Invalid("thresholds must be in 0..=1"));
        }
        if self.batch_columns == 0 {
            return Err(ConfigError::Invalid("batch_columns must be at least 1"));
        }
        Ok(())
    }
}
