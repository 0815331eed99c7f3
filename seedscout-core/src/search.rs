//! Sampling, ranking and truncation of candidate locations.
//!
//! A [`SearchEngine`] is built for exactly one [`SearchRequest`]. Building it
//! validates the request and lays out the scan; running it walks the scan in
//! batches so callers can report progress, cancel, or yield to an async
//! runtime between batches. Batches are evaluated in parallel, and the final
//! ranking is a total order, so none of this affects the results.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::time::Instant;

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use seedscout_utils::seed;
use seedscout_utils::{BlockPos, ChunkPos};

use crate::biome::{BiomeEstimator, BiomeLabel, Dimension};
use crate::config::SearchSettings;
use crate::error::SearchError;
use crate::ore::{OreDensityModel, OreLocation, OreType};
use crate::structure::{StructureLocation, StructureSpacingModel, StructureType};

/// What to search for, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Seed text as the player typed it.
    pub seed: String,
    /// Centre of the search.
    pub center: BlockPos,
    /// Search radius in blocks.
    pub radius: i32,
    /// Ores to look for.
    #[serde(default)]
    pub ore_types: BTreeSet<OreType>,
    /// Structures to look for.
    #[serde(default)]
    pub structure_types: BTreeSet<StructureType>,
    /// Scan a large fixed region for the comprehensive ore only.
    #[serde(default)]
    pub comprehensive: bool,
}

/// Ranked results of a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    /// Ore locations, best first.
    pub ores: Vec<OreLocation>,
    /// Structure locations, best first.
    pub structures: Vec<StructureLocation>,
}

/// Batches finished so far out of the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProgress {
    /// Batches evaluated.
    pub completed: usize,
    /// Batches in the whole scan.
    pub total: usize,
}

struct OreScan {
    ore: OreType,
    y_stride: usize,
}

struct ScanPlan {
    ore_scans: Vec<OreScan>,
    threshold: f64,
    max_ore_results: usize,
    columns: Vec<(i32, i32)>,
    structure_samples: Vec<(StructureType, ChunkPos)>,
    center_chunk: ChunkPos,
    chunk_radius: i32,
    batch_size: usize,
}

impl ScanPlan {
    fn normal(settings: &SearchSettings, request: &SearchRequest) -> Self {
        let radius = request.radius;
        let stride = settings.ore_stride;
        let steps = radius / stride;
        let radius_sq = i64::from(radius) * i64::from(radius);

        let mut columns = Vec::new();
        if !request.ore_types.is_empty() {
            for i in -steps..=steps {
                for j in -steps..=steps {
                    let (dx, dz) = (i64::from(i * stride), i64::from(j * stride));
                    if dx * dx + dz * dz <= radius_sq {
                        columns.push((request.center.x + i * stride, request.center.z + j * stride));
                    }
                }
            }
        }

        let center_chunk = request.center.chunk();
        let chunk_radius = (radius + 15) / 16;
        let mut structure_samples = Vec::new();
        for &structure in &request.structure_types {
            let stride = settings
                .structure_chunk_stride
                .min(structure.profile().spacing);
            // Rounded up so every cell touching the radius box gets a sample.
            let steps = (chunk_radius + stride - 1) / stride;
            for i in -steps..=steps {
                for j in -steps..=steps {
                    structure_samples.push((
                        structure,
                        ChunkPos::new(center_chunk.x + i * stride, center_chunk.z + j * stride),
                    ));
                }
            }
        }

        Self {
            ore_scans: request
                .ore_types
                .iter()
                .map(|&ore| OreScan {
                    ore,
                    y_stride: settings.ore_y_stride as usize,
                })
                .collect(),
            threshold: settings.ore_threshold,
            max_ore_results: settings.max_ore_results,
            columns,
            structure_samples,
            center_chunk,
            chunk_radius,
            batch_size: settings.batch_columns,
        }
    }

    fn comprehensive(settings: &SearchSettings, request: &SearchRequest) -> Self {
        let stride = settings.comprehensive_stride;
        let steps = settings.comprehensive_half_extent / stride;
        let mut columns = Vec::with_capacity(((2 * steps + 1) * (2 * steps + 1)) as usize);
        for i in -steps..=steps {
            for j in -steps..=steps {
                columns.push((request.center.x + i * stride, request.center.z + j * stride));
            }
        }

        Self {
            ore_scans: vec![OreScan {
                ore: settings.comprehensive_ore,
                y_stride: 1,
            }],
            threshold: settings.comprehensive_threshold,
            max_ore_results: settings.max_comprehensive_results,
            columns,
            structure_samples: Vec::new(),
            center_chunk: request.center.chunk(),
            chunk_radius: 0,
            batch_size: settings.batch_columns,
        }
    }

    fn ore_batches(&self) -> usize {
        self.columns.len().div_ceil(self.batch_size)
    }

    fn total_batches(&self) -> usize {
        self.ore_batches() + self.structure_samples.len().div_ceil(self.batch_size)
    }

    fn contains_chunk(&self, chunk: ChunkPos) -> bool {
        let dx = i64::from(chunk.x - self.center_chunk.x);
        let dz = i64::from(chunk.z - self.center_chunk.z);
        let radius = i64::from(self.chunk_radius);
        dx * dx + dz * dz <= radius * radius
    }
}

/// Evaluates whole columns against the ore scans. Shared across threads.
struct ColumnScanner<'a> {
    ores: &'a OreDensityModel,
    biomes: &'a BiomeEstimator,
    biome_cache: &'a FxHashMap<(Dimension, ChunkPos), BiomeLabel>,
    scans: &'a [OreScan],
    threshold: f64,
}

impl ColumnScanner<'_> {
    fn scan(&self, x: i32, z: i32) -> Vec<OreLocation> {
        let chunk = ChunkPos::from_block(x, z);
        let mut hits = Vec::new();
        for scan in self.scans {
            let profile = scan.ore.profile();
            let biome = self
                .biome_cache
                .get(&(profile.dimension, chunk))
                .copied()
                .unwrap_or_else(|| self.biomes.classify_in(profile.dimension, chunk.x, chunk.z));
            for y in (profile.min_y..=profile.max_y).step_by(scan.y_stride) {
                let probability = self.ores.probability(scan.ore, x, y, z, biome);
                if probability >= self.threshold {
                    hits.push(OreLocation {
                        pos: BlockPos::new(x, y, z),
                        chunk,
                        ore: scan.ore,
                        probability,
                        biome,
                    });
                }
            }
        }
        hits
    }
}

/// Classifies the chunks of `columns` not seen by earlier batches.
fn cache_biomes(
    cache: &mut FxHashMap<(Dimension, ChunkPos), BiomeLabel>,
    biomes: &BiomeEstimator,
    scans: &[OreScan],
    columns: &[(i32, i32)],
) {
    for &(x, z) in columns {
        let chunk = ChunkPos::from_block(x, z);
        for scan in scans {
            let dimension = scan.ore.profile().dimension;
            cache
                .entry((dimension, chunk))
                .or_insert_with(|| biomes.classify_in(dimension, chunk.x, chunk.z));
        }
    }
}

/// Best first: probability descending, then distance from `center`
/// ascending, then position, then ore.
fn compare_ores(center: BlockPos, a: &OreLocation, b: &OreLocation) -> Ordering {
    b.probability
        .total_cmp(&a.probability)
        .then_with(|| a.pos.distance_sq(center).cmp(&b.pos.distance_sq(center)))
        .then_with(|| a.pos.cmp(&b.pos))
        .then_with(|| a.ore.cmp(&b.ore))
}

/// Like [`compare_ores`], with horizontal distance since structure heights
/// are approximate.
fn compare_structures(center: BlockPos, a: &StructureLocation, b: &StructureLocation) -> Ordering {
    b.probability
        .total_cmp(&a.probability)
        .then_with(|| {
            a.pos
                .horizontal_distance_sq(center)
                .cmp(&b.pos.horizontal_distance_sq(center))
        })
        .then_with(|| a.pos.cmp(&b.pos))
        .then_with(|| a.structure.cmp(&b.structure))
}

/// Runs one search request.
pub struct SearchEngine {
    request: SearchRequest,
    seed: i64,
    max_structure_results: usize,
    ores: OreDensityModel,
    structures: StructureSpacingModel,
    biomes: BiomeEstimator,
    plan: ScanPlan,
    next_batch: usize,
    biome_cache: FxHashMap<(Dimension, ChunkPos), BiomeLabel>,
    visited_cells: FxHashSet<(StructureType, ChunkPos)>,
    ore_hits: Vec<OreLocation>,
    structure_hits: Vec<StructureLocation>,
}

impl SearchEngine {
    /// Validates `request` and prepares the scan.
    pub fn new(settings: &SearchSettings, request: SearchRequest) -> Result<Self, SearchError> {
        settings
            .validate()
            .map_err(|err| SearchError::InvalidSettings(err.to_string()))?;
        let seed = seed::normalize(&request.seed)?;

        if request.radius < 1 || request.radius > settings.max_radius {
            return Err(SearchError::InvalidSearchRequest(format!(
                "radius must be between 1 and {}, got {}",
                settings.max_radius, request.radius
            )));
        }

        let plan = if request.comprehensive {
            let ignored_ores = request
                .ore_types
                .iter()
                .filter(|&&ore| ore != settings.comprehensive_ore)
                .count();
            if ignored_ores > 0 || !request.structure_types.is_empty() {
                log::info!(
                    "Comprehensive search only looks for {}; ignoring {} other ore and {} structure selections",
                    settings.comprehensive_ore,
                    ignored_ores,
                    request.structure_types.len()
                );
            }
            ScanPlan::comprehensive(settings, &request)
        } else {
            if request.ore_types.is_empty() && request.structure_types.is_empty() {
                return Err(SearchError::InvalidSearchRequest(
                    "select at least one ore or structure type".to_owned(),
                ));
            }
            ScanPlan::normal(settings, &request)
        };

        log::debug!(
            "Planned search for seed {seed}: {} columns, {} structure samples, {} batches",
            plan.columns.len(),
            plan.structure_samples.len(),
            plan.total_batches()
        );

        Ok(Self {
            request,
            seed,
            max_structure_results: settings.max_structure_results,
            ores: OreDensityModel::new(seed),
            structures: StructureSpacingModel::new(seed),
            biomes: BiomeEstimator::new(seed),
            plan,
            next_batch: 0,
            biome_cache: FxHashMap::default(),
            visited_cells: FxHashSet::default(),
            ore_hits: Vec::new(),
            structure_hits: Vec::new(),
        })
    }

    /// The normalized world seed.
    #[must_use]
    pub const fn seed(&self) -> i64 {
        self.seed
    }

    /// Number of batches in the scan.
    #[must_use]
    pub fn total_batches(&self) -> usize {
        self.plan.total_batches()
    }

    /// Runs the whole search on the calling thread.
    pub fn run(self) -> Result<SearchResults, SearchError> {
        self.run_with(&CancellationToken::new(), |_| {})
    }

    /// Runs the search, checking `cancel` before each batch and reporting to
    /// `progress` after it.
    pub fn run_with(
        mut self,
        cancel: &CancellationToken,
        mut progress: impl FnMut(SearchProgress),
    ) -> Result<SearchResults, SearchError> {
        let _span = tracing::info_span!("search", seed = self.seed).entered();
        let started = Instant::now();
        while self.next_batch < self.plan.total_batches() {
            if cancel.is_cancelled() {
                log::debug!("Search cancelled after {} batches", self.next_batch);
                return Err(SearchError::Cancelled);
            }
            progress(self.step());
        }
        Ok(self.finish(started))
    }

    /// Runs the search cooperatively, yielding to the runtime after every
    /// batch.
    pub async fn run_async(
        self,
        cancel: CancellationToken,
        progress: impl FnMut(SearchProgress) + Send,
    ) -> Result<SearchResults, SearchError> {
        let span = tracing::info_span!("search", seed = self.seed);
        self.run_batches_async(cancel, progress)
            .instrument(span)
            .await
    }

    async fn run_batches_async(
        mut self,
        cancel: CancellationToken,
        mut progress: impl FnMut(SearchProgress) + Send,
    ) -> Result<SearchResults, SearchError> {
        let started = Instant::now();
        while self.next_batch < self.plan.total_batches() {
            if cancel.is_cancelled() {
                log::debug!("Search cancelled after {} batches", self.next_batch);
                return Err(SearchError::Cancelled);
            }
            progress(self.step());
            tokio::task::yield_now().await;
        }
        Ok(self.finish(started))
    }

    /// Evaluates the next batch.
    fn step(&mut self) -> SearchProgress {
        let batch = self.next_batch;
        let size = self.plan.batch_size;
        let ore_batches = self.plan.ore_batches();

        if batch < ore_batches {
            let start = batch * size;
            let end = (start + size).min(self.plan.columns.len());
            let columns = &self.plan.columns[start..end];
            cache_biomes(
                &mut self.biome_cache,
                &self.biomes,
                &self.plan.ore_scans,
                columns,
            );
            let scanner = ColumnScanner {
                ores: &self.ores,
                biomes: &self.biomes,
                biome_cache: &self.biome_cache,
                scans: &self.plan.ore_scans,
                threshold: self.plan.threshold,
            };
            let hits: Vec<OreLocation> = columns
                .par_iter()
                .flat_map_iter(|&(x, z)| scanner.scan(x, z))
                .collect();
            self.ore_hits.extend(hits);
        } else {
            let start = (batch - ore_batches) * size;
            let end = (start + size).min(self.plan.structure_samples.len());
            let mut candidates = Vec::new();
            for &(structure, chunk) in &self.plan.structure_samples[start..end] {
                let cell = StructureSpacingModel::cell_of(structure, chunk);
                if !self.visited_cells.insert((structure, cell)) {
                    continue;
                }
                let candidate = self.structures.candidate(structure, chunk.x, chunk.z);
                if self.plan.contains_chunk(candidate) {
                    candidates.push((structure, candidate));
                }
            }
            let structures = &self.structures;
            let hits: Vec<StructureLocation> = candidates
                .par_iter()
                .filter_map(|&(structure, chunk)| structures.locate(structure, chunk))
                .collect();
            self.structure_hits.extend(hits);
        }

        self.next_batch += 1;
        SearchProgress {
            completed: self.next_batch,
            total: self.plan.total_batches(),
        }
    }

    fn finish(self, started: Instant) -> SearchResults {
        let center = self.request.center;

        let mut ores = self.ore_hits;
        let ore_candidates = ores.len();
        ores.par_sort_unstable_by(|a, b| compare_ores(center, a, b));
        ores.truncate(self.plan.max_ore_results);

        let mut structures = self.structure_hits;
        structures.sort_unstable_by(|a, b| compare_structures(center, a, b));
        structures.truncate(self.max_structure_results);

        log::info!(
            "Search for seed {} finished in {:.2?}: kept {} of {} ore candidates, {} structures",
            self.seed,
            started.elapsed(),
            ores.len(),
            ore_candidates,
            structures.len()
        );

        SearchResults { ores, structures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(radius: i32) -> SearchRequest {
        SearchRequest {
            seed: "8674308105921866736".to_owned(),
            center: BlockPos::new(0, -59, 0),
            radius,
            ore_types: BTreeSet::from([OreType::Diamond]),
            structure_types: BTreeSet::new(),
            comprehensive: false,
        }
    }

    fn ore_at(x: i32, y: i32, z: i32, probability: f64) -> OreLocation {
        let pos = BlockPos::new(x, y, z);
        OreLocation {
            pos,
            chunk: pos.chunk(),
            ore: OreType::Diamond,
            probability,
            biome: BiomeLabel::Plains,
        }
    }

    #[test]
    fn test_radius_is_validated() {
        let settings = SearchSettings::default();
        for radius in [0, -5, settings.max_radius + 1] {
            assert!(matches!(
                SearchEngine::new(&settings, request(radius)),
                Err(SearchError::InvalidSearchRequest(_))
            ));
        }
        assert!(SearchEngine::new(&settings, request(settings.max_radius)).is_ok());
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let mut empty = request(50);
        empty.ore_types.clear();
        assert!(matches!(
            SearchEngine::new(&SearchSettings::default(), empty.clone()),
            Err(SearchError::InvalidSearchRequest(_))
        ));

        // Comprehensive mode picks its own ore.
        empty.comprehensive = true;
        assert!(SearchEngine::new(&SearchSettings::default(), empty).is_ok());
    }

    #[test]
    fn test_empty_seed_is_rejected() {
        let mut blank = request(50);
        blank.seed = "  ".to_owned();
        assert!(matches!(
            SearchEngine::new(&SearchSettings::default(), blank),
            Err(SearchError::InvalidSeedFormat(_))
        ));
    }

    #[test]
    fn test_text_seed_is_normalized() {
        let mut text = request(50);
        text.seed = "hello".to_owned();
        let engine = SearchEngine::new(&SearchSettings::default(), text).expect("valid request");
        assert_eq!(engine.seed(), 99_162_322);
    }

    #[test]
    fn test_tie_break_order() {
        let center = BlockPos::new(0, 0, 0);
        let mut hits = vec![
            ore_at(10, 0, 0, 0.5),
            ore_at(-3, 0, 0, 0.5),
            ore_at(3, 0, 0, 0.5),
            ore_at(50, 0, 0, 0.9),
            ore_at(0, 0, 3, 0.5),
        ];
        hits.sort_by(|a, b| compare_ores(center, a, b));
        let order: Vec<(i32, i32, i32)> =
            hits.iter().map(|hit| (hit.pos.x, hit.pos.y, hit.pos.z)).collect();
        assert_eq!(
            order,
            vec![(50, 0, 0), (-3, 0, 0), (0, 0, 3), (3, 0, 0), (10, 0, 0)]
        );
    }

    #[test]
    fn test_unchecked_settings_are_rejected() {
        let broken = [
            SearchSettings {
                ore_y_stride: 0,
                ..SearchSettings::default()
            },
            SearchSettings {
                batch_columns: 0,
                ..SearchSettings::default()
            },
            SearchSettings {
                comprehensive_half_extent: i32::MAX,
                comprehensive_stride: 1,
                ..SearchSettings::default()
            },
        ];
        for settings in &broken {
            assert!(matches!(
                SearchEngine::new(settings, request(50)),
                Err(SearchError::InvalidSettings(_))
            ));
        }
    }

    #[test]
    fn test_structure_tie_break_order() {
        let center = BlockPos::new(0, -40, 0);
        let at = |x: i32, y: i32, z: i32, structure: StructureType, probability: f64| {
            let pos = BlockPos::new(x, y, z);
            StructureLocation {
                pos,
                chunk: pos.chunk(),
                structure,
                probability,
                biome: BiomeLabel::Plains,
            }
        };
        let mut hits = vec![
            at(40, 64, 0, StructureType::Village, 0.7),
            // Height is ignored, so this ties with the village above.
            at(0, -51, 40, StructureType::AncientCity, 0.7),
            at(8, 64, 8, StructureType::RuinedPortal, 0.7),
            at(8, 64, 8, StructureType::Village, 0.7),
            at(500, 64, 500, StructureType::Igloo, 1.0),
        ];
        hits.sort_by(|a, b| compare_structures(center, a, b));
        let order: Vec<(StructureType, i32, i32)> = hits
            .iter()
            .map(|hit| (hit.structure, hit.pos.x, hit.pos.z))
            .collect();
        assert_eq!(
            order,
            vec![
                (StructureType::Igloo, 500, 500),
                (StructureType::Village, 8, 8),
                (StructureType::RuinedPortal, 8, 8),
                (StructureType::AncientCity, 0, 40),
                (StructureType::Village, 40, 0),
            ]
        );
    }

    #[test]
    fn test_cancelled_before_start() {
        let engine =
            SearchEngine::new(&SearchSettings::default(), request(50)).expect("valid request");
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(engine.run_with(&cancel, |_| {}), Err(SearchError::Cancelled));
    }

    #[test]
    fn test_cancel_mid_scan() {
        let settings = SearchSettings {
            batch_columns: 8,
            ..SearchSettings::default()
        };
        let engine = SearchEngine::new(&settings, request(100)).expect("valid request");
        assert!(engine.total_batches() > 2);
        let cancel = CancellationToken::new();
        let mut seen = 0;
        let result = engine.run_with(&cancel, |progress| {
            seen = progress.completed;
            if progress.completed == 2 {
                cancel.cancel();
            }
        });
        assert_eq!(result, Err(SearchError::Cancelled));
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_progress_reaches_total() {
        let settings = SearchSettings {
            batch_columns: 16,
            ..SearchSettings::default()
        };
        let mut with_structures = request(80);
        with_structures.structure_types.insert(StructureType::Village);
        let engine = SearchEngine::new(&settings, with_structures).expect("valid request");
        let total = engine.total_batches();
        let mut reports = Vec::new();
        engine
            .run_with(&CancellationToken::new(), |progress| reports.push(progress))
            .expect("search runs");
        assert_eq!(reports.len(), total);
        assert!(reports.windows(2).all(|pair| pair[0].completed + 1 == pair[1].completed));
        assert_eq!(
            reports.last(),
            Some(&SearchProgress {
                completed: total,
                total
            })
        );
    }

    #[test]
    fn test_batch_size_does_not_change_results() {
        let small = SearchSettings {
            batch_columns: 3,
            ..SearchSettings::default()
        };
        let large = SearchSettings::default();
        let mut req = request(64);
        req.structure_types.insert(StructureType::RuinedPortal);
        let a = SearchEngine::new(&small, req.clone())
            .and_then(SearchEngine::run)
            .expect("search runs");
        let b = SearchEngine::new(&large, req)
            .and_then(SearchEngine::run)
            .expect("search runs");
        assert_eq!(a, b);
    }
}
