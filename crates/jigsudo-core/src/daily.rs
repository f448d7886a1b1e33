//! Daily board orchestration.
//!
//! Each attempt draws a fresh solution, derives the four symmetry variants,
//! checks the island budget, picks the Simon values and then covers and
//! carves every variant. The first attempt where all four variants succeed
//! wins; nothing survives a failed attempt.

use crate::absorb::absorb;
use crate::carve::carve;
use crate::document::{BoardData, Meta, PuzzleDocument, VariantTargets, DOCUMENT_VERSION};
use crate::error::{Error, Result};
use crate::grid::{Cell, CellSet, Grid};
use crate::islands::{reserve_islands, Island};
use crate::search::{SearchConfig, SequenceGenerator};
use crate::seed::DailySeed;
use crate::sequence::Sequence;
use crate::sudoku::{GameData, SeededSudoku, SudokuSource};
use crate::topology::{self, TopologyMap};
use crate::variant::Variant;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Configuration for daily generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyConfig {
    /// Top-level attempts before giving up
    pub max_attempts: usize,
    /// Attempt `n` uses seed `base + n * seed_stride`
    pub seed_stride: u64,
    /// Offset from the attempt seed to the first cover seed
    pub cover_seed_offset: u64,
    /// Most distinct island values the variants may force together
    pub max_forced_values: usize,
    /// Number of Simon values
    pub simon_count: usize,
    /// Stranded cells the cover search may leave for the orphan repair
    pub cover_slack: usize,
    /// Cover seeds tried per variant before the attempt is abandoned; a
    /// failed carve moves on to the next seed
    pub cover_retries: usize,
    /// Placement budget for each cover search
    pub node_budget: Option<u64>,
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            seed_stride: 777,
            cover_seed_offset: 100,
            max_forced_values: 3,
            simon_count: 3,
            cover_slack: 3,
            cover_retries: 6,
            node_budget: Some(20_000),
        }
    }
}

impl DailyConfig {
    fn search(&self) -> SearchConfig {
        SearchConfig::full_cover(self.cover_slack).with_node_budget(self.node_budget)
    }
}

/// Why an attempt was abandoned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The Sudoku source produced no solvable grid
    NoSolution,
    /// The variants' islands force too many distinct values
    ForcedValueOverflow { forced: Vec<u8> },
    /// No full cover was found for a variant
    CoverFailed { variant: Variant, holes: usize },
    /// A Simon value could not be carved from a variant
    CarveFailed { variant: Variant, value: u8 },
}

/// One finished variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantBoard {
    pub variant: Variant,
    /// The transformed solution
    pub grid: Grid,
    pub topology: TopologyMap,
    pub islands: Vec<Island>,
    pub sequences: Vec<Sequence>,
    /// Cells carved out of the sequences, one per Simon value not realized by
    /// an island
    pub carved: Vec<Cell>,
}

impl VariantBoard {
    /// Island cells followed by carved cells
    pub fn simon_cells(&self) -> Vec<Cell> {
        self.islands
            .iter()
            .map(|i| i.cell)
            .chain(self.carved.iter().copied())
            .collect()
    }

    pub fn targets(&self) -> VariantTargets {
        VariantTargets {
            targets: self.sequences.clone(),
            simon: self.simon_cells(),
        }
    }
}

/// A complete daily board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyBoard {
    pub seed: DailySeed,
    /// 1-based index of the winning attempt
    pub attempt: usize,
    pub attempt_seed: u64,
    pub game: GameData,
    pub simon_values: Vec<u8>,
    pub variants: Vec<VariantBoard>,
}

impl DailyBoard {
    pub fn variant(&self, variant: Variant) -> Option<&VariantBoard> {
        self.variants.iter().find(|v| v.variant == variant)
    }

    pub fn to_document(&self) -> PuzzleDocument {
        PuzzleDocument {
            meta: Meta {
                version: DOCUMENT_VERSION.to_string(),
                date: self.seed.label.clone(),
                seed: self.seed.value,
            },
            data: BoardData {
                solution: self.game.solution,
                puzzle: self.game.puzzle,
                simon_values: self.simon_values.clone(),
                search_targets: self.variants.iter().map(|v| (v.variant, v.targets())).collect(),
            },
            chunks: self.game.chunks.clone(),
        }
    }
}

/// A variant before the search stage
#[derive(Debug, Clone)]
struct PreparedVariant {
    variant: Variant,
    grid: Grid,
    topology: TopologyMap,
    islands: Vec<Island>,
}

impl PreparedVariant {
    fn new(variant: Variant, solution: &Grid) -> Self {
        let grid = variant.apply(solution);
        let topology = topology::classify(&grid);
        let islands = reserve_islands(&grid, &topology);
        Self {
            variant,
            grid,
            topology,
            islands,
        }
    }

    fn reserved(&self) -> CellSet {
        self.islands.iter().map(|i| i.cell).collect()
    }
}

/// Drives attempts until a board succeeds or the budget runs out
pub struct DailyGenerator<S: SudokuSource = SeededSudoku> {
    config: DailyConfig,
    source: S,
}

impl DailyGenerator<SeededSudoku> {
    pub fn new(config: DailyConfig) -> Self {
        Self::with_source(config, SeededSudoku::new())
    }
}

impl Default for DailyGenerator<SeededSudoku> {
    fn default() -> Self {
        Self::new(DailyConfig::default())
    }
}

impl<S: SudokuSource> DailyGenerator<S> {
    pub fn with_source(config: DailyConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &DailyConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run attempts until one produces a complete board
    pub fn run(&mut self, seed: &DailySeed) -> Result<DailyBoard> {
        for attempt in 1..=self.config.max_attempts {
            match self.attempt(seed, attempt) {
                Ok(board) => {
                    info!(
                        attempt,
                        seed = board.attempt_seed,
                        simon = ?board.simon_values,
                        "daily board generated"
                    );
                    return Ok(board);
                }
                Err(failure) => debug!(attempt, ?failure, "attempt failed"),
            }
        }
        warn!(attempts = self.config.max_attempts, "attempt budget exhausted");
        Err(Error::AttemptBudgetExhausted {
            attempts: self.config.max_attempts,
        })
    }

    /// Seed of the 1-based attempt `attempt`
    pub fn attempt_seed(&self, base: u64, attempt: usize) -> u64 {
        base.wrapping_add((attempt as u64).wrapping_mul(self.config.seed_stride))
    }

    /// One full attempt; the error describes why it was abandoned
    pub fn attempt(
        &mut self,
        seed: &DailySeed,
        attempt: usize,
    ) -> std::result::Result<DailyBoard, AttemptFailure> {
        let attempt_seed = self.attempt_seed(seed.value, attempt);
        let game = self.source.generate(attempt_seed).ok_or(AttemptFailure::NoSolution)?;
        let mut rng = ChaCha8Rng::seed_from_u64(attempt_seed);

        let prepared: Vec<PreparedVariant> = Variant::ALL
            .iter()
            .map(|&v| PreparedVariant::new(v, &game.solution))
            .collect();

        let forced: BTreeSet<u8> = prepared
            .iter()
            .flat_map(|p| p.islands.iter().map(|i| i.value))
            .collect();
        if forced.len() > self.config.max_forced_values {
            return Err(AttemptFailure::ForcedValueOverflow {
                forced: forced.into_iter().collect(),
            });
        }

        let simon_values = pick_simon_values(&forced, self.config.simon_count, &mut rng);
        debug!(attempt, ?simon_values, forced = forced.len(), "simon values chosen");

        let mut variants = Vec::with_capacity(prepared.len());
        for prep in prepared {
            variants.push(self.solve_variant(prep, attempt_seed, &simon_values, &mut rng)?);
        }

        Ok(DailyBoard {
            seed: seed.clone(),
            attempt,
            attempt_seed,
            game,
            simon_values,
            variants,
        })
    }

    /// Cover every eligible cell of the variant with sequences, then punch
    /// the Simon values its islands do not already realize
    fn solve_variant<R: Rng + ?Sized>(
        &self,
        prep: PreparedVariant,
        attempt_seed: u64,
        simon_values: &[u8],
        rng: &mut R,
    ) -> std::result::Result<VariantBoard, AttemptFailure> {
        let reserved = prep.reserved();
        let eligible = prep
            .topology
            .plain_cells()
            .filter(|&c| !reserved.contains(c))
            .count();
        let realized: BTreeSet<u8> = prep.islands.iter().map(|i| i.value).collect();
        let to_carve: Vec<u8> = simon_values
            .iter()
            .copied()
            .filter(|v| !realized.contains(v))
            .collect();

        let mut failure = AttemptFailure::CoverFailed {
            variant: prep.variant,
            holes: eligible,
        };
        for retry in 0..self.config.cover_retries.max(1) {
            let cover_seed = attempt_seed
                .wrapping_add(self.config.cover_seed_offset)
                .wrapping_add(retry as u64);
            let generation = SequenceGenerator::new(self.config.search()).generate(
                &prep.topology,
                cover_seed,
                eligible,
                &reserved,
            );
            if !generation.success {
                failure = AttemptFailure::CoverFailed {
                    variant: prep.variant,
                    holes: generation.holes,
                };
                continue;
            }

            let mut sequences = generation.sequences;
            let report = absorb(&mut sequences, &reserved, &prep.topology);
            debug!(
                variant = %prep.variant,
                retry,
                nodes = generation.nodes,
                attached = report.attached,
                paired = report.paired,
                residual = report.residual.len(),
                "orphans absorbed"
            );
            if !report.is_complete() {
                failure = AttemptFailure::CoverFailed {
                    variant: prep.variant,
                    holes: report.residual.len(),
                };
                continue;
            }

            match carve(&sequences, &prep.grid, &to_carve, rng) {
                Ok(carving) => {
                    return Ok(VariantBoard {
                        variant: prep.variant,
                        grid: prep.grid,
                        topology: prep.topology,
                        islands: prep.islands,
                        sequences: carving.sequences,
                        carved: carving.removed,
                    })
                }
                Err(e) => {
                    failure = AttemptFailure::CarveFailed {
                        variant: prep.variant,
                        value: e.value,
                    }
                }
            }
        }
        Err(failure)
    }
}

/// Forced values in ascending order, padded with random unused digits
pub fn pick_simon_values<R: Rng + ?Sized>(forced: &BTreeSet<u8>, count: usize, rng: &mut R) -> Vec<u8> {
    let mut values: Vec<u8> = forced.iter().copied().collect();
    let mut pool: Vec<u8> = (1..=9).filter(|v| !forced.contains(v)).collect();
    pool.shuffle(rng);
    while values.len() < count {
        let Some(v) = pool.pop() else {
            break;
        };
        values.push(v);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every seed it is asked for
    struct RecordingSource {
        inner: SeededSudoku,
        seeds: Vec<u64>,
    }

    impl SudokuSource for RecordingSource {
        fn generate(&mut self, seed: u64) -> Option<GameData> {
            self.seeds.push(seed);
            self.inner.generate(seed)
        }
    }

    fn recording() -> RecordingSource {
        RecordingSource {
            inner: SeededSudoku::new(),
            seeds: Vec::new(),
        }
    }

    #[test]
    fn test_pick_simon_values_keeps_forced() {
        let forced: BTreeSet<u8> = [7, 2].into_iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let values = pick_simon_values(&forced, 3, &mut rng);
        assert_eq!(&values[..2], &[2, 7]);
        assert_eq!(values.len(), 3);
        assert!(!forced.contains(&values[2]));
        assert!((1..=9).contains(&values[2]));
    }

    #[test]
    fn test_pick_simon_values_distinct() {
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let values = pick_simon_values(&BTreeSet::new(), 3, &mut rng);
            let unique: BTreeSet<u8> = values.iter().copied().collect();
            assert_eq!(unique.len(), 3);
        }
    }

    #[test]
    fn test_attempt_seeds() {
        let generator: DailyGenerator = DailyGenerator::default();
        assert_eq!(generator.attempt_seed(20250101, 1), 20250101 + 777);
        assert_eq!(generator.attempt_seed(20250101, 3), 20250101 + 3 * 777);
    }

    #[test]
    fn test_failing_search_exhausts_budget() {
        let config = DailyConfig {
            max_attempts: 12,
            node_budget: Some(0),
            ..DailyConfig::default()
        };
        let mut generator = DailyGenerator::with_source(config, recording());
        let seed = DailySeed::parse("20250101");
        let err = generator.run(&seed).unwrap_err();
        assert!(matches!(err, Error::AttemptBudgetExhausted { attempts: 12 }));

        let seeds = &generator.source().seeds;
        assert_eq!(seeds.len(), 12);
        assert_eq!(seeds[0], 20250101 + 777);
        assert_eq!(seeds[11], 20250101 + 12 * 777);
    }

    #[test]
    fn test_zero_forced_budget_rejects_islands() {
        let config = DailyConfig {
            max_attempts: 1,
            ..DailyConfig::default()
        };
        let mut generator = DailyGenerator::with_source(config, recording());
        let seed = DailySeed::parse("20250101");
        let attempt_seed = generator.attempt_seed(seed.value, 1);
        let solution = SeededSudoku::new().generate(attempt_seed).unwrap().solution;
        let island_values: BTreeSet<u8> = Variant::ALL
            .iter()
            .flat_map(|&v| PreparedVariant::new(v, &solution).islands)
            .map(|i| i.value)
            .collect();

        generator.config.max_forced_values = 0;
        let outcome = generator.attempt(&seed, 1);
        if island_values.is_empty() {
            assert!(!matches!(outcome, Err(AttemptFailure::ForcedValueOverflow { .. })));
        } else {
            assert_eq!(
                outcome.unwrap_err(),
                AttemptFailure::ForcedValueOverflow {
                    forced: island_values.into_iter().collect()
                }
            );
        }
    }

    #[test]
    fn test_prepared_variant_reserves_islands() {
        let solution = SeededSudoku::new().generate(11).unwrap().solution;
        for variant in Variant::ALL {
            let prep = PreparedVariant::new(variant, &solution);
            let reserved = prep.reserved();
            assert_eq!(reserved.len(), prep.islands.len());
            for island in &prep.islands {
                assert!(!prep.topology.is_wall(island.cell));
                assert_eq!(prep.grid.get(island.cell), island.value);
            }
        }
    }
}
