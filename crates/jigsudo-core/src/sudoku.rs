//! Baseline Sudoku generation.
//!
//! The daily pipeline only needs a solved grid, a masked puzzle with a unique
//! solution and the nine 3x3 chunks of the solution. [`SudokuSource`] is the
//! seam the orchestrator calls; [`SeededSudoku`] adapts the `sudoku-core`
//! generator and solver to it.

use crate::grid::{Cell, Chunk, Grid};
use sudoku_core::{Difficulty, Generator, Position, Solver};

/// Everything the external generator hands the daily pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameData {
    pub solution: Grid,
    /// The solution with clues removed (0 = hole)
    pub puzzle: Grid,
    /// The solution's 3x3 boxes in row-major box order
    pub chunks: Vec<Chunk>,
}

/// Source of solved grids, deterministic per seed
pub trait SudokuSource {
    /// `None` when the seed produced a puzzle the source could not solve
    fn generate(&mut self, seed: u64) -> Option<GameData>;
}

/// Configuration for puzzle masking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SudokuConfig {
    /// Difficulty requested from `sudoku-core`
    pub difficulty: Difficulty,
}

impl Default for SudokuConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
        }
    }
}

/// Seeded `sudoku-core` generator: the puzzle comes from
/// [`Generator::generate`], the solution from [`Solver::solve`]
#[derive(Debug, Clone, Default)]
pub struct SeededSudoku {
    config: SudokuConfig,
}

impl SeededSudoku {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SudokuConfig) -> Self {
        Self { config }
    }
}

impl SudokuSource for SeededSudoku {
    fn generate(&mut self, seed: u64) -> Option<GameData> {
        let puzzle = Generator::with_seed(seed).generate(self.config.difficulty);
        let solution = Solver::new().solve(&puzzle)?;

        let solution = from_core(&solution);
        if !solution.is_valid_solution() {
            return None;
        }
        Some(GameData {
            chunks: solution.chunks(),
            solution,
            puzzle: from_core(&puzzle),
        })
    }
}

fn from_core(grid: &sudoku_core::Grid) -> Grid {
    let mut out = Grid::empty();
    for cell in Cell::all() {
        let value = grid.get(Position::new(cell.row(), cell.col())).unwrap_or(0);
        out.set(cell, value);
    }
    out
}
