//! Daily board generation for Jigsudo.
//!
//! A board is a solved sudoku plus, for each of four mirror variants, a
//! peak/valley map and a partition of the remaining cells into short
//! orthogonal "search sequences". A few cells per variant are left out of
//! the sequences so that every variant realizes the same three Simon values.
//! - Topology classification and island scanning
//! - Randomized backtracking cover with small-pocket pruning
//! - Orphan repair and hole carving
//! - Retry orchestration and the persisted JSON document

pub mod absorb;
pub mod carve;
pub mod daily;
pub mod document;
pub mod error;
pub mod grid;
pub mod islands;
pub mod search;
pub mod seed;
pub mod sequence;
pub mod store;
pub mod sudoku;
pub mod topology;
pub mod variant;

pub use absorb::{absorb, AbsorbReport};
pub use carve::{carve, CarveInfeasible, Carving};
pub use daily::{AttemptFailure, DailyBoard, DailyConfig, DailyGenerator, VariantBoard};
pub use document::{PuzzleDocument, VariantTargets, DOCUMENT_VERSION};
pub use error::{Error, Result};
pub use grid::{Cell, CellSet, Grid};
pub use islands::{find_islands, reserve_islands, Island};
pub use search::{search_sequences, Generation, SearchConfig, SearchContext, SequenceGenerator};
pub use seed::DailySeed;
pub use sequence::Sequence;
pub use store::{generate_daily, read_document, write_document};
pub use sudoku::{GameData, SeededSudoku, SudokuConfig, SudokuSource};
pub use topology::{classify, Relief, TopologyMap};
pub use variant::Variant;
