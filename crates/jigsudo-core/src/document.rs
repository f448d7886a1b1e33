//! The persisted daily document.

use crate::error::{Error, Result};
use crate::grid::{Cell, CellSet, Chunk, Grid, CELL_COUNT};
use crate::sequence::{covered_cells, Sequence, MAX_SEQUENCE_LEN};
use crate::topology;
use crate::variant::Variant;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Format version written to `meta.version`
pub const DOCUMENT_VERSION: &str = "3.3-island-hybrid";

/// Daily board as read by the game client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDocument {
    pub meta: Meta,
    pub data: BoardData,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub version: String,
    /// `YYYY-MM-DD` or `custom-<seed>`
    pub date: String,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardData {
    pub solution: Grid,
    pub puzzle: Grid,
    pub simon_values: Vec<u8>,
    pub search_targets: BTreeMap<Variant, VariantTargets>,
}

/// Search stage of one variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantTargets {
    pub targets: Vec<Sequence>,
    /// Islands first, then carved holes
    pub simon: Vec<Cell>,
}

impl PuzzleDocument {
    /// Check the guarantees the game client relies on.
    ///
    /// Each variant's sequences, Simon cells and walls must partition the
    /// board, and its Simon cells must realize exactly the Simon values.
    pub fn verify(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::Inconsistent(msg));
        let data = &self.data;

        if !data.solution.is_valid_solution() {
            return fail("solution is not a valid sudoku".into());
        }
        for cell in Cell::all() {
            let v = data.puzzle.get(cell);
            if v != 0 && v != data.solution.get(cell) {
                return fail(format!("puzzle disagrees with solution at {cell}"));
            }
        }
        if self.chunks != data.solution.chunks() {
            return fail("chunks do not match the solution".into());
        }

        let simon: BTreeSet<u8> = data.simon_values.iter().copied().collect();
        if simon.len() != data.simon_values.len() || simon.iter().any(|v| !(1..=9).contains(v)) {
            return fail(format!("bad simon values {:?}", data.simon_values));
        }

        for variant in Variant::ALL {
            let Some(targets) = data.search_targets.get(&variant) else {
                return fail(format!("missing variant {variant}"));
            };
            verify_variant(&variant.apply(&data.solution), targets, &simon)
                .or_else(|msg| fail(format!("variant {variant}: {msg}")))?;
        }
        if data.search_targets.len() != Variant::ALL.len() {
            return fail("unexpected variant keys".into());
        }
        Ok(())
    }
}

fn verify_variant(
    grid: &Grid,
    targets: &VariantTargets,
    simon: &BTreeSet<u8>,
) -> std::result::Result<(), String> {
    let walls = topology::classify(grid).walls();
    let Some(covered) = covered_cells(&targets.targets) else {
        return Err("sequences overlap".into());
    };
    for seq in &targets.targets {
        if !(2..=MAX_SEQUENCE_LEN).contains(&seq.len()) || !seq.is_connected() {
            return Err(format!("malformed sequence {seq:?}"));
        }
    }

    let holes: CellSet = targets.simon.iter().copied().collect();
    if holes.len() != targets.simon.len() {
        return Err("repeated simon cell".into());
    }
    if !covered.intersection(&walls).is_empty()
        || !covered.intersection(&holes).is_empty()
        || !holes.intersection(&walls).is_empty()
    {
        return Err("sequences, holes and walls overlap".into());
    }
    if covered.len() + holes.len() + walls.len() != CELL_COUNT {
        return Err(format!(
            "coverage {} + {} + {} != {CELL_COUNT}",
            covered.len(),
            holes.len(),
            walls.len()
        ));
    }

    let realized: BTreeSet<u8> = holes.iter().map(|c| grid.get(c)).collect();
    if &realized != simon {
        return Err(format!("holes realize {realized:?}, expected {simon:?}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skeleton() -> PuzzleDocument {
        let solution = Grid::from_string(
            "534678912672195348198342567859761423426853791713924856961537284287419635345286179",
        )
        .unwrap();
        PuzzleDocument {
            meta: Meta {
                version: DOCUMENT_VERSION.to_string(),
                date: "2025-01-01".to_string(),
                seed: 20250101,
            },
            data: BoardData {
                solution,
                puzzle: solution,
                simon_values: vec![1, 5, 9],
                search_targets: BTreeMap::new(),
            },
            chunks: solution.chunks(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let mut doc = skeleton();
        doc.data.search_targets.insert(
            Variant::MirrorRows,
            VariantTargets {
                targets: vec![Sequence::new(vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)])],
                simon: vec![Cell::new(8, 8)],
            },
        );
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["meta"]["version"], DOCUMENT_VERSION);
        assert_eq!(json["data"]["simonValues"], serde_json::json!([1, 5, 9]));
        assert_eq!(json["data"]["searchTargets"]["TB"]["simon"][0]["r"], 8);
        assert_eq!(json["data"]["searchTargets"]["TB"]["targets"][0][2]["c"], 2);
        assert_eq!(json["chunks"].as_array().unwrap().len(), 9);

        let back: PuzzleDocument = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_verify_rejects_missing_variants() {
        let err = skeleton().verify().unwrap_err();
        assert!(err.to_string().contains("missing variant"));
    }

    #[test]
    fn test_verify_rejects_bad_simon_values() {
        let mut doc = skeleton();
        doc.data.simon_values = vec![5, 5, 9];
        assert!(doc.verify().is_err());
    }
}
