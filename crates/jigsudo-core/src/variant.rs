use crate::grid::{Cell, Grid, SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board symmetry applied to the solution before the search stage.
///
/// Swapping the outer column stacks or row bands keeps a solved grid valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// The solution as generated
    #[serde(rename = "0")]
    Identity,
    /// Columns 0-2 swapped with columns 6-8
    #[serde(rename = "LR")]
    MirrorColumns,
    /// Rows 0-2 swapped with rows 6-8
    #[serde(rename = "TB")]
    MirrorRows,
    /// Both swaps
    #[serde(rename = "HV")]
    MirrorBoth,
}

impl Variant {
    /// All variants in the order they are generated
    pub const ALL: [Variant; 4] = [
        Variant::Identity,
        Variant::MirrorColumns,
        Variant::MirrorRows,
        Variant::MirrorBoth,
    ];

    /// Key used in the daily document
    pub fn key(self) -> &'static str {
        match self {
            Variant::Identity => "0",
            Variant::MirrorColumns => "LR",
            Variant::MirrorRows => "TB",
            Variant::MirrorBoth => "HV",
        }
    }

    /// Transform a grid
    pub fn apply(self, grid: &Grid) -> Grid {
        match self {
            Variant::Identity => *grid,
            Variant::MirrorColumns => swap_stacks(grid),
            Variant::MirrorRows => swap_bands(grid),
            Variant::MirrorBoth => swap_bands(&swap_stacks(grid)),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn outer_swap(index: usize) -> usize {
    match index {
        0..=2 => index + 6,
        6..=8 => index - 6,
        _ => index,
    }
}

fn swap_stacks(grid: &Grid) -> Grid {
    let mut out = *grid;
    for row in 0..SIZE {
        for col in 0..SIZE {
            out.set(Cell::new(row, col), grid.get(Cell::new(row, outer_swap(col))));
        }
    }
    out
}

fn swap_bands(grid: &Grid) -> Grid {
    let mut out = *grid;
    for row in 0..SIZE {
        for col in 0..SIZE {
            out.set(Cell::new(row, col), grid.get(Cell::new(outer_swap(row), col)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved() -> Grid {
        Grid::from_string(
            "534678912672195348198342567859761423426853791713924856961537284287419635345286179",
        )
        .unwrap()
    }

    #[test]
    fn test_variants_stay_valid() {
        let grid = solved();
        for variant in Variant::ALL {
            assert!(variant.apply(&grid).is_valid_solution(), "{variant} broke the grid");
        }
    }

    #[test]
    fn test_column_mirror() {
        let grid = solved();
        let lr = Variant::MirrorColumns.apply(&grid);
        assert_eq!(lr.rows()[0], [9, 1, 2, 6, 7, 8, 5, 3, 4]);
        assert_eq!(Variant::MirrorColumns.apply(&lr), grid);
    }

    #[test]
    fn test_row_mirror_and_both() {
        let grid = solved();
        let tb = Variant::MirrorRows.apply(&grid);
        assert_eq!(tb.rows()[0], grid.rows()[6]);
        assert_eq!(tb.rows()[4], grid.rows()[4]);
        let hv = Variant::MirrorBoth.apply(&grid);
        assert_eq!(hv, Variant::MirrorRows.apply(&Variant::MirrorColumns.apply(&grid)));
    }

    #[test]
    fn test_document_keys() {
        let keys: Vec<String> = Variant::ALL
            .iter()
            .map(|v| serde_json::to_string(v).unwrap())
            .collect();
        assert_eq!(keys, vec!["\"0\"", "\"LR\"", "\"TB\"", "\"HV\""]);
        for variant in Variant::ALL {
            assert_eq!(format!("\"{}\"", variant.key()), serde_json::to_string(&variant).unwrap());
        }
    }
}
