//! Peak and valley classification.
//!
//! A cell is a peak when it is strictly greater than every in-bounds cell of
//! its 8-neighborhood and a valley when it is strictly smaller. Classified
//! cells act as walls for the search stage.

use crate::grid::{Cell, CellSet, Grid, CELL_COUNT};
use serde::{Deserialize, Serialize};

/// Classification of a non-plain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relief {
    Peak,
    Valley,
}

/// Cell to relief mapping for one grid; absent cells are plain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyMap {
    cells: [Option<Relief>; CELL_COUNT],
}

impl TopologyMap {
    /// A map with every cell plain
    pub fn plain() -> Self {
        Self {
            cells: [None; CELL_COUNT],
        }
    }

    pub fn get(&self, cell: Cell) -> Option<Relief> {
        self.cells[cell.index()]
    }

    pub fn set(&mut self, cell: Cell, relief: Option<Relief>) {
        self.cells[cell.index()] = relief;
    }

    /// Whether the cell is a peak or a valley
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.cells[cell.index()].is_some()
    }

    /// Classified cells as a set
    pub fn walls(&self) -> CellSet {
        Cell::all().filter(|&c| self.is_wall(c)).collect()
    }

    /// Number of classified cells
    pub fn len(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn peak_count(&self) -> usize {
        self.count(Relief::Peak)
    }

    pub fn valley_count(&self) -> usize {
        self.count(Relief::Valley)
    }

    fn count(&self, relief: Relief) -> usize {
        self.cells.iter().filter(|&&r| r == Some(relief)).count()
    }

    /// Plain cells in row-major order
    pub fn plain_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        Cell::all().filter(move |&c| !self.is_wall(c))
    }

    /// Classified cells with their relief, in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Relief)> + '_ {
        Cell::all().filter_map(move |c| self.get(c).map(|r| (c, r)))
    }
}

/// Classify a single cell against its 8-neighborhood
pub fn relief_at(grid: &Grid, cell: Cell) -> Option<Relief> {
    let value = grid.get(cell);
    let mut higher = true;
    let mut lower = true;
    for n in cell.neighbors() {
        let other = grid.get(n);
        higher &= value > other;
        lower &= value < other;
        if !higher && !lower {
            return None;
        }
    }
    if higher {
        Some(Relief::Peak)
    } else if lower {
        Some(Relief::Valley)
    } else {
        None
    }
}

/// Classify every cell of the grid
pub fn classify(grid: &Grid) -> TopologyMap {
    let mut map = TopologyMap::plain();
    for cell in Cell::all() {
        map.set(cell, relief_at(grid, cell));
    }
    map
}
