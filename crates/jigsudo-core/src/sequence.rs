use crate::grid::{Cell, CellSet, Grid};
use serde::{Deserialize, Serialize};

/// Shortest path the search stage places
pub const MIN_SEQUENCE_LEN: usize = 3;
/// Longest path the search stage places
pub const MAX_SEQUENCE_LEN: usize = 6;

/// An ordered orthogonal path of distinct cells, one search target
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence {
    cells: Vec<Cell>,
}

impl Sequence {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn head(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn tail(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn push_front(&mut self, cell: Cell) {
        self.cells.insert(0, cell);
    }

    pub fn push_back(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Values along the path
    pub fn values(&self, grid: &Grid) -> Vec<u8> {
        self.cells.iter().map(|&c| grid.get(c)).collect()
    }

    /// Every step moves to an orthogonal neighbor
    pub fn is_connected(&self) -> bool {
        self.cells.windows(2).all(|w| w[0].is_adjacent(w[1]))
    }

    /// No cell is visited twice
    pub fn is_simple(&self) -> bool {
        let set: CellSet = self.cells.iter().copied().collect();
        set.len() == self.cells.len()
    }

    /// Drop the cell at `index`, returning the fragments before and after it
    pub(crate) fn split_at_cell(&self, index: usize) -> (Sequence, Sequence) {
        let left = self.cells[..index].to_vec();
        let right = self.cells[index + 1..].to_vec();
        (Sequence::new(left), Sequence::new(right))
    }
}

impl From<Vec<Cell>> for Sequence {
    fn from(cells: Vec<Cell>) -> Self {
        Self::new(cells)
    }
}

/// Union of all cells in the sequences, or `None` if two sequences overlap
/// or one revisits a cell.
pub fn covered_cells(sequences: &[Sequence]) -> Option<CellSet> {
    let mut covered = CellSet::new();
    for cell in sequences.iter().flat_map(|s| s.cells().iter().copied()) {
        if !covered.insert(cell) {
            return None;
        }
    }
    Some(covered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(cells: &[(usize, usize)]) -> Sequence {
        cells.iter().map(|&(r, c)| Cell::new(r, c)).collect::<Vec<_>>().into()
    }

    #[test]
    fn test_connectivity() {
        assert!(seq(&[(0, 0), (0, 1), (1, 1)]).is_connected());
        assert!(!seq(&[(0, 0), (1, 1), (1, 2)]).is_connected());
        assert!(!seq(&[(0, 0), (0, 1), (0, 0)]).is_simple());
    }

    #[test]
    fn test_split_at_interior() {
        let s = seq(&[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6)]);
        let (left, right) = s.split_at_cell(3);
        assert_eq!(left, seq(&[(0, 0), (0, 1), (0, 2)]));
        assert_eq!(right, seq(&[(0, 4), (0, 5), (0, 6)]));
    }

    #[test]
    fn test_covered_cells_rejects_overlap() {
        let a = seq(&[(0, 0), (0, 1), (0, 2)]);
        let b = seq(&[(1, 0), (1, 1), (1, 2)]);
        assert_eq!(covered_cells(&[a.clone(), b]).map(|s| s.len()), Some(6));
        let c = seq(&[(0, 2), (1, 2), (2, 2)]);
        assert!(covered_cells(&[a, c]).is_none());
    }

    #[test]
    fn test_serializes_as_cell_list() {
        let json = serde_json::to_string(&seq(&[(0, 0), (0, 1)])).unwrap();
        assert_eq!(json, r#"[{"r":0,"c":0},{"r":0,"c":1}]"#);
    }
}
