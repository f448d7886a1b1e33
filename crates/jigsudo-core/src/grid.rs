//! Board primitives: cells, cell sets and the 9x9 value grid.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board
pub const SIZE: usize = 9;
/// Number of cells on the board
pub const CELL_COUNT: usize = SIZE * SIZE;

const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A board coordinate, identified by `row * 9 + col`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "CellRepr", into = "CellRepr")]
pub struct Cell(u8);

/// Wire shape of a cell as the game client reads it
#[derive(Serialize, Deserialize)]
struct CellRepr {
    r: usize,
    c: usize,
}

impl TryFrom<CellRepr> for Cell {
    type Error = Error;

    fn try_from(repr: CellRepr) -> Result<Self, Self::Error> {
        Cell::checked(repr.r, repr.c)
    }
}

impl From<Cell> for CellRepr {
    fn from(cell: Cell) -> Self {
        Self {
            r: cell.row(),
            c: cell.col(),
        }
    }
}

impl Cell {
    /// Create a cell. Panics in debug builds when out of range.
    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row < SIZE && col < SIZE, "cell ({row}, {col}) out of range");
        Self((row * SIZE + col) as u8)
    }

    /// Create a cell, rejecting coordinates outside the board
    pub fn checked(row: usize, col: usize) -> Result<Self, Error> {
        if row < SIZE && col < SIZE {
            Ok(Self::new(row, col))
        } else {
            Err(Error::CellOutOfRange { row, col })
        }
    }

    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < CELL_COUNT);
        Self(index as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn row(self) -> usize {
        self.index() / SIZE
    }

    pub fn col(self) -> usize {
        self.index() % SIZE
    }

    /// All 81 cells in row-major order
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..CELL_COUNT).map(Cell::from_index)
    }

    fn offset(self, dr: isize, dc: isize) -> Option<Cell> {
        let row = self.row().checked_add_signed(dr)?;
        let col = self.col().checked_add_signed(dc)?;
        (row < SIZE && col < SIZE).then(|| Cell::new(row, col))
    }

    /// In-bounds neighbors sharing an edge, in up/down/left/right order
    pub fn orthogonal_neighbors(self) -> impl Iterator<Item = Cell> {
        ORTHOGONAL
            .iter()
            .filter_map(move |&(dr, dc)| self.offset(dr, dc))
    }

    /// In-bounds neighbors of the 8-neighborhood
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        (-1..=1isize)
            .flat_map(|dr| (-1..=1isize).map(move |dc| (dr, dc)))
            .filter(|&(dr, dc)| dr != 0 || dc != 0)
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }

    pub fn manhattan(self, other: Cell) -> usize {
        self.row().abs_diff(other.row()) + self.col().abs_diff(other.col())
    }

    /// Whether the two cells share an edge
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

/// Membership set over the 81 cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellSet(u128);

impl CellSet {
    pub fn new() -> Self {
        Self(0)
    }

    /// Every cell of the board
    pub fn full() -> Self {
        Self((1u128 << CELL_COUNT) - 1)
    }

    /// Insert a cell, returning false if it was already present
    pub fn insert(&mut self, cell: Cell) -> bool {
        let bit = 1u128 << cell.index();
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    /// Remove a cell, returning false if it was absent
    pub fn remove(&mut self, cell: Cell) -> bool {
        let bit = 1u128 << cell.index();
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.0 & (1u128 << cell.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(&self, other: &CellSet) -> CellSet {
        CellSet(self.0 | other.0)
    }

    pub fn intersection(&self, other: &CellSet) -> CellSet {
        CellSet(self.0 & other.0)
    }

    /// Cells in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        let bits = self.0;
        (0..CELL_COUNT)
            .filter(move |&i| bits & (1u128 << i) != 0)
            .map(Cell::from_index)
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut set = CellSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Cell> for CellSet {
    fn extend<I: IntoIterator<Item = Cell>>(&mut self, iter: I) {
        for cell in iter {
            self.insert(cell);
        }
    }
}

/// A 3x3 block of values
pub type Chunk = [[u8; 3]; 3];

/// 9x9 grid of values 1-9, with 0 marking a hole
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Grid {
    cells: [u8; CELL_COUNT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    /// A grid made entirely of holes
    pub fn empty() -> Self {
        Self {
            cells: [0; CELL_COUNT],
        }
    }

    pub fn from_rows(rows: [[u8; SIZE]; SIZE]) -> Self {
        let mut grid = Self::empty();
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                grid.cells[r * SIZE + c] = value;
            }
        }
        grid
    }

    /// Parse 81 characters, digits 1-9 for values and `0` or `.` for holes
    pub fn from_string(s: &str) -> Option<Self> {
        let digits: Vec<u8> = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '.' => Some(0),
                _ => c.to_digit(10).map(|d| d as u8),
            })
            .collect::<Option<_>>()?;
        if digits.len() != CELL_COUNT {
            return None;
        }
        let mut grid = Self::empty();
        grid.cells.copy_from_slice(&digits);
        Some(grid)
    }

    pub fn rows(&self) -> [[u8; SIZE]; SIZE] {
        let mut rows = [[0; SIZE]; SIZE];
        for cell in Cell::all() {
            rows[cell.row()][cell.col()] = self.get(cell);
        }
        rows
    }

    pub fn get(&self, cell: Cell) -> u8 {
        self.cells[cell.index()]
    }

    pub fn set(&mut self, cell: Cell, value: u8) {
        debug_assert!(value <= 9);
        self.cells[cell.index()] = value;
    }

    pub fn hole_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn given_count(&self) -> usize {
        CELL_COUNT - self.hole_count()
    }

    /// Whether every row, column and box holds each of 1-9 exactly once
    pub fn is_valid_solution(&self) -> bool {
        let full = 0b11_1111_1110u16;
        let mut rows = [0u16; SIZE];
        let mut cols = [0u16; SIZE];
        let mut boxes = [0u16; SIZE];
        for cell in Cell::all() {
            let value = self.get(cell);
            if !(1..=9).contains(&value) {
                return false;
            }
            let bit = 1u16 << value;
            rows[cell.row()] |= bit;
            cols[cell.col()] |= bit;
            boxes[box_index(cell)] |= bit;
        }
        rows.iter().chain(&cols).chain(&boxes).all(|&mask| mask == full)
    }

    /// The 3x3 box at `index` (row-major box order)
    pub fn chunk(&self, index: usize) -> Chunk {
        let (band, stack) = (index / 3, index % 3);
        let mut chunk = [[0; 3]; 3];
        for (r, row) in chunk.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.get(Cell::new(band * 3 + r, stack * 3 + c));
            }
        }
        chunk
    }

    /// All nine boxes in row-major box order
    pub fn chunks(&self) -> Vec<Chunk> {
        (0..SIZE).map(|i| self.chunk(i)).collect()
    }
}

/// Index of the 3x3 box holding `cell`
pub fn box_index(cell: Cell) -> usize {
    (cell.row() / 3) * 3 + cell.col() / 3
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = Error;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        if rows.len() != SIZE {
            return Err(Error::InvalidGrid(format!("expected 9 rows, got {}", rows.len())));
        }
        let mut grid = Grid::empty();
        for (r, row) in rows.iter().enumerate() {
            if row.len() != SIZE {
                return Err(Error::InvalidGrid(format!(
                    "row {r} has {} values, expected 9",
                    row.len()
                )));
            }
            for (c, &value) in row.iter().enumerate() {
                if value > 9 {
                    return Err(Error::InvalidGrid(format!("value {value} at ({r}, {c})")));
                }
                grid.set(Cell::new(r, c), value);
            }
        }
        Ok(grid)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.rows().iter().map(|row| row.to_vec()).collect()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid(\"")?;
        for value in self.cells {
            write!(f, "{value}")?;
        }
        write!(f, "\")")
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            if row > 0 && row % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for col in 0..SIZE {
                if col > 0 && col % 3 == 0 {
                    write!(f, "| ")?;
                }
                match self.get(Cell::new(row, col)) {
                    0 => write!(f, ". ")?,
                    v => write!(f, "{v} ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
