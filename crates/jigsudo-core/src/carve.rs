//! Carving Simon holes out of the search sequences.
//!
//! Each target value loses exactly one occurrence from the sequence set.
//! Removing a head or tail shortens one sequence, removing an interior cell
//! splits it in two; every surviving fragment keeps at least
//! [`MIN_SEQUENCE_LEN`] cells.

use crate::grid::{Cell, Grid};
use crate::sequence::{Sequence, MIN_SEQUENCE_LEN};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// No occurrence of the value could be removed legally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no legal removal for value {value}")]
pub struct CarveInfeasible {
    pub value: u8,
}

/// Sequences after carving and the holes punched into them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carving {
    pub sequences: Vec<Sequence>,
    /// Removed cells, one per target value, in target order
    pub removed: Vec<Cell>,
    /// Copy of the grid with the removed cells cleared to 0
    pub holed: Grid,
}

/// Remove one occurrence of every value in `targets`.
///
/// Works on a copy: on failure the caller's sequences are untouched.
pub fn carve<R: Rng + ?Sized>(
    sequences: &[Sequence],
    grid: &Grid,
    targets: &[u8],
    rng: &mut R,
) -> Result<Carving, CarveInfeasible> {
    let mut working = sequences.to_vec();
    let mut holed = *grid;
    let mut removed = Vec::with_capacity(targets.len());

    for &value in targets {
        let cell = carve_value(&mut working, grid, value, rng).ok_or(CarveInfeasible { value })?;
        holed.set(cell, 0);
        removed.push(cell);
    }

    Ok(Carving {
        sequences: working,
        removed,
        holed,
    })
}

/// Apply the first legal removal among the shuffled occurrences of `value`
fn carve_value<R: Rng + ?Sized>(
    sequences: &mut Vec<Sequence>,
    grid: &Grid,
    value: u8,
    rng: &mut R,
) -> Option<Cell> {
    let mut candidates: Vec<(usize, usize)> = sequences
        .iter()
        .enumerate()
        .flat_map(|(s, seq)| {
            seq.cells()
                .iter()
                .enumerate()
                .filter(|&(_, &cell)| grid.get(cell) == value)
                .map(move |(i, _)| (s, i))
        })
        .collect();
    candidates.shuffle(rng);

    for (s, i) in candidates {
        let seq = &sequences[s];
        let cell = seq.cells()[i];
        let last = seq.len() - 1;

        if i == 0 || i == last {
            if seq.len() - 1 < MIN_SEQUENCE_LEN {
                continue;
            }
            let (left, right) = seq.split_at_cell(i);
            sequences[s] = if i == 0 { right } else { left };
        } else {
            let (left, right) = seq.split_at_cell(i);
            if left.len() < MIN_SEQUENCE_LEN || right.len() < MIN_SEQUENCE_LEN {
                continue;
            }
            sequences[s] = left;
            sequences.push(right);
        }
        return Some(cell);
    }
    None
}
