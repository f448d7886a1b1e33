//! Orphan repair after the search stage.
//!
//! Plain cells left outside every sequence are grown onto an adjacent
//! sequence end or, failing that, paired with a neighboring orphan.

use crate::grid::{Cell, CellSet};
use crate::sequence::{Sequence, MAX_SEQUENCE_LEN};
use crate::topology::TopologyMap;
use tracing::trace;

/// What one absorb run changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbsorbReport {
    /// Orphans attached to an existing sequence end
    pub attached: usize,
    /// Two-cell sequences created from orphan pairs
    pub paired: usize,
    /// Orphans still uncovered at the fixpoint
    pub residual: Vec<Cell>,
}

impl AbsorbReport {
    pub fn is_complete(&self) -> bool {
        self.residual.is_empty()
    }
}

/// Plain cells outside every sequence and outside `reserved`
pub fn orphans(sequences: &[Sequence], reserved: &CellSet, topology: &TopologyMap) -> Vec<Cell> {
    let used: CellSet = sequences.iter().flat_map(|s| s.cells().iter().copied()).collect();
    topology
        .plain_cells()
        .filter(|&c| !used.contains(c) && !reserved.contains(c))
        .collect()
}

/// Absorb orphans into `sequences` until a pass changes nothing
pub fn absorb(
    sequences: &mut Vec<Sequence>,
    reserved: &CellSet,
    topology: &TopologyMap,
) -> AbsorbReport {
    let mut report = AbsorbReport::default();
    loop {
        let pending = orphans(sequences, reserved, topology);
        if pending.is_empty() {
            return report;
        }

        let mut changed = false;
        for &orphan in &pending {
            if attach(sequences, orphan) {
                report.attached += 1;
                changed = true;
            }
        }

        if !changed && pending.len() >= 2 {
            if let Some((a, b)) = adjacent_pair(&pending) {
                trace!(%a, %b, "pairing orphans");
                sequences.push(Sequence::new(vec![a, b]));
                report.paired += 1;
                changed = true;
            }
        }

        if !changed {
            report.residual = pending;
            return report;
        }
    }
}

/// Grow the first sequence whose head or tail touches `orphan`
fn attach(sequences: &mut [Sequence], orphan: Cell) -> bool {
    for seq in sequences.iter_mut() {
        if seq.len() >= MAX_SEQUENCE_LEN {
            continue;
        }
        if seq.head().is_some_and(|h| h.is_adjacent(orphan)) {
            seq.push_front(orphan);
            return true;
        }
        if seq.tail().is_some_and(|t| t.is_adjacent(orphan)) {
            seq.push_back(orphan);
            return true;
        }
    }
    false
}

fn adjacent_pair(cells: &[Cell]) -> Option<(Cell, Cell)> {
    cells.iter().enumerate().find_map(|(i, &a)| {
        cells[i + 1..]
            .iter()
            .find(|&&b| a.is_adjacent(b))
            .map(|&b| (a, b))
    })
}
