//! Search-sequence generation.
//!
//! Eligible cells (plain, not reserved) are partitioned into simple orthogonal
//! paths of 3 to 6 cells by randomized backtracking. Each level branches on
//! the most constrained free cell and tries every path through it. All
//! randomness comes from one generator seeded by the caller, so identical
//! inputs give identical sequence lists.
//!
//! The working state lives in an owned [`SearchContext`]. Each placement is
//! recorded in an undo log and reverted in LIFO order on backtrack.

use crate::absorb::absorb;
use crate::grid::{Cell, CellSet, Grid, CELL_COUNT};
use crate::sequence::{Sequence, MAX_SEQUENCE_LEN, MIN_SEQUENCE_LEN};
use crate::topology::{self, TopologyMap};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Cells the standalone search mode leaves uncovered
pub const SEARCH_BUFFER: usize = 5;

/// Tuning for one search run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Largest total size of sub-3 pockets a branch may leave behind
    pub buffer: usize,
    /// Maximum path placements before the search gives up
    pub node_budget: Option<u64>,
    /// Accept a finished branch only if orphan absorption covers the cells
    /// it leaves behind
    pub repairable: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            buffer: SEARCH_BUFFER,
            node_budget: Some(200_000),
            repairable: false,
        }
    }
}

impl SearchConfig {
    /// Standalone mode: leave exactly [`SEARCH_BUFFER`] cells uncovered
    pub fn standalone() -> Self {
        Self::default()
    }

    /// Full-cover mode: at most `slack` stranded cells, all of which the
    /// repair stage must be able to absorb
    pub fn full_cover(slack: usize) -> Self {
        Self {
            buffer: slack,
            repairable: true,
            ..Self::default()
        }
    }

    pub fn with_node_budget(mut self, budget: Option<u64>) -> Self {
        self.node_budget = budget;
        self
    }
}

/// Outcome of a search run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Whether the target count was reached
    pub success: bool,
    /// Placed sequences in placement order; empty on failure
    pub sequences: Vec<Sequence>,
    /// Eligible cells left uncovered; on failure, by the deepest branch
    pub holes: usize,
    /// Path placements tried
    pub nodes: u64,
}

/// One reversible placement
#[derive(Debug, Clone, Copy)]
struct Placement {
    cells: CellSet,
}

/// Owned, reversible search state
#[derive(Debug, Clone)]
pub struct SearchContext {
    /// Walls and reserved cells; never entered
    blocked: CellSet,
    used: CellSet,
    sequences: Vec<Sequence>,
    trail: Vec<Placement>,
}

impl SearchContext {
    pub fn new(topology: &TopologyMap, reserved: &CellSet) -> Self {
        Self {
            blocked: topology.walls().union(reserved),
            used: CellSet::new(),
            sequences: Vec::new(),
            trail: Vec::new(),
        }
    }

    pub fn used(&self) -> &CellSet {
        &self.used
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Number of placements that can still be undone
    pub fn depth(&self) -> usize {
        self.trail.len()
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        !self.blocked.contains(cell) && !self.used.contains(cell)
    }

    /// Free cells in row-major order
    pub fn free_cells(&self) -> Vec<Cell> {
        Cell::all().filter(|&c| self.is_free(c)).collect()
    }

    /// Free orthogonal neighbors of `cell`
    pub fn free_degree(&self, cell: Cell) -> usize {
        cell.orthogonal_neighbors().filter(|&n| self.is_free(n)).count()
    }

    /// Free cells in components too small to host a sequence
    pub fn pockets(&self) -> CellSet {
        let mut visited = CellSet::new();
        let mut pockets = CellSet::new();
        for start in Cell::all() {
            if !self.is_free(start) || visited.contains(start) {
                continue;
            }
            visited.insert(start);
            let mut stack = vec![start];
            let mut component = Vec::new();
            while let Some(cell) = stack.pop() {
                component.push(cell);
                for n in cell.orthogonal_neighbors() {
                    if self.is_free(n) && visited.insert(n) {
                        stack.push(n);
                    }
                }
            }
            if component.len() < MIN_SEQUENCE_LEN {
                pockets.extend(component);
            }
        }
        pockets
    }

    /// Total size of free components too small to host a sequence
    pub fn small_pocket_total(&self) -> usize {
        self.pockets().len()
    }

    /// Every simple orthogonal path of exactly `len` free cells starting at
    /// `start`, in depth-first order.
    pub fn paths_from(&self, start: Cell, len: usize) -> Vec<Vec<Cell>> {
        if len == 0 || !self.is_free(start) {
            return Vec::new();
        }
        let mut visiting: CellSet = [start].into_iter().collect();
        self.arms(start, len - 1, &mut visiting)
            .into_iter()
            .map(|arm| {
                let mut path = Vec::with_capacity(len);
                path.push(start);
                path.extend(arm);
                path
            })
            .collect()
    }

    /// Every simple orthogonal path of exactly `len` free cells that passes
    /// through `cell`, each listed in one orientation only.
    pub fn paths_through(&self, cell: Cell, len: usize) -> Vec<Vec<Cell>> {
        let mut found = Vec::new();
        if len == 0 || !self.is_free(cell) {
            return found;
        }
        let mut visiting: CellSet = [cell].into_iter().collect();
        for before in 0..len {
            let after = len - 1 - before;
            if before > after {
                break;
            }
            for left in self.arms(cell, before, &mut visiting) {
                let mut taken = visiting;
                taken.extend(left.iter().copied());
                for right in self.arms(cell, after, &mut taken) {
                    // Both orientations of a centred path show up; keep one
                    if before == after && before > 0 && left[0] > right[0] {
                        continue;
                    }
                    let mut path: Vec<Cell> = left.iter().rev().copied().collect();
                    path.push(cell);
                    path.extend(right);
                    found.push(path);
                }
            }
        }
        found
    }

    /// Simple paths of `n` free cells leading away from `from`, avoiding
    /// `visiting`
    fn arms(&self, from: Cell, n: usize, visiting: &mut CellSet) -> Vec<Vec<Cell>> {
        let mut found = Vec::new();
        let mut arm = Vec::with_capacity(n);
        self.extend_arm(from, n, visiting, &mut arm, &mut found);
        found
    }

    fn extend_arm(
        &self,
        last: Cell,
        n: usize,
        visiting: &mut CellSet,
        arm: &mut Vec<Cell>,
        found: &mut Vec<Vec<Cell>>,
    ) {
        if arm.len() == n {
            found.push(arm.clone());
            return;
        }
        for next in last.orthogonal_neighbors() {
            if self.is_free(next) && visiting.insert(next) {
                arm.push(next);
                self.extend_arm(next, n, visiting, arm, found);
                arm.pop();
                visiting.remove(next);
            }
        }
    }

    /// Mark the path used and append it as a sequence
    pub fn place(&mut self, path: Vec<Cell>) {
        let cells: CellSet = path.iter().copied().collect();
        debug_assert_eq!(cells.len(), path.len());
        debug_assert!(cells.iter().all(|c| self.is_free(c)));
        self.used = self.used.union(&cells);
        self.sequences.push(Sequence::new(path));
        self.trail.push(Placement { cells });
    }

    /// Revert the most recent placement
    pub fn undo(&mut self) -> Option<Sequence> {
        let placement = self.trail.pop()?;
        for cell in placement.cells.iter() {
            self.used.remove(cell);
        }
        self.sequences.pop()
    }

    pub fn into_sequences(self) -> Vec<Sequence> {
        self.sequences
    }
}

/// Fixed inputs of one run
struct Run<'a> {
    topology: &'a TopologyMap,
    reserved: &'a CellSet,
    target: usize,
    /// Tie-break order among equally constrained cells
    rank: [u8; CELL_COUNT],
}

/// Randomized backtracking partitioner
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    config: SearchConfig,
    nodes: u64,
    best_used: usize,
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl SequenceGenerator {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            nodes: 0,
            best_used: 0,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Place sequences until exactly `target_used` eligible cells are covered,
    /// or until only stranded pockets (bounded by the buffer) remain.
    ///
    /// Cells in `reserved` and every peak or valley in `topology` are never
    /// entered. Failure is reported through [`Generation::success`].
    pub fn generate(
        &mut self,
        topology: &TopologyMap,
        seed: u64,
        target_used: usize,
        reserved: &CellSet,
    ) -> Generation {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut ctx = SearchContext::new(topology, reserved);
        let eligible = ctx.free_cells().len();
        self.nodes = 0;
        self.best_used = 0;

        let mut order: Vec<u8> = (0..CELL_COUNT as u8).collect();
        order.shuffle(&mut rng);
        let mut rank = [0u8; CELL_COUNT];
        for (position, &index) in order.iter().enumerate() {
            rank[index as usize] = position as u8;
        }
        let run = Run {
            topology,
            reserved,
            target: target_used,
            rank,
        };

        let success = target_used <= eligible && self.backtrack(&mut ctx, &mut rng, &run);
        let holes = if success {
            eligible - ctx.used_count()
        } else {
            eligible - self.best_used
        };
        debug!(
            seed,
            target_used,
            eligible,
            success,
            holes,
            nodes = self.nodes,
            sequences = ctx.sequences().len(),
            "search finished"
        );

        Generation {
            success,
            holes,
            sequences: if success { ctx.into_sequences() } else { Vec::new() },
            nodes: self.nodes,
        }
    }

    fn budget_spent(&self) -> bool {
        self.config.node_budget.is_some_and(|budget| self.nodes >= budget)
    }

    /// Whether a finished branch may be returned
    fn accept(&self, ctx: &SearchContext, run: &Run<'_>) -> bool {
        if !self.config.repairable {
            return true;
        }
        let mut trial = ctx.sequences().to_vec();
        absorb(&mut trial, run.reserved, run.topology).is_complete()
    }

    /// Whether every lone pocket cell touches a sequence end that can still
    /// grow. Pockets never change once sealed, so a miss here is final.
    fn pockets_reachable(ctx: &SearchContext, pockets: &CellSet) -> bool {
        pockets.iter().all(|cell| {
            let paired = cell.orthogonal_neighbors().any(|n| pockets.contains(n));
            paired
                || ctx.sequences().iter().any(|seq| {
                    seq.len() < MAX_SEQUENCE_LEN
                        && (seq.head().is_some_and(|h| h.is_adjacent(cell))
                            || seq.tail().is_some_and(|t| t.is_adjacent(cell)))
                })
        })
    }

    /// Free cell outside the pockets with the fewest free neighbors
    fn pick_cell(ctx: &SearchContext, pockets: &CellSet, rank: &[u8; CELL_COUNT]) -> Option<Cell> {
        Cell::all()
            .filter(|&c| ctx.is_free(c) && !pockets.contains(c))
            .min_by_key(|&c| (ctx.free_degree(c), rank[c.index()]))
    }

    fn backtrack(&mut self, ctx: &mut SearchContext, rng: &mut ChaCha8Rng, run: &Run<'_>) -> bool {
        let used = ctx.used_count();
        self.best_used = self.best_used.max(used);
        if used == run.target {
            return self.accept(ctx, run);
        }
        if self.budget_spent() {
            return false;
        }
        let pockets = ctx.pockets();
        if pockets.len() > self.config.buffer {
            return false;
        }
        if self.config.repairable && !Self::pockets_reachable(ctx, &pockets) {
            return false;
        }
        let Some(cell) = Self::pick_cell(ctx, &pockets, &run.rank) else {
            // Only stranded pockets are left
            return self.accept(ctx, run);
        };

        let mut lengths: Vec<usize> = (MIN_SEQUENCE_LEN..=MAX_SEQUENCE_LEN).collect();
        lengths.shuffle(rng);

        for len in lengths {
            if used + len > run.target {
                continue;
            }
            let mut paths = ctx.paths_through(cell, len);
            paths.shuffle(rng);

            for mut path in paths {
                if self.budget_spent() {
                    return false;
                }
                if rng.gen::<bool>() {
                    path.reverse();
                }
                self.nodes += 1;
                ctx.place(path);
                if self.backtrack(ctx, rng, run) {
                    return true;
                }
                ctx.undo();
            }
        }
        false
    }
}

/// Standalone search targets for a solved grid: cover every plain cell but
/// [`SEARCH_BUFFER`] of them, with no reserved cells.
pub fn search_sequences(grid: &Grid, seed: u64) -> Generation {
    let topology = topology::classify(grid);
    let available = topology.plain_cells().count();
    let target = available.saturating_sub(SEARCH_BUFFER);
    SequenceGenerator::new(SearchConfig::standalone()).generate(
        &topology,
        seed,
        target,
        &CellSet::new(),
    )
}
