//! Island detection: plain cells that no path can ever enter.

use crate::grid::{Cell, CellSet, Grid};
use crate::topology::TopologyMap;
use serde::{Deserialize, Serialize};

/// A sealed plain cell together with its grid value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Island {
    pub cell: Cell,
    pub value: u8,
}

/// Plain, unused cells whose orthogonal neighbors are all off-board, walls or
/// already used.
pub fn find_islands(topology: &TopologyMap, used: &CellSet) -> Vec<Cell> {
    let blocked = |cell: Cell| topology.is_wall(cell) || used.contains(cell);
    Cell::all()
        .filter(|&cell| !blocked(cell))
        .filter(|&cell| cell.orthogonal_neighbors().all(blocked))
        .collect()
}

/// Islands of a fresh board, paired with the values they force out
pub fn reserve_islands(grid: &Grid, topology: &TopologyMap) -> Vec<Island> {
    find_islands(topology, &CellSet::new())
        .into_iter()
        .map(|cell| Island {
            cell,
            value: grid.get(cell),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Relief;

    fn walls(cells: &[(usize, usize)]) -> TopologyMap {
        let mut map = TopologyMap::plain();
        for &(r, c) in cells {
            map.set(Cell::new(r, c), Some(Relief::Peak));
        }
        map
    }

    #[test]
    fn test_enclosed_cell_is_island() {
        let map = walls(&[(3, 4), (5, 4), (4, 3), (4, 5)]);
        assert_eq!(find_islands(&map, &CellSet::new()), vec![Cell::new(4, 4)]);
    }

    #[test]
    fn test_board_edge_seals_corner() {
        let map = walls(&[(0, 1), (1, 0)]);
        assert_eq!(find_islands(&map, &CellSet::new()), vec![Cell::new(0, 0)]);
    }

    #[test]
    fn test_open_board_has_no_islands() {
        assert!(find_islands(&TopologyMap::plain(), &CellSet::new()).is_empty());
    }

    #[test]
    fn test_used_cells_count_as_blocked() {
        let map = walls(&[(0, 1)]);
        let used: CellSet = [Cell::new(1, 0)].into_iter().collect();
        assert_eq!(find_islands(&map, &used), vec![Cell::new(0, 0)]);
    }

    #[test]
    fn test_two_cell_pocket_is_not_island() {
        // (0,0) and (0,1) only see each other
        let map = walls(&[(1, 0), (1, 1), (0, 2)]);
        assert!(find_islands(&map, &CellSet::new()).is_empty());
    }

    #[test]
    fn test_reserve_carries_values() {
        let mut grid = Grid::from_rows([[5; 9]; 9]);
        grid.set(Cell::new(0, 0), 7);
        let map = walls(&[(0, 1), (1, 0)]);
        let islands = reserve_islands(&grid, &map);
        assert_eq!(
            islands,
            vec![Island {
                cell: Cell::new(0, 0),
                value: 7
            }]
        );
    }
}
