//! Voxel grid: N×N×N cells, each empty or owned by a placed piece.

use crate::geometry::GridPos;
use crate::pieces::PieceId;

/// Cubic occupancy store. Out-of-range reads are empty and out-of-range writes are ignored.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    /// cells[(x * size + y) * size + z] = owner.
    cells: Vec<Option<PieceId>>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size * size],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_valid_position(&self, pos: GridPos) -> bool {
        let n = self.size as i32;
        (0..n).contains(&pos.x) && (0..n).contains(&pos.y) && (0..n).contains(&pos.z)
    }

    #[inline]
    fn index(&self, pos: GridPos) -> Option<usize> {
        self.is_valid_position(pos).then(|| {
            let (x, y, z) = (pos.x as usize, pos.y as usize, pos.z as usize);
            (x * self.size + y) * self.size + z
        })
    }

    /// True if the cell is occupied.
    #[inline]
    pub fn get_cell(&self, pos: GridPos) -> bool {
        self.occupant(pos).is_some()
    }

    #[inline]
    pub fn occupant(&self, pos: GridPos) -> Option<PieceId> {
        self.index(pos).and_then(|i| self.cells[i])
    }

    #[inline]
    pub fn set_cell(&mut self, pos: GridPos, value: Option<PieceId>) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = value;
        }
    }

    fn layer_positions(&self, y: i32) -> impl Iterator<Item = GridPos> + use<> {
        let n = self.size as i32;
        (0..n).flat_map(move |x| (0..n).map(move |z| GridPos::new(x, y, z)))
    }

    /// Every (x, z) at height `y` occupied. False for out-of-range `y`.
    pub fn is_layer_complete(&self, y: i32) -> bool {
        if !(0..self.size as i32).contains(&y) {
            return false;
        }
        self.layer_positions(y).all(|p| self.get_cell(p))
    }

    /// Empty the layer at height `y`; returns the blocks that were removed.
    pub fn clear_layer(&mut self, y: i32) -> Vec<(GridPos, PieceId)> {
        if !(0..self.size as i32).contains(&y) {
            return Vec::new();
        }
        let mut removed = Vec::new();
        for pos in self.layer_positions(y) {
            if let Some(i) = self.index(pos) {
                if let Some(id) = self.cells[i].take() {
                    removed.push((pos, id));
                }
            }
        }
        removed
    }

    /// Occupied cells in scan order (x, then y, then z).
    pub fn occupied(&self) -> impl Iterator<Item = (GridPos, PieceId)> + '_ {
        let n = self.size;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|id| {
                let z = i % n;
                let y = (i / n) % n;
                let x = i / (n * n);
                (GridPos::new(x as i32, y as i32, z as i32), id)
            })
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const N: usize = 5;

    #[test]
    fn test_new_grid_empty() {
        let grid = Grid::new(N);
        for x in 0..N as i32 {
            for y in 0..N as i32 {
                for z in 0..N as i32 {
                    assert!(!grid.get_cell(GridPos::new(x, y, z)));
                }
            }
        }
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_is_valid_position_bounds() {
        let grid = Grid::new(N);
        assert!(grid.is_valid_position(GridPos::new(0, 0, 0)));
        assert!(grid.is_valid_position(GridPos::new(4, 4, 4)));
        assert!(!grid.is_valid_position(GridPos::new(-1, 0, 0)));
        assert!(!grid.is_valid_position(GridPos::new(0, 5, 0)));
        assert!(!grid.is_valid_position(GridPos::new(0, 0, 5)));
    }

    #[test]
    fn test_clear_layer_only_touches_that_layer() {
        let mut grid = Grid::new(N);
        let id = PieceId(1);
        for x in 0..N as i32 {
            for y in 0..N as i32 {
                grid.set_cell(GridPos::new(x, y, 1), Some(id));
            }
        }
        let removed = grid.clear_layer(2);
        assert_eq!(removed.len(), N);
        assert!(removed.iter().all(|(p, owner)| p.y == 2 && *owner == id));
        for x in 0..N as i32 {
            assert!(!grid.get_cell(GridPos::new(x, 2, 1)));
            assert!(grid.get_cell(GridPos::new(x, 1, 1)));
            assert!(grid.get_cell(GridPos::new(x, 3, 1)));
        }
    }

    #[test]
    fn test_clear_layer_out_of_range_noop() {
        let mut grid = Grid::new(N);
        grid.set_cell(GridPos::new(0, 0, 0), Some(PieceId(3)));
        assert!(grid.clear_layer(-1).is_empty());
        assert!(grid.clear_layer(N as i32).is_empty());
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_layer_complete() {
        let mut grid = Grid::new(N);
        for x in 0..N as i32 {
            for z in 0..N as i32 {
                assert!(!grid.is_layer_complete(0));
                grid.set_cell(GridPos::new(x, 0, z), Some(PieceId(9)));
            }
        }
        assert!(grid.is_layer_complete(0));
        assert!(!grid.is_layer_complete(1));
        assert!(!grid.is_layer_complete(N as i32));
    }

    #[test]
    fn test_occupied_scan_order() {
        let mut grid = Grid::new(3);
        grid.set_cell(GridPos::new(2, 0, 0), Some(PieceId(1)));
        grid.set_cell(GridPos::new(0, 1, 2), Some(PieceId(2)));
        let cells: Vec<_> = grid.occupied().collect();
        assert_eq!(
            cells,
            vec![
                (GridPos::new(0, 1, 2), PieceId(2)),
                (GridPos::new(2, 0, 0), PieceId(1)),
            ]
        );
    }

    fn coord() -> impl Strategy<Value = i32> {
        -3..(N as i32 + 3)
    }

    proptest! {
        #[test]
        fn prop_set_then_get(x in coord(), y in coord(), z in coord(), owner in 0u32..100) {
            let mut grid = Grid::new(N);
            let pos = GridPos::new(x, y, z);
            grid.set_cell(pos, Some(PieceId(owner)));
            if grid.is_valid_position(pos) {
                prop_assert!(grid.get_cell(pos));
                prop_assert_eq!(grid.occupant(pos), Some(PieceId(owner)));
                grid.set_cell(pos, None);
                prop_assert!(!grid.get_cell(pos));
            } else {
                prop_assert!(!grid.get_cell(pos));
                prop_assert_eq!(grid.occupied_count(), 0);
            }
        }

        #[test]
        fn prop_clear_layer_empties_layer(
            cells in proptest::collection::vec((0..N as i32, 0..N as i32, 0..N as i32), 0..60),
            y in 0..N as i32,
        ) {
            let mut grid = Grid::new(N);
            for (i, &(x, cy, z)) in cells.iter().enumerate() {
                grid.set_cell(GridPos::new(x, cy, z), Some(PieceId(i as u32)));
            }
            let before: Vec<_> = grid.occupied().filter(|(p, _)| p.y != y).collect();
            grid.clear_layer(y);
            let after: Vec<_> = grid.occupied().collect();
            prop_assert!(after.iter().all(|(p, _)| p.y != y));
            prop_assert_eq!(before, after);
        }
    }
}
