//! Placement gate: a blocked piece may only lock when it touches existing structure.

use crate::geometry::WorldPos;
use crate::manager::PlacedPiece;

/// True iff some placed block shares a face with the cell containing `position`.
pub fn is_adjacent_to_existing(
    position: WorldPos,
    placed: &[PlacedPiece],
    grid_size: usize,
) -> bool {
    let neighbours = position.to_grid(grid_size).neighbours();
    placed
        .iter()
        .flat_map(|piece| piece.world_blocks(grid_size))
        .map(|block| block.to_grid(grid_size))
        .any(|cell| neighbours.contains(&cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GridPos;
    use crate::pieces::{PieceId, PieceKind};

    const N: usize = 5;

    fn seed() -> Vec<PlacedPiece> {
        vec![PlacedPiece {
            id: PieceId(0),
            kind: PieceKind::Seed,
            blocks: vec![GridPos::new(2, 2, 2)],
        }]
    }

    fn world(x: i32, y: i32, z: i32) -> WorldPos {
        GridPos::new(x, y, z).to_world(N)
    }

    #[test]
    fn test_face_neighbour_is_adjacent() {
        let placed = seed();
        assert!(is_adjacent_to_existing(world(3, 2, 2), &placed, N));
        assert!(is_adjacent_to_existing(world(2, 3, 2), &placed, N));
        assert!(is_adjacent_to_existing(world(2, 2, 1), &placed, N));
    }

    #[test]
    fn test_far_cell_not_adjacent() {
        assert!(!is_adjacent_to_existing(world(0, 0, 0), &seed(), N));
    }

    #[test]
    fn test_edge_and_corner_not_adjacent() {
        let placed = seed();
        assert!(!is_adjacent_to_existing(world(3, 3, 2), &placed, N));
        assert!(!is_adjacent_to_existing(world(3, 3, 3), &placed, N));
    }

    #[test]
    fn test_same_cell_not_adjacent() {
        assert!(!is_adjacent_to_existing(world(2, 2, 2), &seed(), N));
    }

    #[test]
    fn test_nothing_placed() {
        assert!(!is_adjacent_to_existing(world(2, 3, 2), &[], N));
    }

    #[test]
    fn test_fractional_world_position_rounds() {
        let p = WorldPos::new(1.1, 1.9, -0.2);
        assert!(is_adjacent_to_existing(p, &seed(), N));
    }
}
