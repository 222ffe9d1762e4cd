//! Piece/placement manager: the active piece, the grid, and the placed-piece view.
//!
//! The grid is the only record of what is placed. [`PlacedPiece`]s are rebuilt
//! from it on demand, so a cleared block disappears from both at once.

use crate::geometry::{GridPos, Orientation, WorldPos};
use crate::grid::Grid;
use crate::pieces::{PieceId, PieceKind};
use log::{debug, warn};
use std::collections::BTreeMap;

/// The falling piece. Never written to the grid until placed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePiece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub anchor: WorldPos,
    pub orientation: Orientation,
}

impl ActivePiece {
    /// World position of every block under the current transform.
    pub fn blocks(&self) -> Vec<WorldPos> {
        self.kind
            .blocks()
            .iter()
            .map(|&offset| self.anchor + self.orientation.apply(offset))
            .collect()
    }
}

/// A placed piece as currently seen in the grid (cleared blocks are gone).
///
/// Only cells actually written on placement appear here. Blocks dropped by
/// [`PieceManager::place_piece`] (outside the grid or on an owned cell) are
/// not part of the view and never count for adjacency; a piece whose blocks
/// were all dropped has no view at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedPiece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub blocks: Vec<GridPos>,
}

impl PlacedPiece {
    pub fn world_blocks(&self, grid_size: usize) -> impl Iterator<Item = WorldPos> + '_ {
        self.blocks.iter().map(move |b| b.to_world(grid_size))
    }
}

/// Result of committing the active piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    pub id: PieceId,
    pub kind: PieceKind,
    /// Cells written with this piece's id.
    pub cells: Vec<GridPos>,
    /// Blocks not written: outside the grid or on a cell someone already owns.
    pub dropped: Vec<GridPos>,
}

/// Outcome of clearing one layer through the manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerClear {
    pub removed: Vec<(GridPos, PieceId)>,
    /// Pieces whose last block was in the layer.
    pub emptied: Vec<PieceId>,
}

#[derive(Debug, Clone)]
pub struct PieceManager {
    grid: Grid,
    /// Kind of every piece that still owns at least one cell.
    registry: BTreeMap<PieceId, PieceKind>,
    current: Option<ActivePiece>,
    next_id: u32,
    spawn_height: i32,
}

impl PieceManager {
    /// New grid with the seed block at its centre.
    pub fn new(grid_size: usize, spawn_height: i32) -> Self {
        let mut manager = Self {
            grid: Grid::new(grid_size),
            registry: BTreeMap::new(),
            current: None,
            next_id: 0,
            spawn_height,
        };
        manager.place_seed();
        manager
    }

    fn allocate_id(&mut self) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        id
    }

    fn place_seed(&mut self) {
        let c = (self.grid.size() / 2) as i32;
        let id = self.allocate_id();
        self.grid.set_cell(GridPos::new(c, c, c), Some(id));
        self.registry.insert(id, PieceKind::Seed);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_size(&self) -> usize {
        self.grid.size()
    }

    /// Replace the active piece with a fresh `kind` above the grid.
    /// Returns the new id and the id of the discarded piece, if any.
    pub fn spawn_piece(&mut self, kind: PieceKind) -> (PieceId, Option<PieceId>) {
        let discarded = self.current.take().map(|p| p.id);
        let id = self.allocate_id();
        self.current = Some(ActivePiece {
            id,
            kind,
            anchor: WorldPos::new(0.0, self.spawn_height as f32, 0.0),
            orientation: Orientation::IDENTITY,
        });
        debug!("spawned {} piece {id} (discarded {discarded:?})", kind.name());
        (id, discarded)
    }

    pub fn current_piece(&self) -> Option<&ActivePiece> {
        self.current.as_ref()
    }

    pub(crate) fn current_piece_mut(&mut self) -> Option<&mut ActivePiece> {
        self.current.as_mut()
    }

    pub fn current_piece_blocks(&self) -> Vec<WorldPos> {
        self.current.as_ref().map(ActivePiece::blocks).unwrap_or_default()
    }

    /// Write the active piece into the grid. `None` when there is nothing to place.
    pub fn place_piece(&mut self) -> Option<Committed> {
        let piece = self.current.take()?;
        let size = self.grid.size();
        let mut cells = Vec::new();
        let mut dropped = Vec::new();
        for block in piece.blocks() {
            let pos = block.to_grid(size);
            if self.grid.is_valid_position(pos) && !self.grid.get_cell(pos) {
                self.grid.set_cell(pos, Some(piece.id));
                cells.push(pos);
            } else {
                dropped.push(pos);
            }
        }
        if !cells.is_empty() {
            self.registry.insert(piece.id, piece.kind);
        }
        if !dropped.is_empty() {
            warn!(
                "piece {} placed with {} unrecorded block(s): {dropped:?}",
                piece.id,
                dropped.len()
            );
        }
        debug!("placed {} piece {} at {cells:?}", piece.kind.name(), piece.id);
        Some(Committed {
            id: piece.id,
            kind: piece.kind,
            cells,
            dropped,
        })
    }

    /// Placed pieces in placement order, derived from the grid.
    pub fn placed_pieces(&self) -> Vec<PlacedPiece> {
        let mut by_id: BTreeMap<PieceId, Vec<GridPos>> = BTreeMap::new();
        for (pos, id) in self.grid.occupied() {
            by_id.entry(id).or_default().push(pos);
        }
        by_id
            .into_iter()
            .filter_map(|(id, blocks)| {
                self.registry
                    .get(&id)
                    .map(|&kind| PlacedPiece { id, kind, blocks })
            })
            .collect()
    }

    pub(crate) fn clear_layer(&mut self, y: i32) -> LayerClear {
        let removed = self.grid.clear_layer(y);
        let mut emptied: Vec<PieceId> = removed.iter().map(|&(_, id)| id).collect();
        emptied.sort_unstable();
        emptied.dedup();
        let still_present: Vec<PieceId> = self.grid.occupied().map(|(_, id)| id).collect();
        emptied.retain(|id| !still_present.contains(id));
        for id in &emptied {
            self.registry.remove(id);
        }
        LayerClear { removed, emptied }
    }
}
