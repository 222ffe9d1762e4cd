//! Simulation engine: moves, rotations, collision, placement gating and layer clears.
//!
//! The engine has no clock. Each call applies one intent and returns once the
//! grid is consistent again, including any placement and layer clearing it
//! triggered. Presentation code reads state through the accessors and
//! follows changes through [`Engine::drain_events`].

use crate::adjacency::is_adjacent_to_existing;
use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::geometry::{Axis, Direction, GridPos, WorldPos};
use crate::grid::Grid;
use crate::manager::{ActivePiece, PieceManager, PlacedPiece};
use crate::pieces::{PieceId, PieceKind};
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    PieceActive,
}

/// A committed piece and what it caused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub id: PieceId,
    pub kind: PieceKind,
    /// Cells written for this piece (some may already be cleared again).
    pub cells: Vec<GridPos>,
    /// Blocks that could not be written (outside the grid or on an owned cell).
    pub dropped: Vec<GridPos>,
    /// Heights of layers cleared by this placement, ascending.
    pub cleared_layers: Vec<i32>,
    grid_size: usize,
}

impl Placement {
    /// A block locked above the top of the grid.
    pub fn topped_out(&self) -> bool {
        self.dropped.iter().any(|p| p.y >= self.grid_size as i32)
    }
}

/// Result of a move intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The piece moved one cell.
    Moved,
    /// The move collided and the piece stayed where it was.
    Rejected,
    /// A downward move was blocked next to existing structure; the piece is now placed.
    Placed(Placement),
}

/// Change notifications for a presentation adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Spawned { id: PieceId, kind: PieceKind },
    /// An active piece was replaced before it was placed.
    Discarded { id: PieceId },
    Placed {
        id: PieceId,
        kind: PieceKind,
        cells: Vec<GridPos>,
    },
    LayerCleared {
        y: i32,
        removed: Vec<(GridPos, PieceId)>,
    },
    /// Every block of a placed piece has been cleared.
    PieceCleared { id: PieceId },
}

#[derive(Debug, Clone)]
pub struct Engine {
    manager: PieceManager,
    events: Vec<Event>,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "engine: grid {0}x{0}x{0}, spawn height {1}",
            config.grid_size,
            config.effective_spawn_height()
        );
        Ok(Self {
            manager: PieceManager::new(config.grid_size, config.effective_spawn_height()),
            events: Vec::new(),
        })
    }

    pub fn state(&self) -> EngineState {
        if self.manager.current_piece().is_some() {
            EngineState::PieceActive
        } else {
            EngineState::Idle
        }
    }

    pub fn grid(&self) -> &Grid {
        self.manager.grid()
    }

    pub fn grid_size(&self) -> usize {
        self.manager.grid_size()
    }

    pub fn current_piece(&self) -> Option<&ActivePiece> {
        self.manager.current_piece()
    }

    pub fn current_piece_blocks(&self) -> Vec<WorldPos> {
        self.manager.current_piece_blocks()
    }

    pub fn placed_pieces(&self) -> Vec<PlacedPiece> {
        self.manager.placed_pieces()
    }

    /// Take all events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Spawn `kind` above the grid, discarding any unplaced active piece.
    pub fn spawn_piece(&mut self, kind: PieceKind) -> PieceId {
        let (id, discarded) = self.manager.spawn_piece(kind);
        if let Some(old) = discarded {
            self.events.push(Event::Discarded { id: old });
        }
        self.events.push(Event::Spawned { id, kind });
        id
    }

    /// Quarter-turn the active piece about `axis`.
    ///
    /// No collision check follows: the piece may overlap structure or poke
    /// out of the grid until the next move, whose collision test sees it.
    pub fn rotate_piece(&mut self, axis: Axis) -> Result<(), EngineError> {
        let piece = self
            .manager
            .current_piece_mut()
            .ok_or(EngineError::NoActivePiece)?;
        piece.orientation = piece.orientation.rotated(axis);
        trace!("piece {} rotated about {axis:?}", piece.id);
        Ok(())
    }

    /// Move the active piece one cell. A blocked downward move places the
    /// piece when any of its blocks touches placed structure.
    pub fn move_piece(&mut self, direction: Direction) -> Result<MoveOutcome, EngineError> {
        let piece = self
            .manager
            .current_piece_mut()
            .ok_or(EngineError::NoActivePiece)?;
        let snapshot = piece.anchor;
        piece.anchor = snapshot + direction.delta();

        if !self.collides() {
            trace!("moved {direction:?}");
            return Ok(MoveOutcome::Moved);
        }

        if let Some(piece) = self.manager.current_piece_mut() {
            piece.anchor = snapshot;
        }
        if direction != Direction::Down || !self.touches_structure() {
            trace!("move {direction:?} rejected");
            return Ok(MoveOutcome::Rejected);
        }

        let Some(committed) = self.manager.place_piece() else {
            return Ok(MoveOutcome::Rejected);
        };
        self.events.push(Event::Placed {
            id: committed.id,
            kind: committed.kind,
            cells: committed.cells.clone(),
        });
        let cleared_layers = self.clear_completed_layers();
        Ok(MoveOutcome::Placed(Placement {
            id: committed.id,
            kind: committed.kind,
            cells: committed.cells,
            dropped: committed.dropped,
            cleared_layers,
            grid_size: self.grid_size(),
        }))
    }

    /// Any active block outside the grid's sides or floor, or on an occupied cell.
    /// Cells above the top are open.
    fn collides(&self) -> bool {
        let grid = self.manager.grid();
        let n = grid.size() as i32;
        self.manager
            .current_piece_blocks()
            .into_iter()
            .map(|b| b.to_grid(grid.size()))
            .any(|p| {
                if !(0..n).contains(&p.x) || !(0..n).contains(&p.z) || p.y < 0 {
                    return true;
                }
                p.y < n && grid.get_cell(p)
            })
    }

    fn touches_structure(&self) -> bool {
        let placed = self.manager.placed_pieces();
        let size = self.grid_size();
        self.manager
            .current_piece_blocks()
            .into_iter()
            .any(|b| is_adjacent_to_existing(b, &placed, size))
    }

    /// Clear every full layer, bottom to top. Layers above do not fall.
    fn clear_completed_layers(&mut self) -> Vec<i32> {
        let mut cleared = Vec::new();
        for y in 0..self.grid_size() as i32 {
            if !self.manager.grid().is_layer_complete(y) {
                continue;
            }
            let clear = self.manager.clear_layer(y);
            debug!("layer {y} cleared ({} blocks)", clear.removed.len());
            self.events.push(Event::LayerCleared {
                y,
                removed: clear.removed,
            });
            self.events
                .extend(clear.emptied.into_iter().map(|id| Event::PieceCleared { id }));
            cleared.push(y);
        }
        cleared
    }
}
