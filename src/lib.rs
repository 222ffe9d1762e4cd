//! voxtris: volumetric block-placement puzzle core.
//!
//! Pieces fall into an N×N×N grid, lock only when they touch existing
//! structure, and full horizontal layers clear. The simulation is pure data:
//! front-ends drive an [`Engine`] with move/rotate/spawn intents and draw
//! from its accessors and [`Event`]s.

pub mod adjacency;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod manager;
pub mod pieces;

pub use config::EngineConfig;
pub use engine::{Engine, EngineState, Event, MoveOutcome, Placement};
pub use error::{ConfigError, EngineError};
pub use geometry::{Axis, Direction, GridPos, Orientation, WorldPos};
pub use grid::Grid;
pub use manager::{ActivePiece, PlacedPiece};
pub use pieces::{Bag, PieceId, PieceKind};
