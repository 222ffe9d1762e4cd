//! Error types for the simulation core.

use thiserror::Error;

/// Rejected engine calls. Grid access itself never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no active piece")]
    NoActivePiece,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size must be between 1 and {max}, got {got}")]
    GridSize { got: usize, max: usize },
    #[error("spawn height must not be negative, got {0}")]
    SpawnHeight(i32),
}
