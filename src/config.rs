//! Engine configuration.

use crate::error::ConfigError;

/// Largest supported grid side.
pub const MAX_GRID_SIZE: usize = 16;

pub const DEFAULT_GRID_SIZE: usize = 5;

/// Options that shape the simulation (grid side, spawn height).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub grid_size: usize,
    /// World y of a freshly spawned piece. `None` = two cells above the grid top.
    pub spawn_height: Option<i32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            spawn_height: None,
        }
    }
}

impl EngineConfig {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::GridSize {
                got: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        if let Some(h) = self.spawn_height {
            if h < 0 {
                return Err(ConfigError::SpawnHeight(h));
            }
        }
        Ok(())
    }

    pub fn effective_spawn_height(&self) -> i32 {
        self.spawn_height.unwrap_or(self.grid_size as i32 + 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_spawn_height(), 7);
    }

    #[test]
    fn test_grid_size_bounds() {
        assert_eq!(
            EngineConfig::new(0).validate(),
            Err(ConfigError::GridSize { got: 0, max: MAX_GRID_SIZE })
        );
        assert!(EngineConfig::new(MAX_GRID_SIZE).validate().is_ok());
        assert!(EngineConfig::new(MAX_GRID_SIZE + 1).validate().is_err());
    }

    #[test]
    fn test_negative_spawn_height_rejected() {
        let config = EngineConfig {
            spawn_height: Some(-1),
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::SpawnHeight(-1)));
    }

    #[test]
    fn test_explicit_spawn_height() {
        let config = EngineConfig {
            grid_size: 4,
            spawn_height: Some(4),
        };
        assert_eq!(config.effective_spawn_height(), 4);
    }
}
