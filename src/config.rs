//! Session configuration.

use crate::error::ConfigError;
use crate::grid::{DEFAULT_SIZE, MAX_SIZE};
use crate::palette::Palette;

/// Everything needed to start (and restart) a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Edge length of the cube.
    pub size: usize,
    pub palette: Palette,
    /// Fixed seed for reproducible grids; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            palette: Palette::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Checks the edge length. A `Palette` is validated when it is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.size {
            0 => Err(ConfigError::ZeroSize),
            size if size > MAX_SIZE => Err(ConfigError::TooLarge {
                size,
                max: MAX_SIZE,
            }),
            _ => Ok(()),
        }
    }
}
