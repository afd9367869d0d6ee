//! Error types for the game core and its configuration.

use crate::grid::Coord;
use thiserror::Error;

/// Why a pick or removal was rejected. The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("cell is not active")]
    InactiveCell,
    #[error("selection of {size} cell(s) is too small to remove (need at least 2)")]
    TooSmall { size: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    /// A coordinate outside `[0, size)` on some axis. Correctly resolved picks never produce this.
    #[error("coordinate {coord} is outside the {size}x{size}x{size} grid")]
    OutOfBounds { coord: Coord, size: usize },
    #[error("invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),
}

impl GameError {
    /// Recoverable errors surface to the player as a no-op.
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::InvalidSelection(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size must be at least 1")]
    ZeroSize,
    #[error("grid size {size} exceeds the maximum of {max}")]
    TooLarge { size: usize, max: usize },
    #[error("palette must contain at least one colour")]
    EmptyPalette,
    #[error("colour {0} appears more than once in the palette")]
    DuplicateColor(String),
    #[error("unknown colour: {0}")]
    UnknownColor(String),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}
