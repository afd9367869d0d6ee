//! cubeclear — 3D cluster-clearing puzzle core.
//!
//! A cube of coloured cells. Picking a cell selects its 26-connected same-colour cluster; picking
//! the selection again (or calling `remove_selection`) removes it for `n^(n-1)` points, after
//! which the remaining cells fall down their columns.

pub mod cluster;
pub mod config;
pub mod error;
pub mod gravity;
pub mod grid;
pub mod palette;
pub mod session;

pub use cluster::{Cluster, find_cluster};
pub use config::GameConfig;
pub use error::{ConfigError, GameError, SelectionError};
pub use grid::{Cell, Coord, DEFAULT_SIZE, Grid, MAX_SIZE};
pub use palette::{Color, Palette};
pub use session::{
    CellSnapshot, GameSession, GridSnapshot, PickOutcome, RemovalReport, SelectionSnapshot,
    SessionState, SessionStatus,
};
