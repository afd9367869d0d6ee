//! Game session: selection, removal, scoring and level progression.
//!
//! `GameSession` is the only owner of the grid. Every operation runs to completion before the
//! next one starts, and a failed operation leaves the session exactly as it was.

use crate::cluster::{Cluster, find_cluster};
use crate::config::GameConfig;
use crate::error::{ConfigError, GameError, SelectionError};
use crate::gravity;
use crate::grid::{Coord, Grid};
use crate::palette::{Color, Palette};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

pub const INITIAL_LEVEL: u32 = 1;
pub const INITIAL_TARGET: u64 = 1000;

/// Smallest selection that can be removed.
pub const MIN_REMOVAL: usize = 2;

/// Points for removing `size` cells: `size^(size - 1)`, saturating at `u64::MAX`.
pub fn points_for(size: usize) -> u64 {
    if size == 0 {
        return 0;
    }
    let base = u64::try_from(size).unwrap_or(u64::MAX);
    u32::try_from(size - 1)
        .ok()
        .and_then(|exp| base.checked_pow(exp))
        .unwrap_or(u64::MAX)
}

/// Score threshold for the level after reaching `level`.
pub fn target_for(level: u32) -> u64 {
    u64::from(level) * 1000 + 500
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Selecting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSnapshot {
    pub cells: Vec<Coord>,
    pub size: usize,
    /// Drives the enabled state of a "remove" control.
    pub removable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemovalReport {
    pub points_awarded: u64,
    pub new_score: u64,
    pub leveled_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_target: Option<u64>,
}

/// Result of a pick gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum PickOutcome {
    /// A new cluster replaced the previous selection.
    Selected(SelectionSnapshot),
    /// The pick confirmed a removable selection.
    Removed(RemovalReport),
    /// The pick confirmed a selection too small to remove; nothing changed.
    Unchanged(SelectionSnapshot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellSnapshot {
    #[serde(flatten)]
    pub coord: Coord,
    pub color: Color,
    pub active: bool,
    pub selected: bool,
}

/// Per-cell state for a renderer, in lexicographic coordinate order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridSnapshot {
    pub size: usize,
    pub cells: Vec<CellSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub score: u64,
    pub level: u32,
    pub target: u64,
    pub state: SessionState,
    pub active_cells: usize,
    pub has_moves: bool,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    palette: Palette,
    rng: ChaCha8Rng,
    grid: Grid,
    selection: Cluster,
    score: u64,
    level: u32,
    target: u64,
}

impl GameSession {
    /// Fresh random grid per `config`.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let grid = Grid::random(config.size, &config.palette, &mut rng)?;
        info!(size = config.size, colors = config.palette.len(), seed = ?config.seed, "new game");
        Ok(Self::from_parts(grid, config.palette.clone(), rng))
    }

    /// Session over a prepared grid. `reset` draws from `palette` with an entropy-seeded RNG.
    pub fn with_grid(grid: Grid, palette: Palette) -> Self {
        Self::from_parts(grid, palette, ChaCha8Rng::from_entropy())
    }

    fn from_parts(grid: Grid, palette: Palette, rng: ChaCha8Rng) -> Self {
        Self {
            palette,
            rng,
            grid,
            selection: Cluster::new(),
            score: 0,
            level: INITIAL_LEVEL,
            target: INITIAL_TARGET,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selection(&self) -> &Cluster {
        &self.selection
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn state(&self) -> SessionState {
        if self.selection.is_empty() {
            SessionState::Idle
        } else {
            SessionState::Selecting
        }
    }

    pub fn is_removable(&self) -> bool {
        self.selection.len() >= MIN_REMOVAL
    }

    /// Select the cluster under `coord`, or confirm the current selection if `coord` is in it.
    pub fn pick_cell(&mut self, coord: Coord) -> Result<PickOutcome, GameError> {
        if !self.grid.cell_at(coord)?.active {
            warn!(%coord, "pick on inactive cell ignored");
            return Err(SelectionError::InactiveCell.into());
        }

        if self.selection.contains(&coord) {
            if self.is_removable() {
                return self.remove_selection().map(PickOutcome::Removed);
            }
            debug!(%coord, "confirm on single-cell selection ignored");
            return Ok(PickOutcome::Unchanged(self.selection_snapshot()));
        }

        self.selection = find_cluster(&self.grid, coord)?;
        debug!(%coord, size = self.selection.len(), "selection replaced");
        Ok(PickOutcome::Selected(self.selection_snapshot()))
    }

    /// Removes the current selection, scores it, applies gravity and checks for a level-up.
    pub fn remove_selection(&mut self) -> Result<RemovalReport, GameError> {
        let size = self.selection.len();
        if size < MIN_REMOVAL {
            return Err(SelectionError::TooSmall { size }.into());
        }

        let points = points_for(size);
        let mut grid = self.grid.clone();
        for &coord in &self.selection {
            grid.deactivate(coord)?;
        }
        let passes = gravity::settle(&mut grid)?;

        self.grid = grid;
        self.selection.clear();
        self.score = self.score.saturating_add(points);

        let leveled_up = self.score >= self.target;
        if leveled_up {
            self.level += 1;
            self.target = target_for(self.level);
            info!(level = self.level, target = self.target, "level up");
        }
        info!(size, points, score = self.score, passes, "selection removed");

        Ok(RemovalReport {
            points_awarded: points,
            new_score: self.score,
            leveled_up,
            new_level: leveled_up.then_some(self.level),
            new_target: leveled_up.then_some(self.target),
        })
    }

    /// Drops the current selection without removing anything.
    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            debug!(size = self.selection.len(), "selection cleared");
        }
        self.selection.clear();
    }

    /// New random grid of the same size; score, level and target back to their starting values.
    pub fn reset(&mut self) {
        self.grid.reroll(&self.palette, &mut self.rng);
        self.selection.clear();
        self.score = 0;
        self.level = INITIAL_LEVEL;
        self.target = INITIAL_TARGET;
        info!(size = self.grid.size(), "game reset");
    }

    /// True while some active cell has an active same-colour neighbour.
    pub fn has_moves(&self) -> bool {
        self.grid.iter().any(|(coord, cell)| {
            cell.active
                && self.grid.neighbors26(coord).any(|n| {
                    self.grid
                        .get(n)
                        .is_some_and(|other| other.active && other.color == cell.color)
                })
        })
    }

    pub fn selection_snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            cells: self.selection.iter().copied().collect(),
            size: self.selection.len(),
            removable: self.is_removable(),
        }
    }

    pub fn grid_snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            size: self.grid.size(),
            cells: self
                .grid
                .iter()
                .map(|(coord, cell)| CellSnapshot {
                    coord,
                    color: cell.color,
                    active: cell.active,
                    selected: self.selection.contains(&coord),
                })
                .collect(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            score: self.score,
            level: self.level,
            target: self.target,
            state: self.state(),
            active_cells: self.grid.active_count(),
            has_moves: self.has_moves(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    /// 3x3x3: red slab at y = 0, a lone blue cell at (1, 1, 1), green everywhere else.
    fn layered() -> GameSession {
        let grid = Grid::from_fn(3, |c| {
            if c.y == 0 {
                Cell::active(Color::Red)
            } else if c == Coord::new(1, 1, 1) {
                Cell::active(Color::Blue)
            } else {
                Cell::active(Color::Green)
            }
        })
        .unwrap();
        GameSession::with_grid(grid, Palette::default())
    }

    #[test]
    fn test_points_law() {
        assert_eq!(points_for(2), 2);
        assert_eq!(points_for(3), 9);
        assert_eq!(points_for(5), 625);
        assert_eq!(points_for(8), 2_097_152);
        assert_eq!(points_for(16), 16u64.pow(15));
        assert_eq!(points_for(17), u64::MAX);
        assert_eq!(points_for(125), u64::MAX);
    }

    #[test]
    fn test_target_law() {
        assert_eq!(target_for(2), 2500);
        assert_eq!(target_for(7), 7500);
    }

    #[test]
    fn test_pick_selects_cluster() {
        let mut session = layered();
        let outcome = session.pick_cell(Coord::new(0, 0, 0)).unwrap();
        let PickOutcome::Selected(snap) = outcome else {
            panic!("expected selection");
        };
        assert_eq!(snap.size, 9);
        assert!(snap.removable);
        assert!(snap.cells.iter().all(|c| c.y == 0));
        assert_eq!(session.state(), SessionState::Selecting);
    }

    #[test]
    fn test_pick_replaces_selection() {
        let mut session = layered();
        session.pick_cell(Coord::new(0, 0, 0)).unwrap();
        session.pick_cell(Coord::new(0, 2, 0)).unwrap();
        assert_eq!(session.selection().len(), 17);
        assert!(session.selection().iter().all(|c| c.y > 0));
        assert!(!session.selection().contains(&Coord::new(0, 0, 0)));
    }

    #[test]
    fn test_singleton_is_not_removable() {
        let mut session = layered();
        let lone = Coord::new(1, 1, 1);
        let PickOutcome::Selected(snap) = session.pick_cell(lone).unwrap() else {
            panic!("expected selection");
        };
        assert_eq!(snap.size, 1);
        assert!(!snap.removable);

        let before = session.grid().clone();
        assert!(matches!(
            session.pick_cell(lone).unwrap(),
            PickOutcome::Unchanged(_)
        ));
        assert_eq!(
            session.remove_selection(),
            Err(GameError::InvalidSelection(SelectionError::TooSmall {
                size: 1
            }))
        );
        assert_eq!(session.grid(), &before);
        assert_eq!(session.score(), 0);
        assert_eq!(session.state(), SessionState::Selecting);
    }

    #[test]
    fn test_remove_with_empty_selection() {
        let mut session = layered();
        assert_eq!(
            session.remove_selection(),
            Err(GameError::InvalidSelection(SelectionError::TooSmall {
                size: 0
            }))
        );
    }

    #[test]
    fn test_remove_scores_and_applies_gravity() {
        let mut session = layered();
        session.pick_cell(Coord::new(2, 0, 2)).unwrap();
        let report = session.remove_selection().unwrap();
        assert_eq!(report.points_awarded, 9u64.pow(8));
        assert_eq!(report.new_score, 9u64.pow(8));
        assert!(report.leveled_up);
        assert_eq!(report.new_level, Some(2));
        assert_eq!(report.new_target, Some(2500));
        assert_eq!(session.state(), SessionState::Idle);

        // Everything above the red floor fell by one.
        let grid = session.grid();
        assert_eq!(grid.active_count(), 18);
        assert_eq!(grid.get(Coord::new(1, 0, 1)), Some(Cell::active(Color::Blue)));
        assert!(grid.coords().filter(|c| c.y == 2).all(|c| !grid.get(c).unwrap().active));
        assert!(gravity::is_settled(grid));
    }

    #[test]
    fn test_confirm_matches_direct_removal() {
        let mut confirmed = layered();
        let mut direct = layered();
        let start = Coord::new(1, 0, 1);

        confirmed.pick_cell(start).unwrap();
        let PickOutcome::Removed(via_pick) = confirmed.pick_cell(Coord::new(0, 0, 2)).unwrap()
        else {
            panic!("expected removal");
        };

        direct.pick_cell(start).unwrap();
        let via_remove = direct.remove_selection().unwrap();

        assert_eq!(via_pick, via_remove);
        assert_eq!(confirmed.grid(), direct.grid());
        assert_eq!(confirmed.status(), direct.status());
    }

    #[test]
    fn test_pick_inactive_is_noop() {
        let mut session = layered();
        session.pick_cell(Coord::new(0, 0, 0)).unwrap();
        session.remove_selection().unwrap();
        session.pick_cell(Coord::new(0, 0, 0)).unwrap();
        let before = session.selection().clone();

        let err = session.pick_cell(Coord::new(2, 2, 2)).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidSelection(SelectionError::InactiveCell)
        );
        assert!(err.is_noop());
        assert_eq!(session.selection(), &before);
    }

    #[test]
    fn test_pick_out_of_bounds() {
        let mut session = layered();
        let err = session.pick_cell(Coord::new(3, 0, 0)).unwrap_err();
        assert!(matches!(err, GameError::OutOfBounds { size: 3, .. }));
        assert!(!err.is_noop());
    }

    #[test]
    fn test_small_removal_does_not_level() {
        let grid = Grid::from_fn(2, |c| {
            if c.x == 0 && c.z == 0 {
                Cell::active(Color::Orange)
            } else {
                Cell::active(Color::ALL[(c.x + 2 * c.z + c.y) % 4])
            }
        })
        .unwrap();
        let mut session = GameSession::with_grid(grid, Palette::default());
        session.pick_cell(Coord::new(0, 0, 0)).unwrap();
        assert_eq!(session.selection().len(), 2);
        let report = session.remove_selection().unwrap();
        assert_eq!(report.points_awarded, 2);
        assert!(!report.leveled_up);
        assert_eq!(report.new_level, None);
        assert_eq!(session.level(), 1);
        assert_eq!(session.target(), INITIAL_TARGET);
    }

    #[test]
    fn test_clear_and_reset() {
        let config = GameConfig {
            size: 4,
            seed: Some(9),
            ..GameConfig::default()
        };
        let mut session = GameSession::new(&config).unwrap();
        let fresh = session.grid().clone();

        let coord = session
            .grid()
            .coords()
            .find(|&c| find_cluster(session.grid(), c).is_ok_and(|cl| cl.len() >= 2));
        if let Some(coord) = coord {
            session.pick_cell(coord).unwrap();
            session.remove_selection().unwrap();
            assert!(session.score() > 0);
        }
        session.pick_cell(Coord::new(0, 0, 0)).ok();
        session.clear_selection();
        assert_eq!(session.state(), SessionState::Idle);

        session.reset();
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), INITIAL_LEVEL);
        assert_eq!(session.target(), INITIAL_TARGET);
        assert_eq!(session.grid().active_count(), 64);
        assert_eq!(session.grid().size(), 4);
        assert_ne!(session.grid(), &fresh);
    }

    #[test]
    fn test_failed_removal_commits_nothing() {
        let mut session = layered();
        session.pick_cell(Coord::new(0, 0, 0)).unwrap();
        session.selection.insert(Coord::new(0, 3, 0));
        let grid = session.grid().clone();
        let selection = session.selection().clone();

        let err = session.remove_selection().unwrap_err();
        assert!(matches!(err, GameError::OutOfBounds { size: 3, .. }));
        assert_eq!(session.grid(), &grid);
        assert_eq!(session.selection(), &selection);
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), INITIAL_LEVEL);
    }

    #[test]
    fn test_reset_drops_selection() {
        let mut session =
            GameSession::with_grid(Grid::filled(2, Color::Red).unwrap(), Palette::default());
        session.pick_cell(Coord::new(0, 0, 0)).unwrap();
        assert_eq!(session.state(), SessionState::Selecting);

        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.selection_snapshot().size, 0);
        assert!(session.grid_snapshot().cells.iter().all(|c| !c.selected));
        assert_eq!(session.grid().active_count(), 8);
    }

    #[test]
    fn test_seeded_sessions_match() {
        let config = GameConfig {
            seed: Some(1234),
            ..GameConfig::default()
        };
        let a = GameSession::new(&config).unwrap();
        let b = GameSession::new(&config).unwrap();
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn test_zero_size_config_rejected() {
        let config = GameConfig {
            size: 0,
            ..GameConfig::default()
        };
        assert_eq!(GameSession::new(&config).unwrap_err(), ConfigError::ZeroSize);
    }

    #[test]
    fn test_grid_snapshot_marks_selection() {
        let mut session = layered();
        session.pick_cell(Coord::new(1, 1, 1)).unwrap();
        let snap = session.grid_snapshot();
        assert_eq!(snap.size, 3);
        assert_eq!(snap.cells.len(), 27);
        let selected: Vec<_> = snap.cells.iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].coord, Coord::new(1, 1, 1));
        assert_eq!(selected[0].color, Color::Blue);
    }

    #[test]
    fn test_has_moves() {
        let scattered = Grid::from_fn(2, |c| match (c.x, c.y, c.z) {
            (0, 0, 0) => Cell::active(Color::Red),
            (1, 1, 1) => Cell::active(Color::Blue),
            _ => Cell::inactive(Color::Red),
        })
        .unwrap();
        assert!(!GameSession::with_grid(scattered, Palette::default()).has_moves());
        assert!(layered().has_moves());
    }
}
