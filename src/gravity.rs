//! Column gravity: active cells sink into empty slots below them, keeping their vertical order.
//!
//! Content moves with `Grid::swap_contents`; slots never move. A pass scans each column bottom-up
//! and swaps any active cell sitting directly above an inactive one. Repeating passes until one
//! makes no swap leaves every column as a contiguous active run starting at y = 0.

use crate::error::GameError;
use crate::grid::{Coord, Grid};

/// One bottom-up scan of column (x, z). Returns the number of swaps.
fn sink_once(grid: &mut Grid, x: usize, z: usize) -> Result<usize, GameError> {
    let mut swaps = 0;
    for y in 1..grid.size() {
        let above = Coord::new(x, y, z);
        let below = Coord::new(x, y - 1, z);
        if grid.cell_at(above)?.active && !grid.cell_at(below)?.active {
            grid.swap_contents(above, below)?;
            swaps += 1;
        }
    }
    Ok(swaps)
}

/// Compacts column (x, z) to its fixed point. Returns the number of swaps performed.
pub fn compact_column(grid: &mut Grid, x: usize, z: usize) -> Result<usize, GameError> {
    grid.cell_at(Coord::new(x, 0, z))?;
    let mut total = 0;
    loop {
        let swaps = sink_once(grid, x, z)?;
        if swaps == 0 {
            return Ok(total);
        }
        total += swaps;
    }
}

/// One full-grid pass over every column. Returns true if anything moved.
pub fn gravity_pass(grid: &mut Grid) -> Result<bool, GameError> {
    let mut moved = false;
    for x in 0..grid.size() {
        for z in 0..grid.size() {
            moved |= sink_once(grid, x, z)? > 0;
        }
    }
    Ok(moved)
}

/// Repeats `gravity_pass` until nothing moves. Returns the number of passes that moved cells
/// (at most `size - 1`).
pub fn settle(grid: &mut Grid) -> Result<usize, GameError> {
    let mut passes = 0;
    while gravity_pass(grid)? {
        passes += 1;
        tracing::trace!(passes, "gravity pass moved cells");
    }
    debug_assert!(is_settled(grid));
    Ok(passes)
}

/// True when no column has an active cell above an inactive one.
pub fn is_settled(grid: &Grid) -> bool {
    let size = grid.size();
    (0..size).all(|x| {
        (0..size).all(|z| {
            let column = grid.column(x, z);
            let floor = column.iter().take_while(|c| c.active).count();
            column[floor..].iter().all(|c| !c.active)
        })
    })
}
