//! Cluster discovery: flood fill over active, same-colour, 26-adjacent cells.

use crate::error::{GameError, SelectionError};
use crate::grid::{Coord, Grid};
use std::collections::{BTreeSet, HashSet};

/// A maximal connected set of active cells sharing one colour.
pub type Cluster = BTreeSet<Coord>;

/// Every cell reachable from `start` through active neighbours of the start's colour.
///
/// `start` itself must be active. The grid is only read.
pub fn find_cluster(grid: &Grid, start: Coord) -> Result<Cluster, GameError> {
    let origin = grid.cell_at(start)?;
    if !origin.active {
        return Err(SelectionError::InactiveCell.into());
    }
    let color = origin.color;

    let mut visited = HashSet::from([start]);
    let mut stack = vec![start];
    let mut cluster = Cluster::new();

    while let Some(coord) = stack.pop() {
        cluster.insert(coord);
        for n in grid.neighbors26(coord) {
            if visited.contains(&n) {
                continue;
            }
            if let Some(cell) = grid.get(n) {
                if cell.active && cell.color == color {
                    visited.insert(n);
                    stack.push(n);
                }
            }
        }
    }

    tracing::debug!(%start, %color, size = cluster.len(), "cluster found");
    Ok(cluster)
}
