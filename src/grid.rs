//! The cubic lattice: fixed slots addressed by (x, y, z), each holding a colour and an active flag.
//!
//! y is the vertical axis; y = 0 is the floor that gravity pulls towards.

use crate::error::{ConfigError, GameError};
use crate::palette::{Color, Palette};
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Default edge length.
pub const DEFAULT_SIZE: usize = 5;

/// Largest accepted edge length (262 144 cells).
pub const MAX_SIZE: usize = 64;

/// Slot identity. Ordered lexicographically by (x, y, z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Coordinate shifted by (dx, dy, dz), or None if any axis leaves `[0, size)`.
    fn offset(self, (dx, dy, dz): (isize, isize, isize), size: usize) -> Option<Self> {
        let shift = |v: usize, d: isize| v.checked_add_signed(d).filter(|&n| n < size);
        Some(Self::new(
            shift(self.x, dx)?,
            shift(self.y, dy)?,
            shift(self.z, dz)?,
        ))
    }
}

impl From<(usize, usize, usize)> for Coord {
    fn from((x, y, z): (usize, usize, usize)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Slot content. Only this moves during gravity; the slot's coordinate never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub color: Color,
    pub active: bool,
}

impl Cell {
    pub const fn active(color: Color) -> Self {
        Self {
            color,
            active: true,
        }
    }

    pub const fn inactive(color: Color) -> Self {
        Self {
            color,
            active: false,
        }
    }
}

/// Offsets to the 26 neighbours, lexicographic by (dx, dy, dz).
const NEIGHBOURS_26: [(isize, isize, isize); 26] = {
    let mut out = [(0, 0, 0); 26];
    let mut i = 0;
    let mut dx = -1;
    while dx <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dz = -1;
            while dz <= 1 {
                if dx != 0 || dy != 0 || dz != 0 {
                    out[i] = (dx, dy, dz);
                    i += 1;
                }
                dz += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    out
};

/// size x size x size cells, stored flat with index ((x * size) + y) * size + z.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Every cell active with a colour drawn independently and uniformly from `palette`.
    pub fn random<R: Rng + ?Sized>(
        size: usize,
        palette: &Palette,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        Self::from_fn(size, |_| Cell::active(palette.sample(rng)))
    }

    /// Builds each cell from its coordinate, visiting coordinates in lexicographic order.
    pub fn from_fn(size: usize, mut f: impl FnMut(Coord) -> Cell) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if size > MAX_SIZE {
            return Err(ConfigError::TooLarge {
                size,
                max: MAX_SIZE,
            });
        }
        let cells = coords_of(size).map(&mut f).collect();
        Ok(Self { size, cells })
    }

    /// Redraws every cell as active with a fresh colour, keeping the size.
    pub fn reroll<R: Rng + ?Sized>(&mut self, palette: &Palette, rng: &mut R) {
        for cell in &mut self.cells {
            *cell = Cell::active(palette.sample(rng));
        }
    }

    /// Every cell active and the same colour.
    pub fn filled(size: usize, color: Color) -> Result<Self, ConfigError> {
        Self::from_fn(size, |_| Cell::active(color))
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.size && coord.y < self.size && coord.z < self.size
    }

    #[inline]
    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then(|| (coord.x * self.size + coord.y) * self.size + coord.z)
    }

    fn checked_index(&self, coord: Coord) -> Result<usize, GameError> {
        self.index(coord).ok_or(GameError::OutOfBounds {
            coord,
            size: self.size,
        })
    }

    #[inline]
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|i| self.cells[i])
    }

    pub fn cell_at(&self, coord: Coord) -> Result<&Cell, GameError> {
        let i = self.checked_index(coord)?;
        Ok(&self.cells[i])
    }

    /// In-bounds neighbours differing by at most 1 on every axis, lexicographic by offset.
    /// An out-of-bounds `coord` has no neighbours.
    pub fn neighbors26(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        let inside = self.contains(coord);
        NEIGHBOURS_26
            .into_iter()
            .filter(move |_| inside)
            .filter_map(move |d| coord.offset(d, self.size))
    }

    /// Marks the slot empty. Deactivating an inactive cell is a no-op.
    pub fn deactivate(&mut self, coord: Coord) -> Result<(), GameError> {
        let i = self.checked_index(coord)?;
        self.cells[i].active = false;
        Ok(())
    }

    /// Exchanges (colour, active) between two slots.
    pub fn swap_contents(&mut self, a: Coord, b: Coord) -> Result<(), GameError> {
        let ia = self.checked_index(a)?;
        let ib = self.checked_index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// All coordinates in lexicographic order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        coords_of(self.size)
    }

    /// (coordinate, cell) pairs in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.coords().zip(self.cells.iter().copied())
    }

    /// Cells of column (x, z) from the floor up.
    pub fn column(&self, x: usize, z: usize) -> Vec<Cell> {
        (0..self.size)
            .filter_map(|y| self.get(Coord::new(x, y, z)))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|c| c.active).count()
    }
}

fn coords_of(size: usize) -> impl Iterator<Item = Coord> {
    (0..size).flat_map(move |x| {
        (0..size).flat_map(move |y| (0..size).map(move |z| Coord::new(x, y, z)))
    })
}
