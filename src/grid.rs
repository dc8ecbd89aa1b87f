use std::fmt;

use rand::Rng;

use crate::config::{CELL_SIZE_PX, SCREEN_HEIGHT_PX, SCREEN_WIDTH_PX};

/// A grid-aligned pixel position. Both coordinates are multiples of the cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub x: u16,
    pub y: u16,
}

impl Cell {
    pub fn new(x: u16, y: u16) -> Self {
        Cell { x, y }
    }

    /// Moves the cell by a pixel delta. Stepping past zero wraps around to a huge
    /// coordinate, which `Grid::contains` then rejects.
    pub fn offset(self, dx: i16, dy: i16) -> Self {
        Cell {
            x: self.x.wrapping_add_signed(dx),
            y: self.y.wrapping_add_signed(dy),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The playing field: `[0, width) x [0, height)` in pixels, split into square cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
    cell_size: u16,
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(SCREEN_WIDTH_PX, SCREEN_HEIGHT_PX, CELL_SIZE_PX)
    }
}

impl Grid {
    pub fn new(width: u16, height: u16, cell_size: u16) -> Self {
        Grid { width, height, cell_size }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cell_size(&self) -> u16 {
        self.cell_size
    }

    pub fn columns(&self) -> u16 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> u16 {
        self.height / self.cell_size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// The cell holding the pixel centre of the field, snapped down to the grid.
    pub fn center(&self) -> Cell {
        let snap = |v: u16| v / self.cell_size * self.cell_size;
        Cell::new(snap(self.width / 2), snap(self.height / 2))
    }

    /// Row-major index of a cell among `columns() * rows()`, or `None` if it is off the grid.
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let col = (cell.x / self.cell_size) as usize;
        let row = (cell.y / self.cell_size) as usize;
        Some(row * self.columns() as usize + col)
    }

    /// Picks a random grid-aligned cell. The snake's body is not avoided, so food may
    /// land on top of it.
    pub fn place_food<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        let x = random_step(rng, 0, self.width - self.cell_size, self.cell_size);
        let y = random_step(rng, 0, self.height - self.cell_size, self.cell_size);
        Cell::new(x, y)
    }
}

/// Returns a value drawn uniformly from `min, min + step, min + 2 * step, ...` up to `max`.
///
/// The draw is uniform over the number of steps, not over the raw range. When
/// `max - min` is not a multiple of `step` the trailing partial step is left out.
/// A zero `step` or an empty range (`max < min`) only has `min` to offer.
pub fn random_step<R: Rng + ?Sized>(rng: &mut R, min: u16, max: u16, step: u16) -> u16 {
    if step == 0 || max < min {
        return min;
    }

    let choices = (max - min) as u32 / step as u32 + 1;
    let index = rng.gen_range(0..choices);

    (min as u32 + index * step as u32) as u16
}
