//! The tile map walls are cast against.
//!
//! A [`WorldGrid`] is a rectangle of wall-type codes: `0` is empty floor, any
//! other value is a wall whose code doubles as its texture id. Cells are stored
//! in a flat row-major `Vec<u8>` and every lookup is bounds-checked. Queries
//! outside the grid report [`OUT_OF_BOUNDS_CELL`] so a ray that escapes the map
//! always terminates on an implicit wall.

use thiserror::Error;

/// Code for an empty, passable cell.
pub const EMPTY_CELL: u8 = 0;

/// Code reported for any lookup outside the grid. Treated as solid.
pub const OUT_OF_BOUNDS_CELL: u8 = u8::MAX;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must have at least one row and one column")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{width}x{height} grid needs {expected} cells, got {found}")]
    SizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldGrid {
    cells: Vec<u8>,
    width: usize,
    height: usize,
}

impl WorldGrid {
    /// Creates an all-empty grid.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        Self::from_cells(width, height, vec![EMPTY_CELL; width * height])
    }

    /// Creates a grid from a flat row-major cell vector.
    pub fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        let expected = width * height;
        if cells.len() != expected {
            return Err(GridError::SizeMismatch {
                width,
                height,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Creates a grid from rows, where `rows[y][x]` is the cell at `(x, y)`.
    ///
    /// This is the layout a map literal reads in.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, cols) in rows.iter().enumerate() {
            let cols = cols.as_ref();
            if cols.len() != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found: cols.len(),
                });
            }
            cells.extend_from_slice(cols);
        }
        Self::from_cells(width, height, cells)
    }

    /// Creates a grid from columns, where `columns[x][y]` is the cell at `(x, y)`.
    pub fn from_columns<C: AsRef<[u8]>>(columns: &[C]) -> Result<Self, GridError> {
        let width = columns.len();
        let height = columns.first().map_or(0, |c| c.as_ref().len());
        if height == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = vec![EMPTY_CELL; width * height];
        for (x, col) in columns.iter().enumerate() {
            let col = col.as_ref();
            if col.len() != height {
                return Err(GridError::Ragged {
                    row: x,
                    expected: height,
                    found: col.len(),
                });
            }
            for (y, &cell) in col.iter().enumerate() {
                cells[y * width + x] = cell;
            }
        }
        Self::from_cells(width, height, cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Returns the cell at `(x, y)`, or [`OUT_OF_BOUNDS_CELL`] outside the grid.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> u8 {
        self.index(x, y).map_or(OUT_OF_BOUNDS_CELL, |i| self.cells[i])
    }

    #[inline]
    pub fn is_solid(&self, x: i64, y: i64) -> bool {
        self.get(x, y) != EMPTY_CELL
    }

    /// Sets the cell at `(x, y)`. Returns `false` if the position is outside the grid.
    pub fn set(&mut self, x: i64, y: i64, cell: u8) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// True if every cell on the outer boundary is a wall.
    ///
    /// Only an enclosed grid bounds the DDA by `width + height` steps for a
    /// camera inside it.
    pub fn is_enclosed(&self) -> bool {
        let (w, h) = (self.width as i64, self.height as i64);
        let horizontal = (0..w).all(|x| self.is_solid(x, 0) && self.is_solid(x, h - 1));
        let vertical = (0..h).all(|y| self.is_solid(0, y) && self.is_solid(w - 1, y));
        horizontal && vertical
    }

    /// Overwrites every empty boundary cell with `wall`.
    pub fn enclose(&mut self, wall: u8) {
        let (w, h) = (self.width as i64, self.height as i64);
        for x in 0..w {
            for y in [0, h - 1] {
                if !self.is_solid(x, y) {
                    self.set(x, y, wall);
                }
            }
        }
        for y in 0..h {
            for x in [0, w - 1] {
                if !self.is_solid(x, y) {
                    self.set(x, y, wall);
                }
            }
        }
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}
