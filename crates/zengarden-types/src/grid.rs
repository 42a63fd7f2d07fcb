//! Plot coordinates on the fixed 3x3 garden grid.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Number of rows in the garden grid.
pub const GRID_ROWS: u8 = 3;

/// Number of columns in the garden grid.
pub const GRID_COLS: u8 = 3;

/// Total number of plots (row-major).
pub const CELL_COUNT: usize = 9;

/// A validated `(row, col)` address inside the grid.
///
/// Constructors return `None` for out-of-bounds coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CellPos {
    /// Zero-based row.
    row: u8,
    /// Zero-based column.
    col: u8,
}

impl CellPos {
    /// Create a position, returning `None` when outside the grid.
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < GRID_ROWS && col < GRID_COLS {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Position for a row-major index in `0..CELL_COUNT`.
    pub fn from_index(index: usize) -> Option<Self> {
        let cols = usize::from(GRID_COLS);
        let row = u8::try_from(index.checked_div(cols)?).ok()?;
        let col = u8::try_from(index.checked_rem(cols)?).ok()?;
        Self::new(row, col)
    }

    /// Row-major index of this position.
    pub fn index(self) -> usize {
        usize::from(self.row)
            .saturating_mul(usize::from(GRID_COLS))
            .saturating_add(usize::from(self.col))
    }

    /// Zero-based row.
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Zero-based column.
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Every grid position in row-major order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..CELL_COUNT).filter_map(Self::from_index)
    }
}

impl core::fmt::Display for CellPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}
