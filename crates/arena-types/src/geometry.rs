//! Board geometry: cells and unit directions.
//!
//! The arena board is a square of `board_size × board_size` cells with the
//! origin in the top-left corner. `x` grows to the right and `y` grows
//! downwards, so a delta of `(0, 1)` is a step down.

use serde::{Deserialize, Serialize};

/// A single board cell.
///
/// Serialized as a two-element JSON array `[x, y]`, which is how the arena
/// encodes bot positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct Cell {
    /// Column, counted from the left edge.
    pub x: i64,
    /// Row, counted from the top edge.
    pub y: i64,
}

impl Cell {
    /// Create a cell from its coordinates.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Offset `(dx, dy)` that moves `self` onto `to`.
    ///
    /// Saturates instead of overflowing for absurd coordinates; any
    /// saturated delta is far from a unit step anyway.
    pub const fn delta(self, to: Self) -> (i64, i64) {
        (to.x.saturating_sub(self.x), to.y.saturating_sub(self.y))
    }

    /// Whether the cell lies on a board of the given size.
    pub fn within(self, board_size: u32) -> bool {
        let size = i64::from(board_size);
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }
}

impl From<(i64, i64)> for Cell {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

impl From<Cell> for (i64, i64) {
    fn from(cell: Cell) -> Self {
        (cell.x, cell.y)
    }
}

impl core::fmt::Display for Cell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four single-cell steps a bot can take per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl Direction {
    /// Map a cell delta onto a direction.
    ///
    /// Only the four unit deltas have a direction. Diagonals, jumps of more
    /// than one cell and the zero delta return `None`.
    pub const fn from_delta(dx: i64, dy: i64) -> Option<Self> {
        match (dx, dy) {
            (1, 0) => Some(Self::Right),
            (-1, 0) => Some(Self::Left),
            (0, 1) => Some(Self::Down),
            (0, -1) => Some(Self::Up),
            _ => None,
        }
    }

    /// Direction of a single step from `from` to `to`, if it is one.
    pub const fn between(from: Cell, to: Cell) -> Option<Self> {
        let (dx, dy) = from.delta(to);
        Self::from_delta(dx, dy)
    }

    /// Arrow glyph pointing in this direction.
    pub const fn glyph(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Down => '↓',
            Self::Left => '←',
            Self::Right => '→',
        }
    }
}
