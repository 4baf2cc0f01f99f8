// Core value types shared across the crate.
//
// `Cell` is the binary state of one grid square; `Position` addresses a
// square by (row, col). Both are `Copy` and cheap to pass around.
//
// The wire encoding follows the conventional maze export: wall = 1,
// passage = 0, and a position is a two-element `[row, col]` array.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// State of a single grid square. There is no third state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Wall,
    Passage,
}

impl Cell {
    /// Export encoding: 1 for wall, 0 for passage.
    pub const fn as_bit(self) -> u8 {
        match self {
            Cell::Wall => 1,
            Cell::Passage => 0,
        }
    }

    /// Inverse of `as_bit`. Any value other than 0 or 1 is rejected.
    pub const fn from_bit(bit: u8) -> Option<Cell> {
        match bit {
            1 => Some(Cell::Wall),
            0 => Some(Cell::Passage),
            _ => None,
        }
    }

    pub const fn is_passage(self) -> bool {
        matches!(self, Cell::Passage)
    }

    pub const fn is_wall(self) -> bool {
        matches!(self, Cell::Wall)
    }

    /// The opposite state.
    pub const fn flipped(self) -> Cell {
        match self {
            Cell::Wall => Cell::Passage,
            Cell::Passage => Cell::Wall,
        }
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A (row, col) coordinate, 0-based, row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two positions.
    pub fn manhattan_distance(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// The four orthogonal neighbors at distance `step`, in up, down, left,
    /// right order. Neighbors that would go below zero are omitted; upper
    /// bounds are the caller's concern.
    pub fn orthogonal(self, step: usize) -> impl Iterator<Item = Position> {
        let up = self.row.checked_sub(step).map(|r| Position::new(r, self.col));
        let down = Some(Position::new(self.row + step, self.col));
        let left = self.col.checked_sub(step).map(|c| Position::new(self.row, c));
        let right = Some(Position::new(self.row, self.col + step));
        [up, down, left, right].into_iter().flatten()
    }

    /// Midpoint between two positions on the same row or column.
    pub fn midpoint(self, other: Self) -> Position {
        Position::new((self.row + other.row) / 2, (self.col + other.col) / 2)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// Serialized as `[row, col]` to match the maze export format.
impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.row, self.col].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [row, col] = <[usize; 2]>::deserialize(deserializer)?;
        Ok(Position::new(row, col))
    }
}
