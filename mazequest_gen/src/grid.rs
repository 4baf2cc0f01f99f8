// Dense 2D maze grid.
//
// Stored as a flat `Vec<Cell>` indexed by `row * cols + col`, giving O(1)
// reads and writes. Out-of-bounds reads return `Wall`; out-of-bounds writes
// are no-ops. The carver relies on that for 1-wide and 2-wide grids, where
// its fixed fallback coordinate may fall outside the array.
//
// The outer ring (row 0, row rows-1, col 0, col cols-1) is the border.
// Everything else is the interior, which is the only region the carver's
// lattice and the bias passes ever touch on grids of at least 3x3.
//
// Serialized as a list of rows of 0/1 integers (wall = 1), the export format
// consumed by front ends. Deserialization validates shape and values.
//
// See also: `carve.rs` which builds grids, `bias.rs` which mutates them,
// `endpoints.rs` and `solve.rs` which read them.

use crate::error::{MazeError, Result};
use crate::types::{Cell, Position};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rectangular wall/passage grid, `rows x cols`, both at least 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Flat storage: index = row * cols + col.
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Create a grid with every cell set to `Wall`.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, Cell::Wall)
    }

    /// Create a grid with every cell set to `cell`.
    ///
    /// Fails with `TooLarge` if `rows * cols` overflows or the buffer cannot
    /// be allocated.
    pub fn filled(rows: usize, cols: usize, cell: Cell) -> Result<Self> {
        let len = cell_count(rows, cols)?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| too_large(rows, cols))?;
        cells.resize(len, cell);
        Ok(Self { cells, rows, cols })
    }

    /// Rebuild a grid from rows of 0/1 values (1 = wall).
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(MazeError::MalformedGrid("grid has no cells".into()));
        }
        let mut cells = Vec::with_capacity(height * width);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MazeError::MalformedGrid(format!(
                    "row {r} has {} cells, expected {width}",
                    row.len()
                )));
            }
            for (c, &bit) in row.iter().enumerate() {
                cells.push(Cell::from_bit(bit).ok_or_else(|| {
                    MazeError::MalformedGrid(format!("cell ({r}, {c}) has value {bit}"))
                })?);
            }
        }
        Ok(Self {
            cells,
            rows: height,
            cols: width,
        })
    }

    /// Rebuild a grid from a row-major flat buffer of 0/1 values.
    pub fn from_flat(bits: &[u8], rows: usize, cols: usize) -> Result<Self> {
        let len = cell_count(rows, cols)?;
        if bits.len() != len {
            return Err(MazeError::MalformedGrid(format!(
                "buffer holds {} cells, expected {rows}x{cols} = {len}",
                bits.len()
            )));
        }
        let cells = bits
            .iter()
            .enumerate()
            .map(|(i, &bit)| {
                Cell::from_bit(bit).ok_or_else(|| {
                    MazeError::MalformedGrid(format!("cell index {i} has value {bit}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { cells, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// `true` for cells strictly inside the border ring.
    pub fn is_interior(&self, pos: Position) -> bool {
        pos.row > 0 && pos.col > 0 && pos.row + 1 < self.rows && pos.col + 1 < self.cols
    }

    /// Flat index of a position. `None` if out of bounds.
    pub fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos).then(|| pos.row * self.cols + pos.col)
    }

    /// Inverse of `index`.
    pub fn position_of(&self, index: usize) -> Option<Position> {
        (index < self.cells.len()).then(|| Position::new(index / self.cols, index % self.cols))
    }

    /// Read a cell. Out-of-bounds positions read as `Wall`.
    pub fn get(&self, pos: Position) -> Cell {
        self.index(pos).map_or(Cell::Wall, |i| self.cells[i])
    }

    /// Write a cell. No-op for out-of-bounds positions.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    pub fn is_passage(&self, pos: Position) -> bool {
        self.get(pos).is_passage()
    }

    /// Number of the four orthogonal neighbors that are passages.
    pub fn count_adjacent_passages(&self, pos: Position) -> usize {
        pos.orthogonal(1).filter(|&n| self.is_passage(n)).count()
    }

    /// In-bounds orthogonal neighbors that are passages, in up, down, left,
    /// right order.
    pub fn passage_neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.orthogonal(1).filter(move |&n| self.is_passage(n))
    }

    /// Interior positions in row-major order. Empty when either dimension
    /// is below 3.
    pub fn interior_positions(&self) -> impl Iterator<Item = Position> + use<> {
        let rows = self.rows;
        let cols = self.cols;
        (1..rows.saturating_sub(1))
            .flat_map(move |r| (1..cols.saturating_sub(1)).map(move |c| Position::new(r, c)))
    }

    /// `true` when the grid has at least one interior cell.
    pub fn has_interior(&self) -> bool {
        self.rows >= 3 && self.cols >= 3
    }

    pub fn passage_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_passage()).count()
    }

    pub fn wall_count(&self) -> usize {
        self.cells.len() - self.passage_count()
    }

    /// `true` if every cell on the outer ring is a wall.
    pub fn border_is_solid(&self) -> bool {
        (0..self.rows).all(|r| {
            (0..self.cols).all(|c| {
                let pos = Position::new(r, c);
                self.is_interior(pos) || self.get(pos).is_wall()
            })
        })
    }

    /// Export as rows of 0/1 values (1 = wall).
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.as_bit()).collect())
            .collect()
    }
}

/// `rows * cols`, rejecting zero dimensions and products that overflow.
fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(MazeError::InvalidDimensions { rows, cols });
    }
    rows.checked_mul(cols).ok_or_else(|| too_large(rows, cols))
}

fn too_large(rows: usize, cols: usize) -> MazeError {
    MazeError::TooLarge {
        rows,
        cols,
        max_cells: usize::MAX as u64,
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let rows = Vec::<Vec<u8>>::deserialize(deserializer)?;
        Grid::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}
