// Error type shared by every fallible operation in the crate.
//
// Generation itself has almost no failure modes: the only rejected inputs
// are degenerate or oversized dimensions. The remaining variants cover the
// edges where external data enters (grids rebuilt from rows or flat
// buffers, solver endpoints, config files).

use std::fmt;

/// Everything that can go wrong in `mazequest_gen`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MazeError {
    /// A grid needs at least one row and one column.
    InvalidDimensions { rows: usize, cols: usize },
    /// `rows * cols` exceeds the configured cell budget.
    TooLarge {
        rows: usize,
        cols: usize,
        max_cells: u64,
    },
    /// A coordinate handed to the solver lies outside the grid.
    PositionOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    /// Externally supplied grid data is ragged, empty, or not 0/1.
    MalformedGrid(String),
    /// A configuration file or string could not be read or parsed.
    Config(String),
    /// A solver name that does not match any `Algorithm`.
    UnknownAlgorithm(String),
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::InvalidDimensions { rows, cols } => {
                write!(f, "invalid maze dimensions {rows}x{cols}: both must be at least 1")
            }
            MazeError::TooLarge {
                rows,
                cols,
                max_cells,
            } => write!(
                f,
                "maze of {rows}x{cols} exceeds the limit of {max_cells} cells"
            ),
            MazeError::PositionOutOfBounds {
                row,
                col,
                rows,
                cols,
            } => write!(f, "position ({row}, {col}) is outside a {rows}x{cols} grid"),
            MazeError::MalformedGrid(msg) => write!(f, "malformed grid: {msg}"),
            MazeError::Config(msg) => write!(f, "configuration error: {msg}"),
            MazeError::UnknownAlgorithm(name) => write!(
                f,
                "unknown solver '{name}' (expected bfs, dfs, dijkstra or astar)"
            ),
        }
    }
}

impl std::error::Error for MazeError {}

pub type Result<T> = std::result::Result<T, MazeError>;
