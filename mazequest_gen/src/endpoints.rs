// Start and end cell selection.
//
// The start is the first passage found scanning a small window in the
// top-left corner in row-major order; the end is the first passage found
// scanning a mirrored window in the bottom-right corner, rows and columns
// both descending. Window size is `min(dim / 3, 5)` along each axis (the
// divisor and cap come from `EndpointConfig`).
//
// Each scan falls back to a fixed cell when its window has no passage,
// without checking whether that cell is open. The two scans are
// independent: on tiny grids start and end may coincide.
//
// Pure functions of the grid. No randomness.

use crate::config::EndpointConfig;
use crate::grid::Grid;
use crate::types::Position;

/// First passage in the top-left window, else `(1, 1)` clamped into the grid.
///
/// Rows scanned: `1 .. min(rows / divisor, cap)` (exclusive), same for
/// columns.
pub fn select_start(grid: &Grid, config: &EndpointConfig) -> Position {
    let row_end = config.window(grid.rows());
    let col_end = config.window(grid.cols());
    for row in 1..row_end {
        for col in 1..col_end {
            let pos = Position::new(row, col);
            if grid.is_passage(pos) {
                return pos;
            }
        }
    }
    Position::new(1.min(grid.rows() - 1), 1.min(grid.cols() - 1))
}

/// First passage in the bottom-right window, else `(rows - 2, cols - 2)`
/// clamped into the grid.
///
/// Rows scanned: `rows - 2` down to `max(rows - rows / divisor, rows - cap)`
/// (exclusive), same for columns. The start position does not influence
/// the scan.
pub fn select_end(grid: &Grid, _start: Position, config: &EndpointConfig) -> Position {
    let rows = grid.rows();
    let cols = grid.cols();
    for row in descending_window(rows, config) {
        for col in descending_window(cols, config) {
            let pos = Position::new(row, col);
            if grid.is_passage(pos) {
                return pos;
            }
        }
    }
    Position::new(rows.saturating_sub(2), cols.saturating_sub(2))
}

/// `len - 2` down to (but excluding) `max(len - len / divisor, len - cap)`.
///
/// The stop bound is at most `len`, and a cap larger than `len` saturates to
/// zero, so the window is empty on grids narrower than 3 and every yielded
/// value is at least 1.
fn descending_window(
    len: usize,
    config: &EndpointConfig,
) -> impl Iterator<Item = usize> + use<> {
    let from_fraction = len - len / config.divisor();
    let from_cap = len.saturating_sub(config.window_cap);
    let stop = from_fraction.max(from_cap);
    (stop + 1..=len.saturating_sub(2)).rev()
}
