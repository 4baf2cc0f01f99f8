// Plain-text rendering of a grid for terminals and logs.
//
// One character per cell, one line per row:
//   `#` wall, ` ` passage, `S` start, `E` end, `.` solution path.
// Start and end take precedence over the path; path markers are drawn even
// on walls so a bad path is visible rather than hidden.

use crate::grid::Grid;
use crate::types::{Cell, Position};

pub const WALL: char = '#';
pub const PASSAGE: char = ' ';
pub const START: char = 'S';
pub const END: char = 'E';
pub const PATH: char = '.';

/// Draw `grid` with the endpoints and an optional path overlaid.
pub fn render_ascii(grid: &Grid, start: Position, end: Position, path: &[Position]) -> String {
    let cols = grid.cols();
    let mut canvas: Vec<char> = grid
        .cells()
        .iter()
        .map(|cell| match cell {
            Cell::Wall => WALL,
            Cell::Passage => PASSAGE,
        })
        .collect();

    for &pos in path {
        if let Some(i) = grid.index(pos) {
            canvas[i] = PATH;
        }
    }
    if let Some(i) = grid.index(start) {
        canvas[i] = START;
    }
    if let Some(i) = grid.index(end) {
        canvas[i] = END;
    }

    let mut out = String::with_capacity(grid.rows() * (cols + 1));
    for row in canvas.chunks(cols) {
        out.extend(row);
        out.push('\n');
    }
    out
}
