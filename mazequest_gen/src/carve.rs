// Maze carving by randomized depth-first backtracking.
//
// Starts from a fully walled grid, opens one random interior cell, and walks
// the every-other-cell lattice with an explicit stack: at each step it leaps
// two cells to a random still-walled interior neighbor, opening both the
// neighbor and the cell in between, or backtracks when no such neighbor
// exists. The result is a spanning tree of passages over every lattice cell
// reachable from the start.
//
// Only interior cells (0 < row < rows-1, 0 < col < cols-1) are ever leap
// targets, so on grids of at least 3x3 the border stays solid. On 1- and
// 2-wide grids the start coordinate falls back to 1, which may be a border
// cell or lie outside the array (in which case `Grid::set` ignores it).
//
// See also: `bias.rs` which mutates the carved grid, `pipeline.rs` which
// calls `carve()`.
//
// **Critical constraint: determinism.** All randomness comes from the
// `MazeRng` passed by the caller: one inclusive-range draw per start
// coordinate, then one `choose` per carving step.

use crate::error::Result;
use crate::grid::Grid;
use crate::prng::MazeRng;
use crate::types::{Cell, Position};
use smallvec::SmallVec;

/// Carve a new `rows x cols` maze. Fails only on a zero dimension.
pub fn carve(rows: usize, cols: usize, rng: &mut MazeRng) -> Result<Grid> {
    let mut grid = Grid::new(rows, cols)?;

    let start = Position::new(random_start_coord(rows, rng), random_start_coord(cols, rng));
    grid.set(start, Cell::Passage);

    let mut stack = vec![start];
    let mut steps = 0usize;

    while let Some(&current) = stack.last() {
        let candidates = unvisited_leap_neighbors(&grid, current);
        match rng.choose(&candidates) {
            Some(&next) => {
                grid.set(current.midpoint(next), Cell::Passage);
                grid.set(next, Cell::Passage);
                stack.push(next);
                steps += 1;
            }
            None => {
                stack.pop();
            }
        }
    }

    log::debug!(
        "carved {rows}x{cols} maze from {start}: {steps} leaps, {} passages",
        grid.passage_count()
    );
    Ok(grid)
}

/// Uniform in `[1, len-2]`, or 1 when the dimension has no interior.
fn random_start_coord(len: usize, rng: &mut MazeRng) -> usize {
    if len > 2 {
        rng.range_usize_inclusive(1, len - 2)
    } else {
        1
    }
}

/// Interior cells two steps away that are still walls, in up, down, left,
/// right order.
fn unvisited_leap_neighbors(grid: &Grid, from: Position) -> SmallVec<[Position; 4]> {
    from.orthogonal(2)
        .filter(|&n| grid.is_interior(n) && grid.get(n).is_wall())
        .collect()
}
