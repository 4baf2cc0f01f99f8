// Maze solving over passage cells.
//
// Four searches share one grid model: moves are orthogonal steps between
// passage cells, each costing 1, explored in up, down, left, right order.
//
// - `Bfs`: breadth-first; shortest path.
// - `Dfs`: depth-first with an explicit stack; some path, usually long.
// - `Dijkstra`: uniform-cost search on a `BinaryHeap`; shortest path.
// - `AStar`: Dijkstra plus a Manhattan-distance heuristic (admissible on a
//   unit-cost 4-connected grid); shortest path, fewer expansions.
//
// Per-cell bookkeeping (visited flags, scores, came-from links) lives in
// `Vec`s indexed by the grid's flat index, so results are deterministic and
// lookups are O(1).
//
// `solve_flat()` is the same contract over a flattened 0/1 buffer with
// start and end given as row-major indices, for callers that exchange mazes
// in that shape.
//
// See also: `grid.rs` for the neighbor queries, `render.rs` for drawing a
// solution.

use crate::error::{MazeError, Result};
use crate::grid::Grid;
use crate::types::Position;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Search strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bfs,
    Dfs,
    Dijkstra,
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Dijkstra,
        Algorithm::AStar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar => "astar",
        }
    }

    /// Whether this algorithm always returns a shortest path.
    pub fn is_optimal(self) -> bool {
        !matches!(self, Algorithm::Dfs)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "astar" | "a*" => Ok(Algorithm::AStar),
            _ => Err(MazeError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// A path found by `solve()`, with search statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResult {
    pub algorithm: Algorithm,
    /// Cells from start to goal, both inclusive.
    pub path: Vec<Position>,
    /// Cells the search expanded before reaching the goal.
    pub nodes_visited: usize,
    /// Total passage cells in the grid.
    pub open_cells: usize,
}

impl SolveResult {
    /// Number of moves, one less than the number of cells on the path.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Fraction of passage cells the search had to expand.
    pub fn efficiency(&self) -> f64 {
        if self.open_cells == 0 {
            0.0
        } else {
            self.nodes_visited as f64 / self.open_cells as f64
        }
    }
}

/// Find a path from `start` to `goal`.
///
/// Errors if either position is outside the grid. Returns `Ok(None)` if
/// either endpoint is a wall or the two are not connected.
pub fn solve(
    grid: &Grid,
    start: Position,
    goal: Position,
    algorithm: Algorithm,
) -> Result<Option<SolveResult>> {
    for pos in [start, goal] {
        if !grid.in_bounds(pos) {
            return Err(MazeError::PositionOutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: grid.rows(),
                cols: grid.cols(),
            });
        }
    }
    if !grid.is_passage(start) || !grid.is_passage(goal) {
        return Ok(None);
    }

    let mut search = Search::new(grid);
    let found = match algorithm {
        Algorithm::Bfs => search.bfs(start, goal),
        Algorithm::Dfs => search.dfs(start, goal),
        Algorithm::Dijkstra => search.best_first(start, goal, |_| 0),
        Algorithm::AStar => search.best_first(start, goal, |p| p.manhattan_distance(goal)),
    };
    if !found {
        log::debug!("{algorithm}: no path from {start} to {goal}");
        return Ok(None);
    }

    let path = search.reconstruct(start, goal);
    log::debug!(
        "{algorithm}: {} steps from {start} to {goal}, {} cells expanded",
        path.len() - 1,
        search.expanded
    );
    Ok(Some(SolveResult {
        algorithm,
        path,
        nodes_visited: search.expanded,
        open_cells: grid.passage_count(),
    }))
}

/// Solve a row-major 0/1 buffer (1 = wall) between two flat indices.
///
/// Returns the path as flat indices, start and end inclusive.
pub fn solve_flat(
    cells: &[u8],
    rows: usize,
    cols: usize,
    start_index: usize,
    end_index: usize,
    algorithm: Algorithm,
) -> Result<Option<Vec<usize>>> {
    let grid = Grid::from_flat(cells, rows, cols)?;
    let locate = |index: usize| {
        grid.position_of(index)
            .ok_or(MazeError::PositionOutOfBounds {
                row: index / cols,
                col: index % cols,
                rows,
                cols,
            })
    };
    let start = locate(start_index)?;
    let goal = locate(end_index)?;

    let solved = solve(&grid, start, goal, algorithm)?;
    Ok(solved.map(|result| {
        result
            .path
            .iter()
            .filter_map(|&pos| grid.index(pos))
            .collect()
    }))
}

/// Shared per-search state, indexed by flat cell index.
struct Search<'a> {
    grid: &'a Grid,
    /// Predecessor of each reached cell on the search tree.
    came_from: Vec<Option<usize>>,
    closed: Vec<bool>,
    expanded: usize,
}

impl<'a> Search<'a> {
    fn new(grid: &'a Grid) -> Self {
        let n = grid.rows() * grid.cols();
        Self {
            grid,
            came_from: vec![None; n],
            closed: vec![false; n],
            expanded: 0,
        }
    }

    fn idx(&self, pos: Position) -> usize {
        pos.row * self.grid.cols() + pos.col
    }

    fn bfs(&mut self, start: Position, goal: Position) -> bool {
        let mut queue = VecDeque::from([start]);
        let si = self.idx(start);
        self.closed[si] = true;

        while let Some(current) = queue.pop_front() {
            self.expanded += 1;
            if current == goal {
                return true;
            }
            let ci = self.idx(current);
            for next in self.grid.passage_neighbors(current) {
                let ni = self.idx(next);
                if !self.closed[ni] {
                    self.closed[ni] = true;
                    self.came_from[ni] = Some(ci);
                    queue.push_back(next);
                }
            }
        }
        false
    }

    fn dfs(&mut self, start: Position, goal: Position) -> bool {
        // Entries carry their parent so the link is recorded when the cell
        // is actually expanded, not when it was first pushed.
        let mut stack: Vec<(Position, Option<usize>)> = vec![(start, None)];

        while let Some((current, parent)) = stack.pop() {
            let ci = self.idx(current);
            if self.closed[ci] {
                continue;
            }
            self.closed[ci] = true;
            self.came_from[ci] = parent;
            self.expanded += 1;
            if current == goal {
                return true;
            }
            // Push in reverse so "up" is explored first.
            let neighbors: Vec<Position> = self.grid.passage_neighbors(current).collect();
            for &next in neighbors.iter().rev() {
                if !self.closed[self.idx(next)] {
                    stack.push((next, Some(ci)));
                }
            }
        }
        false
    }

    /// Dijkstra when `heuristic` is zero, A* otherwise.
    fn best_first<H: Fn(Position) -> usize>(
        &mut self,
        start: Position,
        goal: Position,
        heuristic: H,
    ) -> bool {
        let mut g_score = vec![usize::MAX; self.closed.len()];
        let si = self.idx(start);
        g_score[si] = 0;

        let mut open = BinaryHeap::new();
        open.push(OpenEntry {
            f_score: heuristic(start),
            node: si,
        });

        while let Some(OpenEntry { node: ci, .. }) = open.pop() {
            if self.closed[ci] {
                continue;
            }
            self.closed[ci] = true;
            self.expanded += 1;

            let current = Position::new(ci / self.grid.cols(), ci % self.grid.cols());
            if current == goal {
                return true;
            }

            let tentative_g = g_score[ci] + 1;
            for next in self.grid.passage_neighbors(current) {
                let ni = self.idx(next);
                if self.closed[ni] || tentative_g >= g_score[ni] {
                    continue;
                }
                g_score[ni] = tentative_g;
                self.came_from[ni] = Some(ci);
                open.push(OpenEntry {
                    f_score: tentative_g + heuristic(next),
                    node: ni,
                });
            }
        }
        false
    }

    fn reconstruct(&self, start: Position, goal: Position) -> Vec<Position> {
        let cols = self.grid.cols();
        let start_idx = self.idx(start);
        let mut path = vec![goal];
        let mut current = self.idx(goal);
        while current != start_idx {
            match self.came_from[current] {
                Some(prev) => {
                    current = prev;
                    path.push(Position::new(prev / cols, prev % cols));
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

/// Open-set entry for the heap searches (min-heap via reversed ordering).
#[derive(PartialEq, Eq)]
struct OpenEntry {
    f_score: usize,
    node: usize,
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest f_score pops first; ties go to the lower flat index.
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.node.cmp(&self.node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carve::carve;
    use crate::prng::MazeRng;

    fn corridor_grid() -> Grid {
        Grid::from_rows(&[
            vec![1, 1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 1, 1, 1, 0, 1],
            vec![1, 0, 0, 0, 1, 0, 1],
            vec![1, 1, 1, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1, 1],
        ])
        .unwrap()
    }

    fn assert_valid_path(grid: &Grid, path: &[Position], start: Position, goal: Position) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for pos in path {
            assert!(grid.is_passage(*pos), "path crosses wall at {pos}");
        }
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1, "non-adjacent step");
        }
    }

    #[test]
    fn parses_algorithm_names() {
        assert_eq!("bfs".parse::<Algorithm>().unwrap(), Algorithm::Bfs);
        assert_eq!("DFS".parse::<Algorithm>().unwrap(), Algorithm::Dfs);
        assert_eq!("dijkstra".parse::<Algorithm>().unwrap(), Algorithm::Dijkstra);
        assert_eq!("astar".parse::<Algorithm>().unwrap(), Algorithm::AStar);
        assert_eq!("a*".parse::<Algorithm>().unwrap(), Algorithm::AStar);
        assert!(matches!(
            "qlearning".parse::<Algorithm>(),
            Err(MazeError::UnknownAlgorithm(_))
        ));
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn optimal_algorithms_find_shortest_corridor_path() {
        let grid = corridor_grid();
        let start = Position::new(1, 1);
        let goal = Position::new(4, 3);
        for algorithm in Algorithm::ALL {
            let result = solve(&grid, start, goal, algorithm).unwrap().unwrap();
            assert_valid_path(&grid, &result.path, start, goal);
            if algorithm.is_optimal() {
                // Down the left side: (1,1) (2,1) (3,1) (3,2) (3,3) (4,3).
                assert_eq!(result.steps(), 5, "{algorithm} not shortest");
            }
        }
    }

    #[test]
    fn start_equals_goal() {
        let grid = corridor_grid();
        let p = Position::new(2, 5);
        for algorithm in Algorithm::ALL {
            let result = solve(&grid, p, p, algorithm).unwrap().unwrap();
            assert_eq!(result.path, vec![p]);
            assert_eq!(result.steps(), 0);
            assert_eq!(result.nodes_visited, 1);
        }
    }

    #[test]
    fn wall_endpoint_has_no_solution() {
        let grid = corridor_grid();
        for algorithm in Algorithm::ALL {
            assert_eq!(
                solve(&grid, Position::new(0, 0), Position::new(1, 1), algorithm).unwrap(),
                None
            );
        }
    }

    #[test]
    fn disconnected_cells_have_no_solution() {
        let grid = Grid::from_rows(&[
            vec![1, 1, 1, 1, 1],
            vec![1, 0, 1, 0, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .unwrap();
        for algorithm in Algorithm::ALL {
            let result = solve(&grid, Position::new(1, 1), Position::new(1, 3), algorithm);
            assert_eq!(result.unwrap(), None);
        }
    }

    #[test]
    fn out_of_bounds_endpoint_is_an_error() {
        let grid = corridor_grid();
        let err = solve(&grid, Position::new(1, 1), Position::new(9, 1), Algorithm::Bfs)
            .unwrap_err();
        assert_eq!(
            err,
            MazeError::PositionOutOfBounds {
                row: 9,
                col: 1,
                rows: 6,
                cols: 7
            }
        );
    }

    #[test]
    fn optimal_algorithms_agree_on_carved_mazes() {
        for seed in 0..10 {
            let grid = carve(31, 31, &mut MazeRng::new(seed)).unwrap();
            let passages: Vec<_> = grid
                .interior_positions()
                .filter(|&p| grid.is_passage(p))
                .collect();
            let start = passages[0];
            let goal = passages[passages.len() - 1];

            let lengths: Vec<_> = [Algorithm::Bfs, Algorithm::Dijkstra, Algorithm::AStar]
                .into_iter()
                .map(|a| {
                    let r = solve(&grid, start, goal, a).unwrap().unwrap();
                    assert_valid_path(&grid, &r.path, start, goal);
                    r.steps()
                })
                .collect();
            assert!(lengths.windows(2).all(|w| w[0] == w[1]), "seed {seed}: {lengths:?}");

            // A carved maze is a tree: the only path is the shortest one.
            let dfs = solve(&grid, start, goal, Algorithm::Dfs).unwrap().unwrap();
            assert_eq!(dfs.steps(), lengths[0]);
        }
    }

    #[test]
    fn astar_expands_no_more_than_dijkstra() {
        let grid = Grid::filled(30, 30, crate::types::Cell::Passage).unwrap();
        let start = Position::new(0, 0);
        let goal = Position::new(29, 29);
        let dijkstra = solve(&grid, start, goal, Algorithm::Dijkstra).unwrap().unwrap();
        let astar = solve(&grid, start, goal, Algorithm::AStar).unwrap().unwrap();
        assert_eq!(dijkstra.steps(), 58);
        assert_eq!(astar.steps(), 58);
        assert!(astar.nodes_visited <= dijkstra.nodes_visited);
    }

    #[test]
    fn efficiency_is_a_fraction_of_open_cells() {
        let grid = corridor_grid();
        let result = solve(&grid, Position::new(1, 1), Position::new(4, 3), Algorithm::Bfs)
            .unwrap()
            .unwrap();
        assert_eq!(result.open_cells, grid.passage_count());
        assert!(result.efficiency() > 0.0 && result.efficiency() <= 1.0);
    }

    #[test]
    fn flat_contract_two_by_two() {
        let path = solve_flat(&[1, 0, 1, 0], 2, 2, 1, 3, Algorithm::Bfs).unwrap();
        assert_eq!(path, Some(vec![1, 3]));
    }

    #[test]
    fn flat_contract_rejects_bad_input() {
        assert!(matches!(
            solve_flat(&[1, 0, 1, 0], 2, 2, 1, 4, Algorithm::Bfs),
            Err(MazeError::PositionOutOfBounds { row: 2, col: 0, .. })
        ));
        assert!(matches!(
            solve_flat(&[1, 0, 1], 2, 2, 1, 3, Algorithm::Bfs),
            Err(MazeError::MalformedGrid(_))
        ));
        assert_eq!(
            solve_flat(&[1, 0, 1, 0], 2, 2, 0, 3, Algorithm::AStar).unwrap(),
            None
        );
    }

    #[test]
    fn flat_contract_rejects_overflowing_dimensions() {
        let rows = usize::MAX / 2 + 1;
        for algorithm in Algorithm::ALL {
            assert!(matches!(
                solve_flat(&[], rows, 2, 0, 1, algorithm),
                Err(MazeError::TooLarge { .. })
            ));
        }
    }

    #[test]
    fn solve_result_serializes() {
        let grid = corridor_grid();
        let result = solve(&grid, Position::new(1, 1), Position::new(1, 2), Algorithm::AStar)
            .unwrap()
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["algorithm"], "astar");
        assert_eq!(json["path"], serde_json::json!([[1, 1], [1, 2]]));
    }
}
