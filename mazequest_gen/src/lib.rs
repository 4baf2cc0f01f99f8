// mazequest_gen: maze generation, style-biased mutation, and solving.
//
// Pure library: given dimensions, a style source, and an owned `MazeRng`, it
// carves a maze, perturbs it, and picks a start and end. It does no I/O
// beyond optional config loading and never initialises a logger; the
// `mazequest_cli` binary wraps it for command-line use.
//
// Module overview:
// - `types.rs`:     `Cell` (wall/passage) and `Position` (row, col).
// - `grid.rs`:      Dense row-major `Grid` of cells, neighbor queries, serde as 0/1 rows.
// - `carve.rs`:     Randomized depth-first backtracking over the every-other-cell lattice.
// - `bias.rs`:      Density, connectivity, and complexity passes that flip interior cells.
// - `endpoints.rs`: Start/end selection from the top-left and bottom-right corner windows.
// - `style.rs`:     `StyleParameters` and the `StyleSource` trait with its implementations.
// - `pipeline.rs`:  `generate()` (carve -> bias -> select) and parallel `generate_batch()`.
// - `solve.rs`:     BFS / DFS / Dijkstra / A* over passage cells, plus a flat-buffer API.
// - `render.rs`:    ASCII rendering with endpoint and path overlays.
// - `config.rs`:    `GeneratorConfig` with bias and endpoint tuning, loaded from JSON.
// - `error.rs`:     `MazeError` and the crate `Result` alias.
// - `prng`:         Re-exported from `mazequest_prng`.
//
// **Critical constraint: determinism.** Output is a pure function of the
// inputs and the caller's RNG stream. No global RNG, no system time, no
// `HashMap` iteration order anywhere in the generation path.

pub mod bias;
pub mod carve;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod grid;
pub mod pipeline;
pub use mazequest_prng as prng;
pub mod render;
pub mod solve;
pub mod style;
pub mod types;

pub use error::{MazeError, Result};
pub use grid::Grid;
pub use pipeline::{MazeResult, generate};
pub use types::{Cell, Position};
