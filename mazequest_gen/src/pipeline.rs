// The generation pipeline: carve -> bias -> select endpoints.
//
// `generate()` is the single entry point external callers use. It validates
// the dimensions, asks the style source for one style, carves a fresh grid,
// applies the bias passes in place, and picks start and end cells from the
// final grid. The result owns its grid; nothing is shared between calls.
//
// `generate_batch()` runs many independent generations on the rayon pool.
// Each job's RNG streams are split off a root generator in request order
// before any work is spawned, so the batch output does not depend on thread
// scheduling and matches running the jobs one by one.
//
// See also: `carve.rs`, `bias.rs`, `endpoints.rs` for the three stages,
// `style.rs` for style sources, `config.rs` for the tuning knobs.
//
// **Critical constraint: determinism.** The maze `MazeRng` is consumed only
// by carving and the bias passes, in that order. Style sources own their
// own streams.

use crate::bias::{BiasReport, apply_style_bias};
use crate::carve::carve;
use crate::config::GeneratorConfig;
use crate::endpoints::{select_end, select_start};
use crate::error::Result;
use crate::grid::Grid;
use crate::prng::MazeRng;
use crate::style::{FixedStyle, SeededStyleSource, StyleParameters, StyleSource};
use crate::types::Position;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A finished maze, ready to hand to a caller or serialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeResult {
    /// Final grid, serialized as rows of 1 (wall) / 0 (passage).
    pub maze: Grid,
    pub rows: usize,
    pub cols: usize,
    pub start: Position,
    pub end: Position,
    /// Style the bias passes ran with, after clamping.
    pub style: StyleParameters,
    /// How many cells each bias pass flipped. Not part of the wire format.
    #[serde(skip)]
    pub bias: BiasReport,
}

/// Generate one maze.
pub fn generate<S: StyleSource + ?Sized>(
    rows: usize,
    cols: usize,
    config: &GeneratorConfig,
    style_source: &mut S,
    rng: &mut MazeRng,
) -> Result<MazeResult> {
    config.validate_dimensions(rows, cols)?;

    let style = style_source.next_style().clamped();
    let mut grid = carve(rows, cols, rng)?;
    let bias = apply_style_bias(&mut grid, &style, &config.bias, rng);
    let start = select_start(&grid, &config.endpoints);
    let end = select_end(&grid, start, &config.endpoints);

    log::debug!(
        "generated {rows}x{cols} maze: start {start}, end {end}, {} passages, {} bias flips",
        grid.passage_count(),
        bias.total()
    );

    Ok(MazeResult {
        maze: grid,
        rows,
        cols,
        start,
        end,
        style,
        bias,
    })
}

/// Generate one maze with every random stream derived from `seed`.
///
/// With `style` set, that style is used as-is; otherwise a
/// `SeededStyleSource` draws one.
pub fn generate_seeded(
    rows: usize,
    cols: usize,
    config: &GeneratorConfig,
    style: Option<StyleParameters>,
    seed: u64,
) -> Result<MazeResult> {
    run_job(rows, cols, config, style, MazeRng::new(seed))
}

/// One entry of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub style: Option<StyleParameters>,
}

/// Generate every request in parallel. Results come back in request order.
pub fn generate_batch(
    requests: &[BatchRequest],
    config: &GeneratorConfig,
    seed: u64,
) -> Vec<Result<MazeResult>> {
    let mut root = MazeRng::new(seed);
    let jobs: Vec<(BatchRequest, MazeRng)> =
        requests.iter().map(|req| (*req, root.split())).collect();

    log::debug!("generating batch of {} mazes from seed {seed}", jobs.len());

    jobs.into_par_iter()
        .map(|(req, job_rng)| run_job(req.rows, req.cols, config, req.style, job_rng))
        .collect()
}

/// Split `root` into a style stream and a maze stream, then generate.
fn run_job(
    rows: usize,
    cols: usize,
    config: &GeneratorConfig,
    style: Option<StyleParameters>,
    mut root: MazeRng,
) -> Result<MazeResult> {
    let style_rng = root.split();
    let mut maze_rng = root.split();
    match style {
        Some(style) => generate(rows, cols, config, &mut FixedStyle(style), &mut maze_rng),
        None => generate(
            rows,
            cols,
            config,
            &mut SeededStyleSource::new(style_rng),
            &mut maze_rng,
        ),
    }
}
