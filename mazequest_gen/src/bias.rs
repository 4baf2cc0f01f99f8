// Style-driven mutation of a carved maze.
//
// Three passes run in a fixed order (density, connectivity, complexity),
// each gated by a threshold on its own style scalar and each flipping
// interior cells at random:
//
// - Density: above the high threshold, passages become walls with
//   probability `(density - 0.5) * 0.3`; below the low threshold, walls
//   become passages with probability `(0.5 - density) * 0.3`.
// - Connectivity: above its threshold, a wall with at least two orthogonal
//   passage neighbors becomes a passage with probability
//   `(connectivity - 0.5) * 0.2`.
// - Complexity: above its threshold, `floor(complexity * 10)` random interior
//   cells are sampled; a sampled passage becomes a wall with probability 0.3.
//
// The numbers above are the `BiasConfig` defaults (see `config.rs`).
//
// All passes mutate the grid in place. Later passes see earlier passes'
// flips, and within the connectivity pass later cells in row-major order see
// flips made earlier in the same scan. Nothing re-checks that the maze is
// still solvable afterwards.
//
// The border ring is never touched, so a grid with a solid border keeps it.
//
// **Critical constraint: determinism.** Random draws happen only for cells
// that pass the state (and adjacency) check, exactly one draw per candidate,
// in row-major order. Changing the draw order changes every downstream maze
// for a given seed.

use crate::config::BiasConfig;
use crate::grid::Grid;
use crate::prng::MazeRng;
use crate::style::{StyleParameters, clamp_unit};
use crate::types::{Cell, Position};

/// Per-pass flip counts, for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BiasReport {
    pub density_flips: usize,
    pub connectivity_flips: usize,
    pub complexity_flips: usize,
}

impl BiasReport {
    pub fn total(&self) -> usize {
        self.density_flips + self.connectivity_flips + self.complexity_flips
    }
}

/// Apply all three passes in order. Style values are clamped into [0, 1]
/// first.
pub fn apply_style_bias(
    grid: &mut Grid,
    style: &StyleParameters,
    config: &BiasConfig,
    rng: &mut MazeRng,
) -> BiasReport {
    let style = style.clamped();
    let report = BiasReport {
        density_flips: density_pass(grid, style.density, config, rng),
        connectivity_flips: connectivity_pass(grid, style.connectivity, config, rng),
        complexity_flips: complexity_pass(grid, style.complexity, config, rng),
    };
    log::trace!(
        "style bias {style:?}: {} density, {} connectivity, {} complexity flips",
        report.density_flips,
        report.connectivity_flips,
        report.complexity_flips
    );
    report
}

/// Density pass. Returns the number of cells flipped.
pub fn density_pass(
    grid: &mut Grid,
    density: f64,
    config: &BiasConfig,
    rng: &mut MazeRng,
) -> usize {
    let density = clamp_unit(density);
    let (target, p) = if density > config.density_high {
        (Cell::Passage, (density - config.density_midpoint) * config.density_scale)
    } else if density < config.density_low {
        (Cell::Wall, (config.density_midpoint - density) * config.density_scale)
    } else {
        return 0;
    };

    let mut flips = 0;
    for pos in grid.interior_positions() {
        if grid.get(pos) == target && rng.random_bool(p) {
            grid.set(pos, target.flipped());
            flips += 1;
        }
    }
    flips
}

/// Connectivity pass. Returns the number of walls opened.
pub fn connectivity_pass(
    grid: &mut Grid,
    connectivity: f64,
    config: &BiasConfig,
    rng: &mut MazeRng,
) -> usize {
    let connectivity = clamp_unit(connectivity);
    if connectivity <= config.connectivity_threshold {
        return 0;
    }
    let p = (connectivity - config.connectivity_midpoint) * config.connectivity_scale;

    let mut flips = 0;
    for pos in grid.interior_positions() {
        if grid.get(pos).is_wall()
            && grid.count_adjacent_passages(pos) >= config.connectivity_min_neighbors
            && rng.random_bool(p)
        {
            grid.set(pos, Cell::Passage);
            flips += 1;
        }
    }
    flips
}

/// Complexity pass. Returns the number of passages closed.
///
/// Samples `complexity_iterations` random interior cells with replacement.
/// Draws nothing if the grid has no interior.
pub fn complexity_pass(
    grid: &mut Grid,
    complexity: f64,
    config: &BiasConfig,
    rng: &mut MazeRng,
) -> usize {
    let complexity = clamp_unit(complexity);
    if complexity <= config.complexity_threshold || !grid.has_interior() {
        return 0;
    }

    let mut flips = 0;
    for _ in 0..complexity_iterations(complexity, config) {
        let row = rng.range_usize_inclusive(1, grid.rows() - 2);
        let col = rng.range_usize_inclusive(1, grid.cols() - 2);
        let pos = Position::new(row, col);
        if grid.is_passage(pos) && rng.random_bool(config.complexity_flip_probability) {
            grid.set(pos, Cell::Wall);
            flips += 1;
        }
    }
    flips
}

/// Number of samples the complexity pass makes: `floor(complexity * scale)`.
pub fn complexity_iterations(complexity: f64, config: &BiasConfig) -> usize {
    (clamp_unit(complexity) * config.complexity_iteration_scale).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carve::carve;

    fn open_interior(rows: usize, cols: usize) -> Grid {
        let mut grid = Grid::new(rows, cols).unwrap();
        let interior: Vec<_> = grid.interior_positions().collect();
        for pos in interior {
            grid.set(pos, Cell::Passage);
        }
        grid
    }

    #[test]
    fn neutral_style_changes_nothing_and_draws_nothing() {
        let config = BiasConfig::default();
        let mut grid = carve(15, 15, &mut MazeRng::new(1)).unwrap();
        let before = grid.clone();
        let mut rng = MazeRng::new(77);
        let untouched = rng.clone();

        let style = StyleParameters::new(0.5, 0.5, 0.5);
        let report = apply_style_bias(&mut grid, &style, &config, &mut rng);

        assert_eq!(report.total(), 0);
        assert_eq!(grid, before);
        assert_eq!(rng, untouched);
    }

    #[test]
    fn density_threshold_edges_are_inclusive_no_ops() {
        let config = BiasConfig::default();
        for density in [0.3, 0.7] {
            let mut grid = carve(15, 15, &mut MazeRng::new(2)).unwrap();
            let mut rng = MazeRng::new(2);
            assert_eq!(density_pass(&mut grid, density, &config, &mut rng), 0);
            assert_eq!(rng, MazeRng::new(2));
        }
    }

    #[test]
    fn high_density_flip_rate_converges() {
        // Expected rate is (0.9 - 0.5) * 0.3 = 0.12 on 10,000 interior cells.
        let config = BiasConfig::default();
        let mut rng = MazeRng::new(2024);
        let trials = 5;
        let mut total_rate = 0.0;
        for _ in 0..trials {
            let mut grid = open_interior(102, 102);
            let flips = density_pass(&mut grid, 0.9, &config, &mut rng);
            total_rate += flips as f64 / 10_000.0;
        }
        let rate = total_rate / trials as f64;
        assert!((rate - 0.12).abs() < 0.01, "flip rate {rate}");
    }

    #[test]
    fn low_density_opens_walls_only_inside() {
        let config = BiasConfig::default();
        let mut grid = Grid::new(40, 40).unwrap();
        let mut rng = MazeRng::new(5);
        let flips = density_pass(&mut grid, 0.0, &config, &mut rng);
        // p = 0.15 over 38 * 38 = 1444 interior walls.
        assert!(flips > 150 && flips < 290, "unexpected flip count {flips}");
        assert_eq!(grid.passage_count(), flips);
        assert!(grid.border_is_solid());
    }

    #[test]
    fn connectivity_threshold_is_strict() {
        let config = BiasConfig::default();
        // Every interior wall sits between passages, so all are candidates.
        let mut grid = Grid::new(21, 21).unwrap();
        let interior: Vec<_> = grid.interior_positions().collect();
        for pos in interior {
            if pos.row % 2 == 1 {
                grid.set(pos, Cell::Passage);
            }
        }
        let before = grid.clone();

        let mut rng = MazeRng::new(8);
        assert_eq!(connectivity_pass(&mut grid, 0.6, &config, &mut rng), 0);
        assert_eq!(grid, before);
        assert_eq!(rng, MazeRng::new(8), "pass at 0.6 must not draw");

        connectivity_pass(&mut grid, 0.61, &config, &mut rng);
        assert_ne!(rng, MazeRng::new(8), "pass at 0.61 must run");
    }

    #[test]
    fn connectivity_only_opens_walls_with_two_open_neighbors() {
        let config = BiasConfig::default();
        let mut grid = Grid::from_rows(&[
            vec![1, 1, 1, 1, 1],
            vec![1, 0, 1, 1, 1],
            vec![1, 1, 1, 1, 1],
            vec![1, 1, 1, 1, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .unwrap();
        let before = grid.clone();
        let mut rng = MazeRng::new(1);
        // No wall has two passage neighbors: nothing can open, nothing drawn.
        assert_eq!(connectivity_pass(&mut grid, 1.0, &config, &mut rng), 0);
        assert_eq!(grid, before);
        assert_eq!(rng, MazeRng::new(1));
    }

    #[test]
    fn connectivity_scan_sees_its_own_earlier_flips() {
        // With the probability forced to 1, (2,1) opens first and hands
        // (2,2) and (3,2) their second open neighbor. A snapshot-based scan
        // would open (2,1) only.
        let config = BiasConfig {
            connectivity_scale: 2.0,
            ..BiasConfig::default()
        };
        let mut grid = Grid::from_rows(&[
            vec![1, 1, 1, 1, 1],
            vec![1, 0, 1, 1, 1],
            vec![1, 1, 1, 0, 1],
            vec![1, 0, 1, 1, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .unwrap();
        let flips = connectivity_pass(&mut grid, 1.0, &config, &mut MazeRng::new(0));
        assert_eq!(flips, 4);
        let expected = Grid::from_rows(&[
            vec![1, 1, 1, 1, 1],
            vec![1, 0, 1, 1, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .unwrap();
        assert_eq!(grid, expected);
    }

    #[test]
    fn complexity_iteration_counts() {
        let config = BiasConfig::default();
        assert_eq!(complexity_iterations(0.65, &config), 6);
        assert_eq!(complexity_iterations(0.61, &config), 6);
        assert_eq!(complexity_iterations(1.0, &config), 10);
        assert_eq!(complexity_iterations(2.0, &config), 10);
    }

    #[test]
    fn complexity_threshold_is_strict() {
        let config = BiasConfig::default();
        let mut grid = open_interior(10, 10);
        let mut rng = MazeRng::new(4);
        assert_eq!(complexity_pass(&mut grid, 0.6, &config, &mut rng), 0);
        assert_eq!(rng, MazeRng::new(4));
    }

    #[test]
    fn complexity_closes_at_most_iteration_count() {
        let config = BiasConfig::default();
        for seed in 0..30 {
            let mut grid = open_interior(12, 12);
            let mut rng = MazeRng::new(seed);
            let flips = complexity_pass(&mut grid, 1.0, &config, &mut rng);
            assert!(flips <= 10);
            assert_eq!(grid.interior_positions().count() - grid.passage_count(), flips);
            assert!(grid.border_is_solid());
        }
    }

    /// Advance a copy of `rng` by `draws` raw outputs.
    fn advanced(rng: &MazeRng, draws: usize) -> MazeRng {
        let mut rng = rng.clone();
        for _ in 0..draws {
            rng.next_u64();
        }
        rng
    }

    #[test]
    fn complexity_draws_two_per_sample_on_closed_grid() {
        // 10x10: interior coordinates span 1..=8, a power of two, so each
        // coordinate is exactly one raw draw. Walls never roll for a flip.
        let config = BiasConfig::default();
        for (complexity, samples) in [(0.65, 6), (0.79, 7), (1.0, 10)] {
            let mut grid = Grid::new(10, 10).unwrap();
            let mut rng = MazeRng::new(12);
            let expected = advanced(&rng, 2 * samples);
            assert_eq!(complexity_pass(&mut grid, complexity, &config, &mut rng), 0);
            assert_eq!(rng, expected, "complexity {complexity}");
        }
    }

    #[test]
    fn complexity_draws_three_per_sample_on_open_grid() {
        let config = BiasConfig {
            complexity_flip_probability: 0.0,
            ..BiasConfig::default()
        };
        let mut grid = open_interior(10, 10);
        let mut rng = MazeRng::new(13);
        let expected = advanced(&rng, 3 * 8);
        assert_eq!(complexity_pass(&mut grid, 0.85, &config, &mut rng), 0);
        assert_eq!(rng, expected);
    }

    #[test]
    fn complexity_skips_grids_without_interior() {
        let config = BiasConfig::default();
        let mut grid = Grid::filled(2, 8, Cell::Passage).unwrap();
        let mut rng = MazeRng::new(6);
        assert_eq!(complexity_pass(&mut grid, 1.0, &config, &mut rng), 0);
        assert_eq!(rng, MazeRng::new(6));
    }

    #[test]
    fn out_of_range_style_is_clamped() {
        let config = BiasConfig::default();
        // density 5.0 behaves like 1.0: p = 0.15, never above 1.
        let mut a = open_interior(30, 30);
        let mut b = open_interior(30, 30);
        density_pass(&mut a, 5.0, &config, &mut MazeRng::new(10));
        density_pass(&mut b, 1.0, &config, &mut MazeRng::new(10));
        assert_eq!(a, b);

        // Negative connectivity behaves like 0.0: the pass is skipped.
        let mut grid = open_interior(6, 6);
        let mut rng = MazeRng::new(10);
        assert_eq!(connectivity_pass(&mut grid, -3.0, &config, &mut rng), 0);
        assert_eq!(rng, MazeRng::new(10));
    }

    #[test]
    fn passes_are_deterministic() {
        let config = BiasConfig::default();
        let style = StyleParameters::new(0.85, 0.9, 0.95);
        let base = carve(31, 31, &mut MazeRng::new(3)).unwrap();

        let mut a = base.clone();
        let mut b = base.clone();
        let ra = apply_style_bias(&mut a, &style, &config, &mut MazeRng::new(99));
        let rb = apply_style_bias(&mut b, &style, &config, &mut MazeRng::new(99));
        assert_eq!(a, b);
        assert_eq!(ra, rb);
        assert!(a.border_is_solid());
    }
}
