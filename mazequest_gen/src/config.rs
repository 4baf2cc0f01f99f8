// Generator configuration.
//
// Every tunable number in the pipeline lives here: default dimensions, the
// cell budget that bounds generation time, the thresholds and probability
// formulas of the three bias passes, and the corner-window shape used by
// endpoint selection. `GeneratorConfig::default()` reproduces the stock
// generator exactly; a JSON file can override any subset of fields.
//
// Loaded once at startup and never mutated. Two runs with the same seed only
// produce the same maze if they also share a config.
//
// See also: `bias.rs` (reads `BiasConfig`), `endpoints.rs` (reads
// `EndpointConfig`), `pipeline.rs` (reads `max_cells`).

use crate::error::{MazeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Thresholds and scales for the three bias passes.
///
/// A pass runs only when its scalar is strictly beyond its threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasConfig {
    /// Density above this turns passages into walls.
    pub density_high: f64,
    /// Density below this turns walls into passages.
    pub density_low: f64,
    /// Flip probability is `|density - density_midpoint| * density_scale`.
    pub density_midpoint: f64,
    pub density_scale: f64,

    /// Connectivity above this opens walls between passages.
    pub connectivity_threshold: f64,
    /// Open probability is `(connectivity - midpoint) * scale`.
    pub connectivity_midpoint: f64,
    pub connectivity_scale: f64,
    /// Minimum number of orthogonal passage neighbors for a wall to qualify.
    pub connectivity_min_neighbors: usize,

    /// Complexity above this drops random obstacles into passages.
    pub complexity_threshold: f64,
    /// Sample count is `floor(complexity * complexity_iteration_scale)`.
    pub complexity_iteration_scale: f64,
    /// Chance that a sampled passage becomes a wall.
    pub complexity_flip_probability: f64,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            density_high: 0.7,
            density_low: 0.3,
            density_midpoint: 0.5,
            density_scale: 0.3,
            connectivity_threshold: 0.6,
            connectivity_midpoint: 0.5,
            connectivity_scale: 0.2,
            connectivity_min_neighbors: 2,
            complexity_threshold: 0.6,
            complexity_iteration_scale: 10.0,
            complexity_flip_probability: 0.3,
        }
    }
}

/// Shape of the corner windows scanned for start and end cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Window extent is `dim / window_divisor`, capped at `window_cap`.
    pub window_divisor: usize,
    pub window_cap: usize,
}

impl EndpointConfig {
    /// Exclusive upper bound of the top-left window along one axis:
    /// `min(len / divisor, cap)`.
    pub fn window(&self, len: usize) -> usize {
        (len / self.divisor()).min(self.window_cap)
    }

    /// Divisor with zero treated as one.
    pub fn divisor(&self) -> usize {
        self.window_divisor.max(1)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            window_divisor: 3,
            window_cap: 5,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Rows used when the caller does not specify any.
    pub default_rows: usize,
    /// Columns used when the caller does not specify any.
    pub default_cols: usize,
    /// Upper bound on `rows * cols`. Generation is linear in the cell count,
    /// so this bounds its running time.
    pub max_cells: u64,
    pub bias: BiasConfig,
    pub endpoints: EndpointConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_rows: 20,
            default_cols: 20,
            max_cells: 1_000_000,
            bias: BiasConfig::default(),
            endpoints: EndpointConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse a config from JSON. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MazeError::Config(e.to_string()))
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MazeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Check dimensions against the zero and budget limits.
    pub fn validate_dimensions(&self, rows: usize, cols: usize) -> Result<()> {
        if rows == 0 || cols == 0 {
            return Err(MazeError::InvalidDimensions { rows, cols });
        }
        let cells = (rows as u64).saturating_mul(cols as u64);
        if cells > self.max_cells {
            return Err(MazeError::TooLarge {
                rows,
                cols,
                max_cells: self.max_cells,
            });
        }
        Ok(())
    }
}
