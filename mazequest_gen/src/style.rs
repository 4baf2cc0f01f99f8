// Style parameters and the sources that produce them.
//
// A style is three independent scalars in [0, 1] (density, connectivity,
// complexity) that decide which bias passes run and how hard they push.
// Where the numbers come from is pluggable through `StyleSource`:
//
// - `SeededStyleSource` draws each scalar as the logistic sigmoid of an
//   approximately standard-normal value, so styles cluster around 0.5 and
//   only occasionally cross the pass thresholds.
// - `FixedStyle` returns the same parameters every time.
// - Any `FnMut() -> StyleParameters` closure is also a source.
//
// See also: `bias.rs` which consumes the parameters, `pipeline.rs` which
// asks the source for one style per generation.

use crate::prng::MazeRng;
use serde::{Deserialize, Serialize};

/// The three style scalars. Not validated on construction; consumers call
/// `clamped()` before turning them into probabilities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleParameters {
    pub density: f64,
    pub connectivity: f64,
    pub complexity: f64,
}

impl StyleParameters {
    /// The midpoint style, at which none of the bias passes run.
    pub const NEUTRAL: StyleParameters = StyleParameters {
        density: 0.5,
        connectivity: 0.5,
        complexity: 0.5,
    };

    pub const fn new(density: f64, connectivity: f64, complexity: f64) -> Self {
        Self {
            density,
            connectivity,
            complexity,
        }
    }

    /// Each scalar clamped into [0, 1], with NaN mapped to 0.5.
    pub fn clamped(&self) -> Self {
        Self {
            density: clamp_unit(self.density),
            connectivity: clamp_unit(self.connectivity),
            complexity: clamp_unit(self.complexity),
        }
    }
}

impl Default for StyleParameters {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) }
}

/// Anything that can hand out a style for the next maze.
pub trait StyleSource {
    fn next_style(&mut self) -> StyleParameters;
}

impl<F: FnMut() -> StyleParameters> StyleSource for F {
    fn next_style(&mut self) -> StyleParameters {
        self()
    }
}

/// A source that always returns the same style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedStyle(pub StyleParameters);

impl StyleSource for FixedStyle {
    fn next_style(&mut self) -> StyleParameters {
        self.0
    }
}

/// Random styles from an owned `MazeRng`.
///
/// Each scalar is `sigmoid(z * spread)` where `z` is an Irwin-Hall sum of
/// four uniforms rescaled to zero mean and unit variance. With the default
/// `spread = 1.0` about 40% of draws land above 0.7 or below 0.3.
#[derive(Clone, Debug)]
pub struct SeededStyleSource {
    rng: MazeRng,
    spread: f64,
}

impl SeededStyleSource {
    pub fn new(rng: MazeRng) -> Self {
        Self { rng, spread: 1.0 }
    }

    /// Scale applied to the normal draw before the sigmoid. Larger values
    /// push styles toward 0 and 1.
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    fn draw(&mut self) -> f64 {
        let sum: f64 = (0..4).map(|_| self.rng.next_f64()).sum();
        // Sum of four U(0,1) has mean 2 and variance 1/3.
        let z = (sum - 2.0) * 3f64.sqrt();
        sigmoid(z * self.spread)
    }
}

impl StyleSource for SeededStyleSource {
    fn next_style(&mut self) -> StyleParameters {
        let density = self.draw();
        let connectivity = self.draw();
        let complexity = self.draw();
        StyleParameters::new(density, connectivity, complexity)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
