// Seeded pseudo-random number generator for maze generation.
//
// xoshiro256++ (Blackman & Vigna, 2019) expanded from a single `u64` seed
// with SplitMix64. Hand-rolled so that a given seed yields the same maze on
// every platform and toolchain, with no dependency on an external RNG crate
// whose stream could change between versions.
//
// Every random decision in `mazequest_gen` (the carver's start cell and
// neighbor choice, the bias passes' flip rolls, the seeded style source)
// draws from a `MazeRng` that the caller owns and passes in explicitly.
// There is no ambient or global generator. Concurrent generations each get
// their own stream, usually via `split()`.
//
// **Critical constraint: determinism.** The integer core must produce the
// same sequence for the same state regardless of platform or optimization
// level. Only `next_f64` touches floating point, and it does so with an
// exact integer-to-double conversion.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ generator with 256 bits of state.
///
/// Cloning a `MazeRng` forks the stream: both copies produce the same
/// values from that point on. Use `split()` for an independent stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeRng {
    s: [u64; 4],
}

impl MazeRng {
    /// Create a generator from a `u64` seed.
    ///
    /// The seed is expanded through SplitMix64, so nearby seeds (0, 1, 2...)
    /// still produce unrelated streams. Two `MazeRng` instances created with
    /// the same seed produce identical output sequences.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Derive an independent child generator, advancing `self` by one draw.
    ///
    /// Splitting N times in a fixed order gives N reproducible streams, which
    /// is how batch generation hands one generator to each parallel job.
    pub fn split(&mut self) -> MazeRng {
        MazeRng::new(self.next_u64())
    }

    /// Generate the next `u64` in the sequence.
    ///
    /// This is the only method that advances the state; every other draw is
    /// built from one or more calls to it, so counting `next_u64` calls is
    /// how tests pin down how many draws an operation consumes.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform `f64` in [0, 1).
    ///
    /// Uses the upper 53 bits of a `u64` to fill the mantissa of an f64.
    /// 53 bits gives full f64 precision (IEEE 754 double has a 52-bit
    /// mantissa + 1 implicit bit), and the integer-to-float conversion is
    /// exact, so the result is identical on every platform.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a uniform random integer in `[low, high)`.
    ///
    /// Power-of-two spans mask a single draw. Other spans use rejection
    /// sampling to avoid modulo bias, which occasionally costs more than one
    /// draw (with probability below `span / 2^64`).
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        // Reject the short tail so every residue is equally likely.
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % span);
            }
        }
    }

    /// Generate a uniform random `usize` in `[low, high)`.
    ///
    /// Delegates to `range_u64` for the actual sampling.
    /// Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Generate a uniform random `usize` in `[low, high]`, both inclusive.
    ///
    /// Used for the carver's start coordinate, which is drawn from the
    /// closed interior range `[1, len - 2]`.
    /// Panics if `low > high`.
    pub fn range_usize_inclusive(&mut self, low: usize, high: usize) -> usize {
        assert!(low <= high, "range_usize_inclusive: low must be <= high");
        self.range_u64(low as u64, high as u64 + 1) as usize
    }

    /// `true` with probability `p`.
    ///
    /// Always consumes exactly one draw. `p <= 0.0` is never true and
    /// `p >= 1.0` is always true.
    pub fn random_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick one element uniformly. Returns `None` (without drawing) for an
    /// empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.range_usize(0, items.len());
        items.get(idx)
    }
}

/// SplitMix64: a simple 64-bit generator used only to expand a single seed
/// into the 256-bit xoshiro256++ state.
/// This is the seeding scheme the xoshiro authors recommend.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
