//! Seeding for reproducible training runs.
//!
//! A run is seeded once at process start through [`seed_all`], which derives
//! one sub-seed per numeric subsystem from a single user-facing seed. The
//! derivation uses a small xorshift generator so it is identical on every
//! platform and needs no external crates.

use tracing::debug;

const ZERO_SEED_STATE: u64 = 0x9e3779b97f4a7c15;

/// Lower bound of [`large_randint`].
pub const LARGE_RANDINT_MIN: u64 = 10_000;
/// Upper bound (inclusive) of [`large_randint`].
pub const LARGE_RANDINT_MAX: u64 = 1_000_000;

/// Xorshift generator used as the general-purpose RNG of a run.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with explicit seed (if zero, use a fixed value).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { ZERO_SEED_STATE } else { seed };
        Self { state }
    }

    fn next_state(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    pub fn next_u32(&mut self) -> u32 {
        (self.next_state() >> 32) as u32
    }

    pub fn next_u64(&mut self) -> u64 {
        self.next_state()
    }

    /// Uniform sample in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_state() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Integer sample in [low, high], both ends included.
    ///
    /// Returns `low` when `high <= low`.
    pub fn gen_range_inclusive(&mut self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        let span = high - low;
        if span == u64::MAX {
            return self.next_u64();
        }
        low + self.next_u64() % (span + 1)
    }

    /// Fisher-Yates shuffle, e.g. for epoch sample order.
    pub fn shuffle<T>(&mut self, data: &mut [T]) {
        for i in (1..data.len()).rev() {
            let j = self.gen_range_inclusive(0, i as u64) as usize;
            data.swap(i, j);
        }
    }
}

/// Draws a seed in `[10_000, 1_000_000]` from `rng`.
pub fn large_randint(rng: &mut SimpleRng) -> u64 {
    rng.gen_range_inclusive(LARGE_RANDINT_MIN, LARGE_RANDINT_MAX)
}

/// Seeds derived for every random subsystem of a run.
#[derive(Debug, Clone)]
pub struct SeedSet {
    /// The seed the run was started with.
    pub seed: u64,
    /// Seed for the array/numeric library.
    pub numeric: u64,
    /// Seed for the tensor framework's CPU generator.
    pub framework: u64,
    /// Seed for accelerator (GPU) generators.
    pub accelerator: u64,
    /// General-purpose generator, positioned after the three draws above.
    pub rng: SimpleRng,
}

/// Derives every subsystem seed from `seed`.
///
/// The general-purpose generator is seeded with `seed`, then `numeric`,
/// `framework` and `accelerator` are drawn from it in that order with
/// [`large_randint`]. The same `seed` always yields the same [`SeedSet`].
/// Call this once at process start and hand each sub-seed to its subsystem.
pub fn seed_all(seed: u64) -> SeedSet {
    let mut rng = SimpleRng::new(seed);
    let numeric = large_randint(&mut rng);
    let framework = large_randint(&mut rng);
    let accelerator = large_randint(&mut rng);
    debug!(seed, numeric, framework, accelerator, "seeded all generators");

    SeedSet {
        seed,
        numeric,
        framework,
        accelerator,
        rng,
    }
}
