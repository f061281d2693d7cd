//! Deterministic per-driver and run-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each driver gets its own independent `SmallRng` seeded by:
//!
//!   seed = run_seed XOR (fxhash(driver_id) * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio.
//! This means:
//!
//! - Drivers never share RNG state, so the fleet can be projected on any
//!   number of threads in any order and still give identical results.
//! - Adding a driver to the input does not disturb the traffic draws of the
//!   drivers already present.

use std::hash::{Hash, Hasher};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;

use crate::DriverId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

fn driver_hash(driver: &DriverId) -> u64 {
    let mut hasher = FxHasher::default();
    driver.as_str().hash(&mut hasher);
    hasher.finish()
}

// ── DriverRng ─────────────────────────────────────────────────────────────────

/// Per-driver deterministic RNG.
///
/// Created by the projector at the start of each driver's route and dropped
/// when the route is done.  Never shared between threads.
pub struct DriverRng(SmallRng);

impl DriverRng {
    /// Seed deterministically from the run seed and a driver id.
    pub fn new(run_seed: u64, driver: &DriverId) -> Self {
        let seed = run_seed ^ driver_hash(driver).wrapping_mul(MIXING_CONSTANT);
        DriverRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform `f64` in the closed interval `[lo, hi]`.
    ///
    /// Returns `lo` when the interval is empty or degenerate instead of
    /// panicking, so a `(1.0, 1.0)` range behaves as a constant.
    #[inline]
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo {
            self.0.gen_range(lo..=hi)
        } else {
            lo
        }
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

// ── RunRng ────────────────────────────────────────────────────────────────────

/// Run-level RNG, used to derive fresh run seeds for repeated runs.
pub struct RunRng(SmallRng);

impl RunRng {
    pub fn new(seed: u64) -> Self {
        RunRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive the seed for iteration `offset` of a repeated run.
    pub fn child_seed(&mut self, offset: u64) -> u64 {
        self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT)
    }
}
