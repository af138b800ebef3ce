//! Deterministic random streams.
//!
//! A run owns one [`ChaCha8Rng`] for sequential work (landscape layout,
//! founders, reproduction). Parallel phases never touch it: each agent gets
//! its own stream per tick, keyed on (seed, generation, tick, agent), so the
//! draws an agent sees are the same whichever worker runs it.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

pub type SimRng = ChaCha8Rng;

/// Run stream for sequential phases.
pub fn run_rng(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Per-agent stream for one tick of a parallel phase.
#[inline]
pub fn agent_rng(seed: u64, generation: usize, tick: usize, agent: usize) -> SimRng {
    let key = mix(mix(mix(seed ^ 0xA076_1D64_78BD_642F, generation as u64), tick as u64), agent as u64);
    ChaCha8Rng::seed_from_u64(key)
}

/// Seed derived from the wall clock, for runs without an explicit seed.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}

// splitmix64 finaliser
#[inline(always)]
fn mix(state: u64, value: u64) -> u64 {
    let mut z = state.wrapping_add(value.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
