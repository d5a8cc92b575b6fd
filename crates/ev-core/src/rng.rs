//! Simulation-level RNG wrapper.
//!
//! Only the deployment draw is random; the pipeline itself is deterministic
//! apart from thread interleaving.  A fixed seed therefore reproduces the
//! same fleet composition, and `None` falls back to OS entropy.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand::seq::SliceRandom;

/// Simulation-level RNG for global operations (fleet deployment).
///
/// Used only in single-threaded contexts: the deployment runs before any
/// stage thread is spawned.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from OS entropy — a different fleet every run.
    pub fn from_entropy() -> Self {
        SimRng(SmallRng::from_entropy())
    }

    /// `new(seed)` when a seed is given, otherwise `from_entropy()`.
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }
}
