//! Deployment strategies — how many vehicles of which kinds start the run.

use ev_core::{SimRng, VehicleId};
use ev_stats::StatsAggregator;
use tracing::info;

use crate::{Vehicle, VehicleFactory, VehicleKind};

/// Produces the fleet for one run.
///
/// Returned vehicles carry ids `0..n` in order; the engine takes ownership
/// of the whole `Vec` and uses the ids as arena indices.
pub trait Deployment {
    fn deploy(&mut self, stats: &StatsAggregator) -> Vec<Vehicle>;
}

// ── RandomDeployment ──────────────────────────────────────────────────────────

/// Draws `count` vehicles uniformly across [`VehicleKind::ALL`].
pub struct RandomDeployment {
    rng:   SimRng,
    count: usize,
}

impl RandomDeployment {
    /// Number of vehicles drawn by [`RandomDeployment::default`].
    pub const DEFAULT_COUNT: usize = 20;

    pub fn new(rng: SimRng, count: usize) -> Self {
        Self { rng, count }
    }

    /// Reproducible draw from `seed`.
    pub fn seeded(seed: u64, count: usize) -> Self {
        Self::new(SimRng::new(seed), count)
    }
}

impl Default for RandomDeployment {
    fn default() -> Self {
        Self::new(SimRng::from_entropy(), Self::DEFAULT_COUNT)
    }
}

impl Deployment for RandomDeployment {
    fn deploy(&mut self, stats: &StatsAggregator) -> Vec<Vehicle> {
        let fleet: Vec<Vehicle> = (0..self.count)
            .filter_map(|_| self.rng.choose(&VehicleKind::ALL).copied())
            .zip(0u32..)
            .map(|(kind, i)| kind.create_vehicle(VehicleId(i), stats))
            .collect();
        info!(vehicles = fleet.len(), "random deployment drawn");
        fleet
    }
}

// ── FixedDeployment ───────────────────────────────────────────────────────────

/// Deploys exactly the listed kinds, in order.
#[derive(Clone, Debug, Default)]
pub struct FixedDeployment {
    kinds: Vec<VehicleKind>,
}

impl FixedDeployment {
    pub fn new(kinds: Vec<VehicleKind>) -> Self {
        Self { kinds }
    }
}

impl Deployment for FixedDeployment {
    fn deploy(&mut self, stats: &StatsAggregator) -> Vec<Vehicle> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| kind.create_vehicle(VehicleId(i as u32), stats))
            .collect()
    }
}
