//! Fluent builder for constructing a [`SimulationEngine`].

use std::sync::Arc;

use ev_core::{SimConfig, SimRng, VehicleId};
use ev_fleet::{Deployment, RandomDeployment, Vehicle};
use ev_stats::StatsAggregator;
use tracing::debug;

use crate::{EngineError, EngineResult, SimulationEngine};

/// Fluent builder for [`SimulationEngine`].
///
/// # Required inputs
///
/// - [`SimConfig`] — duration, stations, tick length, fleet size, seed
/// - `Arc<StatsAggregator>` — shared with the caller so stats stay readable
///   after the run
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                              |
/// |-------------------|------------------------------------------------------|
/// | `.vehicles(v)`    | —                                                    |
/// | `.deployment(d)`  | `RandomDeployment` of `fleet_size`, seeded by `seed` |
///
/// `.vehicles` wins over `.deployment` when both are given.
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new(config, Arc::clone(&stats))
///     .deployment(FixedDeployment::new(vec![VehicleKind::Alpha; 4]))
///     .build()?;
/// engine.run(&mut MemorySink::default())?;
/// ```
pub struct EngineBuilder {
    config:     SimConfig,
    stats:      Arc<StatsAggregator>,
    vehicles:   Option<Vec<Vehicle>>,
    deployment: Option<Box<dyn Deployment>>,
}

impl EngineBuilder {
    pub fn new(config: SimConfig, stats: Arc<StatsAggregator>) -> Self {
        Self {
            config,
            stats,
            vehicles:   None,
            deployment: None,
        }
    }

    /// Use exactly these vehicles.
    ///
    /// They are re-numbered `0..n` in order and each one's type entry is
    /// registered with the aggregator.
    pub fn vehicles(mut self, vehicles: Vec<Vehicle>) -> Self {
        self.vehicles = Some(vehicles);
        self
    }

    /// Draw the fleet from `deployment` at build time.
    pub fn deployment(mut self, deployment: impl Deployment + 'static) -> Self {
        self.deployment = Some(Box::new(deployment));
        self
    }

    /// Validate inputs, deploy the fleet, and return a ready-to-run engine.
    pub fn build(self) -> EngineResult<SimulationEngine> {
        let Self { config, stats, vehicles, deployment } = self;

        let mut fleet = match (vehicles, deployment) {
            (Some(vehicles), _) => {
                for vehicle in &vehicles {
                    vehicle.register_stats(&stats);
                }
                vehicles
            }
            (None, Some(mut deployment)) => deployment.deploy(&stats),
            (None, None) => {
                config.validate()?;
                let rng = SimRng::from_seed_opt(config.seed);
                RandomDeployment::new(rng, config.fleet_size).deploy(&stats)
            }
        };

        if fleet.is_empty() {
            return Err(EngineError::EmptyFleet);
        }
        for (i, vehicle) in fleet.iter_mut().enumerate() {
            let id = VehicleId::try_from(i)
                .map_err(|_| EngineError::Config(format!("fleet of {} vehicles exceeds id range", i + 1)))?;
            vehicle.set_id(id);
        }
        debug!(vehicles = fleet.len(), stations = config.stations, "engine built");

        Ok(SimulationEngine::new(config, stats, fleet))
    }
}
