//! The five stock vehicle kinds and the factory capability.

use std::fmt;

use ev_core::VehicleId;
use ev_stats::{FleetStats, StatsAggregator, TypeStats};

use crate::Vehicle;

/// Immutable per-kind parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VehicleSpec {
    pub name:             &'static str,
    /// Miles per hour.
    pub cruise_speed:     f64,
    /// kWh.
    pub battery_capacity: f64,
    /// Hours from empty to full.
    pub hours_to_charge:  f64,
    /// kWh per mile.
    pub energy_use:       f64,
    pub passengers:       u32,
    pub faults_per_hour:  f64,
}

/// The closed set of vehicle kinds a fleet is drawn from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleKind {
    Alpha,
    Bravo,
    Charlie,
    Delta,
    Echo,
}

impl VehicleKind {
    /// Every kind, in table order.  The random deployment draws from this.
    pub const ALL: [VehicleKind; 5] = [
        VehicleKind::Alpha,
        VehicleKind::Bravo,
        VehicleKind::Charlie,
        VehicleKind::Delta,
        VehicleKind::Echo,
    ];

    pub const fn spec(self) -> VehicleSpec {
        match self {
            VehicleKind::Alpha => VehicleSpec {
                name: "Alpha", cruise_speed: 120.0, battery_capacity: 320.0,
                hours_to_charge: 0.6, energy_use: 1.6, passengers: 4, faults_per_hour: 0.25,
            },
            VehicleKind::Bravo => VehicleSpec {
                name: "Bravo", cruise_speed: 100.0, battery_capacity: 100.0,
                hours_to_charge: 0.2, energy_use: 1.5, passengers: 5, faults_per_hour: 0.10,
            },
            VehicleKind::Charlie => VehicleSpec {
                name: "Charlie", cruise_speed: 160.0, battery_capacity: 220.0,
                hours_to_charge: 0.8, energy_use: 2.2, passengers: 3, faults_per_hour: 0.05,
            },
            VehicleKind::Delta => VehicleSpec {
                name: "Delta", cruise_speed: 90.0, battery_capacity: 120.0,
                hours_to_charge: 0.62, energy_use: 0.8, passengers: 2, faults_per_hour: 0.22,
            },
            VehicleKind::Echo => VehicleSpec {
                name: "Echo", cruise_speed: 30.0, battery_capacity: 150.0,
                hours_to_charge: 0.3, energy_use: 5.8, passengers: 2, faults_per_hour: 0.61,
            },
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    /// The accumulator installed for this kind's type name on first
    /// construction.
    ///
    /// All stock kinds use [`FleetStats`].  A kind whose figures need
    /// different formulas returns its own [`TypeStats`] here.
    pub fn type_stats(self) -> Box<dyn TypeStats> {
        match self {
            VehicleKind::Alpha
            | VehicleKind::Bravo
            | VehicleKind::Charlie
            | VehicleKind::Delta
            | VehicleKind::Echo => Box::new(FleetStats::new()),
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Factory ───────────────────────────────────────────────────────────────────

/// Builds fully-registered vehicles.
pub trait VehicleFactory {
    /// Build a vehicle with fixed config and run its stats registration hook
    /// against `stats`.
    fn create_vehicle(&self, id: VehicleId, stats: &StatsAggregator) -> Vehicle;
}

impl VehicleFactory for VehicleKind {
    fn create_vehicle(&self, id: VehicleId, stats: &StatsAggregator) -> Vehicle {
        let vehicle = Vehicle::new(id, *self);
        vehicle.register_stats(stats);
        vehicle
    }
}
