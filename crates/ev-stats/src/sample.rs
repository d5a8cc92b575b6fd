//! Inputs to the aggregator: what happened, and to which vehicle.

use std::fmt;

/// The stage transitions the pipeline reports.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatEvent {
    /// A vehicle entered the run queue (initial seeding or after a charge).
    VehicleStarted,
    /// A vehicle depleted its battery, or was stopped mid-run at shutdown.
    RunCompleted,
    /// A vehicle acquired a charging station.
    ChargeCycleStarted,
    /// A vehicle finished charging, or was stopped mid-charge at shutdown.
    ChargeCompleted,
}

impl fmt::Display for StatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatEvent::VehicleStarted     => "vehicle_started",
            StatEvent::RunCompleted       => "run_completed",
            StatEvent::ChargeCycleStarted => "charge_cycle_started",
            StatEvent::ChargeCompleted    => "charge_completed",
        };
        f.write_str(name)
    }
}

/// Read-only view of one vehicle at the moment an event is recorded.
///
/// Counters are in simulated seconds.  Built by `Vehicle::sample()` in
/// `ev-fleet`; kept here so the aggregator does not depend on the vehicle
/// crate.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleSample {
    pub running_secs:    u64,
    pub charging_secs:   u64,
    /// Miles per hour.
    pub cruise_speed:    f64,
    pub passengers:      u32,
    pub faults_per_hour: f64,
}
