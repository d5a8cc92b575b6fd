//! The `TypeStats` capability and its default accumulator.

use std::fmt;

use crate::{StatEvent, VehicleSample};

const SECS_PER_HOUR: f64 = 3_600.0;

/// Per-type accumulator installed in the [`StatsAggregator`][crate::StatsAggregator].
///
/// One instance exists per vehicle type.  The aggregator serialises every
/// call, so implementations hold plain fields and need no locking of their
/// own.
///
/// [`FleetStats`] is the only implementation the five stock vehicle kinds
/// use.  A kind that needs different accumulation formulas supplies its own
/// implementation from `VehicleKind::type_stats()` in `ev-fleet`; the first
/// registration for a type name wins.
pub trait TypeStats: Send + 'static {
    /// Fold one event into the running totals.
    fn record(&mut self, sample: &VehicleSample, event: StatEvent);

    /// Copy the derived figures out.  Must not mutate.
    fn snapshot(&self, type_name: &str) -> StatsSnapshot;

    /// The line written to the report sink for this type.
    fn summary_line(&self, type_name: &str) -> String {
        self.snapshot(type_name).to_string()
    }
}

// ── FleetStats ────────────────────────────────────────────────────────────────

/// Default accumulator: running totals plus averages recomputed on every
/// event, so the derived figures are correct after each call rather than
/// only at the end of the run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FleetStats {
    pub runs:                u64,
    pub total_run_secs:      f64,
    pub average_run_secs:    f64,
    pub total_distance:      f64,
    pub average_distance:    f64,
    pub total_faults:        f64,
    pub passenger_distance:  f64,
    pub charge_cycles:       u64,
    pub total_charge_secs:   f64,
    pub average_charge_secs: f64,
}

impl FleetStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn refresh_run_average(&mut self) {
        self.average_run_secs = ratio(self.total_run_secs, self.runs);
    }

    fn refresh_charge_average(&mut self) {
        self.average_charge_secs = ratio(self.total_charge_secs, self.charge_cycles);
    }
}

impl TypeStats for FleetStats {
    fn record(&mut self, sample: &VehicleSample, event: StatEvent) {
        match event {
            StatEvent::VehicleStarted => {
                self.runs += 1;
                self.refresh_run_average();
            }
            StatEvent::RunCompleted => {
                self.total_run_secs += sample.running_secs as f64;
                self.refresh_run_average();

                // Distance-derived figures come from the type's cumulative
                // drive time and this type's (fixed) config.
                let hours = self.total_run_secs / SECS_PER_HOUR;
                self.total_distance     = hours * sample.cruise_speed;
                self.average_distance   = ratio(self.total_distance, self.runs);
                self.total_faults       = hours * sample.faults_per_hour;
                self.passenger_distance = self.total_distance * sample.passengers as f64;
            }
            StatEvent::ChargeCycleStarted => {
                self.charge_cycles += 1;
                self.refresh_charge_average();
            }
            StatEvent::ChargeCompleted => {
                self.total_charge_secs += sample.charging_secs as f64;
                self.refresh_charge_average();
            }
        }
    }

    fn snapshot(&self, type_name: &str) -> StatsSnapshot {
        StatsSnapshot {
            type_name:           type_name.to_owned(),
            average_run_secs:    self.average_run_secs,
            runs:                self.runs,
            charge_cycles:       self.charge_cycles,
            average_distance:    self.average_distance,
            average_charge_secs: self.average_charge_secs,
            total_faults:        self.total_faults,
            passenger_distance:  self.passenger_distance,
        }
    }
}

/// `num / den`, or 0 when nothing has been counted yet.
#[inline]
fn ratio(num: f64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num / den as f64 }
}

// ── StatsSnapshot ─────────────────────────────────────────────────────────────

/// Plain-data copy of one type's figures, as reported at the end of a run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    pub type_name:           String,
    /// Simulated seconds.
    pub average_run_secs:    f64,
    /// Run cycles begun (initial seeding plus one per completed charge).
    pub runs:                u64,
    pub charge_cycles:       u64,
    /// Miles.
    pub average_distance:    f64,
    /// Simulated seconds.
    pub average_charge_secs: f64,
    pub total_faults:        f64,
    /// Passenger-miles.
    pub passenger_distance:  f64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> average_time: {:.2} s  runs: {}  charge_cycles: {}  \
             average_distance: {:.2} miles  average_charge_time: {:.2} s  \
             total_faults: {:.4}  passenger_miles: {:.2} miles",
            self.type_name,
            self.average_run_secs,
            self.runs,
            self.charge_cycles,
            self.average_distance,
            self.average_charge_secs,
            self.total_faults,
            self.passenger_distance,
        )
    }
}
