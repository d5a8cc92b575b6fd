//! The per-vehicle run/charge state machine.

use std::fmt;

use ev_core::{Tick, VehicleId};
use ev_stats::{StatsAggregator, VehicleSample};
use tracing::debug;

use crate::{VehicleKind, VehicleSpec};

/// Which leg of the cycle a vehicle is in, derived from its battery ratio.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VehiclePhase {
    /// Battery above empty; `run()` may be called.
    Running,
    /// Battery empty; waiting for a station.
    NeedsCharge,
    /// Partially recharged.
    Charging,
}

/// One simulated vehicle.
///
/// Config is fixed at construction; the mutable part is the per-cycle
/// counters and the battery ratio.  The running counter is reset once per
/// completed run and the charging counter once per completed charge, by the
/// pipeline stage that observes the transition.
///
/// Each counter holds only time not yet handed to the aggregator.  Time that
/// was recorded mid-leg (at shutdown) is banked, so the leg's thresholds
/// still see the whole elapsed time when the vehicle resumes.
#[derive(Clone, Debug)]
pub struct Vehicle {
    id:                 VehicleId,
    kind:               VehicleKind,
    spec:               VehicleSpec,
    running_secs:       u64,
    charging_secs:      u64,
    banked_run_secs:    u64,
    banked_charge_secs: u64,
    /// In [0, 1].  Exactly 0 only after the drive threshold is crossed,
    /// exactly 1 only when new or after the charge threshold is crossed.
    battery:            f64,
    tick_secs:          u64,
}

impl Vehicle {
    /// A fully charged vehicle of `kind`.
    ///
    /// Does not touch any aggregator; go through
    /// [`VehicleFactory`][crate::VehicleFactory] to also run
    /// [`register_stats`][Self::register_stats].
    pub fn new(id: VehicleId, kind: VehicleKind) -> Self {
        Self {
            id,
            kind,
            spec:               kind.spec(),
            running_secs:       0,
            charging_secs:      0,
            banked_run_secs:    0,
            banked_charge_secs: 0,
            battery:            1.0,
            tick_secs:          Tick::SECS,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Re-home the vehicle in a new arena slot.
    pub fn set_id(&mut self, id: VehicleId) {
        self.id = id;
    }

    #[inline]
    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    #[inline]
    pub fn spec(&self) -> &VehicleSpec {
        &self.spec
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.spec.name
    }

    #[inline]
    pub fn running_secs(&self) -> u64 {
        self.running_secs
    }

    #[inline]
    pub fn charging_secs(&self) -> u64 {
        self.charging_secs
    }

    /// Simulated seconds driven in the current leg, recorded or not.
    #[inline]
    pub fn run_elapsed_secs(&self) -> u64 {
        self.banked_run_secs + self.running_secs
    }

    /// Simulated seconds charged in the current leg, recorded or not.
    #[inline]
    pub fn charge_elapsed_secs(&self) -> u64 {
        self.banked_charge_secs + self.charging_secs
    }

    #[inline]
    pub fn battery_ratio(&self) -> f64 {
        self.battery
    }

    // ── Thresholds ────────────────────────────────────────────────────────

    /// Simulated seconds a full battery lasts at cruise speed:
    /// `3600 · (capacity / energy_use) / cruise_speed`.
    pub fn drive_duration_secs(&self) -> f64 {
        3_600.0 * (self.spec.battery_capacity / self.spec.energy_use) / self.spec.cruise_speed
    }

    /// Simulated seconds from empty to full, never less than one.
    pub fn charge_duration_secs(&self) -> f64 {
        (self.spec.hours_to_charge * 3_600.0).max(1.0)
    }

    // ── Step functions ────────────────────────────────────────────────────

    /// Drive for one tick.
    ///
    /// An empty battery stays empty; only `charge()` raises it.
    pub fn run(&mut self) {
        self.running_secs += self.tick_secs;
        let drive = self.drive_duration_secs();
        let elapsed = self.run_elapsed_secs() as f64;
        self.battery = if self.battery <= 0.0 || elapsed >= drive {
            0.0
        } else {
            // Never rises while driving, and stays strictly above empty.
            self.battery.min(1.0 - elapsed / drive).max(f64::MIN_POSITIVE)
        };
    }

    /// Charge for one tick.
    pub fn charge(&mut self) {
        self.charging_secs += self.tick_secs;
        let full = self.charge_duration_secs();
        let elapsed = self.charge_elapsed_secs() as f64;
        self.battery = if elapsed >= full {
            1.0
        } else {
            // Strictly below full until the threshold is crossed.
            self.battery.max(elapsed / full).min(1.0 - f64::EPSILON)
        };
    }

    // ── Predicates ────────────────────────────────────────────────────────

    #[inline]
    pub fn needs_charge(&self) -> bool {
        self.battery <= 0.0
    }

    #[inline]
    pub fn is_fully_charged(&self) -> bool {
        self.battery >= 1.0
    }

    pub fn phase(&self) -> VehiclePhase {
        if self.needs_charge() {
            VehiclePhase::NeedsCharge
        } else if self.charge_elapsed_secs() > 0 {
            VehiclePhase::Charging
        } else {
            VehiclePhase::Running
        }
    }

    // ── Half-cycle resets ─────────────────────────────────────────────────

    /// Clear the running counter after its run has been recorded.
    pub fn reset_running_time(&mut self) {
        self.running_secs = 0;
        self.banked_run_secs = 0;
    }

    /// Clear the charging counter after its charge has been recorded.
    pub fn reset_charging_time(&mut self) {
        self.charging_secs = 0;
        self.banked_charge_secs = 0;
    }

    /// Move recorded running time out of the counter without ending the run.
    pub fn bank_running_time(&mut self) {
        self.banked_run_secs += self.running_secs;
        self.running_secs = 0;
    }

    /// Move recorded charging time out of the counter without ending the
    /// charge.
    pub fn bank_charging_time(&mut self) {
        self.banked_charge_secs += self.charging_secs;
        self.charging_secs = 0;
    }

    // ── Stats hooks ───────────────────────────────────────────────────────

    /// Install this vehicle's type entry in `stats` if none exists yet.
    ///
    /// Called once per vehicle by the factory.  The accumulator comes from
    /// [`VehicleKind::type_stats`]; a type that is already registered keeps
    /// its existing entry.
    pub fn register_stats(&self, stats: &StatsAggregator) {
        if stats.register(self.type_name(), self.kind.type_stats()) {
            debug!(vehicle = %self.id, vehicle_type = self.type_name(), "installed stats entry");
        }
    }

    /// The aggregator's view of this vehicle right now.
    pub fn sample(&self) -> VehicleSample {
        VehicleSample {
            running_secs:    self.running_secs,
            charging_secs:   self.charging_secs,
            cruise_speed:    self.spec.cruise_speed,
            passengers:      self.spec.passengers,
            faults_per_hour: self.spec.faults_per_hour,
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({:.0}%)", self.kind, self.id, self.battery * 100.0)
    }
}
