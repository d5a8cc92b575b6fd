//! The three stage loops.
//!
//! Each loop runs on its own thread and borrows the engine immutably; all
//! shared state it touches is behind the engine's queues, pool, vehicle
//! mutexes, or the aggregator's lock.  Lock order is always
//! vehicle → aggregator; queue and pool locks are never held across either.

use std::sync::atomic::Ordering;

use ev_core::VehicleId;
use ev_stats::StatEvent;
use tracing::{debug, trace, warn};

use crate::{Acquisition, SimulationEngine};

// ── Per-stage counters ────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunnerReport {
    /// Passes over the run queue, including empty ones.
    pub passes:         u64,
    /// Vehicles handed to the need-charge queue.
    pub runs_completed: u64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatcherReport {
    /// Vehicles that got a station and moved to the charge queue.
    pub dispatched: u64,
    /// Vehicle held while cancellation interrupted the station wait.
    pub abandoned:  Option<VehicleId>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChargerReport {
    pub passes:            u64,
    /// Vehicles returned to the run queue after a full charge.
    pub charges_completed: u64,
}

// ── Loops ─────────────────────────────────────────────────────────────────────

impl SimulationEngine {
    #[inline]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// ① Advance every queued vehicle by one running tick per pass.
    ///
    /// The pass size is the queue length sampled at the start of the pass;
    /// vehicles re-queued during the pass are not seen again until the next.
    pub(crate) fn runner_loop(&self) -> RunnerReport {
        let mut report = RunnerReport::default();
        while !self.is_cancelled() {
            let batch = self.run_queue.len();
            for _ in 0..batch {
                if self.is_cancelled() {
                    break;
                }
                let Some(id) = self.run_queue.try_pop() else {
                    break;
                };
                let mut vehicle = self.vehicles[id.index()].lock();
                vehicle.run();
                if vehicle.needs_charge() {
                    self.stats.record(vehicle.type_name(), &vehicle.sample(), StatEvent::RunCompleted);
                    debug!(vehicle = %id, running_secs = vehicle.running_secs(), "battery depleted");
                    vehicle.reset_running_time();
                    drop(vehicle);
                    self.need_charge_queue.push(id);
                    report.runs_completed += 1;
                } else {
                    drop(vehicle);
                    self.run_queue.push(id);
                }
            }
            report.passes += 1;
            self.clock.sleep_tick();
        }
        trace!(?report, "runner stopped");
        report
    }

    /// ② Move depleted vehicles to the charge queue as stations free up.
    ///
    /// Handles one vehicle at a time and blocks on the pool while holding it.
    /// A vehicle held when cancellation interrupts the wait is not re-queued.
    pub(crate) fn dispatcher_loop(&self) -> DispatcherReport {
        let mut report = DispatcherReport::default();
        while !self.is_cancelled() {
            let Some(id) = self.need_charge_queue.try_pop() else {
                self.clock.sleep_tick();
                continue;
            };
            match self.pool.acquire(&self.cancel) {
                Acquisition::Acquired => {
                    let vehicle = self.vehicles[id.index()].lock();
                    // A charge resumed from an earlier run was already counted.
                    if vehicle.charge_elapsed_secs() == 0 {
                        self.stats.record(
                            vehicle.type_name(),
                            &vehicle.sample(),
                            StatEvent::ChargeCycleStarted,
                        );
                    }
                    drop(vehicle);
                    debug!(vehicle = %id, "station assigned");
                    self.charge_queue.push(id);
                    report.dispatched += 1;
                }
                Acquisition::Cancelled => {
                    warn!(vehicle = %id, "shutdown while waiting for a station; vehicle left unqueued");
                    report.abandoned = Some(id);
                    break;
                }
            }
        }
        trace!(?report, "dispatcher stopped");
        report
    }

    /// ③ Advance every charging vehicle by one charging tick per pass.
    ///
    /// A fully charged vehicle gives its station back before it is re-queued.
    pub(crate) fn charger_loop(&self) -> ChargerReport {
        let mut report = ChargerReport::default();
        while !self.is_cancelled() {
            let batch = self.charge_queue.len();
            for _ in 0..batch {
                if self.is_cancelled() {
                    break;
                }
                let Some(id) = self.charge_queue.try_pop() else {
                    break;
                };
                let mut vehicle = self.vehicles[id.index()].lock();
                vehicle.charge();
                if vehicle.is_fully_charged() {
                    self.pool.release();
                    let sample = vehicle.sample();
                    self.stats.record(vehicle.type_name(), &sample, StatEvent::ChargeCompleted);
                    self.stats.record(vehicle.type_name(), &sample, StatEvent::VehicleStarted);
                    debug!(vehicle = %id, charging_secs = vehicle.charging_secs(), "fully charged");
                    vehicle.reset_charging_time();
                    drop(vehicle);
                    self.run_queue.push(id);
                    report.charges_completed += 1;
                } else {
                    drop(vehicle);
                    self.charge_queue.push(id);
                }
            }
            report.passes += 1;
            self.clock.sleep_tick();
        }
        trace!(?report, "charger stopped");
        report
    }
}
