//! `SimulationEngine` — owns the fleet and drives one timed run.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, Scope, ScopedJoinHandle};

use ev_core::{SimConfig, TickClock, VehicleId};
use ev_fleet::{Vehicle, VehiclePhase};
use ev_stats::{ReportSink, StatEvent, StatsAggregator};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::{
    ChargeStationPool, ChargerReport, DispatcherReport, EngineError, EngineResult, RunnerReport,
    SyncQueue,
};

// ── RunSummary ────────────────────────────────────────────────────────────────

/// What one call to [`SimulationEngine::run`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub vehicles:   usize,
    pub runner:     RunnerReport,
    pub dispatcher: DispatcherReport,
    pub charger:    ChargerReport,
    /// Vehicles whose unfinished run or charge was recorded at shutdown.
    pub in_flight:  usize,
    /// Lines written to the report sink.
    pub report_lines: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vehicles, {} runs completed, {} dispatched, {} charges completed, {} in flight",
            self.vehicles,
            self.runner.runs_completed,
            self.dispatcher.dispatched,
            self.charger.charges_completed,
            self.in_flight,
        )
    }
}

// ── SimulationEngine ──────────────────────────────────────────────────────────

/// The fleet, the three queues, the station pool, and the shared
/// cancellation flag.
///
/// Vehicles live in an arena indexed by [`VehicleId`]; the queues carry ids.
/// Create via [`EngineBuilder`][crate::EngineBuilder].
pub struct SimulationEngine {
    pub(crate) config:            SimConfig,
    pub(crate) clock:             TickClock,
    pub(crate) stats:             Arc<StatsAggregator>,
    pub(crate) vehicles:          Vec<Mutex<Vehicle>>,
    pub(crate) pool:              ChargeStationPool,
    pub(crate) run_queue:         SyncQueue<VehicleId>,
    pub(crate) need_charge_queue: SyncQueue<VehicleId>,
    pub(crate) charge_queue:      SyncQueue<VehicleId>,
    pub(crate) cancel:            AtomicBool,
}

impl SimulationEngine {
    pub(crate) fn new(config: SimConfig, stats: Arc<StatsAggregator>, fleet: Vec<Vehicle>) -> Self {
        Self {
            clock:             config.clock(),
            pool:              ChargeStationPool::new(config.stations),
            vehicles:          fleet.into_iter().map(Mutex::new).collect(),
            run_queue:         SyncQueue::new(),
            need_charge_queue: SyncQueue::new(),
            charge_queue:      SyncQueue::new(),
            cancel:            AtomicBool::new(false),
            config,
            stats,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Copy of one vehicle's current state.
    pub fn vehicle(&self, id: VehicleId) -> Option<Vehicle> {
        self.vehicles.get(id.index()).map(|slot| slot.lock().clone())
    }

    /// Run the pipeline for the configured duration, then report.
    ///
    /// 1. Every vehicle is queued by phase (see
    ///    [`seed_queues`][Self::seed_queues]); a fresh vehicle also gets a
    ///    start recorded.
    /// 2. The three stages start on named threads.
    /// 3. The calling thread sleeps for `duration_secs` ticks of real time.
    /// 4. Cancellation is raised and every blocked wait is woken.
    /// 5. After all stages have exited, unfinished runs and charges are
    ///    recorded and banked, the aggregator's report goes to `sink`, and
    ///    the queues and pool are reset for a later run.
    pub fn run<S: ReportSink + ?Sized>(&mut self, sink: &mut S) -> EngineResult<RunSummary> {
        self.cancel.store(false, Ordering::SeqCst);
        self.seed_queues();

        let real = self.clock.real_duration(self.config.duration());
        info!(
            vehicles = self.vehicles.len(),
            stations = self.pool.total(),
            clock = %self.clock,
            duration = %self.config.duration(),
            real_ms = real.as_millis() as u64,
            "simulation starting",
        );

        let this = &*self;
        let (runner, dispatcher, charger) = thread::scope(|scope| -> EngineResult<_> {
            let runner = spawn_stage(scope, this, "runner", || this.runner_loop())?;
            let dispatcher = spawn_stage(scope, this, "dispatcher", || this.dispatcher_loop())?;
            let charger = spawn_stage(scope, this, "charger", || this.charger_loop())?;

            thread::sleep(real);
            this.shutdown();

            let runner = runner.join();
            let dispatcher = dispatcher.join();
            let charger = charger.join();
            Ok((
                runner.map_err(|_| EngineError::StagePanicked("runner"))?,
                dispatcher.map_err(|_| EngineError::StagePanicked("dispatcher"))?,
                charger.map_err(|_| EngineError::StagePanicked("charger"))?,
            ))
        })?;

        let in_flight = self.record_in_flight();
        self.reset_pipeline();
        let report_lines = self.stats.report(sink)?;

        let summary = RunSummary {
            vehicles: self.vehicles.len(),
            runner,
            dispatcher,
            charger,
            in_flight,
            report_lines,
        };
        info!(%summary, "simulation finished");
        Ok(summary)
    }

    /// Queue every vehicle where its phase says it belongs.
    ///
    /// A running vehicle goes to the run queue; a start is recorded only if
    /// it has not driven yet in this leg.  A depleted vehicle, or one cut off
    /// mid-charge by an earlier shutdown, has no station and goes to the
    /// need-charge queue.  Returns how many vehicles wait for a station.
    pub(crate) fn seed_queues(&self) -> usize {
        let mut awaiting_station = 0;
        for slot in &self.vehicles {
            let vehicle = slot.lock();
            match vehicle.phase() {
                VehiclePhase::Running => {
                    if vehicle.run_elapsed_secs() == 0 {
                        self.stats.record(
                            vehicle.type_name(),
                            &vehicle.sample(),
                            StatEvent::VehicleStarted,
                        );
                    }
                    self.run_queue.push(vehicle.id());
                }
                VehiclePhase::NeedsCharge | VehiclePhase::Charging => {
                    debug!(vehicle = %vehicle.id(), phase = ?vehicle.phase(), "queued for a station");
                    self.need_charge_queue.push(vehicle.id());
                    awaiting_station += 1;
                }
            }
        }
        awaiting_station
    }

    /// Raise cancellation and wake every wait that could be blocking a stage.
    pub(crate) fn shutdown(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        self.pool.stop_all();
        self.run_queue.close();
        self.need_charge_queue.close();
        self.charge_queue.close();
        debug!("shutdown signalled");
    }

    /// Record whatever running or charging time is still on the counters.
    ///
    /// The time is banked, not reset: the leg is unfinished and resumes on a
    /// later run.  Only called once every stage has exited.  Returns how many
    /// vehicles had anything to record.
    pub(crate) fn record_in_flight(&self) -> usize {
        let mut recorded = 0;
        for slot in &self.vehicles {
            let mut vehicle = slot.lock();
            let mut touched = false;
            if vehicle.running_secs() > 0 {
                self.stats.record(vehicle.type_name(), &vehicle.sample(), StatEvent::RunCompleted);
                vehicle.bank_running_time();
                touched = true;
            }
            if vehicle.charging_secs() > 0 {
                self.stats.record(vehicle.type_name(), &vehicle.sample(), StatEvent::ChargeCompleted);
                vehicle.bank_charging_time();
                touched = true;
            }
            if touched {
                recorded += 1;
            }
        }
        debug!(recorded, "in-flight time recorded");
        recorded
    }

    fn reset_pipeline(&self) {
        for queue in [&self.run_queue, &self.need_charge_queue, &self.charge_queue] {
            queue.drain();
            queue.reopen();
        }
        self.pool.reset();
    }
}

/// Spawn one stage on a named scoped thread.
///
/// A spawn failure shuts down whatever already started, so the enclosing
/// scope can join it.
fn spawn_stage<'scope, T, F>(
    scope: &'scope Scope<'scope, '_>,
    engine: &SimulationEngine,
    stage: &'static str,
    body: F,
) -> EngineResult<ScopedJoinHandle<'scope, T>>
where
    F: FnOnce() -> T + Send + 'scope,
    T: Send + 'scope,
{
    thread::Builder::new()
        .name(stage.to_owned())
        .spawn_scoped(scope, body)
        .map_err(|source| {
            engine.shutdown();
            EngineError::Spawn { stage, source }
        })
}
