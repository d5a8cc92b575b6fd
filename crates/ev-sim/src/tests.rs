//! Unit and integration tests for ev-sim.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use ev_core::{SimConfig, VehicleId};
use ev_fleet::{FixedDeployment, Vehicle, VehicleKind};
use ev_stats::{MemorySink, StatEvent, StatsAggregator};

use crate::{Acquisition, ChargeStationPool, EngineBuilder, EngineError, SimulationEngine, SyncQueue};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(duration_secs: u64, stations: usize, tick_millis: u64) -> SimConfig {
    SimConfig {
        duration_secs,
        stations,
        tick_millis,
        seed: Some(42),
        ..SimConfig::default()
    }
}

fn engine_with(kinds: Vec<VehicleKind>, config: SimConfig) -> (SimulationEngine, Arc<StatsAggregator>) {
    let stats = Arc::new(StatsAggregator::new());
    let engine = EngineBuilder::new(config, Arc::clone(&stats))
        .deployment(FixedDeployment::new(kinds))
        .build()
        .unwrap();
    (engine, stats)
}

/// Poll `cond` until it holds or five seconds pass.
fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

// ── SyncQueue ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use super::*;

    #[test]
    fn push_then_try_pop() {
        let q = SyncQueue::new();
        q.push(5u32);
        assert_eq!(q.len(), 1);
        assert_eq!(q.try_pop(), Some(5));
        assert!(q.is_empty());
    }

    #[test]
    fn empty_try_pop_is_none() {
        let q: SyncQueue<u32> = SyncQueue::new();
        assert_eq!(q.try_pop(), None);
    }

    #[test]
    fn fifo_order() {
        let q = SyncQueue::new();
        for i in 0..10u32 {
            q.push(i);
        }
        let out: Vec<u32> = std::iter::from_fn(|| q.try_pop()).collect();
        assert_eq!(out, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn concurrent_producers_lose_nothing() {
        let q = SyncQueue::new();
        thread::scope(|s| {
            for p in 0..4u32 {
                let q = &q;
                s.spawn(move || {
                    for i in 0..1_000u32 {
                        q.push(p * 1_000 + i);
                    }
                });
            }
        });
        let mut all = q.drain();
        assert_eq!(all.len(), 4_000);
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 4_000);
        assert!(q.is_empty());
    }

    #[test]
    fn blocking_pop_waits_for_push() {
        let q = SyncQueue::new();
        let got = thread::scope(|s| {
            let consumer = s.spawn(|| q.pop());
            thread::sleep(Duration::from_millis(20));
            q.push(7u32);
            consumer.join().unwrap()
        });
        assert_eq!(got, Some(7));
    }

    #[test]
    fn close_releases_blocked_pop() {
        let q: SyncQueue<u32> = SyncQueue::new();
        let got = thread::scope(|s| {
            let consumers: Vec<_> = (0..3).map(|_| s.spawn(|| q.pop())).collect();
            thread::sleep(Duration::from_millis(20));
            q.close();
            consumers.into_iter().map(|c| c.join().unwrap()).collect::<Vec<_>>()
        });
        assert_eq!(got, vec![None; 3]);
        assert!(q.is_closed());
    }

    #[test]
    fn closed_queue_still_hands_out_items() {
        let q = SyncQueue::new();
        q.push(1u32);
        q.close();
        q.push(2);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), None);

        q.reopen();
        assert!(!q.is_closed());
        q.push(3);
        assert_eq!(q.pop(), Some(3));
    }
}

// ── ChargeStationPool ─────────────────────────────────────────────────────────

#[cfg(test)]
mod pool {
    use super::*;

    #[test]
    fn acquire_and_release_track_available() {
        let pool = ChargeStationPool::new(2);
        let cancel = AtomicBool::new(false);
        assert_eq!(pool.acquire(&cancel), Acquisition::Acquired);
        assert_eq!(pool.available(), 1);
        pool.release();
        assert_eq!(pool.available(), 2);
        assert_eq!(pool.total(), 2);
    }

    #[test]
    fn release_beyond_total_is_ignored() {
        let pool = ChargeStationPool::new(1);
        pool.release();
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn never_more_holders_than_stations() {
        let pool = ChargeStationPool::new(2);
        let cancel = AtomicBool::new(false);
        let holders = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let done = AtomicUsize::new(0);
        thread::scope(|s| {
            for _ in 0..6 {
                s.spawn(|| {
                    assert!(pool.acquire(&cancel).is_acquired());
                    let now = holders.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(5));
                    holders.fetch_sub(1, Ordering::SeqCst);
                    pool.release();
                    done.fetch_add(1, Ordering::SeqCst);
                });
            }
        });
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(done.load(Ordering::SeqCst), 6);
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn waiter_blocks_until_release() {
        let pool = ChargeStationPool::new(1);
        let cancel = AtomicBool::new(false);
        assert!(pool.acquire(&cancel).is_acquired());
        let acquired = AtomicBool::new(false);
        thread::scope(|s| {
            let waiter = s.spawn(|| {
                let got = pool.acquire(&cancel);
                acquired.store(true, Ordering::SeqCst);
                got
            });
            thread::sleep(Duration::from_millis(30));
            assert!(!acquired.load(Ordering::SeqCst));
            pool.release();
            assert_eq!(waiter.join().unwrap(), Acquisition::Acquired);
        });
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn stop_all_releases_cancelled_waiters() {
        let pool = ChargeStationPool::new(0);
        let cancel = AtomicBool::new(false);
        let results = thread::scope(|s| {
            let waiters: Vec<_> = (0..3).map(|_| s.spawn(|| pool.acquire(&cancel))).collect();
            thread::sleep(Duration::from_millis(20));
            cancel.store(true, Ordering::SeqCst);
            pool.stop_all();
            waiters.into_iter().map(|w| w.join().unwrap()).collect::<Vec<_>>()
        });
        assert_eq!(results, vec![Acquisition::Cancelled; 3]);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn cancellation_wins_over_free_station() {
        let pool = ChargeStationPool::new(3);
        let cancel = AtomicBool::new(true);
        assert_eq!(pool.acquire(&cancel), Acquisition::Cancelled);
        assert_eq!(pool.available(), 3);
    }

    #[test]
    fn reset_frees_every_station() {
        let pool = ChargeStationPool::new(2);
        let cancel = AtomicBool::new(false);
        let _ = pool.acquire(&cancel);
        let _ = pool.acquire(&cancel);
        pool.reset();
        assert_eq!(pool.available(), 2);
    }
}

// ── Stage loops ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod stages {
    use super::*;

    #[test]
    fn runner_routes_depleted_vehicle_to_need_charge() {
        let (engine, stats) = engine_with(vec![VehicleKind::Bravo], test_config(0, 1, 0));
        engine.run_queue.push(VehicleId(0));

        let (reached, report) = thread::scope(|s| {
            let runner = s.spawn(|| engine.runner_loop());
            let reached = wait_until(|| engine.need_charge_queue.len() == 1);
            engine.shutdown();
            (reached, runner.join().unwrap())
        });

        assert!(reached);
        assert_eq!(report.runs_completed, 1);
        assert!(engine.run_queue.is_empty());
        let v = engine.vehicle(VehicleId(0)).unwrap();
        assert_eq!(v.running_secs(), 0);
        assert!(v.needs_charge());
        let snap = stats.snapshot("Bravo").unwrap();
        assert!(snap.passenger_distance > 0.0);
        assert!(snap.total_faults > 0.0);
    }

    #[test]
    fn dispatcher_assigns_free_station() {
        let (engine, stats) = engine_with(vec![VehicleKind::Alpha], test_config(0, 1, 0));
        engine.need_charge_queue.push(VehicleId(0));

        let (reached, report) = thread::scope(|s| {
            let dispatcher = s.spawn(|| engine.dispatcher_loop());
            let reached = wait_until(|| engine.charge_queue.len() == 1);
            engine.shutdown();
            (reached, dispatcher.join().unwrap())
        });

        assert!(reached);
        assert_eq!(report.dispatched, 1);
        assert_eq!(report.abandoned, None);
        assert_eq!(engine.pool.available(), 0);
        assert_eq!(stats.snapshot("Alpha").unwrap().charge_cycles, 1);
    }

    #[test]
    fn dispatcher_leaves_vehicle_unqueued_on_cancel() {
        let (engine, _stats) = engine_with(vec![VehicleKind::Echo], test_config(0, 0, 0));
        engine.need_charge_queue.push(VehicleId(0));

        let (reached, report) = thread::scope(|s| {
            let dispatcher = s.spawn(|| engine.dispatcher_loop());
            let reached = wait_until(|| engine.need_charge_queue.is_empty());
            thread::sleep(Duration::from_millis(10));
            engine.shutdown();
            (reached, dispatcher.join().unwrap())
        });

        assert!(reached);
        assert_eq!(report.abandoned, Some(VehicleId(0)));
        assert_eq!(report.dispatched, 0);
        assert!(engine.need_charge_queue.is_empty());
        assert!(engine.charge_queue.is_empty());
    }

    #[test]
    fn charger_returns_full_vehicle_and_frees_station() {
        let (engine, stats) = engine_with(vec![VehicleKind::Bravo], test_config(0, 1, 0));
        assert!(engine.pool.acquire(&AtomicBool::new(false)).is_acquired());
        let full = Vehicle::new(VehicleId(0), VehicleKind::Bravo).charge_duration_secs().ceil();
        {
            let v = engine.vehicles[0].lock();
            stats.record(v.type_name(), &v.sample(), StatEvent::ChargeCycleStarted);
        }
        engine.charge_queue.push(VehicleId(0));

        let (reached, report) = thread::scope(|s| {
            let charger = s.spawn(|| engine.charger_loop());
            let reached = wait_until(|| engine.run_queue.len() == 1);
            engine.shutdown();
            (reached, charger.join().unwrap())
        });

        assert!(reached);
        assert_eq!(report.charges_completed, 1);
        assert_eq!(engine.pool.available(), 1);
        assert_eq!(engine.vehicle(VehicleId(0)).unwrap().charging_secs(), 0);
        let snap = stats.snapshot("Bravo").unwrap();
        assert_eq!(snap.runs, 1);
        assert_eq!(snap.average_charge_secs, full);
    }

    #[test]
    fn in_flight_time_is_recorded_once() {
        let (engine, stats) = engine_with(vec![VehicleKind::Alpha, VehicleKind::Alpha], test_config(0, 1, 0));
        {
            let mut v = engine.vehicles[0].lock();
            for _ in 0..3_600 {
                v.run();
            }
        }
        assert_eq!(engine.record_in_flight(), 1);
        assert_eq!(engine.record_in_flight(), 0);
        let snap = stats.snapshot("Alpha").unwrap();
        // One hour at 120 mph, four passengers.
        assert_eq!(snap.runs, 0);
        assert!((snap.passenger_distance - 480.0).abs() < 1e-9);
    }
}

// ── Builder & full runs ───────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use super::*;

    #[test]
    fn empty_fleet_is_rejected() {
        let stats = Arc::new(StatsAggregator::new());
        let built = EngineBuilder::new(test_config(10, 1, 1), stats).vehicles(Vec::new()).build();
        assert!(matches!(built, Err(EngineError::EmptyFleet)));
    }

    #[test]
    fn zero_fleet_size_fails_validation() {
        let stats = Arc::new(StatsAggregator::new());
        let config = SimConfig { fleet_size: 0, ..test_config(10, 1, 1) };
        let built = EngineBuilder::new(config, stats).build();
        assert!(matches!(built, Err(EngineError::Core(_))));
    }

    #[test]
    fn explicit_vehicles_are_renumbered_and_registered() {
        let stats = Arc::new(StatsAggregator::new());
        let vehicles = vec![
            Vehicle::new(VehicleId(7), VehicleKind::Charlie),
            Vehicle::new(VehicleId(9), VehicleKind::Delta),
        ];
        let engine = EngineBuilder::new(test_config(10, 1, 1), Arc::clone(&stats))
            .vehicles(vehicles)
            .build()
            .unwrap();
        assert_eq!(engine.vehicle_count(), 2);
        assert_eq!(engine.vehicle(VehicleId(1)).unwrap().id(), VehicleId(1));
        assert_eq!(engine.vehicle(VehicleId(1)).unwrap().kind(), VehicleKind::Delta);
        assert!(engine.vehicle(VehicleId(2)).is_none());
        assert!(stats.contains("Charlie"));
        assert!(stats.contains("Delta"));
    }

    #[test]
    fn default_deployment_uses_fleet_size_and_seed() {
        let kinds = |seed| {
            let config = SimConfig { fleet_size: 12, seed: Some(seed), ..SimConfig::default() };
            let engine = EngineBuilder::new(config, Arc::new(StatsAggregator::new())).build().unwrap();
            (0..engine.vehicle_count())
                .map(|i| engine.vehicle(VehicleId(i as u32)).unwrap().kind())
                .collect::<Vec<_>>()
        };
        let a = kinds(5);
        assert_eq!(a.len(), 12);
        assert_eq!(a, kinds(5));
    }

    #[test]
    fn zero_duration_run_reports_every_type() {
        let (mut engine, stats) =
            engine_with(vec![VehicleKind::Echo, VehicleKind::Alpha], test_config(0, 1, 1));
        let mut sink = MemorySink::new();
        let summary = engine.run(&mut sink).unwrap();

        assert_eq!(summary.vehicles, 2);
        assert_eq!(summary.report_lines, 2);
        assert!(sink.lines[0].starts_with("Alpha"));
        assert!(sink.lines[1].starts_with("Echo"));
        assert_eq!(stats.snapshot("Alpha").unwrap().runs, 1);
        assert_eq!(stats.snapshot("Echo").unwrap().runs, 1);
    }

    #[test]
    fn short_run_leaves_engine_reusable() {
        let (mut engine, stats) = engine_with(vec![VehicleKind::Bravo], test_config(20, 1, 1));
        let mut sink = MemorySink::new();
        let first = engine.run(&mut sink).unwrap();

        assert_eq!(first.runner.runs_completed, 0);
        assert_eq!(first.dispatcher.dispatched, 0);
        assert!(first.in_flight <= 1);
        assert!(sink.lines[0].contains("runs: 1"));
        assert!(engine.run_queue.is_empty());
        assert!(!engine.run_queue.is_closed());
        assert_eq!(engine.pool.available(), 1);
        let after_first = engine.vehicle(VehicleId(0)).unwrap();
        assert_eq!(after_first.running_secs(), 0);

        engine.run(&mut sink).unwrap();
        assert_eq!(sink.lines.len(), 2);
        // A vehicle that was mid-drive resumes its run instead of starting a new one.
        let expected_runs = if after_first.run_elapsed_secs() > 0 { 1 } else { 2 };
        assert_eq!(stats.snapshot("Bravo").unwrap().runs, expected_runs);
        let after_second = engine.vehicle(VehicleId(0)).unwrap();
        assert!(after_second.run_elapsed_secs() >= after_first.run_elapsed_secs());
    }

    #[test]
    fn rerun_sends_depleted_vehicle_to_need_charge() {
        let (mut engine, stats) = engine_with(vec![VehicleKind::Bravo], test_config(5, 0, 1));
        {
            let mut v = engine.vehicles[0].lock();
            while !v.needs_charge() {
                v.run();
            }
            v.reset_running_time();
        }

        assert_eq!(engine.seed_queues(), 1);
        assert!(engine.run_queue.is_empty());
        assert_eq!(engine.need_charge_queue.len(), 1);
        assert_eq!(stats.snapshot("Bravo").unwrap().runs, 0);
        engine.need_charge_queue.drain();

        let mut sink = MemorySink::new();
        for _ in 0..2 {
            let summary = engine.run(&mut sink).unwrap();
            assert_eq!(summary.runner.runs_completed, 0);
            assert_eq!(summary.dispatcher.dispatched, 0);
            let v = engine.vehicle(VehicleId(0)).unwrap();
            assert!(v.needs_charge());
            assert_eq!(v.battery_ratio(), 0.0);
            assert_eq!(v.running_secs(), 0);
        }
        assert_eq!(stats.snapshot("Bravo").unwrap().runs, 0);
    }

    #[test]
    fn rerun_resumes_interrupted_charge() {
        let (mut engine, stats) = engine_with(vec![VehicleKind::Bravo], test_config(0, 1, 1));
        {
            let mut v = engine.vehicles[0].lock();
            while !v.needs_charge() {
                v.run();
            }
            v.reset_running_time();
            stats.record(v.type_name(), &v.sample(), StatEvent::ChargeCycleStarted);
            for _ in 0..100 {
                v.charge();
            }
        }
        assert_eq!(engine.record_in_flight(), 1);
        let v = engine.vehicle(VehicleId(0)).unwrap();
        assert_eq!(v.charging_secs(), 0);
        assert_eq!(v.charge_elapsed_secs(), 100);

        assert_eq!(engine.seed_queues(), 1);
        assert!(engine.run_queue.is_empty());
        assert_eq!(engine.need_charge_queue.len(), 1);

        let (reached, report) = thread::scope(|s| {
            let dispatcher = s.spawn(|| engine.dispatcher_loop());
            let reached = wait_until(|| engine.charge_queue.len() == 1);
            engine.shutdown();
            (reached, dispatcher.join().unwrap())
        });
        assert!(reached);
        assert_eq!(report.dispatched, 1);
        // The resumed charge is still the same cycle.
        assert_eq!(stats.snapshot("Bravo").unwrap().charge_cycles, 1);
    }

    #[test]
    fn full_cycle_through_every_stage() {
        // Bravo drains in 2400 s and charges in 720 s; leave ample real time
        // for both legs at 1 ms per tick.
        let (mut engine, stats) = engine_with(vec![VehicleKind::Bravo], test_config(6_000, 1, 1));
        let mut sink = MemorySink::new();
        let summary = engine.run(&mut sink).unwrap();

        assert!(summary.runner.runs_completed >= 1);
        assert!(summary.dispatcher.dispatched >= 1);
        assert!(summary.charger.charges_completed >= 1);
        assert!(summary.charger.charges_completed <= summary.dispatcher.dispatched);
        assert!(summary.dispatcher.dispatched <= summary.runner.runs_completed);
        assert_eq!(engine.pool.available(), 1);

        let snap = stats.snapshot("Bravo").unwrap();
        assert_eq!(snap.runs, 1 + summary.charger.charges_completed);
        assert_eq!(snap.charge_cycles, summary.dispatcher.dispatched);
        assert!(snap.average_charge_secs > 0.0);
        assert!(snap.passenger_distance > 0.0);
        assert!(sink.lines[0].starts_with("Bravo"));
    }
}
