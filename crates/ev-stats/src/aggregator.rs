//! `StatsAggregator` — the thread-safe type name → [`TypeStats`] map.
//!
//! # Locking
//!
//! One `parking_lot::Mutex` guards the whole map and every entry in it.
//! Get-or-create and the first write therefore happen under the same lock,
//! and two stages recording against a brand-new type cannot both insert.
//! The lock is independent of the pipeline's queue and pool locks, so stats
//! contention never stalls a stage while it holds a pipeline lock.
//!
//! Reports copy the summary lines out under the lock and write them to the
//! sink after releasing it; sink I/O never blocks `record`.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::{FleetStats, ReportSink, StatEvent, StatsResult, StatsSnapshot, TypeStats, VehicleSample};

/// Process-wide statistics, shared by `Arc` between the engine, its stages,
/// and the vehicle registration hook.
#[derive(Default)]
pub struct StatsAggregator {
    entries: Mutex<BTreeMap<String, Box<dyn TypeStats>>>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `stats` as the accumulator for `type_name`.
    ///
    /// First registration wins: if the type already has an entry (registered
    /// earlier or created lazily by [`record`][Self::record]), `stats` is
    /// dropped and `false` is returned.
    pub fn register(&self, type_name: &str, stats: Box<dyn TypeStats>) -> bool {
        let mut entries = self.entries.lock();
        if entries.contains_key(type_name) {
            return false;
        }
        entries.insert(type_name.to_owned(), stats);
        debug!(vehicle_type = type_name, "registered stats entry");
        true
    }

    /// Fold `event` into `type_name`'s entry, creating a default
    /// [`FleetStats`] entry first if the type has never been seen.
    pub fn record(&self, type_name: &str, sample: &VehicleSample, event: StatEvent) {
        let mut entries = self.entries.lock();
        if let Some(stats) = entries.get_mut(type_name) {
            stats.record(sample, event);
            return;
        }
        let mut stats: Box<dyn TypeStats> = Box::new(FleetStats::new());
        stats.record(sample, event);
        entries.insert(type_name.to_owned(), stats);
    }

    /// Write `type_name`'s summary line to `sink`.
    ///
    /// Returns `Ok(false)` without writing if the type has no entry.
    pub fn log<S: ReportSink + ?Sized>(&self, type_name: &str, sink: &mut S) -> StatsResult<bool> {
        let line = {
            let entries = self.entries.lock();
            match entries.get(type_name) {
                Some(stats) => stats.summary_line(type_name),
                None => return Ok(false),
            }
        };
        sink.write_line(&line)?;
        Ok(true)
    }

    /// Write every type's summary line to `sink` in type-name order, then
    /// call `sink.finish()`.  Returns the number of lines written.
    pub fn report<S: ReportSink + ?Sized>(&self, sink: &mut S) -> StatsResult<usize> {
        let lines: Vec<String> = {
            let entries = self.entries.lock();
            entries
                .iter()
                .map(|(name, stats)| stats.summary_line(name))
                .collect()
        };
        for line in &lines {
            sink.write_line(line)?;
        }
        sink.finish()?;
        Ok(lines.len())
    }

    /// Snapshot one type's figures, or `None` if it has never been seen.
    pub fn snapshot(&self, type_name: &str) -> Option<StatsSnapshot> {
        self.entries
            .lock()
            .get(type_name)
            .map(|stats| stats.snapshot(type_name))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.lock().contains_key(type_name)
    }

    /// Number of types with an entry.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
