//! `ev-sim` — the concurrent run/dispatch/charge pipeline.
//!
//! # Three-stage pipeline
//!
//! ```text
//!            ┌──────────── run queue ◄──────────────────────────┐
//!            ▼                                                  │
//!   ① Runner   — run() each queued vehicle once per pass;       │
//!                depleted → need-charge queue                   │
//!            ▼                                                  │
//!   ② Dispatcher — poll need-charge queue; block on the         │
//!                  station pool; → charge queue                 │
//!            ▼                                                  │
//!   ③ Charger  — charge() each queued vehicle once per pass;    │
//!                full → release station ────────────────────────┘
//! ```
//!
//! Each stage is one named OS thread.  Vehicles live in the engine's arena;
//! queues carry [`VehicleId`][ev_core::VehicleId] handles only, and a
//! vehicle's id is in at most one queue or one stage's hands at any moment.
//! Shutdown is cooperative: one shared cancellation flag, checked at every
//! pass, every vehicle, and inside the station wait.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ev_core::SimConfig;
//! use ev_sim::EngineBuilder;
//! use ev_stats::{StatsAggregator, TextLogSink};
//!
//! let stats = Arc::new(StatsAggregator::new());
//! let mut engine = EngineBuilder::new(config.clone(), Arc::clone(&stats)).build()?;
//! let mut sink = TextLogSink::new(&config.log_path)?;
//! let summary = engine.run(&mut sink)?;
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod queue;
pub mod stages;
pub mod station;

#[cfg(test)]
mod tests;

pub use builder::EngineBuilder;
pub use engine::{RunSummary, SimulationEngine};
pub use error::{EngineError, EngineResult};
pub use queue::SyncQueue;
pub use stages::{ChargerReport, DispatcherReport, RunnerReport};
pub use station::{Acquisition, ChargeStationPool};
