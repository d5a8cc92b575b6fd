//! `ev-stats` — per-vehicle-type statistics for the EV fleet simulation.
//!
//! Every pipeline stage transition records a [`StatEvent`] against the
//! vehicle's type name.  The [`StatsAggregator`] keeps one [`TypeStats`]
//! entry per type, created lazily on first use, and renders a summary line
//! per type into any [`ReportSink`] at the end of the run.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`sample`]     | `VehicleSample`, `StatEvent`                               |
//! | [`stats`]      | `TypeStats` trait, `FleetStats` default, `StatsSnapshot`   |
//! | [`aggregator`] | `StatsAggregator` (thread-safe type → stats map)           |
//! | [`sink`]       | `ReportSink` trait, `TextLogSink`, `MemorySink`            |
//! | [`error`]      | `StatsError`, `StatsResult<T>`                             |
//!
//! # Usage
//!
//! ```rust,ignore
//! use ev_stats::{StatsAggregator, TextLogSink};
//!
//! let stats = Arc::new(StatsAggregator::new());
//! // ... run the engine, which records events ...
//! let mut sink = TextLogSink::new(Path::new("stats_log.txt"))?;
//! stats.report(&mut sink)?;
//! ```

pub mod aggregator;
pub mod error;
pub mod sample;
pub mod sink;
pub mod stats;


pub use aggregator::StatsAggregator;
pub use error::{StatsError, StatsResult};
pub use sample::{StatEvent, VehicleSample};
pub use sink::{MemorySink, ReportSink, TextLogSink};
pub use stats::{FleetStats, StatsSnapshot, TypeStats};
