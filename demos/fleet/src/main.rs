//! fleet — run the EV fleet charging simulation from the command line.
//!
//! ```text
//! fleet [duration_secs] [stations] [tick_millis]
//! ```
//!
//! Defaults are 2000 simulated seconds, 3 stations, and 10 ms of real time
//! per simulated second.  Unparseable values fall back to their default.
//!
//! | Variable     | Effect                                        |
//! |--------------|-----------------------------------------------|
//! | `FLEET_SEED` | Seed for the random deployment                |
//! | `FLEET_LOG`  | Stats log path (default `stats_log.txt`)      |
//! | `RUST_LOG`   | Log filter for stderr diagnostics (`info`)    |
//!
//! The per-type report goes to stdout and is appended to the stats log.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ev_core::SimConfig;
use ev_sim::EngineBuilder;
use ev_stats::{StatsAggregator, TextLogSink};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .init();
}

/// Positional arguments first, then environment overrides.
fn load_config() -> Result<SimConfig> {
    let mut config = SimConfig::from_args(std::env::args().skip(1));

    if let Ok(raw) = std::env::var("FLEET_SEED") {
        match raw.trim().parse::<u64>() {
            Ok(seed) => config.seed = Some(seed),
            Err(_) => warn!(value = %raw, "ignoring unparseable FLEET_SEED"),
        }
    }
    if let Some(path) = std::env::var_os("FLEET_LOG") {
        config.log_path = PathBuf::from(path);
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    init_logging();

    let config = load_config()?;
    info!(
        duration_secs = config.duration_secs,
        stations = config.stations,
        tick_millis = config.tick_millis,
        fleet_size = config.fleet_size,
        seed = ?config.seed,
        log_path = %config.log_path.display(),
        "configuration loaded",
    );

    let stats = Arc::new(StatsAggregator::new());
    let mut engine = EngineBuilder::new(config.clone(), Arc::clone(&stats))
        .build()
        .context("building simulation")?;
    let mut sink = TextLogSink::new(&config.log_path)
        .with_context(|| format!("opening {}", config.log_path.display()))?;

    let started = Instant::now();
    let summary = engine.run(&mut sink).context("simulation run")?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, %summary, "done");

    println!("Simulation completed");
    Ok(())
}
