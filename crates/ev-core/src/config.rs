//! Run configuration and positional argument parsing.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::{EvError, EvResult, Tick, TickClock};

/// Default simulated run length in seconds.
pub const DEFAULT_DURATION_SECS: u64 = 2_000;
/// Default number of charging stations.
pub const DEFAULT_STATIONS: usize = 3;
/// Default real milliseconds per simulated second.
pub const DEFAULT_TICK_MILLIS: u64 = 10;
/// Default number of vehicles drawn by the random deployment.
pub const DEFAULT_FLEET_SIZE: usize = 20;
/// Default append-only report file.
pub const DEFAULT_LOG_PATH: &str = "stats_log.txt";

/// Top-level simulation configuration.
///
/// Built from command-line positionals by [`SimConfig::from_args`], then
/// optionally adjusted by the application (seed, log path) before being
/// handed to the engine builder.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated seconds to run before shutdown.
    pub duration_secs: u64,

    /// Number of charging stations in the pool.
    pub stations: usize,

    /// Real milliseconds one simulated second takes.
    pub tick_millis: u64,

    /// Vehicles drawn by the default random deployment.
    pub fleet_size: usize,

    /// Deployment RNG seed.  `None` draws from OS entropy.
    pub seed: Option<u64>,

    /// Report lines are appended here at the end of the run.
    pub log_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            stations:      DEFAULT_STATIONS,
            tick_millis:   DEFAULT_TICK_MILLIS,
            fleet_size:    DEFAULT_FLEET_SIZE,
            seed:          None,
            log_path:      PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl SimConfig {
    /// Parse `[duration_secs] [stations] [tick_millis]` (program name already
    /// stripped).
    ///
    /// Each value is optional and independent.  A value that is not a
    /// non-negative integer falls back to its default; this never fails.
    /// Extra positionals are ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        if let Some(arg) = args.next() {
            config.duration_secs = parse_or(arg.as_ref(), "duration_secs", DEFAULT_DURATION_SECS);
        }
        if let Some(arg) = args.next() {
            config.stations = parse_or(arg.as_ref(), "stations", DEFAULT_STATIONS);
        }
        if let Some(arg) = args.next() {
            config.tick_millis = parse_or(arg.as_ref(), "tick_millis", DEFAULT_TICK_MILLIS);
        }
        config
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> EvResult<()> {
        if self.fleet_size == 0 {
            return Err(EvError::Config("fleet_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Simulated run length.
    #[inline]
    pub fn duration(&self) -> Tick {
        Tick(self.duration_secs)
    }

    /// Construct a `TickClock` for this run.
    #[inline]
    pub fn clock(&self) -> TickClock {
        TickClock::new(self.tick_millis)
    }
}

fn parse_or<T>(raw: &str, name: &'static str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw.trim().parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            warn!(argument = name, value = raw, fallback = %default, "invalid argument, using default");
            default
        }
    }
}
