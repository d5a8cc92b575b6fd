//! Simulation time model.
//!
//! # Design
//!
//! One `Tick` is one simulated second.  Every pipeline stage advances its
//! vehicles by one tick per pass and then sleeps for the tick's real-time
//! duration, held in `TickClock`:
//!
//!   real_time = ticks * tick_millis
//!
//! All stages share the same `TickClock`, so relative progress between
//! running and charging stays proportional no matter how fast the run is
//! played back.

use std::fmt;
use std::time::Duration;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// A count of simulated seconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    /// Simulated seconds represented by one tick.
    pub const SECS: u64 = 1;
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickClock ─────────────────────────────────────────────────────────────────

/// Maps simulated ticks onto wall-clock time.
///
/// `TickClock` is `Copy` and holds no heap data, so each stage thread takes
/// its own copy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickClock {
    /// Real milliseconds one simulated second takes.  Zero means "as fast as
    /// possible" (stages still yield between passes).
    pub tick_millis: u64,
}

impl TickClock {
    pub fn new(tick_millis: u64) -> Self {
        Self { tick_millis }
    }

    /// Real time of one tick.
    #[inline]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Real time needed to play back `ticks` simulated seconds.
    #[inline]
    pub fn real_duration(&self, ticks: Tick) -> Duration {
        Duration::from_millis(ticks.0.saturating_mul(self.tick_millis))
    }

    /// Sleep for one tick.  With a zero tick the thread only yields.
    pub fn sleep_tick(&self) {
        if self.tick_millis == 0 {
            std::thread::yield_now();
        } else {
            std::thread::sleep(self.tick());
        }
    }
}

impl fmt::Display for TickClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms/tick", self.tick_millis)
    }
}
