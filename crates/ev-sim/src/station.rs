//! `ChargeStationPool` — counting semaphore with cancellable acquisition.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

/// Outcome of [`ChargeStationPool::acquire`].
#[must_use = "a cancelled acquisition does not hold a station"]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Acquisition {
    /// One station was taken; the caller must `release()` it later.
    Acquired,
    /// Cancellation was observed first; nothing was taken.
    Cancelled,
}

impl Acquisition {
    #[inline]
    pub fn is_acquired(self) -> bool {
        self == Acquisition::Acquired
    }
}

/// A fixed number of charging stations.
///
/// `0 ≤ available ≤ total` holds at all times; the counter only changes
/// under the pool's own lock.
pub struct ChargeStationPool {
    total:     usize,
    available: Mutex<usize>,
    freed:     Condvar,
}

impl ChargeStationPool {
    /// A pool with all `total` stations free.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            available: Mutex::new(total),
            freed:     Condvar::new(),
        }
    }

    /// Block until a station is free or `cancel` is set.
    ///
    /// Cancellation takes precedence: once `cancel` is set this returns
    /// [`Acquisition::Cancelled`] without decrementing, even if a station
    /// happens to be free.
    pub fn acquire(&self, cancel: &AtomicBool) -> Acquisition {
        let mut available = self.available.lock();
        self.freed.wait_while(&mut available, |available| {
            *available == 0 && !cancel.load(Ordering::SeqCst)
        });
        if cancel.load(Ordering::SeqCst) {
            return Acquisition::Cancelled;
        }
        *available -= 1;
        debug!(available = *available, "station acquired");
        Acquisition::Acquired
    }

    /// Return one station and wake one waiter.
    ///
    /// A release with every station already free is ignored.
    pub fn release(&self) {
        {
            let mut available = self.available.lock();
            if *available >= self.total {
                warn!(total = self.total, "station released with none held; ignored");
                return;
            }
            *available += 1;
            debug!(available = *available, "station released");
        }
        self.freed.notify_one();
    }

    /// Wake every waiter so each re-checks its cancellation flag.
    pub fn stop_all(&self) {
        // Held so a waiter between its predicate check and its wait cannot
        // miss the wake-up.
        let _available = self.available.lock();
        self.freed.notify_all();
    }

    /// Mark every station free again (between runs).
    pub fn reset(&self) {
        *self.available.lock() = self.total;
        self.freed.notify_all();
    }

    /// Diagnostic snapshot.
    pub fn available(&self) -> usize {
        *self.available.lock()
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
