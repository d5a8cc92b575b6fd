//! `SyncQueue<T>` — unbounded FIFO shared between pipeline stages.
//!
//! A `VecDeque` behind a `parking_lot::Mutex`, with a `Condvar` for the
//! blocking pop.  The pipeline itself only uses the non-blocking
//! [`try_pop`][SyncQueue::try_pop] inside tick-paced loops; the blocking
//! form is for consumers that have nothing else to do, and is released by
//! [`close`][SyncQueue::close] at shutdown.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

struct QueueState<T> {
    items:  VecDeque<T>,
    closed: bool,
}

pub struct SyncQueue<T> {
    state: Mutex<QueueState<T>>,
    ready: Condvar,
}

impl<T> Default for SyncQueue<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(QueueState { items: VecDeque::new(), closed: false }),
            ready: Condvar::new(),
        }
    }
}

impl<T> SyncQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` and wake one blocked consumer.
    ///
    /// Pushing to a closed queue still enqueues; the item stays until it is
    /// popped or drained.
    pub fn push(&self, item: T) {
        self.state.lock().items.push_back(item);
        self.ready.notify_one();
    }

    /// Block until an item is available, then remove and return the front.
    ///
    /// Returns `None` only once the queue is closed and empty; queued items
    /// are still handed out after `close`.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            self.ready.wait(&mut state);
        }
    }

    /// Remove the front item without blocking.
    pub fn try_pop(&self) -> Option<T> {
        self.state.lock().items.pop_front()
    }

    /// Wake every blocked consumer so it can re-check the closed flag.
    pub fn notify_all(&self) {
        // Taken so a consumer between its check and its wait cannot miss this.
        let _state = self.state.lock();
        self.ready.notify_all();
    }

    /// Mark the queue closed and wake every blocked consumer.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.notify_all();
    }

    /// Accept blocking consumers again after a [`close`][Self::close].
    pub fn reopen(&self) {
        self.state.lock().closed = false;
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Point-in-time length.  May be stale by the time the caller acts on it.
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Remove and return everything queued, front first.
    pub fn drain(&self) -> Vec<T> {
        self.state.lock().items.drain(..).collect()
    }
}
