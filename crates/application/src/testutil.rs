//! Shared test helpers — available to all `#[cfg(test)]` modules in the crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::ports::{Clock, StorageError, TimerHandle, TokenStorage};

type TimerSlot = Arc<Mutex<Option<Box<dyn FnOnce() + Send>>>>;

struct ScheduledTimer {
    due: DateTime<Utc>,
    slot: TimerSlot,
}

/// Hand-driven clock for deterministic scheduling tests.
///
/// Records every scheduled delay and cancellation; [`ManualClock::advance`]
/// moves time forward and fires due timers in due order.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    timers: Mutex<Vec<ScheduledTimer>>,
    delays: Mutex<Vec<Duration>>,
    cancellations: Arc<AtomicUsize>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
            timers: Mutex::new(Vec::new()),
            delays: Mutex::new(Vec::new()),
            cancellations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Moves time forward by `delta`, firing every due, uncancelled timer
    /// in due order.
    ///
    /// Callbacks run with no internal lock held, so they may schedule or
    /// cancel further timers.
    pub fn advance(&self, delta: Duration) {
        let target = {
            let mut now = self.now.lock().unwrap();
            *now = *now + delta;
            *now
        };

        loop {
            let next = {
                let timers = self.timers.lock().unwrap();
                timers
                    .iter()
                    .filter(|timer| timer.due <= target)
                    .filter(|timer| timer.slot.lock().unwrap().is_some())
                    .min_by_key(|timer| timer.due)
                    .map(|timer| Arc::clone(&timer.slot))
            };

            let Some(slot) = next else { break };
            let Some(callback) = slot.lock().unwrap().take() else {
                continue;
            };
            callback();
        }
    }

    /// Number of scheduled timers that have neither fired nor been
    /// cancelled.
    pub fn pending_count(&self) -> usize {
        self.timers
            .lock()
            .unwrap()
            .iter()
            .filter(|timer| timer.slot.lock().unwrap().is_some())
            .count()
    }

    /// Number of timers cancelled before they fired.
    pub fn cancelled_count(&self) -> usize {
        self.cancellations.load(Ordering::SeqCst)
    }

    /// Delay of the most recently scheduled timer.
    pub fn last_delay(&self) -> Option<Duration> {
        self.delays.lock().unwrap().last().copied()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn after(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) -> Box<dyn TimerHandle> {
        let due = self.now() + delay;
        let slot: TimerSlot = Arc::new(Mutex::new(Some(callback)));

        self.delays.lock().unwrap().push(delay);
        self.timers.lock().unwrap().push(ScheduledTimer {
            due,
            slot: Arc::clone(&slot),
        });

        Box::new(ManualTimerHandle {
            slot,
            cancellations: Arc::clone(&self.cancellations),
        })
    }
}

struct ManualTimerHandle {
    slot: TimerSlot,
    cancellations: Arc<AtomicUsize>,
}

impl TimerHandle for ManualTimerHandle {
    fn cancel(&self) {
        // Taking the callback makes cancel idempotent and a no-op after
        // the timer fired.
        if self.slot.lock().unwrap().take().is_some() {
            self.cancellations.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// In-memory storage with a read-failure toggle.
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent `get` fail when `fail` is true.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Seeds an entry directly, bypassing the port.
    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Reads an entry directly, bypassing the port.
    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "simulated read failure".to_string(),
            ));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}
