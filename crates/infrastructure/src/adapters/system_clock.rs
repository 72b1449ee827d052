//! System clock adapter

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};
use credo_application::ports::{Clock, TimerHandle};

/// System clock implementation using the system time and tokio timers.
///
/// Deferred callbacks run as tasks on the ambient tokio runtime;
/// [`Clock::after`] must be called from within one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn after(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) -> Box<dyn TimerHandle> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        // A negative delay means the moment already passed; fire at once.
        let sleep = delay.to_std().unwrap_or(std::time::Duration::ZERO);

        let task = tokio::spawn(async move {
            tokio::time::sleep(sleep).await;
            if !flag.load(Ordering::SeqCst) {
                callback();
            }
        });

        Box::new(TokioTimerHandle { cancelled, task })
    }
}

/// Handle for a deferred callback spawned on the tokio runtime.
struct TokioTimerHandle {
    cancelled: Arc<AtomicBool>,
    task: tokio::task::JoinHandle<()>,
}

impl TimerHandle for TokioTimerHandle {
    fn cancel(&self) {
        // The flag covers a cancel racing the fire instant; the abort
        // reclaims the task when it is still sleeping.
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.task.abort();
        }
    }
}
