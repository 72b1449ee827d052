//! Clock port for time-related operations

use chrono::{DateTime, Duration, Utc};

/// Cancellable handle for a deferred callback.
pub trait TimerHandle: Send {
    /// Cancels the pending callback.
    ///
    /// Idempotent; cancelling a timer that already fired or was already
    /// cancelled is a no-op.
    fn cancel(&self);
}

/// Port for getting the current time and scheduling deferred callbacks.
///
/// This abstraction allows testing time-dependent code by providing
/// a mock implementation.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Schedules `callback` to run once after `delay`.
    ///
    /// A non-positive delay fires as soon as the scheduler is able to run
    /// the callback. The returned handle cancels the callback if it has not
    /// fired yet.
    fn after(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) -> Box<dyn TimerHandle>;
}
