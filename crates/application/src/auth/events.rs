//! Lifecycle event channel.
//!
//! A synchronous, in-process multicast stream: publishing invokes every
//! live handler on the calling thread before returning. There is no
//! buffering; a subscriber added after an event was published never sees
//! that event.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Lifecycle event emitted by the auth state manager.
///
/// Events carry no payload; observers query the manager for the current
/// token or user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// A token became current.
    Login,
    /// Token and user were cleared.
    Logout,
    /// The current token is inside its refresh window.
    RefreshNeeded,
}

type Handler = Arc<dyn Fn(AuthEvent) + Send + Sync>;

struct Subscriber {
    id: u64,
    alive: Arc<AtomicBool>,
    handler: Handler,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Synchronous multicast channel for [`AuthEvent`]s.
///
/// Cloning the bus yields another handle to the same subscriber list.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` and returns its cancellable subscription.
    ///
    /// Handlers are invoked in subscription order. A handler registered
    /// while a publish is in flight is not invoked for that publish.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(AuthEvent) + Send + Sync + 'static,
    {
        let alive = Arc::new(AtomicBool::new(true));
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.next_id += 1;
        let id = inner.next_id;
        inner.subscribers.push(Subscriber {
            id,
            alive: Arc::clone(&alive),
            handler: Arc::new(handler),
        });

        Subscription {
            id,
            alive,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Delivers `event` to every live subscriber, in subscription order,
    /// synchronously on the calling thread.
    ///
    /// The subscriber list is snapshotted up front and the internal lock
    /// released before any handler runs, so handlers may subscribe or
    /// cancel re-entrantly. A subscription cancelled mid-publish is
    /// skipped for the remainder of that publish.
    pub fn publish(&self, event: AuthEvent) {
        let snapshot: Vec<(Arc<AtomicBool>, Handler)> = {
            let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner
                .subscribers
                .iter()
                .map(|subscriber| {
                    (
                        Arc::clone(&subscriber.alive),
                        Arc::clone(&subscriber.handler),
                    )
                })
                .collect()
        };

        for (alive, handler) in snapshot {
            if alive.load(Ordering::SeqCst) {
                handler(event);
            }
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribers
            .len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Cancellable handle for a registered handler.
///
/// Dropping the handle does not cancel the subscription; call
/// [`Subscription::cancel`] explicitly.
pub struct Subscription {
    id: u64,
    alive: Arc<AtomicBool>,
    bus: Weak<Mutex<BusInner>>,
}

impl Subscription {
    /// Removes the handler from the bus.
    ///
    /// Idempotent. A cancel issued while a publish is in flight makes the
    /// handler skip the remainder of that publish.
    pub fn cancel(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            if let Some(bus) = self.bus.upgrade() {
                let mut inner = bus.lock().unwrap_or_else(PoisonError::into_inner);
                inner.subscribers.retain(|subscriber| subscriber.id != self.id);
            }
        }
    }

    /// Whether the handler is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
