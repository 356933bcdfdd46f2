// ABOUTME: Single-writer store around the document session with change subscriptions
// ABOUTME: Commands apply under one write lock; subscribers and the event bus see the result afterwards

use canopy_events::EventBus;
use canopy_events::document::Event;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::session::{DocumentSession, SessionCommand};

type Subscriber = Arc<dyn Fn(&DocumentSession, &[Event]) + Send + Sync>;

/// Handle returned by [`SessionStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct SessionStore {
    state: RwLock<DocumentSession>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
    bus: Arc<dyn EventBus + Send + Sync>,
}

impl SessionStore {
    pub fn new(bus: Arc<dyn EventBus + Send + Sync>) -> Self {
        Self {
            state: RwLock::new(DocumentSession::new()),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
            bus,
        }
    }

    /// Apply one command as a single transaction.
    ///
    /// Subscribers run after the write lock is released and only when the
    /// command changed something.
    pub fn dispatch(&self, command: SessionCommand) -> Vec<Event> {
        let (events, snapshot) = {
            let mut state = self.state.write();
            let events = state.apply(command);
            if events.is_empty() {
                return events;
            }
            (events, state.clone())
        };

        debug!(event_count = events.len(), "Session changed");

        let subscribers: Vec<Subscriber> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(&snapshot, &events);
        }

        for event in &events {
            self.bus.dispatch_document(event.clone());
        }
        events
    }

    /// Consistent copy of the current session
    pub fn snapshot(&self) -> DocumentSession {
        self.state.read().clone()
    }

    /// Run `f` against the current session under the read lock
    pub fn read<R>(&self, f: impl FnOnce(&DocumentSession) -> R) -> R {
        f(&self.state.read())
    }

    pub fn subscribe(
        &self,
        subscriber: impl Fn(&DocumentSession, &[Event]) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Arc::new(subscriber)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }
}
