// ABOUTME: Event aggregator that queues domain events and fans them out to handlers
// ABOUTME: Implements the event bus so producers never hold references to listeners

use crate::document::Event as DocumentEvent;
use crate::event_bus::{EventBus, EventHandler};
use crate::quick::Event as QuickEvent;
use crate::tree::Event as TreeEvent;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// App-level event wrapper for the event aggregator
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Document(DocumentEvent),
    Tree(TreeEvent),
    Quick(QuickEvent),
}

/// Event aggregator that collects and dispatches events
pub struct EventAggregator {
    handlers: Mutex<Vec<Box<dyn EventHandler + Send>>>,
    event_queue: Mutex<Vec<AppEvent>>,
}

impl EventAggregator {
    /// Create a new event aggregator
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
            event_queue: Mutex::new(Vec::new()),
        }
    }

    /// Register an event handler
    pub fn register_handler<H>(&self, handler: H)
    where
        H: EventHandler + Send + 'static,
    {
        self.handlers.lock().push(Box::new(handler));
    }

    /// Process all queued events, returning how many were delivered
    pub fn process_events(&self) -> usize {
        let events: Vec<AppEvent> = std::mem::take(&mut *self.event_queue.lock());
        if events.is_empty() {
            return 0;
        }

        let mut handlers = self.handlers.lock();
        debug!(
            event_count = events.len(),
            handler_count = handlers.len(),
            "Processing queued events"
        );

        for event in &events {
            for (index, handler) in handlers.iter_mut().enumerate() {
                let result = match event {
                    AppEvent::Document(e) => handler.handle_document(e),
                    AppEvent::Tree(e) => handler.handle_tree(e),
                    AppEvent::Quick(e) => handler.handle_quick(e),
                };
                if let Err(error) = result {
                    warn!(handler = index, error = %error, "Event handler failed");
                }
            }
        }

        events.len()
    }

    /// Queue an event for processing
    pub fn queue_event(&self, event: AppEvent) {
        self.event_queue.lock().push(event);
    }

    /// Get the number of queued events
    pub fn queued_count(&self) -> usize {
        self.event_queue.lock().len()
    }
}

impl EventBus for EventAggregator {
    fn dispatch_document(&self, event: DocumentEvent) {
        self.queue_event(AppEvent::Document(event));
    }

    fn dispatch_tree(&self, event: TreeEvent) {
        self.queue_event(AppEvent::Tree(event));
    }

    fn dispatch_quick(&self, event: QuickEvent) {
        self.queue_event(AppEvent::Quick(event));
    }
}

impl Default for EventAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// A handle to the event aggregator that can be cloned and shared
#[derive(Clone, Default)]
pub struct EventAggregatorHandle {
    inner: Arc<EventAggregator>,
}

impl EventAggregatorHandle {
    /// Create a new handle from an event aggregator
    pub fn new(aggregator: EventAggregator) -> Self {
        Self {
            inner: Arc::new(aggregator),
        }
    }

    /// Register an event handler
    pub fn register_handler<H>(&self, handler: H)
    where
        H: EventHandler + Send + 'static,
    {
        self.inner.register_handler(handler);
    }

    /// Process all queued events
    pub fn process_events(&self) -> usize {
        self.inner.process_events()
    }

    pub fn queued_count(&self) -> usize {
        self.inner.queued_count()
    }
}

impl EventBus for EventAggregatorHandle {
    fn dispatch_document(&self, event: DocumentEvent) {
        self.inner.dispatch_document(event);
    }

    fn dispatch_tree(&self, event: TreeEvent) {
        self.inner.dispatch_tree(event);
    }

    fn dispatch_quick(&self, event: QuickEvent) {
        self.inner.dispatch_quick(event);
    }
}
