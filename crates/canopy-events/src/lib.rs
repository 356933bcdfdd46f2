// ABOUTME: Cross-crate event definitions for decoupled communication
// ABOUTME: Domain events grouped by bounded context plus the bus that dispatches them

pub mod aggregator;
pub mod document;
pub mod event_bus;
pub mod handler;
pub mod quick;
pub mod tree;

pub use aggregator::{AppEvent, EventAggregator, EventAggregatorHandle};
pub use event_bus::{EventBus, EventHandler, NullEventBus};
pub use handler::HandlerError;
