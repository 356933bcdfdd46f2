// ABOUTME: Event bus and handler traits for decoupled communication
// ABOUTME: Provides publish-subscribe pattern for cross-crate events

use crate::document::Event as DocumentEvent;
use crate::handler::HandlerError;
use crate::quick::Event as QuickEvent;
use crate::tree::Event as TreeEvent;

/// Event bus trait for dispatching domain events
pub trait EventBus {
    /// Dispatch a document session event
    fn dispatch_document(&self, event: DocumentEvent);

    /// Dispatch a tree index event
    fn dispatch_tree(&self, event: TreeEvent);

    /// Dispatch a quick search event
    fn dispatch_quick(&self, event: QuickEvent);
}

/// Event handler trait for receiving domain events
pub trait EventHandler {
    /// Handle a document session event
    fn handle_document(&mut self, _event: &DocumentEvent) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Handle a tree index event
    fn handle_tree(&mut self, _event: &TreeEvent) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Handle a quick search event
    fn handle_quick(&mut self, _event: &QuickEvent) -> Result<(), HandlerError> {
        Ok(())
    }
}

/// Bus that drops every event, for callers without listeners
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn dispatch_document(&self, _event: DocumentEvent) {}
    fn dispatch_tree(&self, _event: TreeEvent) {}
    fn dispatch_quick(&self, _event: QuickEvent) {}
}
