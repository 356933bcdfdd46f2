// ABOUTME: Document session events for tab lifecycle and activation changes
// ABOUTME: Immutable facts emitted after each session transition has been applied

use canopy_types::{ActivationMode, NodeId, NodeKind, ViewMode};
use serde::Serialize;

/// Document session events - covers opening, activation, promotion and closing of tabs.
/// Each event describes something that already happened to the session state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    /// A document was appended to the tab strip
    Opened {
        doc_id: NodeId,
        /// Kind of the source node; `None` for a document activated before it was populated
        kind: Option<NodeKind>,
        mode: ActivationMode,
    },

    /// The preview tab was replaced in place by another document
    Replaced {
        evicted: NodeId,
        doc_id: NodeId,
        slot: usize,
    },

    /// A document became the active one
    Activated {
        doc_id: NodeId,
        previous: Option<NodeId>,
    },

    /// A preview document was pinned
    Promoted { doc_id: NodeId },

    /// A document was closed
    Closed {
        doc_id: NodeId,
        next_active: Option<NodeId>,
    },

    /// The global visual/code toggle changed
    ViewModeChanged { mode: ViewMode },
}

impl Event {
    /// Document the event refers to, if any
    pub fn doc_id(&self) -> Option<&NodeId> {
        match self {
            Event::Opened { doc_id, .. }
            | Event::Replaced { doc_id, .. }
            | Event::Activated { doc_id, .. }
            | Event::Promoted { doc_id }
            | Event::Closed { doc_id, .. } => Some(doc_id),
            Event::ViewModeChanged { .. } => None,
        }
    }
}
