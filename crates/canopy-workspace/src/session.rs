// ABOUTME: Document session state machine: tab order, MRU order, preview tab and active document
// ABOUTME: Every transition goes through apply() and reports what changed as document events

use canopy_events::document::Event;
use canopy_types::{ActivationMode, NodeId, ViewMode};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

use crate::document::{Document, DocumentItem};
use crate::error::SessionError;

/// One logical session transition
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Open a document from its source node, populating it on first open
    Open {
        item: DocumentItem,
        mode: ActivationMode,
    },
    Activate {
        doc_id: NodeId,
        mode: ActivationMode,
    },
    Close {
        doc_id: NodeId,
    },
    Next,
    Previous,
    SetViewMode(ViewMode),
}

/// Open documents and their ordering.
///
/// `open_ids` is tab order, `mru_ids` is most recently activated first and
/// always holds the same ids. At most one open document is soft; opening a
/// new document while one is soft replaces it in its tab slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSession {
    open_ids: Vec<NodeId>,
    mru_ids: Vec<NodeId>,
    active_id: Option<NodeId>,
    documents: HashMap<NodeId, Document>,
    view_mode: ViewMode,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, command: SessionCommand) -> Vec<Event> {
        trace!(?command, "Applying session command");
        match command {
            SessionCommand::Open { item, mode } => self.open(item, mode),
            SessionCommand::Activate { doc_id, mode } => self.activate(&doc_id, mode),
            SessionCommand::Close { doc_id } => self.close(&doc_id),
            SessionCommand::Next => self.next(),
            SessionCommand::Previous => self.previous(),
            SessionCommand::SetViewMode(mode) => self.change_view_mode(mode),
        }
    }

    pub fn open(&mut self, item: DocumentItem, mode: ActivationMode) -> Vec<Event> {
        let doc_id = item.id.clone();
        let was_open = self.is_open(&doc_id);
        let document = self
            .documents
            .entry(doc_id.clone())
            .or_insert_with(|| Document::new(doc_id.clone()));

        // Re-opening keeps the metadata from the first open. An open
        // placeholder keeps its mode so activation can promote it.
        if !document.is_populated() {
            let mode = if was_open { document.mode } else { mode };
            document.populate(item, mode);
        }

        self.activate(&doc_id, mode)
    }

    pub fn activate(&mut self, doc_id: &NodeId, mode: ActivationMode) -> Vec<Event> {
        let mut events = Vec::new();
        let previous = self.active_id.clone();

        if !self.is_open(doc_id) {
            let kind = self
                .documents
                .entry(doc_id.clone())
                .or_insert_with(|| Document::new(doc_id.clone()))
                .node_kind();

            match self.soft_slot() {
                Some(slot) => {
                    let evicted = std::mem::replace(&mut self.open_ids[slot], doc_id.clone());
                    self.documents.remove(&evicted);
                    self.mru_ids.retain(|id| id != &evicted);
                    debug!(doc_id = %doc_id, evicted = %evicted, slot, "Replaced preview document");
                    events.push(Event::Replaced {
                        evicted,
                        doc_id: doc_id.clone(),
                        slot,
                    });
                }
                None => {
                    self.open_ids.push(doc_id.clone());
                    let mode = self
                        .documents
                        .get(doc_id)
                        .map(|doc| doc.mode)
                        .unwrap_or_default();
                    debug!(doc_id = %doc_id, ?mode, "Opened document");
                    events.push(Event::Opened {
                        doc_id: doc_id.clone(),
                        kind,
                        mode,
                    });
                }
            }
        }

        self.mru_ids.retain(|id| id != doc_id);
        self.mru_ids.insert(0, doc_id.clone());
        self.active_id = Some(doc_id.clone());

        if previous.as_ref() != Some(doc_id) {
            events.push(Event::Activated {
                doc_id: doc_id.clone(),
                previous,
            });
        }

        if mode == ActivationMode::Hard {
            if let Some(document) = self.documents.get_mut(doc_id) {
                if document.is_soft() {
                    document.mode = ActivationMode::Hard;
                    debug!(doc_id = %doc_id, "Promoted preview document");
                    events.push(Event::Promoted {
                        doc_id: doc_id.clone(),
                    });
                }
            }
        }

        events
    }

    pub fn close(&mut self, doc_id: &NodeId) -> Vec<Event> {
        if !self.is_open(doc_id) {
            return Vec::new();
        }

        self.mru_ids.retain(|id| id != doc_id);
        self.open_ids.retain(|id| id != doc_id);
        self.documents.remove(doc_id);

        let next_active = self.mru_ids.first().cloned();
        debug!(doc_id = %doc_id, next_active = ?next_active, "Closed document");
        let mut events = vec![Event::Closed {
            doc_id: doc_id.clone(),
            next_active: next_active.clone(),
        }];

        match next_active {
            Some(next) => events.extend(self.activate(&next, ActivationMode::Soft)),
            None => self.active_id = None,
        }
        events
    }

    /// Activate the tab after the active one, wrapping at the end
    pub fn next(&mut self) -> Vec<Event> {
        match self.active_position() {
            Some(position) => {
                let next = self.open_ids[(position + 1) % self.open_ids.len()].clone();
                self.activate(&next, ActivationMode::Soft)
            }
            None => Vec::new(),
        }
    }

    /// Activate the tab before the active one, wrapping at the start
    pub fn previous(&mut self) -> Vec<Event> {
        match self.active_position() {
            Some(position) => {
                let len = self.open_ids.len();
                let previous = self.open_ids[(position + len - 1) % len].clone();
                self.activate(&previous, ActivationMode::Soft)
            }
            None => Vec::new(),
        }
    }

    pub fn change_view_mode(&mut self, mode: ViewMode) -> Vec<Event> {
        if self.view_mode == mode {
            return Vec::new();
        }
        self.view_mode = mode;
        vec![Event::ViewModeChanged { mode }]
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn open_ids(&self) -> &[NodeId] {
        &self.open_ids
    }

    pub fn mru_ids(&self) -> &[NodeId] {
        &self.mru_ids
    }

    pub fn active_id(&self) -> Option<&NodeId> {
        self.active_id.as_ref()
    }

    pub fn is_open(&self, doc_id: &NodeId) -> bool {
        self.open_ids.contains(doc_id)
    }

    pub fn is_empty(&self) -> bool {
        self.open_ids.is_empty()
    }

    pub fn document(&self, doc_id: &NodeId) -> Option<&Document> {
        if self.is_open(doc_id) {
            self.documents.get(doc_id)
        } else {
            None
        }
    }

    pub fn require(&self, doc_id: &NodeId) -> Result<&Document, SessionError> {
        self.document(doc_id)
            .ok_or_else(|| SessionError::UnknownDocument(doc_id.clone()))
    }

    /// Open documents in tab order
    pub fn documents(&self) -> Vec<&Document> {
        self.open_ids
            .iter()
            .filter_map(|id| self.documents.get(id))
            .collect()
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active_id.as_ref().and_then(|id| self.document(id))
    }

    /// The preview document, if one is open
    pub fn soft_document(&self) -> Option<&Document> {
        self.soft_slot()
            .and_then(|slot| self.documents.get(&self.open_ids[slot]))
    }

    fn soft_slot(&self) -> Option<usize> {
        self.open_ids.iter().position(|id| {
            self.documents
                .get(id)
                .is_some_and(|document| document.is_soft())
        })
    }

    fn active_position(&self) -> Option<usize> {
        let active = self.active_id.as_ref()?;
        self.open_ids.iter().position(|id| id == active)
    }

    /// Verify the structural invariants; used by tests and debug assertions
    pub fn check_invariants(&self) -> Result<(), SessionError> {
        if let Some(active) = &self.active_id {
            if !self.is_open(active) {
                return Err(SessionError::invariant(format!(
                    "active document {active} is not open"
                )));
            }
            if self.mru_ids.first() != Some(active) {
                return Err(SessionError::invariant(format!(
                    "active document {active} is not at the head of the MRU list"
                )));
            }
        }

        let open: HashSet<&NodeId> = self.open_ids.iter().collect();
        let mru: HashSet<&NodeId> = self.mru_ids.iter().collect();
        if open.len() != self.open_ids.len() {
            return Err(SessionError::invariant("tab order contains duplicates"));
        }
        if open != mru || self.mru_ids.len() != self.open_ids.len() {
            return Err(SessionError::invariant(
                "MRU list is not a reordering of the open documents",
            ));
        }

        let soft = self
            .open_ids
            .iter()
            .filter(|id| self.documents.get(*id).is_some_and(Document::is_soft))
            .count();
        if soft > 1 {
            return Err(SessionError::invariant(format!(
                "{soft} preview documents are open"
            )));
        }

        let records_match = self.documents.len() == self.open_ids.len()
            && self.open_ids.iter().all(|id| self.documents.contains_key(id));
        if !records_match {
            return Err(SessionError::invariant(
                "document records do not match the open documents",
            ));
        }

        Ok(())
    }
}
