// ABOUTME: Error types for document session lookups and state validation
// ABOUTME: Most session transitions are infallible; these cover lookups that need a document

use canopy_types::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("document is not open: {0}")]
    UnknownDocument(NodeId),

    #[error("no document is active")]
    NoActiveDocument,

    #[error("session invariant violated: {0}")]
    Invariant(String),
}

impl SessionError {
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}
