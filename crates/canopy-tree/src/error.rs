// ABOUTME: Error type for tree construction and node lookups
// ABOUTME: Traversal itself is infallible; errors come from building or resolving ids

use canopy_types::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("duplicate node id in tree: {0}")]
    DuplicateId(NodeId),

    #[error("unknown tree node: {0}")]
    UnknownNode(NodeId),
}
