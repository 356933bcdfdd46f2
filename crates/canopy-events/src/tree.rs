// ABOUTME: Tree index events for snapshot rebuilds and explorer collapse changes
// ABOUTME: Lets views invalidate cached flattenings without polling the snapshot

use canopy_types::NodeId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    /// A new snapshot replaced the previous one
    Rebuilt {
        revision: u64,
        node_count: usize,
        project_count: usize,
    },

    /// An explorer node was collapsed
    NodeCollapsed { node_id: NodeId },

    /// An explorer node was expanded
    NodeExpanded { node_id: NodeId },
}
