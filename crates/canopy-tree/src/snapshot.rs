// ABOUTME: Immutable tree snapshot stored as a flat arena with id and parent indexes
// ABOUTME: Rebuilt wholesale on every source change; never mutated after construction

use canopy_types::{NodeId, NodeKind};
use slotmap::{SecondaryMap, SlotMap, new_key_type};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::TreeError;
use crate::node::{NodeSpec, TreeNode};

new_key_type! {
    /// Arena key of a node within one snapshot
    pub struct NodeKey;
}

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// Immutable tree snapshot.
///
/// Nodes live in a flat arena. Children are stored as ordered key lists on
/// each node and the parent relation is a separate index, so the node
/// structure holds no back-references.
#[derive(Debug, Clone)]
pub struct TreeSnapshot {
    nodes: SlotMap<NodeKey, TreeNode>,
    index: HashMap<NodeId, NodeKey>,
    parents: SecondaryMap<NodeKey, NodeKey>,
    root: NodeKey,
    revision: u64,
}

impl TreeSnapshot {
    /// Build a snapshot from a nested spec. Fails if any id appears twice.
    pub fn from_spec(spec: NodeSpec) -> Result<Self, TreeError> {
        let mut nodes = SlotMap::with_key();
        let mut index = HashMap::new();
        let mut parents = SecondaryMap::new();

        let root = insert_subtree(&mut nodes, &mut index, &mut parents, spec, None)?;

        Ok(Self {
            nodes,
            index,
            parents,
            root,
            revision: NEXT_REVISION.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Unique per snapshot; used as a memoization key
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn root_node(&self) -> &TreeNode {
        &self.nodes[self.root]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, key: NodeKey) -> Option<&TreeNode> {
        self.nodes.get(key)
    }

    pub fn key_of(&self, id: &str) -> Option<NodeKey> {
        self.index.get(id).copied()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&TreeNode> {
        self.key_of(id).and_then(|key| self.nodes.get(key))
    }

    /// Like `key_of`, for callers that treat a missing id as an error
    pub fn require(&self, id: &str) -> Result<NodeKey, TreeError> {
        self.key_of(id)
            .ok_or_else(|| TreeError::UnknownNode(NodeId::from(id)))
    }

    pub fn kind(&self, key: NodeKey) -> Option<NodeKind> {
        self.nodes.get(key).map(TreeNode::kind)
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(key)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.parents.get(key).copied()
    }

    /// Chain from the root down to `key`, both ends included
    pub fn ancestry(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut chain = Vec::new();
        let mut current = Some(key);
        while let Some(k) = current {
            chain.push(k);
            current = self.parent(k);
        }
        chain.reverse();
        chain
    }

    /// Keys in depth-first pre-order, ignoring any collapse state
    pub fn preorder(&self) -> Vec<NodeKey> {
        self.preorder_from(self.root)
    }

    pub fn preorder_from(&self, start: NodeKey) -> Vec<NodeKey> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![start];
        while let Some(key) = stack.pop() {
            order.push(key);
            stack.extend(self.children(key).iter().rev().copied());
        }
        order
    }

    /// Iterate nodes in pre-order
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &TreeNode)> + '_ {
        self.preorder()
            .into_iter()
            .filter_map(move |key| self.nodes.get(key).map(|node| (key, node)))
    }
}

fn insert_subtree(
    nodes: &mut SlotMap<NodeKey, TreeNode>,
    index: &mut HashMap<NodeId, NodeKey>,
    parents: &mut SecondaryMap<NodeKey, NodeKey>,
    spec: NodeSpec,
    parent: Option<NodeKey>,
) -> Result<NodeKey, TreeError> {
    if index.contains_key(&spec.id) {
        return Err(TreeError::DuplicateId(spec.id));
    }

    let NodeSpec {
        id,
        owner,
        data,
        children,
    } = spec;

    let key = nodes.insert(TreeNode {
        id: id.clone(),
        owner,
        data,
        children: Vec::with_capacity(children.len()),
    });
    index.insert(id, key);
    if let Some(parent) = parent {
        parents.insert(key, parent);
    }

    for child in children {
        let child_key = insert_subtree(nodes, index, parents, child, Some(key))?;
        nodes[key].children.push(child_key);
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeData;
    use canopy_types::ProjectId;

    fn leaf(id: &str) -> NodeSpec {
        NodeSpec::new(
            id,
            ProjectId::from("p"),
            NodeData::Schema {
                schema_id: id.to_string(),
            },
        )
    }

    fn root(children: Vec<NodeSpec>) -> NodeSpec {
        NodeSpec::new(
            "root",
            ProjectId::from("root"),
            NodeData::Root {
                label: "Solution".into(),
            },
        )
        .with_children(children)
    }

    #[test]
    fn test_indexes_are_built() {
        let snapshot =
            TreeSnapshot::from_spec(root(vec![leaf("a").with_children(vec![leaf("a1")]), leaf("b")]))
                .unwrap();

        assert_eq!(snapshot.len(), 4);
        let a1 = snapshot.key_of("a1").unwrap();
        let a = snapshot.key_of("a").unwrap();
        assert_eq!(snapshot.parent(a1), Some(a));
        assert_eq!(snapshot.parent(snapshot.root()), None);

        let ids: Vec<_> = snapshot.iter().map(|(_, n)| n.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "a", "a1", "b"]);

        let chain: Vec<_> = snapshot
            .ancestry(a1)
            .into_iter()
            .map(|k| snapshot.get(k).unwrap().id.as_str())
            .collect();
        assert_eq!(chain, vec!["root", "a", "a1"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = TreeSnapshot::from_spec(root(vec![leaf("a"), leaf("a")]));
        assert!(matches!(result, Err(TreeError::DuplicateId(id)) if id.as_str() == "a"));
    }

    #[test]
    fn test_revisions_are_unique() {
        let first = TreeSnapshot::from_spec(root(vec![])).unwrap();
        let second = TreeSnapshot::from_spec(root(vec![])).unwrap();
        assert_ne!(first.revision(), second.revision());
    }

    #[test]
    fn test_unknown_node_lookup() {
        let snapshot = TreeSnapshot::from_spec(root(vec![])).unwrap();
        assert!(matches!(
            snapshot.require("missing"),
            Err(TreeError::UnknownNode(_))
        ));
    }
}
