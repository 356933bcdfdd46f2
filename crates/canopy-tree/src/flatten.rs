// ABOUTME: Flattening of a tree snapshot into the visible node list with lookup maps
// ABOUTME: Computes levels, parents, group-eliding paths and full subtree sizes

use canopy_types::NodeId;
use slotmap::SecondaryMap;
use std::collections::HashSet;

use crate::snapshot::{NodeKey, TreeSnapshot};

/// Ids of collapsed nodes
pub type CollapsedSet = HashSet<NodeId>;

#[derive(Debug, Clone, Default)]
pub struct FlattenOptions {
    /// A collapsed node is listed but its subtree is skipped
    pub collapsed: CollapsedSet,
    /// Leave the root out of `nodes`; it still gets level 0
    pub skip_root: bool,
    /// Start from this node instead of the snapshot root
    pub start: Option<NodeKey>,
}

impl FlattenOptions {
    pub fn collapsed(collapsed: CollapsedSet) -> Self {
        Self {
            collapsed,
            ..Default::default()
        }
    }
}

/// Result of flattening a snapshot for display
#[derive(Debug, Clone, Default)]
pub struct FlattenedTree {
    /// Visible nodes in depth-first pre-order
    pub nodes: Vec<NodeKey>,
    levels: SecondaryMap<NodeKey, usize>,
    parents: SecondaryMap<NodeKey, NodeKey>,
    paths: SecondaryMap<NodeKey, String>,
    descendant_count: SecondaryMap<NodeKey, usize>,
}

impl FlattenedTree {
    /// Depth below the traversal start, which is level 0
    pub fn level(&self, key: NodeKey) -> Option<usize> {
        self.levels.get(key).copied()
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.parents.get(key).copied()
    }

    /// `/`-joined labels from the start node down to `key`, without group labels
    pub fn path(&self, key: NodeKey) -> Option<&str> {
        self.paths.get(key).map(String::as_str)
    }

    /// Size of the full subtree below `key`, ignoring collapse
    pub fn descendant_count(&self, key: NodeKey) -> Option<usize> {
        self.descendant_count.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn position(&self, key: NodeKey) -> Option<usize> {
        self.nodes.iter().position(|k| *k == key)
    }
}

/// Flatten the snapshot into its visible node list.
///
/// Traversal is depth-first pre-order. A node listed in `collapsed` is
/// emitted but its children are not visited, so nothing below it receives a
/// level, parent or path entry. Descendant counts cover the whole subtree
/// regardless of collapse.
pub fn get_all_nodes(snapshot: &TreeSnapshot, options: &FlattenOptions) -> FlattenedTree {
    let start = options.start.unwrap_or_else(|| snapshot.root());
    let mut flat = FlattenedTree::default();

    // (node, parent, level, path of the nearest non-group ancestor)
    let mut stack: Vec<(NodeKey, Option<NodeKey>, usize, Option<String>)> =
        vec![(start, None, 0, None)];

    while let Some((key, parent, level, base)) = stack.pop() {
        let Some(node) = snapshot.get(key) else {
            continue;
        };

        if !(options.skip_root && key == start) {
            flat.nodes.push(key);
        }
        flat.levels.insert(key, level);
        if let Some(parent) = parent {
            flat.parents.insert(key, parent);
        }

        let path = match &base {
            Some(base) => format!("{base}/{}", node.label()),
            None => node.label().to_string(),
        };
        // Group labels are structural; children extend the group's own base
        let child_base = if node.kind().is_group() {
            base
        } else {
            Some(path.clone())
        };
        flat.paths.insert(key, path);

        if options.collapsed.contains(&node.id) {
            continue;
        }
        for child in node.children().iter().rev() {
            stack.push((*child, Some(key), level + 1, child_base.clone()));
        }
    }

    fill_descendant_counts(snapshot, start, &mut flat.descendant_count);
    flat
}

fn fill_descendant_counts(
    snapshot: &TreeSnapshot,
    start: NodeKey,
    counts: &mut SecondaryMap<NodeKey, usize>,
) {
    // Reverse pre-order visits every child before its parent
    for key in snapshot.preorder_from(start).into_iter().rev() {
        let children = snapshot.children(key);
        let below: usize = children
            .iter()
            .map(|child| counts.get(*child).copied().unwrap_or(0))
            .sum();
        counts.insert(key, below + children.len());
    }
}

/// Number of rows below `key` when rendered with `collapsed` applied: every
/// direct child plus the visible rows below each expanded child.
pub fn count_descendants(snapshot: &TreeSnapshot, key: NodeKey, collapsed: &CollapsedSet) -> usize {
    let children = snapshot.children(key);
    let nested: usize = children
        .iter()
        .filter(|child| {
            snapshot
                .get(**child)
                .is_some_and(|node| !collapsed.contains(&node.id))
        })
        .map(|child| count_descendants(snapshot, *child, collapsed))
        .sum();
    nested + children.len()
}
