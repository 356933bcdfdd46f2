// ABOUTME: Searchable entries for the quick palette built from tree snapshots and commands
// ABOUTME: Each entry carries its label plus the slash-split path used for path matching

use canopy_tree::{FlattenOptions, TreeSnapshot, get_all_nodes};
use canopy_types::{NodeId, NodeKind, ProjectId};
use serde::Serialize;

use crate::commands::CommandId;

/// One searchable palette entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickItem {
    pub id: NodeId,
    pub owner: ProjectId,
    pub kind: NodeKind,
    pub label: String,
    /// Ancestor path split on `/`, group labels already elided
    pub path: Vec<String>,
}

impl QuickItem {
    pub fn command(command: CommandId) -> Self {
        Self {
            id: NodeId::from(command.as_str()),
            owner: ProjectId::default(),
            kind: NodeKind::Command,
            label: command.label(),
            path: Vec::new(),
        }
    }

    pub fn is_command(&self) -> bool {
        self.kind == NodeKind::Command
    }

    /// Command this entry executes, for command entries
    pub fn command_id(&self) -> Option<CommandId> {
        if !self.is_command() {
            return None;
        }
        self.id.as_str().parse().ok()
    }
}

/// Searchable entries for every node of a searchable kind, ignoring collapse
pub fn searchable_items(snapshot: &TreeSnapshot) -> Vec<QuickItem> {
    let flat = get_all_nodes(snapshot, &FlattenOptions::default());

    flat.nodes
        .iter()
        .filter_map(|key| {
            let node = snapshot.get(*key)?;
            if !node.kind().is_searchable() {
                return None;
            }
            let path = flat
                .path(*key)
                .map(|p| p.split('/').map(str::to_string).collect())
                .unwrap_or_default();
            Some(QuickItem {
                id: node.id.clone(),
                owner: node.owner.clone(),
                kind: node.kind(),
                label: node.label().to_string(),
                path,
            })
        })
        .collect()
}

/// Command pseudo-entries in declaration order
pub fn command_items() -> Vec<QuickItem> {
    CommandId::ALL.into_iter().map(QuickItem::command).collect()
}
