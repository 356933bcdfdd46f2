// ABOUTME: Open document records and the tree item snapshot each one was opened from
// ABOUTME: A document starts as an untitled soft placeholder and is populated on first open

use canopy_tree::{NodeData, TreeNode, icon_name};
use canopy_types::{ActivationMode, NodeId, NodeKind, ProjectId};
use serde::Serialize;

/// Editor family of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Dialog,
    Trigger,
    Lg,
    Lu,
    Qna,
    Schema,
    #[default]
    None,
}

impl From<NodeKind> for DocumentKind {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Dialog | NodeKind::FormDialog => Self::Dialog,
            NodeKind::Trigger => Self::Trigger,
            NodeKind::Lg | NodeKind::LgImport => Self::Lg,
            NodeKind::Lu | NodeKind::LuImport => Self::Lu,
            NodeKind::Qna => Self::Qna,
            NodeKind::Schema => Self::Schema,
            NodeKind::Root
            | NodeKind::Bot
            | NodeKind::DialogGroup
            | NodeKind::TriggerGroup
            | NodeKind::LuGroup
            | NodeKind::LgGroup
            | NodeKind::QnaGroup
            | NodeKind::SchemaGroup
            | NodeKind::Command => Self::None,
        }
    }
}

/// Detached copy of the tree node a document was opened from.
///
/// Snapshots are rebuilt wholesale, so documents keep their own copy instead of
/// an arena key that would dangle after the next rebuild.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentItem {
    pub id: NodeId,
    pub owner: ProjectId,
    pub kind: NodeKind,
    pub label: String,
    pub data: NodeData,
}

impl DocumentItem {
    pub fn from_node(node: &TreeNode) -> Self {
        Self {
            id: node.id.clone(),
            owner: node.owner.clone(),
            kind: node.kind(),
            label: node.label().to_string(),
            data: node.data.clone(),
        }
    }
}

impl From<&TreeNode> for DocumentItem {
    fn from(node: &TreeNode) -> Self {
        Self::from_node(node)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: NodeId,
    pub owner: ProjectId,
    pub kind: DocumentKind,
    pub title: String,
    pub mode: ActivationMode,
    pub icon: &'static str,
    pub item: Option<DocumentItem>,
}

impl Document {
    pub const UNTITLED: &'static str = "Untitled";

    /// Placeholder state for an id that has not been opened from a node
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            owner: ProjectId::default(),
            kind: DocumentKind::None,
            title: Self::UNTITLED.to_string(),
            mode: ActivationMode::Soft,
            icon: "",
            item: None,
        }
    }

    pub fn is_populated(&self) -> bool {
        self.item.is_some()
    }

    /// Fill in metadata from the source node
    pub fn populate(&mut self, item: DocumentItem, mode: ActivationMode) {
        self.owner = item.owner.clone();
        self.icon = icon_name(item.kind);
        self.kind = DocumentKind::from(item.kind);
        self.title = item.label.clone();
        self.mode = mode;
        self.item = Some(item);
    }

    pub fn is_soft(&self) -> bool {
        self.mode.is_soft()
    }

    pub fn node_kind(&self) -> Option<NodeKind> {
        self.item.as_ref().map(|item| item.kind)
    }
}
