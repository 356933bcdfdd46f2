// ABOUTME: Tree node payloads as a closed sum type, one variant family per node kind
// ABOUTME: NodeSpec is the owned construction form that snapshots are built from

use canopy_types::{LanguageFileImport, NodeId, NodeKind, ProjectId};
use serde::Serialize;

/// Synthetic grouping nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupKind {
    Dialogs,
    Triggers,
    KnowledgeBase,
    LanguageGeneration,
    LanguageUnderstanding,
    Schemas,
}

impl GroupKind {
    pub fn node_kind(&self) -> NodeKind {
        match self {
            Self::Dialogs => NodeKind::DialogGroup,
            Self::Triggers => NodeKind::TriggerGroup,
            Self::KnowledgeBase => NodeKind::QnaGroup,
            Self::LanguageGeneration => NodeKind::LgGroup,
            Self::LanguageUnderstanding => NodeKind::LuGroup,
            Self::Schemas => NodeKind::SchemaGroup,
        }
    }

    /// Label shown for the group in the explorer
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Dialogs => "dialogs",
            Self::Triggers => "triggers",
            Self::KnowledgeBase => "knowledge base",
            Self::LanguageGeneration => "language generation",
            Self::LanguageUnderstanding => "language understanding",
            Self::Schemas => "schemas",
        }
    }

    /// Id prefix used for `<prefix>:<ownerId>` group ids
    pub fn id_prefix(&self) -> &'static str {
        self.node_kind().as_str()
    }
}

/// Language asset families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LanguageKind {
    Lg,
    Lu,
    Qna,
}

impl LanguageKind {
    /// Marker embedded in node ids, e.g. `main:lg:main`
    pub fn id_marker(&self) -> &'static str {
        match self {
            Self::Lg => ":lg:",
            Self::Lu => ":lu:",
            Self::Qna => ":qna:",
        }
    }
}

/// Payload carried by a tree node. The variant determines the node kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeData {
    Root {
        label: String,
    },
    Bot {
        name: String,
        running: bool,
    },
    Group {
        group: GroupKind,
        label: String,
    },
    Dialog {
        dialog_id: String,
        display_name: String,
        is_form_dialog: bool,
    },
    Trigger {
        dialog_id: String,
        trigger_id: String,
        label: String,
        trigger_type: String,
    },
    File {
        language: LanguageKind,
        dialog_id: String,
        file_id: String,
    },
    /// Import reached from a form dialog's LG file
    LgImport {
        dialog_id: String,
        import: LanguageFileImport,
    },
    /// Import reached from a form dialog's LU file
    LuImport {
        dialog_id: String,
        import: LanguageFileImport,
    },
    Schema {
        schema_id: String,
    },
    Command {
        command_id: String,
        label: String,
    },
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Root { .. } => NodeKind::Root,
            NodeData::Bot { .. } => NodeKind::Bot,
            NodeData::Group { group, .. } => group.node_kind(),
            NodeData::Dialog {
                is_form_dialog: false,
                ..
            } => NodeKind::Dialog,
            NodeData::Dialog {
                is_form_dialog: true,
                ..
            } => NodeKind::FormDialog,
            NodeData::Trigger { .. } => NodeKind::Trigger,
            NodeData::File { language, .. } => match language {
                LanguageKind::Lg => NodeKind::Lg,
                LanguageKind::Lu => NodeKind::Lu,
                LanguageKind::Qna => NodeKind::Qna,
            },
            NodeData::LgImport { .. } => NodeKind::LgImport,
            NodeData::LuImport { .. } => NodeKind::LuImport,
            NodeData::Schema { .. } => NodeKind::Schema,
            NodeData::Command { .. } => NodeKind::Command,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NodeData::Root { label }
            | NodeData::Group { label, .. }
            | NodeData::Trigger { label, .. }
            | NodeData::Command { label, .. } => label,
            NodeData::Bot { name, .. } => name,
            NodeData::Dialog { display_name, .. } => display_name,
            NodeData::File { file_id, .. } => file_id,
            NodeData::LgImport { import, .. } | NodeData::LuImport { import, .. } => {
                &import.display_name
            }
            NodeData::Schema { schema_id } => schema_id,
        }
    }
}

/// Owned, nested description of a subtree. Snapshots are built from one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: NodeId,
    pub owner: ProjectId,
    pub data: NodeData,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(id: impl Into<NodeId>, owner: ProjectId, data: NodeData) -> Self {
        Self {
            id: id.into(),
            owner,
            data,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children = children;
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}

/// A node stored in a snapshot arena
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: NodeId,
    pub owner: ProjectId,
    pub data: NodeData,
    pub(crate) children: Vec<crate::snapshot::NodeKey>,
}

impl TreeNode {
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn label(&self) -> &str {
        self.data.label()
    }

    /// Label, falling back to the id for nodes without one
    pub fn display_label(&self) -> &str {
        let label = self.label();
        if label.is_empty() {
            self.id.as_str()
        } else {
            label
        }
    }

    pub fn children(&self) -> &[crate::snapshot::NodeKey] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
