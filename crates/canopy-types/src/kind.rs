// ABOUTME: Closed enumeration of tree node kinds
// ABOUTME: Drives renderer, icon, action menu and clickability selection downstream

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag carried by every tree node.
///
/// The set is closed: every table keyed on a kind (icons, action menus, editor
/// targets) is an exhaustive `match`, so adding a variant fails to compile until
/// each table handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Root,
    Bot,
    DialogGroup,
    Dialog,
    FormDialog,
    TriggerGroup,
    Trigger,
    LuGroup,
    Lu,
    LuImport,
    LgGroup,
    Lg,
    LgImport,
    QnaGroup,
    Qna,
    SchemaGroup,
    Schema,
    Command,
}

impl NodeKind {
    pub const ALL: [NodeKind; 18] = [
        NodeKind::Root,
        NodeKind::Bot,
        NodeKind::DialogGroup,
        NodeKind::Dialog,
        NodeKind::FormDialog,
        NodeKind::TriggerGroup,
        NodeKind::Trigger,
        NodeKind::LuGroup,
        NodeKind::Lu,
        NodeKind::LuImport,
        NodeKind::LgGroup,
        NodeKind::Lg,
        NodeKind::LgImport,
        NodeKind::QnaGroup,
        NodeKind::Qna,
        NodeKind::SchemaGroup,
        NodeKind::Schema,
        NodeKind::Command,
    ];

    /// Kinds the quick search palette indexes.
    pub const SEARCHABLE: [NodeKind; 9] = [
        NodeKind::Trigger,
        NodeKind::Lg,
        NodeKind::Lu,
        NodeKind::Qna,
        NodeKind::Dialog,
        NodeKind::Schema,
        NodeKind::FormDialog,
        NodeKind::LgImport,
        NodeKind::LuImport,
    ];

    /// Wire name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Bot => "bot",
            Self::DialogGroup => "dialogGroup",
            Self::Dialog => "dialog",
            Self::FormDialog => "formDialog",
            Self::TriggerGroup => "triggerGroup",
            Self::Trigger => "trigger",
            Self::LuGroup => "luGroup",
            Self::Lu => "lu",
            Self::LuImport => "luImport",
            Self::LgGroup => "lgGroup",
            Self::Lg => "lg",
            Self::LgImport => "lgImport",
            Self::QnaGroup => "qnaGroup",
            Self::Qna => "qna",
            Self::SchemaGroup => "schemaGroup",
            Self::Schema => "schema",
            Self::Command => "command",
        }
    }

    /// Returns true for synthetic grouping nodes
    pub fn is_group(&self) -> bool {
        matches!(
            self,
            Self::DialogGroup
                | Self::TriggerGroup
                | Self::LuGroup
                | Self::LgGroup
                | Self::QnaGroup
                | Self::SchemaGroup
        )
    }

    /// Returns true if clicking a node of this kind opens a document.
    /// Non-clickable nodes toggle their collapse state instead.
    pub fn is_clickable(&self) -> bool {
        !matches!(self, Self::Root | Self::Bot) && !self.is_group()
    }

    /// Returns true if the quick search palette indexes this kind
    pub fn is_searchable(&self) -> bool {
        Self::SEARCHABLE.contains(self)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_kinds_are_not_clickable() {
        for kind in NodeKind::ALL {
            if kind.is_group() {
                assert!(!kind.is_clickable(), "{kind} should not be clickable");
            }
        }
        assert!(!NodeKind::Root.is_clickable());
        assert!(!NodeKind::Bot.is_clickable());
        assert!(NodeKind::Trigger.is_clickable());
        assert!(NodeKind::LgImport.is_clickable());
    }

    #[test]
    fn test_searchable_scope() {
        assert!(NodeKind::Dialog.is_searchable());
        assert!(NodeKind::LuImport.is_searchable());
        assert!(!NodeKind::Command.is_searchable());
        assert!(!NodeKind::LgGroup.is_searchable());
        assert!(!NodeKind::Bot.is_searchable());
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for kind in NodeKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
