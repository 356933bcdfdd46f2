// ABOUTME: Kind-keyed presentation tables: icon names, icon colours and contextual action menus
// ABOUTME: Every table is an exhaustive match so new node kinds must be handled before compiling

use canopy_types::{NodeKind, ProjectId};
use serde::Serialize;

use crate::node::{NodeData, TreeNode};

/// Icon shown next to a node, or an empty string for none
pub fn icon_name(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Trigger => "LightningBolt",
        NodeKind::Dialog => "Org",
        NodeKind::FormDialog => "Table",
        NodeKind::Bot => "CubeShape",
        NodeKind::Lg | NodeKind::LgImport => "Robot",
        NodeKind::Lu | NodeKind::LuImport => "People",
        NodeKind::Qna => "Chat",
        NodeKind::Schema => "OfficeFormsLogo",
        NodeKind::Root
        | NodeKind::DialogGroup
        | NodeKind::TriggerGroup
        | NodeKind::LuGroup
        | NodeKind::LgGroup
        | NodeKind::QnaGroup
        | NodeKind::SchemaGroup
        | NodeKind::Command => "",
    }
}

/// Theme colour token for a node's icon; `None` inherits the row colour
pub fn icon_color(kind: NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::Trigger => Some("themePrimary"),
        NodeKind::Dialog | NodeKind::FormDialog => Some("themeDark"),
        NodeKind::Bot => Some("neutralPrimary"),
        NodeKind::Lg | NodeKind::LgImport => Some("tealDark"),
        NodeKind::Lu | NodeKind::LuImport => Some("purpleDark"),
        NodeKind::Qna => Some("orangeDark"),
        NodeKind::Schema => Some("greenDark"),
        NodeKind::Root
        | NodeKind::DialogGroup
        | NodeKind::TriggerGroup
        | NodeKind::LuGroup
        | NodeKind::LgGroup
        | NodeKind::QnaGroup
        | NodeKind::SchemaGroup
        | NodeKind::Command => None,
    }
}

/// What a menu entry does when chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", content = "project", rename_all = "camelCase")]
pub enum ActionCommand {
    StartBot(ProjectId),
    StopBot(ProjectId),
    AddDialog(ProjectId),
    EditManifest(ProjectId),
    ExportZip(ProjectId),
    OpenSettings(ProjectId),
    AddTrigger,
    AddKnowledgeBase,
    RemoveDialog,
    EditSchema,
    RemoveSchema,
}

/// Receivers for menu commands. Unhandled commands are ignored.
pub trait ActionCallbacks {
    fn on_bot_start(&mut self, _project: &ProjectId) {}
    fn on_bot_stop(&mut self, _project: &ProjectId) {}
    fn on_add_dialog(&mut self, _project: &ProjectId) {}
    fn on_edit_manifest(&mut self, _project: &ProjectId) {}
    fn on_export_zip(&mut self, _project: &ProjectId) {}
}

impl ActionCommand {
    pub fn invoke(&self, callbacks: &mut dyn ActionCallbacks) {
        match self {
            ActionCommand::StartBot(project) => callbacks.on_bot_start(project),
            ActionCommand::StopBot(project) => callbacks.on_bot_stop(project),
            ActionCommand::AddDialog(project) => callbacks.on_add_dialog(project),
            ActionCommand::EditManifest(project) => callbacks.on_edit_manifest(project),
            ActionCommand::ExportZip(project) => callbacks.on_export_zip(project),
            ActionCommand::OpenSettings(_)
            | ActionCommand::AddTrigger
            | ActionCommand::AddKnowledgeBase
            | ActionCommand::RemoveDialog
            | ActionCommand::EditSchema
            | ActionCommand::RemoveSchema => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub label: &'static str,
    pub icon: Option<&'static str>,
    /// Rendered as an inline button instead of inside the overflow menu
    pub show_as_action: bool,
    pub command: ActionCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MenuEntry {
    Normal(ActionItem),
    Separator,
}

/// Action entries split the way a row renders them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionMenu {
    pub inline: Vec<ActionItem>,
    pub overflow: Vec<MenuEntry>,
}

impl ActionMenu {
    pub fn from_entries(entries: Vec<MenuEntry>) -> Self {
        let mut menu = ActionMenu::default();
        for entry in entries {
            match entry {
                MenuEntry::Normal(item) if item.show_as_action => menu.inline.push(item),
                other => menu.overflow.push(other),
            }
        }
        menu
    }

    pub fn is_empty(&self) -> bool {
        self.inline.is_empty() && self.overflow.is_empty()
    }
}

fn item(label: &'static str, icon: Option<&'static str>, command: ActionCommand) -> MenuEntry {
    MenuEntry::Normal(ActionItem {
        label,
        icon,
        show_as_action: false,
        command,
    })
}

/// Contextual menu entries for a node, in display order
pub fn action_menu_entries(node: &TreeNode) -> Vec<MenuEntry> {
    let project = &node.owner;
    match &node.data {
        NodeData::Bot { running, .. } => vec![
            MenuEntry::Normal(ActionItem {
                label: if *running { "Stop bot" } else { "Start bot" },
                icon: Some(if *running {
                    "CircleStopSolid"
                } else {
                    "TriangleSolidRight12"
                }),
                show_as_action: true,
                command: if *running {
                    ActionCommand::StopBot(project.clone())
                } else {
                    ActionCommand::StartBot(project.clone())
                },
            }),
            item("Add a dialog", Some("Add"), ActionCommand::AddDialog(project.clone())),
            MenuEntry::Separator,
            item(
                "Create/edit skill manifest",
                None,
                ActionCommand::EditManifest(project.clone()),
            ),
            item(
                "Export this bot as .zip",
                None,
                ActionCommand::ExportZip(project.clone()),
            ),
            item("Settings", None, ActionCommand::OpenSettings(project.clone())),
        ],
        NodeData::Dialog { is_form_dialog, .. } => {
            let mut entries = vec![
                item("Add trigger", Some("Add"), ActionCommand::AddTrigger),
                item("Add knowledge base", Some("Add"), ActionCommand::AddKnowledgeBase),
            ];
            if *is_form_dialog {
                entries.extend([
                    MenuEntry::Separator,
                    item("Remove dialog", Some("Delete"), ActionCommand::RemoveDialog),
                    item("Edit schema", Some("Edit"), ActionCommand::EditSchema),
                ]);
            }
            entries
        }
        NodeData::Trigger { .. } => {
            vec![item("Remove dialog", Some("Delete"), ActionCommand::RemoveDialog)]
        }
        NodeData::Schema { .. } => {
            vec![item("Remove schema", Some("Delete"), ActionCommand::RemoveSchema)]
        }
        NodeData::Root { .. }
        | NodeData::Group { .. }
        | NodeData::File { .. }
        | NodeData::LgImport { .. }
        | NodeData::LuImport { .. }
        | NodeData::Command { .. } => Vec::new(),
    }
}

/// Contextual menu for a node, partitioned into inline and overflow entries
pub fn action_menu(node: &TreeNode) -> ActionMenu {
    ActionMenu::from_entries(action_menu_entries(node))
}
