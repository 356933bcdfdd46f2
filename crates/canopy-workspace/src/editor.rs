// ABOUTME: Resolves which external editor renders a document for the current view mode
// ABOUTME: Exhaustive over node payloads; owning dialogs come from the id lineage markers

use canopy_tree::{LanguageKind, NodeData};
use canopy_types::{ProjectId, ViewMode};
use serde::Serialize;

use crate::document::DocumentItem;

const LG_MARKER: &str = ":lg:";
const LU_MARKER: &str = ":lu:";
const QNA_MARKER: &str = ":qna:";
const TRIGGER_MARKER: &str = ":trigger:";

/// Editor a document should be mounted in
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "editor", rename_all = "camelCase")]
pub enum EditorTarget {
    LgTable {
        project: ProjectId,
        dialog_id: String,
        file_id: String,
    },
    LgCode {
        project: ProjectId,
        dialog_id: String,
        file_id: String,
    },
    LuTable {
        project: ProjectId,
        dialog_id: String,
        file_id: String,
    },
    LuCode {
        project: ProjectId,
        dialog_id: String,
        file_id: String,
    },
    QnaTable {
        project: ProjectId,
    },
    QnaCode {
        project: ProjectId,
        dialog_id: String,
    },
    VisualDesigner {
        project: ProjectId,
        dialog_id: String,
        trigger_id: Option<String>,
        view_mode: ViewMode,
    },
    FormSchemaEditor {
        project: ProjectId,
        schema_id: String,
        /// The raw schema editor is only shown in code mode
        show_editor: bool,
    },
    RawData {
        data: serde_json::Value,
    },
}

impl EditorTarget {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LgTable { .. } => "lgTable",
            Self::LgCode { .. } => "lgCode",
            Self::LuTable { .. } => "luTable",
            Self::LuCode { .. } => "luCode",
            Self::QnaTable { .. } => "qnaTable",
            Self::QnaCode { .. } => "qnaCode",
            Self::VisualDesigner { .. } => "visualDesigner",
            Self::FormSchemaEditor { .. } => "formSchemaEditor",
            Self::RawData { .. } => "rawData",
        }
    }
}

fn owning_dialog(item: &DocumentItem, marker: &str, fallback: &str) -> String {
    item.id
        .owner_dialog(marker)
        .unwrap_or(fallback)
        .to_string()
}

fn language_target(
    language: LanguageKind,
    project: ProjectId,
    dialog_id: String,
    file_id: String,
    view_mode: ViewMode,
) -> EditorTarget {
    match (language, view_mode) {
        (LanguageKind::Lg, ViewMode::Visual) => EditorTarget::LgTable {
            project,
            dialog_id,
            file_id,
        },
        (LanguageKind::Lg, ViewMode::Code) => EditorTarget::LgCode {
            project,
            dialog_id,
            file_id,
        },
        (LanguageKind::Lu, ViewMode::Visual) => EditorTarget::LuTable {
            project,
            dialog_id,
            file_id,
        },
        (LanguageKind::Lu, ViewMode::Code) => EditorTarget::LuCode {
            project,
            dialog_id,
            file_id,
        },
        (LanguageKind::Qna, ViewMode::Visual) => EditorTarget::QnaTable { project },
        (LanguageKind::Qna, ViewMode::Code) => EditorTarget::QnaCode { project, dialog_id },
    }
}

/// Pick the editor for `item` under the global view mode
pub fn resolve_editor(item: &DocumentItem, view_mode: ViewMode) -> EditorTarget {
    let project = item.owner.clone();
    match &item.data {
        NodeData::File {
            language,
            dialog_id,
            file_id,
        } => {
            let marker = match language {
                LanguageKind::Lg => LG_MARKER,
                LanguageKind::Lu => LU_MARKER,
                LanguageKind::Qna => QNA_MARKER,
            };
            let dialog_id = owning_dialog(item, marker, dialog_id);
            language_target(*language, project, dialog_id, file_id.clone(), view_mode)
        }
        NodeData::LgImport { dialog_id, import } => {
            let dialog_id = owning_dialog(item, LG_MARKER, dialog_id);
            language_target(LanguageKind::Lg, project, dialog_id, import.id.clone(), view_mode)
        }
        NodeData::LuImport { dialog_id, import } => {
            let dialog_id = owning_dialog(item, LU_MARKER, dialog_id);
            language_target(LanguageKind::Lu, project, dialog_id, import.id.clone(), view_mode)
        }
        NodeData::Dialog { dialog_id, .. } => EditorTarget::VisualDesigner {
            project,
            dialog_id: dialog_id.clone(),
            trigger_id: None,
            view_mode,
        },
        NodeData::Trigger {
            dialog_id,
            trigger_id,
            ..
        } => EditorTarget::VisualDesigner {
            project,
            dialog_id: owning_dialog(item, TRIGGER_MARKER, dialog_id),
            trigger_id: Some(trigger_id.clone()),
            view_mode,
        },
        NodeData::Schema { schema_id } => EditorTarget::FormSchemaEditor {
            project,
            schema_id: schema_id.clone(),
            show_editor: view_mode == ViewMode::Code,
        },
        NodeData::Root { .. }
        | NodeData::Bot { .. }
        | NodeData::Group { .. }
        | NodeData::Command { .. } => EditorTarget::RawData {
            data: serde_json::to_value(&item.data).unwrap_or(serde_json::Value::Null),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_types::{LanguageFileImport, NodeId, NodeKind};

    fn item(id: &str, kind: NodeKind, data: NodeData) -> DocumentItem {
        DocumentItem {
            id: NodeId::from(id),
            owner: ProjectId::from("p1"),
            kind,
            label: "label".into(),
            data,
        }
    }

    #[test]
    fn test_language_files_follow_view_mode() {
        let lg = item(
            "main:lg:main.en-us",
            NodeKind::Lg,
            NodeData::File {
                language: LanguageKind::Lg,
                dialog_id: "main".into(),
                file_id: "main.en-us".into(),
            },
        );
        assert_eq!(resolve_editor(&lg, ViewMode::Visual).name(), "lgTable");
        assert_eq!(
            resolve_editor(&lg, ViewMode::Code),
            EditorTarget::LgCode {
                project: ProjectId::from("p1"),
                dialog_id: "main".into(),
                file_id: "main.en-us".into(),
            }
        );

        let qna = item(
            "main:qna:main",
            NodeKind::Qna,
            NodeData::File {
                language: LanguageKind::Qna,
                dialog_id: "main".into(),
                file_id: "main".into(),
            },
        );
        assert_eq!(
            resolve_editor(&qna, ViewMode::Visual),
            EditorTarget::QnaTable {
                project: ProjectId::from("p1")
            }
        );
    }

    #[test]
    fn test_imports_open_the_imported_file() {
        let import = item(
            "order:lu:shared",
            NodeKind::LuImport,
            NodeData::LuImport {
                dialog_id: "order".into(),
                import: LanguageFileImport {
                    id: "shared".into(),
                    import_path: "shared.lu".into(),
                    display_name: "Shared".into(),
                },
            },
        );
        assert_eq!(
            resolve_editor(&import, ViewMode::Visual),
            EditorTarget::LuTable {
                project: ProjectId::from("p1"),
                dialog_id: "order".into(),
                file_id: "shared".into(),
            }
        );
    }

    #[test]
    fn test_trigger_opens_owning_dialog() {
        let trigger = item(
            "main:trigger:greet",
            NodeKind::Trigger,
            NodeData::Trigger {
                dialog_id: "main".into(),
                trigger_id: "greet".into(),
                label: "Greeting".into(),
                trigger_type: "Microsoft.OnIntent".into(),
            },
        );
        assert_eq!(
            resolve_editor(&trigger, ViewMode::Code),
            EditorTarget::VisualDesigner {
                project: ProjectId::from("p1"),
                dialog_id: "main".into(),
                trigger_id: Some("greet".into()),
                view_mode: ViewMode::Code,
            }
        );
    }

    #[test]
    fn test_schema_editor_visibility() {
        let schema = item(
            "schema:order",
            NodeKind::Schema,
            NodeData::Schema {
                schema_id: "order".into(),
            },
        );
        let visual = resolve_editor(&schema, ViewMode::Visual);
        assert!(matches!(visual, EditorTarget::FormSchemaEditor { show_editor: false, .. }));
        let code = resolve_editor(&schema, ViewMode::Code);
        assert!(matches!(code, EditorTarget::FormSchemaEditor { show_editor: true, .. }));
    }

    #[test]
    fn test_structural_nodes_show_raw_data() {
        let bot = item(
            "bot:p1",
            NodeKind::Bot,
            NodeData::Bot {
                name: "Echo".into(),
                running: false,
            },
        );
        match resolve_editor(&bot, ViewMode::Visual) {
            EditorTarget::RawData { data } => {
                assert_eq!(data["type"], "bot");
                assert_eq!(data["name"], "Echo");
            }
            other => panic!("Expected raw data, got {other:?}"),
        }
    }
}
