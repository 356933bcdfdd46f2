// ABOUTME: Read-only project input model consumed by the tree builder
// ABOUTME: Mirrors the external project store: dialogs, triggers, language files and schemas

use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;

/// One loaded bot project with all its authoring assets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotProject {
    pub project_id: ProjectId,
    pub name: String,
    /// Project locale; empty falls back to the navigator default
    pub locale: String,
    /// Whether the bot runtime is currently connected
    pub running: bool,
    pub dialogs: Vec<DialogInfo>,
    pub lg_files: Vec<LanguageFile>,
    pub lu_files: Vec<LanguageFile>,
    pub qna_files: Vec<LanguageFile>,
    pub form_dialog_schemas: Vec<FormDialogSchema>,
    pub json_schema_files: Vec<JsonSchemaFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogInfo {
    pub id: String,
    pub display_name: String,
    pub is_form_dialog: bool,
    /// Id of the JSON schema file describing a form dialog's properties
    pub schema: Option<String>,
    pub triggers: Vec<TriggerInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TriggerInfo {
    pub id: String,
    pub display_name: String,
    /// Declarative kind, e.g. `Microsoft.OnIntent`
    #[serde(rename = "type")]
    pub kind: String,
    /// Form property this trigger refers to, if any
    pub property: Option<String>,
}

impl TriggerInfo {
    /// Display name, falling back to a friendly name derived from the kind
    pub fn label(&self) -> String {
        if !self.display_name.is_empty() {
            return self.display_name.clone();
        }
        friendly_kind_name(&self.kind).to_string()
    }
}

fn friendly_kind_name(kind: &str) -> &str {
    kind.rsplit('.').next().unwrap_or(kind)
}

/// An LG, LU or QnA file. Only LG and LU files declare imports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageFile {
    pub id: String,
    pub content: String,
    pub imports: Vec<FileImportRef>,
}

/// Import statement as declared inside a language file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileImportRef {
    /// Target file name, e.g. `common.lg`
    pub id: String,
    pub path: String,
    pub description: String,
}

/// Import resolved against the project's files
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageFileImport {
    pub id: String,
    pub import_path: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormDialogSchema {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsonSchemaFile {
    pub id: String,
    pub content: serde_json::Value,
}

impl BotProject {
    pub fn json_schema(&self, id: &str) -> Option<&JsonSchemaFile> {
        self.json_schema_files.iter().find(|f| f.id == id)
    }
}
