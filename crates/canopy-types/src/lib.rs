// ABOUTME: Pure data types with no cross-crate dependencies
// ABOUTME: Foundation layer for all other canopy crates

pub mod config;
pub mod ids;
pub mod kind;
pub mod modes;
pub mod project;

// Re-export commonly used types
pub use config::{ConfigError, NavigatorConfig, QuickConfig, TreeConfig};
pub use ids::{NodeId, ProjectId};
pub use kind::NodeKind;
pub use modes::{ActivationMode, ViewMode};
pub use project::{
    BotProject, DialogInfo, FileImportRef, FormDialogSchema, JsonSchemaFile, LanguageFile,
    LanguageFileImport, TriggerInfo,
};
