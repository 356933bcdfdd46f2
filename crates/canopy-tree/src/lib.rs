// ABOUTME: Tree index for bot projects: immutable arena snapshots plus traversal utilities
// ABOUTME: Builds the solution tree, flattens it for display and drives explorer presentation

pub mod builder;
pub mod error;
pub mod explorer;
pub mod flatten;
pub mod grouping;
pub mod imports;
pub mod node;
pub mod presentation;
pub mod snapshot;

#[cfg(test)]
mod flatten_tests;

pub use builder::{TreeBuilder, build_tree};
pub use error::TreeError;
pub use explorer::{ExplorerAction, ExplorerRow, ExplorerState};
pub use flatten::{CollapsedSet, FlattenOptions, FlattenedTree, count_descendants, get_all_nodes};
pub use grouping::{SchemaPropertyGrouper, TriggerGrouper, extract_schema_properties};
pub use imports::{base_name, find_language_file, get_language_file_imports};
pub use node::{GroupKind, LanguageKind, NodeData, NodeSpec, TreeNode};
pub use presentation::{
    ActionCallbacks, ActionCommand, ActionItem, ActionMenu, MenuEntry, action_menu,
    action_menu_entries, icon_color, icon_name,
};
pub use snapshot::{NodeKey, TreeSnapshot};
