// ABOUTME: Explorer view state: collapse toggles, click resolution and memoized flattening
// ABOUTME: Non-clickable rows toggle collapse while document rows resolve into open requests

use canopy_events::tree::Event as TreeEvent;
use canopy_types::{ActivationMode, NodeId, NodeKind};
use std::sync::Arc;
use tracing::debug;

use crate::flatten::{CollapsedSet, FlattenOptions, FlattenedTree, get_all_nodes};
use crate::presentation::{icon_color, icon_name};
use crate::snapshot::{NodeKey, TreeSnapshot};

/// Outcome of a click on an explorer row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplorerAction {
    /// The row's subtree was collapsed or expanded
    Toggled { id: NodeId, collapsed: bool },
    /// The row's document should be opened
    Open { id: NodeId, mode: ActivationMode },
}

impl ExplorerAction {
    /// Tree event describing a toggle, if this action was one
    pub fn tree_event(&self) -> Option<TreeEvent> {
        match self {
            ExplorerAction::Toggled {
                id,
                collapsed: true,
            } => Some(TreeEvent::NodeCollapsed {
                node_id: id.clone(),
            }),
            ExplorerAction::Toggled {
                id,
                collapsed: false,
            } => Some(TreeEvent::NodeExpanded {
                node_id: id.clone(),
            }),
            ExplorerAction::Open { .. } => None,
        }
    }
}

/// One rendered explorer row
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerRow {
    pub key: NodeKey,
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    pub level: usize,
    pub icon: &'static str,
    pub icon_color: Option<&'static str>,
    pub collapsed: bool,
    pub has_children: bool,
    pub selected: bool,
}

struct ViewCache {
    snapshot_revision: u64,
    collapsed_revision: u64,
    flat: Arc<FlattenedTree>,
}

/// Collapse state and cached flattening for one explorer view
pub struct ExplorerState {
    collapsed: CollapsedSet,
    collapsed_revision: u64,
    skip_root: bool,
    start: Option<NodeKey>,
    cache: Option<ViewCache>,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self::new(CollapsedSet::new())
    }
}

impl ExplorerState {
    pub fn new(default_collapsed: CollapsedSet) -> Self {
        Self {
            collapsed: default_collapsed,
            collapsed_revision: 0,
            skip_root: false,
            start: None,
            cache: None,
        }
    }

    pub fn with_skip_root(mut self, skip_root: bool) -> Self {
        self.skip_root = skip_root;
        self.cache = None;
        self
    }

    /// Show only the subtree below `start`
    pub fn with_start(mut self, start: NodeKey) -> Self {
        self.start = Some(start);
        self.cache = None;
        self
    }

    pub fn is_collapsed(&self, id: &NodeId) -> bool {
        self.collapsed.contains(id)
    }

    pub fn collapsed(&self) -> &CollapsedSet {
        &self.collapsed
    }

    /// Set one node's collapse flag, returning the matching tree event
    pub fn set_collapsed(&mut self, id: &NodeId, collapsed: bool) -> TreeEvent {
        let changed = if collapsed {
            self.collapsed.insert(id.clone())
        } else {
            self.collapsed.remove(id)
        };
        if changed {
            self.collapsed_revision += 1;
        }
        debug!(node_id = %id, collapsed, "Explorer collapse changed");

        if collapsed {
            TreeEvent::NodeCollapsed {
                node_id: id.clone(),
            }
        } else {
            TreeEvent::NodeExpanded {
                node_id: id.clone(),
            }
        }
    }

    /// Single click: toggles non-clickable rows, soft-opens the rest
    pub fn click(&mut self, snapshot: &TreeSnapshot, key: NodeKey) -> Option<ExplorerAction> {
        let node = snapshot.get(key)?;
        if node.kind().is_clickable() {
            return Some(ExplorerAction::Open {
                id: node.id.clone(),
                mode: ActivationMode::Soft,
            });
        }

        let collapsed = !self.is_collapsed(&node.id);
        let id = node.id.clone();
        self.set_collapsed(&id, collapsed);
        Some(ExplorerAction::Toggled { id, collapsed })
    }

    /// Double click: hard-opens document rows, ignored on the rest
    pub fn double_click(&self, snapshot: &TreeSnapshot, key: NodeKey) -> Option<ExplorerAction> {
        let node = snapshot.get(key)?;
        node.kind().is_clickable().then(|| ExplorerAction::Open {
            id: node.id.clone(),
            mode: ActivationMode::Hard,
        })
    }

    /// Flattened view, recomputed only when the snapshot or collapse state changed
    pub fn view(&mut self, snapshot: &TreeSnapshot) -> Arc<FlattenedTree> {
        if let Some(cache) = &self.cache {
            if cache.snapshot_revision == snapshot.revision()
                && cache.collapsed_revision == self.collapsed_revision
            {
                return cache.flat.clone();
            }
        }

        let options = FlattenOptions {
            collapsed: self.collapsed.clone(),
            skip_root: self.skip_root,
            start: self.start,
        };
        let flat = Arc::new(get_all_nodes(snapshot, &options));
        self.cache = Some(ViewCache {
            snapshot_revision: snapshot.revision(),
            collapsed_revision: self.collapsed_revision,
            flat: flat.clone(),
        });
        flat
    }

    /// Rows ready for rendering, with levels shifted when the root is hidden
    pub fn rows(&mut self, snapshot: &TreeSnapshot, selected: Option<&str>) -> Vec<ExplorerRow> {
        let flat = self.view(snapshot);
        let offset = usize::from(self.skip_root);

        flat.nodes
            .iter()
            .filter_map(|key| {
                let node = snapshot.get(*key)?;
                Some(ExplorerRow {
                    key: *key,
                    id: node.id.clone(),
                    label: node.display_label().to_string(),
                    kind: node.kind(),
                    level: flat.level(*key).unwrap_or(0).saturating_sub(offset),
                    icon: icon_name(node.kind()),
                    icon_color: icon_color(node.kind()),
                    collapsed: self.collapsed.contains(&node.id),
                    has_children: node.has_children(),
                    selected: selected == Some(node.id.as_str()),
                })
            })
            .collect()
    }

    /// Position of `id` among the visible rows, for scroll-into-view
    pub fn index_of(&mut self, snapshot: &TreeSnapshot, id: &str) -> Option<usize> {
        let key = snapshot.key_of(id)?;
        self.view(snapshot).position(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_tree;
    use canopy_types::{BotProject, DialogInfo, LanguageFile, NavigatorConfig, ProjectId};

    fn snapshot() -> TreeSnapshot {
        let project = BotProject {
            project_id: ProjectId::from("p1"),
            name: "EchoBot".into(),
            dialogs: vec![DialogInfo {
                id: "main".into(),
                display_name: "Main".into(),
                ..Default::default()
            }],
            lg_files: vec![LanguageFile {
                id: "main".into(),
                content: "# hi".into(),
                imports: vec![],
            }],
            ..Default::default()
        };
        build_tree(&[project], &NavigatorConfig::default()).unwrap()
    }

    #[test]
    fn test_group_click_toggles_collapse() {
        let snapshot = snapshot();
        let mut explorer = ExplorerState::default();
        let group = snapshot.key_of("lgGroup:main").unwrap();

        let before = explorer.rows(&snapshot, None).len();
        let action = explorer.click(&snapshot, group).unwrap();
        assert_eq!(
            action,
            ExplorerAction::Toggled {
                id: NodeId::from("lgGroup:main"),
                collapsed: true
            }
        );
        assert!(matches!(
            action.tree_event(),
            Some(TreeEvent::NodeCollapsed { .. })
        ));
        assert_eq!(explorer.rows(&snapshot, None).len(), before - 1);

        explorer.click(&snapshot, group);
        assert_eq!(explorer.rows(&snapshot, None).len(), before);
    }

    #[test]
    fn test_document_clicks_open() {
        let snapshot = snapshot();
        let mut explorer = ExplorerState::default();
        let lg = snapshot.key_of("main:lg:main").unwrap();
        let bot = snapshot.key_of("bot:p1").unwrap();

        assert_eq!(
            explorer.click(&snapshot, lg),
            Some(ExplorerAction::Open {
                id: NodeId::from("main:lg:main"),
                mode: ActivationMode::Soft
            })
        );
        assert_eq!(
            explorer.double_click(&snapshot, lg),
            Some(ExplorerAction::Open {
                id: NodeId::from("main:lg:main"),
                mode: ActivationMode::Hard
            })
        );
        assert_eq!(explorer.double_click(&snapshot, bot), None);
    }

    #[test]
    fn test_view_is_memoized() {
        let snapshot = snapshot();
        let mut explorer = ExplorerState::default();

        let first = explorer.view(&snapshot);
        let second = explorer.view(&snapshot);
        assert!(Arc::ptr_eq(&first, &second));

        explorer.set_collapsed(&NodeId::from("bot:p1"), true);
        let third = explorer.view(&snapshot);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.len(), 2);
    }

    #[test]
    fn test_rows_with_hidden_root() {
        let snapshot = snapshot();
        let mut explorer = ExplorerState::default().with_skip_root(true);
        let rows = explorer.rows(&snapshot, Some("main:lg:main"));

        assert_eq!(rows[0].id.as_str(), "bot:p1");
        assert_eq!(rows[0].level, 0);
        assert_eq!(rows[0].icon, "CubeShape");
        assert_eq!(rows[0].icon_color, Some("neutralPrimary"));
        let lg_group = rows.iter().find(|r| r.kind == NodeKind::LgGroup).unwrap();
        assert_eq!(lg_group.icon_color, None);
        assert!(rows.iter().any(|r| r.selected && r.kind == NodeKind::Lg));
        assert_eq!(explorer.index_of(&snapshot, "main:lg:main"), Some(rows.len() - 1));
    }
}
