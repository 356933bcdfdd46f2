// ABOUTME: Document group coordination between the session and the tree snapshot
// ABOUTME: Breadcrumbs, breadcrumb callouts, go-to-file lookup, palette ownership and empty state hints

use canopy_quick::QuickPalette;
use canopy_tree::{
    CollapsedSet, ExplorerAction, ExplorerRow, ExplorerState, FlattenOptions, NodeKey, TreeNode,
    TreeSnapshot, count_descendants, get_all_nodes,
};
use canopy_types::{NavigatorConfig, NodeId, NodeKind, TreeConfig};
use serde::Serialize;
use tracing::debug;

use crate::keybindings::{Platform, ShortcutHint, empty_state_hints};
use crate::session::DocumentSession;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbItem {
    #[serde(skip)]
    pub key: NodeKey,
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    pub is_current: bool,
}

/// Chain from the root down to the active document's node, skipping group nodes
pub fn breadcrumb(snapshot: &TreeSnapshot, active_id: Option<&NodeId>) -> Vec<BreadcrumbItem> {
    let Some(active_id) = active_id else {
        return Vec::new();
    };
    let Some(key) = snapshot.key_of(active_id.as_str()) else {
        return Vec::new();
    };

    snapshot
        .ancestry(key)
        .into_iter()
        .filter_map(|k| {
            let node = snapshot.get(k)?;
            if node.kind().is_group() {
                return None;
            }
            Some(BreadcrumbItem {
                key: k,
                id: node.id.clone(),
                label: node.display_label().to_string(),
                kind: node.kind(),
                is_current: &node.id == active_id,
            })
        })
        .collect()
}

/// First node, in tree order, whose id contains `file_id`.
///
/// Ids embed both dialog and file ids, so this is a substring search rather
/// than an exact lookup; an empty `file_id` never matches.
pub fn find_file_node<'a>(snapshot: &'a TreeSnapshot, file_id: &str) -> Option<&'a TreeNode> {
    if file_id.is_empty() {
        return None;
    }
    snapshot
        .iter()
        .map(|(_, node)| node)
        .find(|node| node.id.contains(file_id))
}

/// Popup tree shown when a breadcrumb item is clicked
pub struct BreadcrumbCallout {
    /// Breadcrumb item the callout belongs to
    pub item: NodeKey,
    /// Root of the popup tree: the item's parent, or the item itself at the top
    pub root: NodeKey,
    /// Visible rows below `root` when the callout opened
    pub count: usize,
    pub height: u32,
    explorer: ExplorerState,
}

impl BreadcrumbCallout {
    /// `active` is the active document's node; its ancestors stay expanded
    pub fn new(
        snapshot: &TreeSnapshot,
        item: NodeKey,
        active: Option<NodeKey>,
        config: &TreeConfig,
    ) -> Self {
        let root = snapshot.parent(item).unwrap_or(item);
        let active_path = active.map(|key| snapshot.ancestry(key)).unwrap_or_default();
        let collapsed = callout_collapsed(snapshot, root, &active_path);

        let count = count_descendants(snapshot, root, &collapsed);
        let rows = u32::try_from(count).unwrap_or(u32::MAX);
        let height = rows
            .saturating_mul(config.item_height)
            .min(config.max_callout_height);

        Self {
            item,
            root,
            count,
            height,
            explorer: ExplorerState::new(collapsed)
                .with_skip_root(true)
                .with_start(root),
        }
    }

    pub fn is_collapsed(&self, id: &NodeId) -> bool {
        self.explorer.is_collapsed(id)
    }

    /// Rows of the popup tree, its root hidden
    pub fn rows(&mut self, snapshot: &TreeSnapshot, selected: Option<&str>) -> Vec<ExplorerRow> {
        self.explorer.rows(snapshot, selected)
    }

    /// Clicks toggle structural rows in place; document rows resolve to an open
    pub fn click(&mut self, snapshot: &TreeSnapshot, key: NodeKey) -> Option<ExplorerAction> {
        self.explorer.click(snapshot, key)
    }
}

/// Every node under `root` starts collapsed unless it lies on the active path;
/// `root` itself is always expanded.
fn callout_collapsed(snapshot: &TreeSnapshot, root: NodeKey, active_path: &[NodeKey]) -> CollapsedSet {
    let subtree = get_all_nodes(
        snapshot,
        &FlattenOptions {
            start: Some(root),
            ..Default::default()
        },
    );

    let mut collapsed: CollapsedSet = subtree
        .nodes
        .iter()
        .filter(|key| !active_path.contains(key))
        .filter_map(|key| snapshot.get(*key))
        .map(|node| node.id.clone())
        .collect();
    if let Some(root_node) = snapshot.get(root) {
        collapsed.remove(&root_node.id);
    }
    collapsed
}

/// Presentation state of the document area
pub struct DocumentGroup {
    palette: QuickPalette,
    callout: Option<BreadcrumbCallout>,
    tree_config: TreeConfig,
    platform: Platform,
}

impl DocumentGroup {
    pub fn new(config: &NavigatorConfig, platform: Platform) -> Self {
        Self {
            palette: QuickPalette::with_config(config.quick.clone()),
            callout: None,
            tree_config: config.tree.clone(),
            platform,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn palette(&self) -> &QuickPalette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut QuickPalette {
        &mut self.palette
    }

    /// Index a new snapshot and drop callouts that point into the old one
    pub fn set_snapshot(&mut self, snapshot: &TreeSnapshot) {
        self.palette.set_snapshot(snapshot);
        self.callout = None;
    }

    pub fn breadcrumb(&self, snapshot: &TreeSnapshot, session: &DocumentSession) -> Vec<BreadcrumbItem> {
        breadcrumb(snapshot, session.active_id())
    }

    pub fn open_callout(
        &mut self,
        snapshot: &TreeSnapshot,
        session: &DocumentSession,
        item: NodeKey,
    ) -> Option<&BreadcrumbCallout> {
        snapshot.get(item)?;
        let active = session
            .active_id()
            .and_then(|id| snapshot.key_of(id.as_str()));
        let callout = BreadcrumbCallout::new(snapshot, item, active, &self.tree_config);
        debug!(count = callout.count, height = callout.height, "Opened breadcrumb callout");
        self.callout = Some(callout);
        self.callout.as_ref()
    }

    pub fn callout(&self) -> Option<&BreadcrumbCallout> {
        self.callout.as_ref()
    }

    pub fn callout_mut(&mut self) -> Option<&mut BreadcrumbCallout> {
        self.callout.as_mut()
    }

    pub fn close_callout(&mut self) {
        self.callout = None;
    }

    /// Shortcut hints, shown only while no document is open
    pub fn empty_state(&self, session: &DocumentSession) -> Option<Vec<ShortcutHint>> {
        session.is_empty().then(|| empty_state_hints(self.platform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentItem;
    use canopy_tree::build_tree;
    use canopy_types::{ActivationMode, BotProject, DialogInfo, LanguageFile, ProjectId, TriggerInfo};

    fn project() -> BotProject {
        BotProject {
            project_id: ProjectId::from("p1"),
            name: "EchoBot".into(),
            dialogs: vec![DialogInfo {
                id: "main".into(),
                display_name: "Main".into(),
                triggers: vec![TriggerInfo {
                    id: "greet".into(),
                    display_name: "Greeting".into(),
                    kind: "Microsoft.OnIntent".into(),
                    property: None,
                }],
                ..Default::default()
            }],
            lg_files: vec![LanguageFile {
                id: "main".into(),
                content: "# hi".into(),
                imports: vec![],
            }],
            lu_files: vec![LanguageFile {
                id: "main".into(),
                content: "# Greet".into(),
                imports: vec![],
            }],
            ..Default::default()
        }
    }

    fn snapshot() -> TreeSnapshot {
        build_tree(&[project()], &NavigatorConfig::default()).unwrap()
    }

    fn session_with(snapshot: &TreeSnapshot, id: &str) -> DocumentSession {
        let mut session = DocumentSession::new();
        let node = snapshot.get_by_id(id).unwrap();
        session.open(DocumentItem::from_node(node), ActivationMode::Soft);
        session
    }

    #[test]
    fn test_breadcrumb_skips_groups() {
        let snapshot = snapshot();
        let active = NodeId::from("main:lg:main");
        let crumbs = breadcrumb(&snapshot, Some(&active));

        let ids: Vec<&str> = crumbs.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "bot:p1", "dialog:main", "main:lg:main"]);
        assert!(crumbs.last().unwrap().is_current);
        assert!(!crumbs[0].is_current);

        assert!(breadcrumb(&snapshot, None).is_empty());
        assert!(breadcrumb(&snapshot, Some(&NodeId::from("gone"))).is_empty());
    }

    #[test]
    fn test_find_file_node_by_substring() {
        let snapshot = snapshot();
        // "main" is part of several ids; the first in tree order wins
        assert_eq!(
            find_file_node(&snapshot, "main").map(|n| n.id.as_str()),
            Some("dialog:main")
        );
        assert_eq!(
            find_file_node(&snapshot, "lu:main").map(|n| n.id.as_str()),
            Some("main:lu:main")
        );
        assert!(find_file_node(&snapshot, "").is_none());
        assert!(find_file_node(&snapshot, "missing").is_none());
    }

    #[test]
    fn test_callout_expands_only_the_active_path() {
        let snapshot = snapshot();
        let session = session_with(&snapshot, "main:lg:main");
        let mut group = DocumentGroup::new(&NavigatorConfig::default(), Platform::Other);
        let dialog = snapshot.key_of("dialog:main").unwrap();

        let callout = group.open_callout(&snapshot, &session, dialog).unwrap();
        assert_eq!(callout.root, snapshot.key_of("dialogGroup:p1").unwrap());
        assert!(!callout.is_collapsed(&NodeId::from("dialogGroup:p1")));
        assert!(!callout.is_collapsed(&NodeId::from("lgGroup:main")));
        assert!(callout.is_collapsed(&NodeId::from("triggerGroup:main")));
        assert!(callout.is_collapsed(&NodeId::from("luGroup:main")));
        // dialog, its three groups and the active lg file
        assert_eq!(callout.count, 5);
        assert_eq!(callout.height, 5 * 24);

        let rows = group
            .callout_mut()
            .unwrap()
            .rows(&snapshot, Some("main:lg:main"));
        let shape: Vec<(&str, usize)> = rows.iter().map(|r| (r.id.as_str(), r.level)).collect();
        assert_eq!(
            shape,
            vec![
                ("dialog:main", 0),
                ("triggerGroup:main", 1),
                ("lgGroup:main", 1),
                ("main:lg:main", 2),
                ("luGroup:main", 1),
            ]
        );
        assert!(rows[3].selected);
    }

    #[test]
    fn test_callout_height_is_capped() {
        let snapshot = snapshot();
        let config = TreeConfig {
            item_height: 100,
            max_callout_height: 300,
        };
        let root = snapshot.root();
        let active = snapshot.key_of("main:lu:main");
        let callout = BreadcrumbCallout::new(&snapshot, root, active, &config);
        assert_eq!(callout.root, root);
        assert!(callout.count > 3);
        assert_eq!(callout.height, 300);
    }

    #[test]
    fn test_callout_click_opens_documents() {
        let snapshot = snapshot();
        let session = session_with(&snapshot, "main:lg:main");
        let mut group = DocumentGroup::new(&NavigatorConfig::default(), Platform::Other);
        group.open_callout(&snapshot, &session, snapshot.key_of("dialog:main").unwrap());

        let callout = group.callout_mut().unwrap();
        let lu_group = snapshot.key_of("luGroup:main").unwrap();
        assert_eq!(
            callout.click(&snapshot, lu_group),
            Some(ExplorerAction::Toggled {
                id: NodeId::from("luGroup:main"),
                collapsed: false,
            })
        );
        let trigger = snapshot.key_of("main:trigger:greet").unwrap();
        assert_eq!(
            callout.click(&snapshot, trigger),
            Some(ExplorerAction::Open {
                id: NodeId::from("main:trigger:greet"),
                mode: ActivationMode::Soft,
            })
        );

        group.set_snapshot(&snapshot);
        assert!(group.callout().is_none());
    }

    #[test]
    fn test_empty_state_only_without_documents() {
        let snapshot = snapshot();
        let group = DocumentGroup::new(&NavigatorConfig::default(), Platform::Mac);

        let hints = group.empty_state(&DocumentSession::new()).unwrap();
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0].shortcut, crate::keybindings::Shortcut::ShowAllCommands);

        let session = session_with(&snapshot, "main:lg:main");
        assert!(group.empty_state(&session).is_none());
    }
}
