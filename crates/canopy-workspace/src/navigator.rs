// ABOUTME: Navigator facade wiring the tree snapshot, explorer, palette and document session
// ABOUTME: Owns the current snapshot and routes clicks, keys and commands to session transitions

use canopy_events::EventBus;
use canopy_events::document::Event as DocumentEvent;
use canopy_events::quick::Event as QuickEvent;
use canopy_events::tree::Event as TreeEvent;
use canopy_quick::{CommandId, CommandOutcome, PaletteAction, QuickPalette};
use canopy_tree::{
    ActionMenu, ExplorerAction, ExplorerRow, ExplorerState, TreeError, TreeSnapshot, action_menu,
    build_tree,
};
use canopy_types::{ActivationMode, BotProject, NavigatorConfig, NodeId, ProjectId, ViewMode};
use std::sync::Arc;
use tracing::{debug, info};

use crate::document::DocumentItem;
use crate::editor::{EditorTarget, resolve_editor};
use crate::group::{BreadcrumbItem, DocumentGroup, find_file_node};
use crate::keybindings::{KeyChord, Platform, ShortcutHint, match_shortcut, palette_key};
use crate::session::{DocumentSession, SessionCommand};
use crate::store::SessionStore;

/// Result of routing an input through the navigator
#[derive(Debug, Clone, PartialEq)]
pub enum NavigatorOutcome {
    /// Nothing reacted to the input
    Ignored,
    /// View state changed without touching the session
    Handled,
    /// The session changed
    Session(Vec<DocumentEvent>),
    /// A palette command ran
    Command(CommandOutcome),
}

pub struct Navigator {
    config: NavigatorConfig,
    projects: Vec<BotProject>,
    snapshot: Arc<TreeSnapshot>,
    explorer: ExplorerState,
    group: DocumentGroup,
    store: SessionStore,
    bus: Arc<dyn EventBus + Send + Sync>,
    active_project: Option<ProjectId>,
}

impl Navigator {
    pub fn new(config: NavigatorConfig, bus: Arc<dyn EventBus + Send + Sync>) -> Result<Self, TreeError> {
        Self::with_platform(config, bus, Platform::current())
    }

    pub fn with_platform(
        config: NavigatorConfig,
        bus: Arc<dyn EventBus + Send + Sync>,
        platform: Platform,
    ) -> Result<Self, TreeError> {
        let snapshot = Arc::new(build_tree(&[], &config)?);
        let group = DocumentGroup::new(&config, platform);
        Ok(Self {
            store: SessionStore::new(bus.clone()),
            config,
            projects: Vec::new(),
            snapshot,
            explorer: ExplorerState::default(),
            group,
            bus,
            active_project: None,
        })
    }

    /// Replace the loaded projects and rebuild every derived index
    pub fn set_projects(&mut self, projects: Vec<BotProject>) -> Result<(), TreeError> {
        let snapshot = Arc::new(build_tree(&projects, &self.config)?);
        self.group.set_snapshot(&snapshot);

        let keep_active = self
            .active_project
            .as_ref()
            .is_some_and(|active| projects.iter().any(|p| &p.project_id == active));
        if !keep_active {
            self.active_project = projects.first().map(|p| p.project_id.clone());
        }

        info!(
            projects = projects.len(),
            nodes = snapshot.len(),
            revision = snapshot.revision(),
            "Navigator tree rebuilt"
        );
        self.bus.dispatch_tree(TreeEvent::Rebuilt {
            revision: snapshot.revision(),
            node_count: snapshot.len(),
            project_count: projects.len(),
        });

        self.projects = projects;
        self.snapshot = snapshot;
        Ok(())
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn projects(&self) -> &[BotProject] {
        &self.projects
    }

    pub fn snapshot(&self) -> Arc<TreeSnapshot> {
        self.snapshot.clone()
    }

    pub fn active_project(&self) -> Option<&ProjectId> {
        self.active_project.as_ref()
    }

    pub fn set_active_project(&mut self, project: Option<ProjectId>) {
        self.active_project = project;
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Consistent copy of the session
    pub fn session(&self) -> DocumentSession {
        self.store.snapshot()
    }

    // Explorer

    pub fn explorer_rows(&mut self) -> Vec<ExplorerRow> {
        let selected = self.store.read(|s| s.active_id().cloned());
        self.explorer
            .rows(&self.snapshot, selected.as_ref().map(NodeId::as_str))
    }

    pub fn explorer_click(&mut self, id: &str) -> NavigatorOutcome {
        let Some(key) = self.snapshot.key_of(id) else {
            return NavigatorOutcome::Ignored;
        };
        let action = self.explorer.click(&self.snapshot, key);
        self.apply_explorer_action(action)
    }

    pub fn explorer_double_click(&mut self, id: &str) -> NavigatorOutcome {
        let Some(key) = self.snapshot.key_of(id) else {
            return NavigatorOutcome::Ignored;
        };
        let action = self.explorer.double_click(&self.snapshot, key);
        self.apply_explorer_action(action)
    }

    fn apply_explorer_action(&mut self, action: Option<ExplorerAction>) -> NavigatorOutcome {
        let Some(action) = action else {
            return NavigatorOutcome::Ignored;
        };
        if let Some(event) = action.tree_event() {
            self.bus.dispatch_tree(event);
        }
        match action {
            ExplorerAction::Toggled { .. } => NavigatorOutcome::Handled,
            ExplorerAction::Open { id, mode } => NavigatorOutcome::Session(self.open_node(&id, mode)),
        }
    }

    /// Contextual actions for a tree node
    pub fn action_menu(&self, id: &str) -> Option<ActionMenu> {
        self.snapshot.get_by_id(id).map(action_menu)
    }

    // Session

    /// Open the document for a tree node; unknown ids change nothing
    pub fn open_node(&mut self, id: &NodeId, mode: ActivationMode) -> Vec<DocumentEvent> {
        let Some(node) = self.snapshot.get_by_id(id.as_str()) else {
            debug!(node_id = %id, "Ignoring open of unknown node");
            return Vec::new();
        };
        self.store.dispatch(SessionCommand::Open {
            item: DocumentItem::from_node(node),
            mode,
        })
    }

    /// Activate an open document, or open it from the tree when it is not open yet
    pub fn activate(&mut self, id: &NodeId, mode: ActivationMode) -> Vec<DocumentEvent> {
        if self.store.read(|s| s.is_open(id)) {
            self.store.dispatch(SessionCommand::Activate {
                doc_id: id.clone(),
                mode,
            })
        } else {
            self.open_node(id, mode)
        }
    }

    pub fn close(&mut self, id: &NodeId) -> Vec<DocumentEvent> {
        self.store.dispatch(SessionCommand::Close { doc_id: id.clone() })
    }

    pub fn next(&mut self) -> Vec<DocumentEvent> {
        self.store.dispatch(SessionCommand::Next)
    }

    pub fn previous(&mut self) -> Vec<DocumentEvent> {
        self.store.dispatch(SessionCommand::Previous)
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> Vec<DocumentEvent> {
        self.store.dispatch(SessionCommand::SetViewMode(mode))
    }

    pub fn toggle_view_mode(&mut self) -> Vec<DocumentEvent> {
        let mode = self.store.read(|s| s.view_mode()).toggled();
        self.set_view_mode(mode)
    }

    /// Soft-open the first node whose id contains `file_id`; no match is a no-op
    pub fn goto_file(&mut self, file_id: &str) -> Vec<DocumentEvent> {
        let Some(id) = find_file_node(&self.snapshot, file_id).map(|node| node.id.clone()) else {
            debug!(file_id, "No node matches go-to-file target");
            return Vec::new();
        };
        self.open_node(&id, ActivationMode::Soft)
    }

    /// Editor the active document should be shown in
    pub fn editor_target(&self) -> Option<EditorTarget> {
        self.store.read(|session| {
            session
                .active_document()
                .and_then(|doc| doc.item.as_ref())
                .map(|item| resolve_editor(item, session.view_mode()))
        })
    }

    pub fn empty_state(&self) -> Option<Vec<ShortcutHint>> {
        self.store.read(|session| self.group.empty_state(session))
    }

    // Breadcrumbs

    pub fn breadcrumb(&self) -> Vec<BreadcrumbItem> {
        self.store
            .read(|session| self.group.breadcrumb(&self.snapshot, session))
    }

    /// Open the callout for a breadcrumb item; returns false for unknown ids
    pub fn open_breadcrumb_callout(&mut self, id: &str) -> bool {
        let Some(key) = self.snapshot.key_of(id) else {
            return false;
        };
        let session = self.store.snapshot();
        self.group.open_callout(&self.snapshot, &session, key).is_some()
    }

    pub fn callout_rows(&mut self) -> Vec<ExplorerRow> {
        let selected = self.store.read(|s| s.active_id().cloned());
        match self.group.callout_mut() {
            Some(callout) => callout.rows(&self.snapshot, selected.as_ref().map(NodeId::as_str)),
            None => Vec::new(),
        }
    }

    /// Click inside the callout: groups toggle, documents soft-open and close it
    pub fn callout_click(&mut self, id: &str) -> NavigatorOutcome {
        let Some(key) = self.snapshot.key_of(id) else {
            return NavigatorOutcome::Ignored;
        };
        let Some(callout) = self.group.callout_mut() else {
            return NavigatorOutcome::Ignored;
        };
        match callout.click(&self.snapshot, key) {
            Some(ExplorerAction::Open { id, .. }) => {
                self.group.close_callout();
                NavigatorOutcome::Session(self.open_node(&id, ActivationMode::Soft))
            }
            Some(ExplorerAction::Toggled { .. }) => NavigatorOutcome::Handled,
            None => NavigatorOutcome::Ignored,
        }
    }

    pub fn close_breadcrumb_callout(&mut self) {
        self.group.close_callout();
    }

    // Palette

    pub fn palette(&self) -> &QuickPalette {
        self.group.palette()
    }

    pub fn open_palette(&mut self, command_mode: bool) {
        self.group.palette_mut().open(command_mode);
        debug!(command_mode, "Palette opened");
        self.bus
            .dispatch_quick(QuickEvent::PaletteOpened { command_mode });
    }

    pub fn dismiss_palette(&mut self) {
        if self.group.palette().is_open() {
            self.group.palette_mut().dismiss();
            self.bus.dispatch_quick(QuickEvent::Dismissed);
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.group.palette_mut().set_query(query);
    }

    /// Activate the palette result at `index`
    pub fn palette_activate(&mut self, index: usize) -> NavigatorOutcome {
        match self.group.palette_mut().activate(index) {
            Some(action) => self.apply_palette_action(action),
            None => NavigatorOutcome::Ignored,
        }
    }

    /// Route a key press: palette keys while it is open, then group shortcuts
    pub fn key_down(&mut self, chord: &KeyChord) -> NavigatorOutcome {
        if self.group.palette().is_open() {
            if let Some(key) = palette_key(chord) {
                return match self.group.palette_mut().handle_key(key) {
                    Some(action) => self.apply_palette_action(action),
                    None => NavigatorOutcome::Handled,
                };
            }
        }

        match match_shortcut(chord, self.group.platform()) {
            Some(shortcut) => {
                self.open_palette(shortcut.opens_command_mode());
                NavigatorOutcome::Handled
            }
            None => NavigatorOutcome::Ignored,
        }
    }

    fn apply_palette_action(&mut self, action: PaletteAction) -> NavigatorOutcome {
        match action {
            PaletteAction::ExecuteCommand(command) => {
                NavigatorOutcome::Command(self.execute_command(command))
            }
            PaletteAction::OpenNode { id, mode } => {
                if let Some(node) = self.snapshot.get_by_id(id.as_str()) {
                    self.bus.dispatch_quick(QuickEvent::ItemSelected {
                        node_id: id.clone(),
                        kind: node.kind(),
                    });
                }
                NavigatorOutcome::Session(self.open_node(&id, mode))
            }
            PaletteAction::Dismissed => {
                self.bus.dispatch_quick(QuickEvent::Dismissed);
                NavigatorOutcome::Handled
            }
        }
    }

    /// Run a palette command against the active project
    pub fn execute_command(&mut self, command: CommandId) -> CommandOutcome {
        let outcome = command.execute(self.active_project.as_ref());
        match &outcome {
            CommandOutcome::Navigate(route) => {
                info!(command = %command, route = %route, "Executed palette command");
                self.bus.dispatch_quick(QuickEvent::CommandExecuted {
                    command_id: command.as_str().to_string(),
                    route: route.clone(),
                });
            }
            CommandOutcome::Unavailable => {
                debug!(command = %command, "Palette command needs an active project");
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_events::{EventAggregatorHandle, EventHandler, HandlerError};
    use canopy_types::{DialogInfo, LanguageFile, TriggerInfo};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        tree: Arc<Mutex<Vec<TreeEvent>>>,
        quick: Arc<Mutex<Vec<QuickEvent>>>,
    }

    impl EventHandler for Recorder {
        fn handle_tree(&mut self, event: &TreeEvent) -> Result<(), HandlerError> {
            self.tree.lock().push(event.clone());
            Ok(())
        }

        fn handle_quick(&mut self, event: &QuickEvent) -> Result<(), HandlerError> {
            self.quick.lock().push(event.clone());
            Ok(())
        }
    }

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

    fn navigator() -> (Navigator, EventAggregatorHandle, Recorder) {
        let bus = EventAggregatorHandle::default();
        let recorder = Recorder::default();
        bus.register_handler(Recorder {
            tree: recorder.tree.clone(),
            quick: recorder.quick.clone(),
        });
        let mut navigator =
            Navigator::with_platform(NavigatorConfig::default(), Arc::new(bus.clone()), Platform::Other)
                .unwrap();
        navigator.set_projects(vec![project()]).unwrap();
        (navigator, bus, recorder)
    }

    fn id(id: &str) -> NodeId {
        NodeId::from(id)
    }

    #[test]
    fn test_set_projects_rebuilds_and_announces() {
        let (navigator, bus, recorder) = navigator();
        bus.process_events();

        assert!(navigator.snapshot().get_by_id("main:lg:main").is_some());
        assert_eq!(navigator.active_project(), Some(&ProjectId::from("p1")));
        assert!(matches!(
            recorder.tree.lock().as_slice(),
            [TreeEvent::Rebuilt { project_count: 1, .. }]
        ));
    }

    #[test]
    fn test_explorer_clicks() {
        let (mut navigator, bus, recorder) = navigator();

        assert_eq!(navigator.explorer_click("lgGroup:main"), NavigatorOutcome::Handled);
        assert!(
            !navigator
                .explorer_rows()
                .iter()
                .any(|row| row.id.as_str() == "main:lg:main")
        );

        let outcome = navigator.explorer_click("main:trigger:greet");
        assert!(matches!(outcome, NavigatorOutcome::Session(ref events) if !events.is_empty()));
        let session = navigator.session();
        assert_eq!(session.active_id(), Some(&id("main:trigger:greet")));
        assert!(session.active_document().unwrap().is_soft());

        navigator.explorer_double_click("main:trigger:greet");
        assert!(!navigator.session().active_document().unwrap().is_soft());

        assert_eq!(navigator.explorer_double_click("bot:p1"), NavigatorOutcome::Ignored);
        assert_eq!(navigator.explorer_click("nope"), NavigatorOutcome::Ignored);

        bus.process_events();
        assert!(recorder.tree.lock().contains(&TreeEvent::NodeCollapsed {
            node_id: id("lgGroup:main")
        }));
    }

    #[test]
    fn test_soft_opens_share_one_tab() {
        let (mut navigator, _bus, _recorder) = navigator();

        navigator.open_node(&id("main:lg:main"), ActivationMode::Soft);
        navigator.open_node(&id("main:lu:main"), ActivationMode::Soft);
        let session = navigator.session();
        assert_eq!(session.open_ids(), &[id("main:lu:main")]);
        session.check_invariants().unwrap();

        assert!(navigator.open_node(&id("missing"), ActivationMode::Hard).is_empty());
    }

    #[test]
    fn test_goto_file_soft_opens_match() {
        let (mut navigator, _bus, _recorder) = navigator();

        assert!(!navigator.goto_file("lu:main").is_empty());
        assert_eq!(navigator.session().active_id(), Some(&id("main:lu:main")));
        assert!(navigator.goto_file("does-not-exist").is_empty());
        assert!(navigator.goto_file("").is_empty());
        assert_eq!(navigator.session().open_ids().len(), 1);
    }

    #[test]
    fn test_activate_unknown_document_is_noop() {
        let (mut navigator, _bus, _recorder) = navigator();
        assert!(navigator.activate(&id("ghost"), ActivationMode::Hard).is_empty());
        assert!(navigator.session().is_empty());

        // Known tree nodes are opened on activation
        assert!(!navigator.activate(&id("dialog:main"), ActivationMode::Hard).is_empty());
        assert_eq!(navigator.session().active_id(), Some(&id("dialog:main")));
    }

    #[test]
    fn test_palette_keyboard_flow() {
        let (mut navigator, bus, recorder) = navigator();

        let ctrl_p = KeyChord::key("p").with_ctrl();
        assert_eq!(navigator.key_down(&ctrl_p), NavigatorOutcome::Handled);
        assert!(navigator.palette().is_open());
        assert!(!navigator.palette().is_command_mode());

        navigator.set_query("greet");
        assert!(!navigator.palette().results().is_empty());
        let outcome = navigator.key_down(&KeyChord::key("Enter"));
        assert!(matches!(outcome, NavigatorOutcome::Session(_)));
        assert!(!navigator.palette().is_open());

        let session = navigator.session();
        assert_eq!(session.active_id(), Some(&id("main:trigger:greet")));
        // Palette results open pinned
        assert!(!session.active_document().unwrap().is_soft());

        navigator.key_down(&ctrl_p);
        assert_eq!(navigator.key_down(&KeyChord::key("Escape")), NavigatorOutcome::Handled);
        assert!(!navigator.palette().is_open());

        assert_eq!(navigator.key_down(&KeyChord::key("x")), NavigatorOutcome::Ignored);

        bus.process_events();
        let quick = recorder.quick.lock();
        assert_eq!(quick[0], QuickEvent::PaletteOpened { command_mode: false });
        assert!(quick.contains(&QuickEvent::Dismissed));
        assert!(quick.iter().any(|e| matches!(e, QuickEvent::ItemSelected { .. })));
    }

    #[test]
    fn test_command_mode_executes_commands() {
        let (mut navigator, _bus, _recorder) = navigator();

        navigator.key_down(&KeyChord::key("p").with_ctrl().with_shift());
        assert!(navigator.palette().is_command_mode());
        assert_eq!(navigator.palette().results().len(), 2);

        navigator.key_down(&KeyChord::key("ArrowDown"));
        let outcome = navigator.key_down(&KeyChord::key("Enter"));
        assert_eq!(
            outcome,
            NavigatorOutcome::Command(CommandOutcome::Navigate(
                "/bot/p1/botProjectsSettings".to_string()
            ))
        );

        navigator.set_active_project(None);
        assert_eq!(
            navigator.execute_command(CommandId::ShowBotSettings),
            CommandOutcome::Unavailable
        );
    }

    #[test]
    fn test_breadcrumb_and_callout() {
        let (mut navigator, _bus, _recorder) = navigator();
        assert!(navigator.breadcrumb().is_empty());
        assert!(navigator.empty_state().is_some());

        navigator.open_node(&id("main:lg:main"), ActivationMode::Hard);
        let crumbs: Vec<String> = navigator
            .breadcrumb()
            .iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(crumbs, vec!["root", "bot:p1", "dialog:main", "main:lg:main"]);
        assert!(navigator.empty_state().is_none());

        assert!(navigator.open_breadcrumb_callout("dialog:main"));
        assert_eq!(navigator.callout_rows().len(), 5);
        assert_eq!(navigator.callout_click("luGroup:main"), NavigatorOutcome::Handled);
        assert_eq!(navigator.callout_rows().len(), 6);

        let outcome = navigator.callout_click("main:lu:main");
        assert!(matches!(outcome, NavigatorOutcome::Session(_)));
        assert!(navigator.callout_rows().is_empty());

        let session = navigator.session();
        assert_eq!(session.active_id(), Some(&id("main:lu:main")));
        assert!(session.active_document().unwrap().is_soft());
        assert_eq!(session.open_ids().len(), 2);
    }

    #[test]
    fn test_editor_target_follows_view_mode() {
        let (mut navigator, _bus, _recorder) = navigator();
        assert!(navigator.editor_target().is_none());

        navigator.open_node(&id("main:lg:main"), ActivationMode::Hard);
        assert_eq!(navigator.editor_target().unwrap().name(), "lgCode");

        assert_eq!(navigator.toggle_view_mode().len(), 1);
        assert_eq!(navigator.editor_target().unwrap().name(), "lgTable");
        assert!(navigator.set_view_mode(ViewMode::Visual).is_empty());
    }

    #[test]
    fn test_action_menu_lookup() {
        let (navigator, _bus, _recorder) = navigator();
        assert!(!navigator.action_menu("bot:p1").unwrap().is_empty());
        assert!(navigator.action_menu("missing").is_none());
    }
}
