// ABOUTME: Quick palette state: query handling, result capping and keyboard selection
// ABOUTME: A leading `>` switches to command mode; Enter yields the action for the selected hit

use canopy_tree::TreeSnapshot;
use canopy_types::{ActivationMode, NodeId, QuickConfig};
use tracing::debug;

use crate::commands::CommandId;
use crate::fuzzy::NucleoMatcher;
use crate::item::{QuickItem, command_items, searchable_items};
use crate::matcher::{FuzzyMatcher, QuickMatch};

/// Prefix that switches the palette into command mode
pub const COMMAND_PREFIX: char = '>';

/// Keys the open palette reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKey {
    Up,
    Down,
    Enter,
    Escape,
}

/// What the host should do after a palette interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteAction {
    ExecuteCommand(CommandId),
    OpenNode { id: NodeId, mode: ActivationMode },
    Dismissed,
}

/// A result row: the entry plus its match metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickResult {
    pub item: QuickItem,
    pub hit: QuickMatch,
}

pub struct QuickPalette<M: FuzzyMatcher = NucleoMatcher> {
    matcher: M,
    config: QuickConfig,
    nodes: Vec<QuickItem>,
    node_index: M::Index,
    commands: Vec<QuickItem>,
    command_index: M::Index,
    open: bool,
    query: String,
    results: Vec<QuickResult>,
    selected: usize,
}

impl QuickPalette<NucleoMatcher> {
    pub fn with_config(config: QuickConfig) -> Self {
        let matcher = NucleoMatcher::with_prefer_prefix(config.prefer_prefix);
        Self::new(matcher, config)
    }
}

impl<M: FuzzyMatcher> QuickPalette<M> {
    pub fn new(matcher: M, config: QuickConfig) -> Self {
        let commands = command_items();
        let command_index = matcher.index(&commands);
        let node_index = matcher.index(&[]);
        Self {
            matcher,
            config,
            nodes: Vec::new(),
            node_index,
            commands,
            command_index,
            open: false,
            query: String::new(),
            results: Vec::new(),
            selected: 0,
        }
    }

    /// Replace the searchable node set, rebuilding the index
    pub fn set_snapshot(&mut self, snapshot: &TreeSnapshot) {
        self.set_items(searchable_items(snapshot));
    }

    pub fn set_items(&mut self, items: Vec<QuickItem>) {
        self.node_index = self.matcher.index(&items);
        self.nodes = items;
        debug!(entries = self.nodes.len(), "Quick search index rebuilt");
        self.refresh();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_command_mode(&self) -> bool {
        self.query.starts_with(COMMAND_PREFIX)
    }

    /// Show the palette, pre-filled with `>` in command mode
    pub fn open(&mut self, command_mode: bool) {
        self.open = true;
        let query = if command_mode {
            COMMAND_PREFIX.to_string()
        } else {
            String::new()
        };
        self.set_query(query);
    }

    /// Hide the palette and reset query and selection
    pub fn dismiss(&mut self) {
        self.open = false;
        self.query.clear();
        self.results.clear();
        self.selected = 0;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.selected = 0;
        self.refresh();
    }

    pub fn results(&self) -> &[QuickResult] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&QuickResult> {
        self.results.get(self.selected)
    }

    /// Rows the result list shows before scrolling
    pub fn visible_rows(&self) -> usize {
        self.results.len().min(self.config.visible_rows)
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1) % self.results.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.results.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.results.len() - 1);
        }
    }

    /// Apply a key press. Returns an action when the palette wants the host to act.
    pub fn handle_key(&mut self, key: PaletteKey) -> Option<PaletteAction> {
        match key {
            PaletteKey::Up => {
                self.select_previous();
                None
            }
            PaletteKey::Down => {
                self.select_next();
                None
            }
            PaletteKey::Enter => self.activate(self.selected),
            PaletteKey::Escape => {
                self.dismiss();
                Some(PaletteAction::Dismissed)
            }
        }
    }

    /// Activate the result at `index` and close the palette
    pub fn activate(&mut self, index: usize) -> Option<PaletteAction> {
        let result = self.results.get(index)?;
        let action = match result.item.command_id() {
            Some(command) => PaletteAction::ExecuteCommand(command),
            None => PaletteAction::OpenNode {
                id: result.item.id.clone(),
                mode: ActivationMode::Hard,
            },
        };
        self.dismiss();
        Some(action)
    }

    fn refresh(&mut self) {
        self.results = if let Some(rest) = self.query.strip_prefix(COMMAND_PREFIX) {
            let rest = rest.trim();
            if rest.is_empty() {
                // Bare `>` lists every command
                self.commands
                    .iter()
                    .enumerate()
                    .map(|(index, item)| QuickResult {
                        item: item.clone(),
                        hit: QuickMatch {
                            index,
                            score: 0,
                            matches: Vec::new(),
                        },
                    })
                    .collect()
            } else {
                collect(&self.matcher, &self.command_index, &self.commands, rest)
            }
        } else if self.query.is_empty() {
            Vec::new()
        } else {
            collect(&self.matcher, &self.node_index, &self.nodes, &self.query)
        };
        self.results.truncate(self.config.max_results);
        self.selected = self.selected.min(self.results.len().saturating_sub(1));
    }
}

fn collect<M: FuzzyMatcher>(
    matcher: &M,
    index: &M::Index,
    items: &[QuickItem],
    text: &str,
) -> Vec<QuickResult> {
    matcher
        .query(index, text)
        .into_iter()
        .filter_map(|hit| {
            items.get(hit.index).map(|item| QuickResult {
                item: item.clone(),
                hit,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchField;
    use canopy_types::{NodeKind, ProjectId};

    fn entry(id: &str, label: &str) -> QuickItem {
        QuickItem {
            id: NodeId::from(id),
            owner: ProjectId::from("p1"),
            kind: NodeKind::Lg,
            label: label.to_string(),
            path: vec!["Solution".into(), "EchoBot".into(), label.to_string()],
        }
    }

    fn palette() -> QuickPalette {
        let mut palette = QuickPalette::with_config(QuickConfig::default());
        palette.set_items(vec![
            entry("main:lg:main", "main"),
            entry("main:lg:mainExtra", "mainExtra"),
            entry("main:lg:common", "common"),
        ]);
        palette
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let mut palette = palette();
        palette.open(false);
        assert!(palette.is_open());
        assert!(palette.results().is_empty());
        assert_eq!(palette.visible_rows(), 0);
        assert_eq!(palette.handle_key(PaletteKey::Enter), None);
    }

    #[test]
    fn test_selection_wraps_both_ways() {
        let mut palette = palette();
        palette.set_query("main");
        assert_eq!(palette.results().len(), 2);

        palette.handle_key(PaletteKey::Up);
        assert_eq!(palette.selected_index(), 1);
        palette.handle_key(PaletteKey::Down);
        assert_eq!(palette.selected_index(), 0);
        palette.handle_key(PaletteKey::Down);
        palette.handle_key(PaletteKey::Down);
        assert_eq!(palette.selected_index(), 0);
    }

    #[test]
    fn test_query_change_resets_selection() {
        let mut palette = palette();
        palette.set_query("main");
        palette.select_next();
        assert_eq!(palette.selected_index(), 1);

        palette.set_query("mai");
        assert_eq!(palette.selected_index(), 0);
    }

    #[test]
    fn test_enter_opens_node_hard_and_dismisses() {
        let mut palette = palette();
        palette.open(false);
        palette.set_query("common");

        let action = palette.handle_key(PaletteKey::Enter);
        assert_eq!(
            action,
            Some(PaletteAction::OpenNode {
                id: NodeId::from("main:lg:common"),
                mode: ActivationMode::Hard
            })
        );
        assert!(!palette.is_open());
        assert_eq!(palette.query(), "");
    }

    #[test]
    fn test_command_mode() {
        let mut palette = palette();
        palette.open(true);
        assert!(palette.is_command_mode());
        let labels: Vec<_> = palette.results().iter().map(|r| r.item.label.as_str()).collect();
        assert_eq!(labels, vec!["> Show App Settings", "> Show Bot Settings"]);

        palette.set_query("> bot");
        assert_eq!(palette.results().len(), 1);
        assert!(
            palette.results()[0]
                .hit
                .field(MatchField::Label)
                .is_some()
        );
        assert_eq!(
            palette.handle_key(PaletteKey::Enter),
            Some(PaletteAction::ExecuteCommand(CommandId::ShowBotSettings))
        );
    }

    #[test]
    fn test_nodes_are_not_searched_in_command_mode() {
        let mut palette = palette();
        palette.set_query(">common");
        assert!(palette.results().is_empty());
    }

    #[test]
    fn test_escape_dismisses() {
        let mut palette = palette();
        palette.open(false);
        palette.set_query("main");
        assert_eq!(
            palette.handle_key(PaletteKey::Escape),
            Some(PaletteAction::Dismissed)
        );
        assert!(!palette.is_open());
        assert!(palette.results().is_empty());
    }

    #[test]
    fn test_results_are_capped() {
        let config = QuickConfig {
            max_results: 2,
            visible_rows: 1,
            ..QuickConfig::default()
        };
        let mut palette = QuickPalette::with_config(config);
        palette.set_items((0..5).map(|i| entry(&format!("n{i}"), &format!("node{i}"))).collect());
        palette.set_query("node");

        assert_eq!(palette.results().len(), 2);
        assert_eq!(palette.visible_rows(), 1);
    }
}
