// ABOUTME: Builds the solution tree snapshot from loaded bot projects
// ABOUTME: Synthesizes group nodes only for non-empty collections and encodes lineage in ids

use canopy_types::{BotProject, DialogInfo, LanguageFile, NavigatorConfig, NodeId, ProjectId, TriggerInfo};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

use crate::error::TreeError;
use crate::grouping::{SchemaPropertyGrouper, TriggerGrouper};
use crate::imports::{lg_imports, lu_imports};
use crate::node::{GroupKind, LanguageKind, NodeData, NodeSpec};
use crate::snapshot::TreeSnapshot;

/// Id of the synthetic solution root
pub const ROOT_ID: &str = "root";

/// Build a snapshot with the default schema-based trigger grouping.
pub fn build_tree(projects: &[BotProject], config: &NavigatorConfig) -> Result<TreeSnapshot, TreeError> {
    TreeBuilder::new(config).build(projects)
}

/// Tree builder parameterized over the form dialog trigger grouping.
pub struct TreeBuilder<'a> {
    config: &'a NavigatorConfig,
    grouper: Box<dyn TriggerGrouper + 'a>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(config: &'a NavigatorConfig) -> Self {
        Self {
            config,
            grouper: Box::new(SchemaPropertyGrouper),
        }
    }

    pub fn with_grouper(mut self, grouper: impl TriggerGrouper + 'a) -> Self {
        self.grouper = Box::new(grouper);
        self
    }

    #[instrument(skip_all, fields(projects = projects.len()))]
    pub fn build(&self, projects: &[BotProject]) -> Result<TreeSnapshot, TreeError> {
        let mut spec = self.build_spec(projects);
        drop_duplicate_ids(&mut spec, &mut HashSet::new());
        let snapshot = TreeSnapshot::from_spec(spec)?;
        debug!(
            revision = snapshot.revision(),
            node_count = snapshot.len(),
            "Built project tree"
        );
        Ok(snapshot)
    }

    /// Nested description of the whole solution
    pub fn build_spec(&self, projects: &[BotProject]) -> NodeSpec {
        NodeSpec::new(
            ROOT_ID,
            ProjectId::from(ROOT_ID),
            NodeData::Root {
                label: self.config.solution_label.clone(),
            },
        )
        .with_children(projects.iter().map(|p| self.bot_node(p)).collect())
    }

    fn bot_node(&self, project: &BotProject) -> NodeSpec {
        let owner = &project.project_id;
        let schemas: Vec<NodeSpec> = project
            .form_dialog_schemas
            .iter()
            .map(|schema| {
                NodeSpec::new(
                    format!("schema:{}", schema.id),
                    owner.clone(),
                    NodeData::Schema {
                        schema_id: schema.id.clone(),
                    },
                )
            })
            .collect();
        let dialogs: Vec<NodeSpec> = project
            .dialogs
            .iter()
            .map(|dialog| self.dialog_node(project, dialog))
            .collect();

        let mut children = Vec::new();
        children.extend(group(GroupKind::Schemas, owner.as_str(), owner, schemas));
        children.extend(group(GroupKind::Dialogs, owner.as_str(), owner, dialogs));

        NodeSpec::new(
            format!("bot:{owner}"),
            owner.clone(),
            NodeData::Bot {
                name: project.name.clone(),
                running: project.running,
            },
        )
        .with_children(children)
    }

    fn dialog_node(&self, project: &BotProject, dialog: &DialogInfo) -> NodeSpec {
        let owner = &project.project_id;
        let triggers = self.dialog_triggers(project, dialog);
        let qna = self.dialog_files(project, dialog, LanguageKind::Qna);
        let lg = self.dialog_files(project, dialog, LanguageKind::Lg);
        let lu = self.dialog_files(project, dialog, LanguageKind::Lu);

        let mut children = Vec::new();
        children.extend(group(GroupKind::Triggers, &dialog.id, owner, triggers));
        children.extend(group(GroupKind::KnowledgeBase, &dialog.id, owner, qna));
        children.extend(group(GroupKind::LanguageGeneration, &dialog.id, owner, lg));
        children.extend(group(GroupKind::LanguageUnderstanding, &dialog.id, owner, lu));

        let prefix = if dialog.is_form_dialog {
            "formDialog"
        } else {
            "dialog"
        };

        NodeSpec::new(
            format!("{prefix}:{}", dialog.id),
            owner.clone(),
            NodeData::Dialog {
                dialog_id: dialog.id.clone(),
                display_name: dialog.display_name.clone(),
                is_form_dialog: dialog.is_form_dialog,
            },
        )
        .with_children(children)
    }

    fn dialog_triggers(&self, project: &BotProject, dialog: &DialogInfo) -> Vec<NodeSpec> {
        let owner = &project.project_id;
        if !dialog.is_form_dialog {
            return dialog
                .triggers
                .iter()
                .map(|t| trigger_node(owner, dialog, t))
                .collect();
        }

        // Form dialogs show one trigger group per schema property
        self.grouper
            .group(project, dialog)
            .into_iter()
            .map(|(property, triggers)| {
                NodeSpec::new(
                    format!("{}:property:{property}", dialog.id),
                    owner.clone(),
                    NodeData::Group {
                        group: GroupKind::Triggers,
                        label: property,
                    },
                )
                .with_children(
                    triggers
                        .iter()
                        .map(|t| trigger_node(owner, dialog, t))
                        .collect(),
                )
            })
            .collect()
    }

    fn dialog_files(
        &self,
        project: &BotProject,
        dialog: &DialogInfo,
        language: LanguageKind,
    ) -> Vec<NodeSpec> {
        let owner = &project.project_id;
        let locale = self.locale_for(project);
        let files: &[LanguageFile] = match language {
            LanguageKind::Lg => &project.lg_files,
            LanguageKind::Lu => &project.lu_files,
            LanguageKind::Qna => &project.qna_files,
        };
        let marker = language.id_marker();

        let file_node = |file: &LanguageFile| {
            NodeSpec::new(
                format!("{}{marker}{}", dialog.id, file.id),
                owner.clone(),
                NodeData::File {
                    language,
                    dialog_id: dialog.id.clone(),
                    file_id: file.id.clone(),
                },
            )
        };

        if !dialog.is_form_dialog || language == LanguageKind::Qna {
            let common = self.config.common_lg_prefix.as_str();
            return files
                .iter()
                .filter(|file| {
                    file.id.starts_with(&dialog.id)
                        || (language == LanguageKind::Lg && file.id.starts_with(common))
                })
                .map(file_node)
                .collect();
        }

        let localized = format!("{}.{locale}", dialog.id);
        let mut nodes: Vec<NodeSpec> = files
            .iter()
            .filter(|file| file.id == dialog.id || file.id == localized)
            .map(file_node)
            .collect();

        let imports = match language {
            LanguageKind::Lg => lg_imports(project, &dialog.id, locale, &self.config.common_lg_prefix),
            LanguageKind::Lu | LanguageKind::Qna => lu_imports(project, &dialog.id, locale),
        };
        // An import cycle can lead back to the dialog's own file
        let shown: HashSet<String> = nodes
            .iter()
            .filter_map(|node| match &node.data {
                NodeData::File { file_id, .. } => Some(file_id.clone()),
                _ => None,
            })
            .chain(std::iter::once(dialog.id.clone()))
            .collect();
        nodes.extend(
            imports
                .into_iter()
                .filter(|import| !shown.contains(&import.id))
                .map(|import| {
                    let id = format!("{}{marker}{}", dialog.id, import.id);
                    let data = match language {
                        LanguageKind::Lg => NodeData::LgImport {
                            dialog_id: dialog.id.clone(),
                            import,
                        },
                        LanguageKind::Lu | LanguageKind::Qna => NodeData::LuImport {
                            dialog_id: dialog.id.clone(),
                            import,
                        },
                    };
                    NodeSpec::new(id, owner.clone(), data)
                }),
        );

        nodes
    }

    fn locale_for<'p>(&'p self, project: &'p BotProject) -> &'p str {
        if project.locale.is_empty() {
            &self.config.locale
        } else {
            &project.locale
        }
    }
}

fn trigger_node(owner: &ProjectId, dialog: &DialogInfo, trigger: &TriggerInfo) -> NodeSpec {
    NodeSpec::new(
        format!("{}:trigger:{}", dialog.id, trigger.id),
        owner.clone(),
        NodeData::Trigger {
            dialog_id: dialog.id.clone(),
            trigger_id: trigger.id.clone(),
            label: trigger.label(),
            trigger_type: trigger.kind.clone(),
        },
    )
}

/// Drop every subtree whose id already appeared earlier in pre-order.
///
/// Dialog ids are only unique within a project, so two bots can both
/// produce `dialog:main`. The first occurrence wins. A group left empty by
/// the pruning is dropped as well.
fn drop_duplicate_ids(spec: &mut NodeSpec, seen: &mut HashSet<NodeId>) {
    seen.insert(spec.id.clone());
    for mut child in std::mem::take(&mut spec.children) {
        if seen.contains(&child.id) {
            warn!(node_id = %child.id, owner = %child.owner, "Skipping node with duplicate id");
            continue;
        }
        let had_children = !child.children.is_empty();
        drop_duplicate_ids(&mut child, seen);
        if had_children && child.children.is_empty() && child.kind().is_group() {
            continue;
        }
        spec.children.push(child);
    }
}

/// Wrap `children` in a group node, or nothing when there are no children
fn group(
    kind: GroupKind,
    scope: &str,
    owner: &ProjectId,
    children: Vec<NodeSpec>,
) -> Option<NodeSpec> {
    if children.is_empty() {
        return None;
    }

    Some(
        NodeSpec::new(
            format!("{}:{scope}", kind.id_prefix()),
            owner.clone(),
            NodeData::Group {
                group: kind,
                label: kind.default_label().to_string(),
            },
        )
        .with_children(children),
    )
}
