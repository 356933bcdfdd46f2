// ABOUTME: Form dialog trigger grouping by schema property
// ABOUTME: Pluggable seam so the property extraction can be replaced by a richer indexer

use canopy_types::{BotProject, DialogInfo, TriggerInfo};

/// Groups a form dialog's triggers under the schema properties they refer to.
pub trait TriggerGrouper {
    /// Ordered `(property, triggers)` pairs. Properties without triggers are
    /// left out.
    fn group(&self, project: &BotProject, dialog: &DialogInfo) -> Vec<(String, Vec<TriggerInfo>)>;
}

/// Default grouper: valid properties come from the dialog's JSON schema and
/// each trigger is filed under its declared property reference.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaPropertyGrouper;

impl TriggerGrouper for SchemaPropertyGrouper {
    fn group(&self, project: &BotProject, dialog: &DialogInfo) -> Vec<(String, Vec<TriggerInfo>)> {
        extract_schema_properties(project, dialog)
            .into_iter()
            .filter_map(|property| {
                let triggers: Vec<TriggerInfo> = dialog
                    .triggers
                    .iter()
                    .filter(|t| t.property.as_deref() == Some(property.as_str()))
                    .cloned()
                    .collect();
                (!triggers.is_empty()).then_some((property, triggers))
            })
            .collect()
    }
}

/// Property names declared in the top-level `properties` object of the
/// dialog's schema. Missing schemas yield no properties.
pub fn extract_schema_properties(project: &BotProject, dialog: &DialogInfo) -> Vec<String> {
    let schema_id = dialog.schema.as_deref().unwrap_or(&dialog.id);

    project
        .json_schema(schema_id)
        .and_then(|file| file.content.get("properties"))
        .and_then(|properties| properties.as_object())
        .map(|properties| properties.keys().cloned().collect())
        .unwrap_or_default()
}
