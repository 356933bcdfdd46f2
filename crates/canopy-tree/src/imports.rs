// ABOUTME: Transitive language file import resolution for LG and LU files
// ABOUTME: Stack-driven traversal with a visited set so cyclic imports terminate

use canopy_types::{BotProject, LanguageFile, LanguageFileImport};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Strip the last extension from a file name: `common.lg` becomes `common`.
pub fn base_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    }
}

/// Find a language file by exact id or by its locale-suffixed variant.
pub fn find_language_file<'a>(
    files: &'a [LanguageFile],
    file_id: &str,
    locale: &str,
) -> Option<&'a LanguageFile> {
    files.iter().find(|file| {
        file.id == file_id
            || file
                .id
                .strip_prefix(file_id)
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|suffix| suffix == locale)
    })
}

/// Collect every import reachable from `root_id`.
///
/// Each file's declared imports are resolved through `get_file` and the
/// traversal continues from every newly referenced id. A file that cannot be
/// found or has no content is skipped with a warning and left out of the
/// result. Results are unique by id; the first occurrence wins.
pub fn get_language_file_imports<'a, F>(root_id: &str, get_file: F) -> Vec<LanguageFileImport>
where
    F: Fn(&str) -> Option<&'a LanguageFile>,
{
    let mut imports = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut missing: HashSet<String> = HashSet::new();
    let mut pending = vec![root_id.to_string()];

    while let Some(current_id) = pending.pop() {
        if visited.contains(&current_id) {
            continue;
        }

        let Some(file) = get_file(&current_id).filter(|file| !file.content.is_empty()) else {
            warn!(file_id = %current_id, "Could not find language import file");
            missing.insert(current_id);
            continue;
        };

        visited.insert(current_id);
        for declared in &file.imports {
            let id = base_name(&declared.id).to_string();
            pending.push(id.clone());
            imports.push(LanguageFileImport {
                id,
                import_path: declared.path.clone(),
                display_name: declared.description.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    imports.retain(|import| !missing.contains(&import.id) && seen.insert(import.id.clone()));

    debug!(root_id, import_count = imports.len(), "Resolved language file imports");
    imports
}

/// LG imports for a dialog, excluding the shared common file which every
/// dialog shows anyway.
pub fn lg_imports(
    project: &BotProject,
    dialog_id: &str,
    locale: &str,
    common_id: &str,
) -> Vec<LanguageFileImport> {
    let mut imports = get_language_file_imports(dialog_id, |id| {
        find_language_file(&project.lg_files, id, locale)
    });
    imports.retain(|import| import.id != common_id);
    imports
}

/// LU imports for a dialog
pub fn lu_imports(project: &BotProject, dialog_id: &str, locale: &str) -> Vec<LanguageFileImport> {
    get_language_file_imports(dialog_id, |id| {
        find_language_file(&project.lu_files, id, locale)
    })
}
