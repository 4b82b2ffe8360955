//! Project export/import: the shareable envelope around the serialized
//! project, stamped with an export timestamp and version.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use pagecraft_common::IdGenerator;
use pagecraft_document::{ComponentRegistry, Project, PROJECT_VERSION};
use pagecraft_validator::{Diagnostic, ValidationReport};

use crate::error::SerializeError;
use crate::project::{deserialize_project, serialize_project, SerializedProject};

/// Version stamped on exports by this build
pub const EXPORT_VERSION: &str = "1.0.0";

/// Shareable export envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectExport {
    pub exported_at: DateTime<Utc>,
    pub export_version: String,
    #[serde(flatten)]
    pub project: SerializedProject,
}

/// Export a project to a JSON string with export stamps
pub fn export_project(project: &Project) -> Result<String, SerializeError> {
    let export = ProjectExport {
        exported_at: Utc::now(),
        export_version: EXPORT_VERSION.to_string(),
        project: serialize_project(project),
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Import a project from an export (or bare project) JSON string.
///
/// Requires `id` and a component source to be present; warns on version
/// mismatch without blocking. With `new_owner` set this is a transfer:
/// ownership metadata is reassigned and ids are kept. Without an owner it
/// is a duplicate-import: the project and all components get fresh ids.
pub fn import_project(
    json: &str,
    new_owner: Option<&str>,
    registry: &ComponentRegistry,
) -> Result<(Project, ValidationReport), SerializeError> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| SerializeError::InvalidProjectFile(e.to_string()))?;

    if value.get("id").and_then(|v| v.as_str()).is_none() {
        return Err(SerializeError::InvalidProjectFile(
            "missing 'id' field".to_string(),
        ));
    }
    if value.get("components").is_none() && value.get("pages").is_none() {
        return Err(SerializeError::InvalidProjectFile(
            "missing 'components' field".to_string(),
        ));
    }

    let version_mismatch = value
        .get("version")
        .and_then(|v| v.as_str())
        .filter(|version| *version != PROJECT_VERSION)
        .map(|version| version.to_string());

    let serialized: SerializedProject = serde_json::from_value(value)
        .map_err(|e| SerializeError::InvalidProjectFile(e.to_string()))?;
    let (mut project, mut report) = deserialize_project(&serialized, registry)?;

    if let Some(version) = version_mismatch {
        warn!(
            found = %version,
            expected = %PROJECT_VERSION,
            "Importing project with mismatched version"
        );
        report.push(Diagnostic::warning(
            "import-version",
            format!("Project was exported with format version {version}, expected {PROJECT_VERSION}"),
        ));
    }

    match new_owner {
        Some(owner) => {
            project.metadata.author = Some(owner.to_string());
        }
        None => {
            reassign_ids(&mut project);
        }
    }
    project.touch();

    Ok((project, report))
}

/// Give the project and every component a fresh identity
fn reassign_ids(project: &mut Project) {
    let new_id = pagecraft_common::new_project_id(
        &project.name,
        Utc::now().timestamp_millis() as u64,
    );
    let mut ids = IdGenerator::new(&new_id);

    for page in &mut project.pages {
        let components: Vec<_> = page
            .tree
            .root_ids()
            .iter()
            .flat_map(|root| page.tree.descendant_ids(root))
            .collect();

        let id_map: std::collections::HashMap<String, String> = components
            .iter()
            .map(|old| (old.clone(), ids.new_id()))
            .collect();

        let mut remapped = Vec::with_capacity(components.len());
        for old_id in &components {
            if let Some(mut component) = page.tree.get(old_id).cloned() {
                component.id = id_map[old_id].clone();
                if let Some(parent) = &component.parent_id {
                    component.parent_id = id_map.get(parent).cloned();
                }
                remapped.push(component);
            }
        }
        let (tree, _) = pagecraft_document::ComponentTree::from_components(remapped);
        page.tree = tree;
        page.id = format!("{new_id}-{}", page.slug);
    }

    project.id = new_id;
}
