//! Project-level (de)serialization: the versioned JSON envelope wrapping
//! page component lists, settings, and metadata.
//!
//! Loads are forgiving where possible: recognized issues (missing orders,
//! dangling parents, unknown component types) are fixed or degraded with
//! warnings, while a structurally unusable document is rejected with
//! [`SerializeError::InvalidProjectFile`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pagecraft_document::{
    Asset, ComponentRegistry, Page, Project, ProjectMetadata, ProjectSettings,
    PROJECT_VERSION,
};
use pagecraft_validator::{validate_project, ValidationReport};

use crate::component::{build_component_hierarchy, serialize_flat, SerializedComponent};
use crate::error::SerializeError;

/// Storage-safe page shape (flat component list)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedPage {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub is_home: bool,
    #[serde(default)]
    pub components: Vec<SerializedComponent>,
}

/// Storage-safe project envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedProject {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<SerializedPage>,

    /// Legacy single-page form: components directly on the project
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<SerializedComponent>,

    #[serde(default)]
    pub settings: ProjectSettings,

    #[serde(default)]
    pub metadata: ProjectMetadata,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Asset>,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_version: Option<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_version() -> String {
    PROJECT_VERSION.to_string()
}

/// Serialize a project to the storage envelope
pub fn serialize_project(project: &Project) -> SerializedProject {
    SerializedProject {
        id: project.id.clone(),
        name: project.name.clone(),
        description: project.description.clone(),
        pages: project
            .pages
            .iter()
            .map(|page| SerializedPage {
                id: page.id.clone(),
                name: page.name.clone(),
                slug: page.slug.clone(),
                is_home: page.is_home,
                components: serialize_flat(&page.tree),
            })
            .collect(),
        components: Vec::new(),
        settings: project.settings.clone(),
        metadata: project.metadata.clone(),
        assets: project.assets.clone(),
        version: project.version.clone(),
        published_url: project.published_url.clone(),
        published_version: project.published_version.clone(),
        created_at: project.created_at,
        updated_at: project.updated_at,
    }
}

/// Deserialize a project envelope, applying best-effort fixes.
///
/// Returns the project together with the collected load warnings; hard
/// validation failures after fixes reject the load.
pub fn deserialize_project(
    serialized: &SerializedProject,
    registry: &ComponentRegistry,
) -> Result<(Project, ValidationReport), SerializeError> {
    if serialized.id.is_empty() {
        return Err(SerializeError::InvalidProjectFile(
            "missing project id".to_string(),
        ));
    }

    let mut report = ValidationReport::new();
    let mut pages = Vec::new();

    if serialized.pages.is_empty() {
        // Legacy form: flat component list becomes the home page
        debug!(project_id = %serialized.id, "Loading legacy single-page project");
        let (tree, page_report) =
            build_component_hierarchy(&serialized.components, registry);
        report.extend(page_report);
        let mut home = Page::new(format!("{}-home", serialized.id), "Home", "home");
        home.is_home = true;
        home.tree = tree;
        pages.push(home);
    } else {
        for serialized_page in &serialized.pages {
            let (tree, page_report) =
                build_component_hierarchy(&serialized_page.components, registry);
            report.extend(page_report);
            pages.push(Page {
                id: serialized_page.id.clone(),
                name: serialized_page.name.clone(),
                slug: serialized_page.slug.clone(),
                is_home: serialized_page.is_home,
                tree,
            });
        }
    }

    let project = Project {
        id: serialized.id.clone(),
        name: serialized.name.clone(),
        description: serialized.description.clone(),
        pages,
        settings: serialized.settings.clone(),
        metadata: serialized.metadata.clone(),
        assets: serialized.assets.clone(),
        version: serialized.version.clone(),
        published_url: serialized.published_url.clone(),
        published_version: serialized.published_version.clone(),
        created_at: serialized.created_at,
        updated_at: serialized.updated_at,
    };

    let project_report = validate_project(&project);
    if !project_report.is_valid() {
        let problems: Vec<String> = project_report
            .errors()
            .map(|d| d.message.clone())
            .collect();
        return Err(SerializeError::InvalidProjectFile(problems.join("; ")));
    }
    report.extend(project_report);

    info!(
        project_id = %project.id,
        pages = project.pages.len(),
        components = project.component_count(),
        "Loaded project"
    );
    Ok((project, report))
}

/// Serialize a project to a JSON string
pub fn project_to_json(project: &Project) -> Result<String, SerializeError> {
    Ok(serde_json::to_string_pretty(&serialize_project(project))?)
}

/// Parse and deserialize a project from a JSON string
pub fn project_from_json(
    json: &str,
    registry: &ComponentRegistry,
) -> Result<(Project, ValidationReport), SerializeError> {
    let serialized: SerializedProject = serde_json::from_str(json)
        .map_err(|e| SerializeError::InvalidProjectFile(e.to_string()))?;
    deserialize_project(&serialized, registry)
}
