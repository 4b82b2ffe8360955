//! Project aggregate: pages of component trees plus global settings and
//! metadata. A project's `updated_at` changes on every persisted edit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pagecraft_common::new_project_id;

use crate::tree::ComponentTree;

/// Current persisted format version
pub const PROJECT_VERSION: &str = "1.0.0";

/// One page of a project, carrying its own component tree
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: String,
    pub name: String,
    pub slug: String,
    /// Exactly one page per project may be the home page
    pub is_home: bool,
    pub tree: ComponentTree,
}

impl Page {
    pub fn new(id: impl Into<String>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            is_home: false,
            tree: ComponentTree::new(),
        }
    }
}

/// Search-engine metadata for the published site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeoSettings {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

/// Theme colors and typography
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeSettings {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: "#3366ff".to_string(),
            secondary_color: "#111827".to_string(),
            font_family: "Inter, sans-serif".to_string(),
        }
    }
}

/// Global project settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectSettings {
    pub seo: SeoSettings,
    pub theme: ThemeSettings,
    /// Publish targets; at least one is required to go live
    pub domains: Vec<String>,
}

/// Free-form project metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub author: Option<String>,
    pub tags: Vec<String>,
}

/// An uploaded asset referenced by the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub size_bytes: u64,
}

/// Aggregate root: pages, settings, metadata, publish state
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub pages: Vec<Page>,
    pub settings: ProjectSettings,
    pub metadata: ProjectMetadata,
    pub assets: Vec<Asset>,
    pub version: String,
    pub published_url: Option<String>,
    pub published_version: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create an empty project with a single home page
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        let id = new_project_id(&name, now.timestamp_millis() as u64);

        let mut home = Page::new(format!("{id}-home"), "Home", "home");
        home.is_home = true;

        Self {
            id,
            name,
            description: String::new(),
            pages: vec![home],
            settings: ProjectSettings::default(),
            metadata: ProjectMetadata::default(),
            assets: Vec::new(),
            version: PROJECT_VERSION.to_string(),
            published_url: None,
            published_version: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at`; called on every persisted edit
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn home_page(&self) -> Option<&Page> {
        self.pages.iter().find(|p| p.is_home)
    }

    pub fn page_by_slug(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    /// Total component count across all pages
    pub fn component_count(&self) -> usize {
        self.pages.iter().map(|p| p.tree.len()).sum()
    }

    /// Sum of declared asset sizes in bytes
    pub fn total_asset_bytes(&self) -> u64 {
        self.assets.iter().map(|a| a.size_bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_has_home_page() {
        let project = Project::new("Shop");
        assert_eq!(project.pages.len(), 1);
        assert!(project.home_page().is_some());
        assert_eq!(project.home_page().unwrap().slug, "home");
    }

    #[test]
    fn test_touch_bumps_updated_at() {
        let mut project = Project::new("Shop");
        let before = project.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        project.touch();
        assert!(project.updated_at > before);
    }

    #[test]
    fn test_component_count_spans_pages() {
        use crate::component::{Component, ComponentKind};

        let mut project = Project::new("Shop");
        project.pages[0]
            .tree
            .insert(Component::new("c1", ComponentKind::Container, "c1"), None, None)
            .unwrap();
        let mut about = Page::new("p2", "About", "about");
        about
            .tree
            .insert(Component::new("c2", ComponentKind::Section, "c2"), None, None)
            .unwrap();
        project.pages.push(about);

        assert_eq!(project.component_count(), 2);
    }
}
