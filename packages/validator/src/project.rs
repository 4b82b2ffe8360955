//! Project-level validation and the publish gate.
//!
//! Project validation bounds names, counts, slugs, and publish settings.
//! The publish gate runs everything plus stricter content checks before a
//! project may go live; warnings let the publish proceed, errors block it.

use std::collections::HashSet;

use regex::Regex;

use pagecraft_document::{ComponentKind, ComponentRegistry, Project, PropValue};

use crate::component::{validate_children, validate_component};
use crate::diagnostic::{Diagnostic, ValidationReport};
use crate::tree::validate_tree;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_COMPONENTS: usize = 5000;
pub const MAX_PAGES: usize = 100;
pub const MAX_ASSET_BYTES: u64 = 100 * 1024 * 1024;

const KNOWN_TLDS: &[&str] = &[
    "com", "org", "net", "io", "dev", "app", "co", "ai", "me", "site", "store", "shop",
    "xyz", "info", "edu", "biz", "us", "uk", "de", "fr",
];

fn is_valid_slug(slug: &str) -> bool {
    let re = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
    re.is_match(slug)
}

fn is_valid_domain(domain: &str) -> bool {
    let re = Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)+$")
        .unwrap();
    if !re.is_match(domain) {
        return false;
    }
    domain
        .rsplit('.')
        .next()
        .map(|tld| KNOWN_TLDS.contains(&tld))
        .unwrap_or(false)
}

/// Validate project-level constraints (persistence gate)
pub fn validate_project(project: &Project) -> ValidationReport {
    let mut report = ValidationReport::new();

    if project.name.is_empty() {
        report.push(Diagnostic::error("project-name", "Project name is empty"));
    } else if project.name.len() > MAX_NAME_LENGTH {
        report.push(Diagnostic::error(
            "project-name",
            format!("Project name exceeds {MAX_NAME_LENGTH} characters"),
        ));
    }

    if project.description.len() > MAX_DESCRIPTION_LENGTH {
        report.push(Diagnostic::error(
            "project-description",
            format!("Description exceeds {MAX_DESCRIPTION_LENGTH} characters"),
        ));
    }

    if project.pages.is_empty() {
        report.push(Diagnostic::error("project-pages", "Project has no pages"));
    } else if project.pages.len() > MAX_PAGES {
        report.push(Diagnostic::error(
            "project-pages",
            format!("Project exceeds {MAX_PAGES} pages"),
        ));
    }

    let component_count = project.component_count();
    if component_count > MAX_COMPONENTS {
        report.push(Diagnostic::error(
            "project-component-count",
            format!("Project has {component_count} components, limit is {MAX_COMPONENTS}"),
        ));
    }

    let mut slugs: HashSet<&str> = HashSet::new();
    for page in &project.pages {
        if !is_valid_slug(&page.slug) {
            report.push(Diagnostic::error(
                "project-page-slug",
                format!("Page '{}' has an invalid slug: '{}'", page.name, page.slug),
            ));
        }
        if !slugs.insert(&page.slug) {
            report.push(Diagnostic::error(
                "project-page-slug",
                format!("Duplicate page slug: '{}'", page.slug),
            ));
        }
    }

    let home_count = project.pages.iter().filter(|p| p.is_home).count();
    if home_count != 1 {
        report.push(Diagnostic::error(
            "project-home-page",
            format!("Exactly one home page required, found {home_count}"),
        ));
    }

    for domain in &project.settings.domains {
        if !is_valid_domain(domain) {
            report.push(
                Diagnostic::error(
                    "project-domain",
                    format!("Invalid domain: '{domain}'"),
                )
                .with_suggestion("Use a lowercase hostname with a known TLD, e.g. example.com"),
            );
        }
    }

    let asset_bytes = project.total_asset_bytes();
    if asset_bytes > MAX_ASSET_BYTES {
        report.push(Diagnostic::error(
            "project-asset-size",
            format!("Total asset size {asset_bytes} bytes exceeds the {MAX_ASSET_BYTES} byte limit"),
        ));
    }

    for page in &project.pages {
        report.extend(validate_tree(&page.tree));
    }

    report
}

fn contains_lorem(text: &str) -> bool {
    text.to_ascii_lowercase().contains("lorem ipsum")
}

/// Stricter validation pass required before a project goes live
pub fn validate_for_publish(project: &Project, registry: &ComponentRegistry) -> ValidationReport {
    let mut report = validate_project(project);
    report.extend(validate_publish_content(project, registry));
    report
}

/// The publish-only checks, without the project-level pass.
///
/// Callers that already hold a [`validate_project`] report (e.g. from
/// loading the project) extend it with this instead of re-running the
/// project rules.
pub fn validate_publish_content(
    project: &Project,
    registry: &ComponentRegistry,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    if project.settings.domains.is_empty() {
        report.push(
            Diagnostic::error(
                "publish-no-domain",
                "At least one domain must be configured before publishing",
            )
            .with_suggestion("Add a domain under project settings"),
        );
    }

    for page in &project.pages {
        report.extend(validate_children(&page.tree));

        for component in page.tree.iter() {
            report.extend(validate_component(component, registry));

            if component.is_placeholder() {
                report.push(
                    Diagnostic::error(
                        "publish-placeholder",
                        "Placeholder components cannot be published",
                    )
                    .with_component(&component.id),
                );
            }

            if matches!(
                component.kind,
                ComponentKind::Container | ComponentKind::Section | ComponentKind::Grid
            ) && page.tree.children_of(&component.id).is_empty()
            {
                report.push(
                    Diagnostic::warning(
                        "publish-empty-container",
                        format!("{} '{}' is empty", component.kind, component.name),
                    )
                    .with_component(&component.id),
                );
            }

            if let Some(PropValue::Text(content)) = component.props.get("content") {
                if contains_lorem(content) {
                    report.push(
                        Diagnostic::warning(
                            "publish-lorem-ipsum",
                            "Placeholder text should be replaced before publishing",
                        )
                        .with_component(&component.id),
                    );
                }
            }
        }
    }

    report
}
