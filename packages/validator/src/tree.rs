//! Structural tree validation: duplicate ids, dangling parents, cycles.
//! These are hard errors; they indicate corrupted data rather than
//! user-correctable input.

use std::collections::HashSet;

use pagecraft_document::ComponentTree;

use crate::diagnostic::{Diagnostic, ValidationReport};

/// Validate structural invariants of a component tree
pub fn validate_tree(tree: &ComponentTree) -> ValidationReport {
    let mut report = ValidationReport::new();

    for component in tree.iter() {
        if let Some(parent_id) = &component.parent_id {
            if !tree.contains(parent_id) {
                report.push(
                    Diagnostic::error(
                        "tree-orphaned-component",
                        format!(
                            "Component '{}' references missing parent '{parent_id}'",
                            component.id
                        ),
                    )
                    .with_component(&component.id),
                );
            }
        }

        if has_cycle(tree, &component.id) {
            report.push(
                Diagnostic::error(
                    "tree-circular-reference",
                    format!("Component '{}' is its own ancestor", component.id),
                )
                .with_component(&component.id),
            );
        }
    }

    report
}

/// Validate a flat component list before hierarchy reconstruction.
///
/// The canonical tree is id-indexed so duplicate ids cannot exist once
/// loaded; they can only appear in serialized input, which is checked
/// here.
pub fn validate_flat_components(
    components: &[pagecraft_document::Component],
) -> ValidationReport {
    let mut report = ValidationReport::new();
    let ids: HashSet<&str> = components.iter().map(|c| c.id.as_str()).collect();

    let mut seen: HashSet<&str> = HashSet::new();
    for component in components {
        if !seen.insert(&component.id) {
            report.push(
                Diagnostic::error(
                    "tree-duplicate-id",
                    format!("Duplicate component id: '{}'", component.id),
                )
                .with_component(&component.id),
            );
        }
        if let Some(parent_id) = &component.parent_id {
            if !ids.contains(parent_id.as_str()) {
                report.push(
                    Diagnostic::warning(
                        "tree-orphaned-component",
                        format!(
                            "Component '{}' references missing parent '{parent_id}'; it will be promoted to root",
                            component.id
                        ),
                    )
                    .with_component(&component.id),
                );
            }
        }
    }

    report
}

/// Whether walking the parent chain from `id` revisits `id` (or loops)
fn has_cycle(tree: &ComponentTree, id: &str) -> bool {
    let mut seen = HashSet::new();
    seen.insert(id.to_string());

    let mut current = tree.get(id).and_then(|c| c.parent_id.clone());
    while let Some(parent) = current {
        if !seen.insert(parent.clone()) {
            return true;
        }
        current = tree.get(&parent).and_then(|c| c.parent_id.clone());
    }
    false
}
