//! Per-component validation: kind known to the registry, required props
//! present, child acceptance honored.

use pagecraft_document::{
    Component, ComponentRegistry, ComponentTree, PropValue,
};

use crate::diagnostic::{Diagnostic, ValidationReport};
use crate::style::validate_styles;

fn prop_is_missing(component: &Component, name: &str) -> bool {
    match component.props.get(name) {
        None => true,
        // An empty string counts as missing for required props
        Some(PropValue::Text(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Validate a single component against its kind schema
pub fn validate_component(
    component: &Component,
    registry: &ComponentRegistry,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    if !registry.is_known(component.kind.as_str()) {
        report.push(
            Diagnostic::error(
                "component-unknown-kind",
                format!("Unknown component type: '{}'", component.kind),
            )
            .with_component(&component.id),
        );
    }

    if component.is_placeholder() {
        report.push(
            Diagnostic::warning(
                "component-placeholder",
                "Component is a placeholder for an unrecognized type",
            )
            .with_component(&component.id)
            .with_suggestion("Replace it or register the missing component type"),
        );
    }

    for required in component.kind.required_props() {
        if prop_is_missing(component, required) {
            report.push(
                Diagnostic::error(
                    "component-missing-prop",
                    format!(
                        "{} component requires the '{required}' prop",
                        component.kind
                    ),
                )
                .with_component(&component.id),
            );
        }
    }

    for value in component.props.values() {
        if let PropValue::Action(id) = value {
            if !registry.has_action(id) {
                report.push(
                    Diagnostic::warning(
                        "component-unknown-action",
                        format!("Action '{id}' is not registered"),
                    )
                    .with_component(&component.id),
                );
            }
        }
    }

    let mut style_report = validate_styles(&component.styles);
    for diagnostic in &mut style_report.diagnostics {
        if diagnostic.component_id.is_none() {
            diagnostic.component_id = Some(component.id.clone());
        }
    }
    report.extend(style_report);

    report
}

/// Validate the children of each component against its child policy
pub fn validate_children(tree: &ComponentTree) -> ValidationReport {
    let mut report = ValidationReport::new();

    for component in tree.iter() {
        let policy = component.kind.child_policy();
        for child_id in tree.children_of(&component.id) {
            let child = match tree.get(&child_id) {
                Some(c) => c,
                None => continue,
            };
            if !policy.accepts(child.kind) {
                report.push(
                    Diagnostic::error(
                        "component-invalid-child",
                        format!(
                            "{} does not accept {} children",
                            component.kind, child.kind
                        ),
                    )
                    .with_component(&child_id),
                );
            }
        }
    }

    report
}
