//! Style validation: property allow-list and type-appropriate value
//! patterns. Invalid declarations are rejected before they reach the
//! styling engine, never silently dropped after injection.

use regex::Regex;

use pagecraft_document::{StyleLayers, StyleMap};

use crate::diagnostic::{Diagnostic, ValidationReport};

/// Longest accepted style value
pub const MAX_VALUE_LENGTH: usize = 256;

/// Properties the builder may emit. Anything else is rejected.
pub const ALLOWED_PROPERTIES: &[&str] = &[
    // Layout
    "display",
    "position",
    "top",
    "right",
    "bottom",
    "left",
    "z-index",
    "overflow",
    "flex-direction",
    "flex-wrap",
    "justify-content",
    "align-items",
    "align-self",
    "gap",
    "grid-template-columns",
    "grid-template-rows",
    "grid-column",
    "grid-row",
    // Box model
    "width",
    "height",
    "min-width",
    "min-height",
    "max-width",
    "max-height",
    "margin",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "padding",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "border",
    "border-width",
    "border-style",
    "border-color",
    "border-radius",
    "box-shadow",
    // Typography
    "color",
    "font-family",
    "font-size",
    "font-weight",
    "font-style",
    "line-height",
    "letter-spacing",
    "text-align",
    "text-decoration",
    "text-transform",
    // Background
    "background",
    "background-color",
    "background-image",
    "background-size",
    "background-position",
    "background-repeat",
    // Misc
    "opacity",
    "cursor",
    "transition",
    "transform",
    "object-fit",
    "visibility",
];

fn keyword_values(property: &str) -> Option<&'static [&'static str]> {
    match property {
        "display" => Some(&[
            "block",
            "inline",
            "inline-block",
            "flex",
            "inline-flex",
            "grid",
            "none",
        ]),
        "position" => Some(&["static", "relative", "absolute", "fixed", "sticky"]),
        "overflow" => Some(&["visible", "hidden", "scroll", "auto"]),
        "visibility" => Some(&["visible", "hidden", "collapse"]),
        "text-align" => Some(&["left", "right", "center", "justify"]),
        "object-fit" => Some(&["fill", "contain", "cover", "none", "scale-down"]),
        _ => None,
    }
}

fn is_color_property(property: &str) -> bool {
    matches!(property, "color" | "background-color" | "border-color")
}

fn is_length_property(property: &str) -> bool {
    matches!(
        property,
        "width"
            | "height"
            | "min-width"
            | "min-height"
            | "max-width"
            | "max-height"
            | "top"
            | "right"
            | "bottom"
            | "left"
            | "font-size"
            | "gap"
            | "border-radius"
            | "letter-spacing"
            | "margin-top"
            | "margin-right"
            | "margin-bottom"
            | "margin-left"
            | "padding-top"
            | "padding-right"
            | "padding-bottom"
            | "padding-left"
    )
}

fn is_valid_color(value: &str) -> bool {
    let hex = Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
        .unwrap();
    let functional = Regex::new(r"^(rgb|rgba|hsl|hsla)\([\d\s.,%/]+\)$").unwrap();
    const NAMED: &[&str] = &[
        "transparent",
        "currentcolor",
        "inherit",
        "black",
        "white",
        "red",
        "green",
        "blue",
        "gray",
        "grey",
    ];

    hex.is_match(value)
        || functional.is_match(value)
        || NAMED.contains(&value.to_ascii_lowercase().as_str())
        || value.starts_with("var(--")
}

fn is_valid_length(value: &str) -> bool {
    let unit = Regex::new(r"^-?\d+(\.\d+)?(px|rem|em|%|vw|vh|pt|ch|fr)$").unwrap();
    unit.is_match(value)
        || value == "0"
        || value == "auto"
        || value == "none"
        || value == "normal"
        || value.starts_with("calc(")
        || value.starts_with("var(--")
}

fn check_declaration(property: &str, value: &str, report: &mut ValidationReport) {
    if value.len() > MAX_VALUE_LENGTH {
        report.push(Diagnostic::error(
            "style-value-too-long",
            format!("Value for '{property}' exceeds {MAX_VALUE_LENGTH} characters"),
        ));
        return;
    }

    // Custom properties are only length-capped
    if property.starts_with("--") {
        return;
    }

    if !ALLOWED_PROPERTIES.contains(&property) {
        report.push(
            Diagnostic::error(
                "style-unknown-property",
                format!("'{property}' is not an allowed style property"),
            )
            .with_suggestion("Use one of the supported CSS properties"),
        );
        return;
    }

    if let Some(keywords) = keyword_values(property) {
        if !keywords.contains(&value) {
            report.push(Diagnostic::error(
                "style-invalid-keyword",
                format!("'{value}' is not a valid value for '{property}'"),
            ));
        }
        return;
    }

    if is_color_property(property) && !is_valid_color(value) {
        report.push(Diagnostic::error(
            "style-invalid-color",
            format!("'{value}' is not a valid color for '{property}'"),
        ));
        return;
    }

    if is_length_property(property) && !is_valid_length(value) {
        report.push(Diagnostic::error(
            "style-invalid-length",
            format!("'{value}' is not a valid length for '{property}'"),
        ));
    }
}

/// Validate one style layer
pub fn validate_style_map(styles: &StyleMap) -> ValidationReport {
    let mut report = ValidationReport::new();
    for (property, value) in styles {
        check_declaration(property, value, &mut report);
    }
    report
}

/// Validate every layer of a component's styles
pub fn validate_styles(styles: &StyleLayers) -> ValidationReport {
    let mut report = validate_style_map(&styles.base);
    for layer in styles.breakpoints.values() {
        report.extend(validate_style_map(layer));
    }
    for layer in styles.states.values() {
        report.extend(validate_style_map(layer));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> StyleMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_accepts_valid_declarations() {
        let report = validate_style_map(&map(&[
            ("color", "#3366ff"),
            ("width", "50%"),
            ("display", "flex"),
            ("padding", "8px 16px"),
            ("--accent", "#f0f"),
        ]));
        assert!(report.is_valid(), "{:?}", report.diagnostics);
    }

    #[test]
    fn test_rejects_unknown_property() {
        let report = validate_style_map(&map(&[("behavior", "url(evil.htc)")]));
        assert!(!report.is_valid());
        assert_eq!(report.errors().next().unwrap().rule, "style-unknown-property");
    }

    #[test]
    fn test_rejects_invalid_color() {
        let report = validate_style_map(&map(&[("color", "#zzz")]));
        assert!(!report.is_valid());
        assert_eq!(report.errors().next().unwrap().rule, "style-invalid-color");
    }

    #[test]
    fn test_rejects_invalid_keyword() {
        let report = validate_style_map(&map(&[("display", "wobbly")]));
        assert!(!report.is_valid());
    }

    #[test]
    fn test_rejects_invalid_length() {
        let report = validate_style_map(&map(&[("width", "very wide")]));
        assert!(!report.is_valid());
        assert_eq!(report.errors().next().unwrap().rule, "style-invalid-length");
    }

    #[test]
    fn test_rejects_oversized_value() {
        let long = "a".repeat(MAX_VALUE_LENGTH + 1);
        let report = validate_style_map(&map(&[("font-family", long.as_str())]));
        assert!(!report.is_valid());
        assert_eq!(report.errors().next().unwrap().rule, "style-value-too-long");
    }

    #[test]
    fn test_validation_does_not_mutate_input() {
        let styles = map(&[("color", "#zzz"), ("display", "flex")]);
        let before = styles.clone();
        let _ = validate_style_map(&styles);
        assert_eq!(styles, before);
    }
}
