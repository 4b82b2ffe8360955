//! CSS generation: partition a component's layered styles into a base
//! class rule, per-breakpoint media-query rules, and pseudo-state rules.
//! Custom properties (`--*`) cannot be targeted through generated class
//! rules, so they are returned separately for inline application.

use std::collections::BTreeMap;

use crc32fast::Hasher;
use tracing::debug;

use pagecraft_document::{Component, StyleLayers, StyleMap};

/// CSS rule with selector and properties
#[derive(Debug, Clone, PartialEq)]
pub struct CssRule {
    pub selector: String,
    pub properties: BTreeMap<String, String>,
    pub media_query: Option<String>,
}

/// CSS document - an ordered collection of rules
#[derive(Debug, Clone, Default)]
pub struct CssDocument {
    pub rules: Vec<CssRule>,
}

impl CssDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, rule: CssRule) {
        self.rules.push(rule);
    }

    /// Convert to CSS text
    pub fn to_css(&self) -> String {
        let mut css = String::new();

        for rule in &self.rules {
            let indent = if rule.media_query.is_some() {
                if let Some(query) = &rule.media_query {
                    css.push_str(query);
                    css.push_str(" {\n");
                }
                "  "
            } else {
                ""
            };

            css.push_str(indent);
            css.push_str(&rule.selector);
            css.push_str(" {\n");

            for (key, value) in &rule.properties {
                css.push_str(indent);
                css.push_str("  ");
                css.push_str(key);
                css.push_str(": ");
                css.push_str(value);
                css.push_str(";\n");
            }

            css.push_str(indent);
            css.push_str("}\n");

            if rule.media_query.is_some() {
                css.push_str("}\n");
            }
            css.push('\n');
        }

        css
    }
}

/// Output of style generation for one component
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedStyles {
    /// Class name targeted by all generated rules
    pub class_name: String,

    /// Content hash of the style data the rules were generated from
    pub hash: u32,

    /// Base, breakpoint, and pseudo-state rules
    pub rules: Vec<CssRule>,

    /// Custom properties that must be applied inline
    pub inline: StyleMap,
}

/// Content hash over a component's style layers
pub fn style_hash(styles: &StyleLayers) -> u32 {
    let mut hasher = Hasher::new();
    // BTreeMap iteration is ordered, so the hash is stable
    for (key, value) in &styles.base {
        hasher.update(key.as_bytes());
        hasher.update(value.as_bytes());
    }
    for (breakpoint, layer) in &styles.breakpoints {
        hasher.update(breakpoint.as_str().as_bytes());
        for (key, value) in layer {
            hasher.update(key.as_bytes());
            hasher.update(value.as_bytes());
        }
    }
    for (state, layer) in &styles.states {
        hasher.update(state.selector().as_bytes());
        for (key, value) in layer {
            hasher.update(key.as_bytes());
            hasher.update(value.as_bytes());
        }
    }
    hasher.finalize()
}

fn is_custom_property(name: &str) -> bool {
    name.starts_with("--")
}

fn class_properties(layer: &StyleMap) -> BTreeMap<String, String> {
    layer
        .iter()
        .filter(|(k, _)| !is_custom_property(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Generate the CSS rules for a component's style layers
pub fn generate_styles(component: &Component) -> GeneratedStyles {
    let hash = style_hash(&component.styles);
    let class_name = {
        let mut hasher = Hasher::new();
        hasher.update(component.id.as_bytes());
        hasher.update(&hash.to_le_bytes());
        format!("pc-{:x}", hasher.finalize())
    };
    let selector = format!(".{class_name}");

    let mut rules = Vec::new();
    let inline: StyleMap = component
        .styles
        .base
        .iter()
        .filter(|(k, _)| is_custom_property(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let base_properties = class_properties(&component.styles.base);
    if !base_properties.is_empty() {
        rules.push(CssRule {
            selector: selector.clone(),
            properties: base_properties,
            media_query: None,
        });
    }

    // Ascending breakpoints preserve the mobile-first cascade
    for (breakpoint, layer) in &component.styles.breakpoints {
        let properties = class_properties(layer);
        if properties.is_empty() {
            continue;
        }
        rules.push(CssRule {
            selector: selector.clone(),
            properties,
            media_query: Some(breakpoint.media_query()),
        });
    }

    for (state, layer) in &component.styles.states {
        let properties = class_properties(layer);
        if properties.is_empty() {
            continue;
        }
        rules.push(CssRule {
            selector: format!("{selector}{}", state.selector()),
            properties,
            media_query: None,
        });
    }

    debug!(
        component_id = %component.id,
        class = %class_name,
        rules = rules.len(),
        "Generated component styles"
    );

    GeneratedStyles {
        class_name,
        hash,
        rules,
        inline,
    }
}
