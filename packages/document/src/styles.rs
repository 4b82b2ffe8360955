//! Layered style data: a base layer, sparse per-breakpoint overrides, and
//! pseudo-state overrides. Resolution and CSS generation live in the
//! styling package; this module only defines the data shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Responsive width threshold (mobile-first, ascending)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Breakpoint {
    #[serde(rename = "sm")]
    Sm,
    #[serde(rename = "md")]
    Md,
    #[serde(rename = "lg")]
    Lg,
    #[serde(rename = "xl")]
    Xl,
    #[serde(rename = "2xl")]
    Xxl,
}

impl Breakpoint {
    pub const ALL: &'static [Breakpoint] = &[
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
    ];

    /// Minimum viewport width in pixels at which this breakpoint applies
    pub fn min_width(&self) -> u32 {
        match self {
            Breakpoint::Sm => 640,
            Breakpoint::Md => 768,
            Breakpoint::Lg => 1024,
            Breakpoint::Xl => 1280,
            Breakpoint::Xxl => 1536,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
            Breakpoint::Xxl => "2xl",
        }
    }

    /// Min-width media query wrapping this breakpoint's rules
    pub fn media_query(&self) -> String {
        format!("@media (min-width: {}px)", self.min_width())
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interaction pseudo-state carrying style overrides
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PseudoState {
    Hover,
    Active,
    Focus,
}

impl PseudoState {
    pub const ALL: &'static [PseudoState] =
        &[PseudoState::Hover, PseudoState::Active, PseudoState::Focus];

    /// CSS selector suffix, e.g. `:hover`
    pub fn selector(&self) -> &'static str {
        match self {
            PseudoState::Hover => ":hover",
            PseudoState::Active => ":active",
            PseudoState::Focus => ":focus",
        }
    }
}

/// Property → value declarations for one layer
pub type StyleMap = BTreeMap<String, String>;

/// A style patch: `Some(value)` sets a property, `None` deletes it
pub type StyleMapPatch = BTreeMap<String, Option<String>>;

/// Layered style data attached to a component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleLayers {
    /// Applied unconditionally (below the smallest breakpoint)
    pub base: StyleMap,

    /// Sparse per-breakpoint overrides
    pub breakpoints: BTreeMap<Breakpoint, StyleMap>,

    /// Pseudo-state overrides (hover/active/focus)
    pub states: BTreeMap<PseudoState, StyleMap>,
}

/// Shallow patch across all style layers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePatch {
    pub base: StyleMapPatch,
    pub breakpoints: BTreeMap<Breakpoint, StyleMapPatch>,
    pub states: BTreeMap<PseudoState, StyleMapPatch>,
}

impl StylePatch {
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.breakpoints.is_empty() && self.states.is_empty()
    }

    /// Convenience patch setting base-layer properties
    pub fn base_set(entries: &[(&str, &str)]) -> Self {
        let mut patch = StylePatch::default();
        for (key, value) in entries {
            patch
                .base
                .insert((*key).to_string(), Some((*value).to_string()));
        }
        patch
    }
}

fn apply_map_patch(target: &mut StyleMap, patch: &StyleMapPatch) -> StyleMapPatch {
    let mut inverse = StyleMapPatch::new();
    for (key, value) in patch {
        inverse.insert(key.clone(), target.get(key).cloned());
        match value {
            Some(v) => {
                target.insert(key.clone(), v.clone());
            }
            None => {
                target.remove(key);
            }
        }
    }
    inverse
}

impl StyleLayers {
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.breakpoints.is_empty() && self.states.is_empty()
    }

    /// Apply a shallow patch to each layer, returning the inverse patch
    pub fn apply_patch(&mut self, patch: &StylePatch) -> StylePatch {
        let mut inverse = StylePatch::default();
        inverse.base = apply_map_patch(&mut self.base, &patch.base);

        for (breakpoint, map_patch) in &patch.breakpoints {
            let layer = self.breakpoints.entry(*breakpoint).or_default();
            inverse
                .breakpoints
                .insert(*breakpoint, apply_map_patch(layer, map_patch));
            if layer.is_empty() {
                self.breakpoints.remove(breakpoint);
            }
        }

        for (state, map_patch) in &patch.states {
            let layer = self.states.entry(*state).or_default();
            inverse
                .states
                .insert(*state, apply_map_patch(layer, map_patch));
            if layer.is_empty() {
                self.states.remove(state);
            }
        }

        inverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints_ascend() {
        let mut last = 0;
        for bp in Breakpoint::ALL {
            assert!(bp.min_width() > last);
            last = bp.min_width();
        }
    }

    #[test]
    fn test_breakpoint_serde_names() {
        assert_eq!(serde_json::to_string(&Breakpoint::Xxl).unwrap(), "\"2xl\"");
        assert_eq!(
            serde_json::from_str::<Breakpoint>("\"sm\"").unwrap(),
            Breakpoint::Sm
        );
    }

    #[test]
    fn test_style_patch_inverse_restores() {
        let mut styles = StyleLayers::default();
        styles.base.insert("color".to_string(), "#333".to_string());
        let before = styles.clone();

        let mut patch = StylePatch::base_set(&[("color", "#000"), ("padding", "16px")]);
        patch
            .breakpoints
            .entry(Breakpoint::Md)
            .or_default()
            .insert("padding".to_string(), Some("24px".to_string()));

        let inverse = styles.apply_patch(&patch);
        assert_eq!(styles.base.get("color"), Some(&"#000".to_string()));
        assert_eq!(
            styles.breakpoints.get(&Breakpoint::Md).unwrap().get("padding"),
            Some(&"24px".to_string())
        );

        styles.apply_patch(&inverse);
        assert_eq!(styles, before);
    }

    #[test]
    fn test_patch_deletion_removes_empty_layer() {
        let mut styles = StyleLayers::default();
        styles
            .breakpoints
            .entry(Breakpoint::Lg)
            .or_default()
            .insert("gap".to_string(), "8px".to_string());

        let mut patch = StylePatch::default();
        patch
            .breakpoints
            .entry(Breakpoint::Lg)
            .or_default()
            .insert("gap".to_string(), None);

        styles.apply_patch(&patch);
        assert!(styles.breakpoints.is_empty());
    }
}
