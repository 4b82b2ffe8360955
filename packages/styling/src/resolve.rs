//! Breakpoint resolution: mobile-first cascade over sparse style layers.
//!
//! A value defined at a smaller breakpoint applies until a larger one
//! overrides it, so resolving at breakpoint B folds base + every layer at
//! or below B, ascending.

use pagecraft_document::{Breakpoint, PseudoState, StyleLayers, StyleMap};

/// Final declarations that apply at `breakpoint` (base cascade folded in)
pub fn resolve_at(styles: &StyleLayers, breakpoint: Breakpoint) -> StyleMap {
    let mut resolved = styles.base.clone();
    for bp in Breakpoint::ALL {
        if *bp > breakpoint {
            break;
        }
        if let Some(layer) = styles.breakpoints.get(bp) {
            for (key, value) in layer {
                resolved.insert(key.clone(), value.clone());
            }
        }
    }
    resolved
}

/// Nearest defined value for `property` at or below `breakpoint`,
/// falling back to the base layer
pub fn resolve_property<'a>(
    styles: &'a StyleLayers,
    breakpoint: Breakpoint,
    property: &str,
) -> Option<&'a str> {
    for bp in Breakpoint::ALL.iter().rev() {
        if *bp > breakpoint {
            continue;
        }
        if let Some(value) = styles.breakpoints.get(bp).and_then(|l| l.get(property)) {
            return Some(value);
        }
    }
    styles.base.get(property).map(|v| v.as_str())
}

/// Declarations that apply in `state` at `breakpoint` (state layer on top
/// of the resolved cascade)
pub fn resolve_state(
    styles: &StyleLayers,
    breakpoint: Breakpoint,
    state: PseudoState,
) -> StyleMap {
    let mut resolved = resolve_at(styles, breakpoint);
    if let Some(layer) = styles.states.get(&state) {
        for (key, value) in layer {
            resolved.insert(key.clone(), value.clone());
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse_styles() -> StyleLayers {
        let mut styles = StyleLayers::default();
        styles
            .base
            .insert("color".to_string(), "#111".to_string());
        styles
            .breakpoints
            .entry(Breakpoint::Sm)
            .or_default()
            .insert("font-size".to_string(), "14px".to_string());
        styles
            .breakpoints
            .entry(Breakpoint::Xl)
            .or_default()
            .insert("font-size".to_string(), "20px".to_string());
        styles
    }

    #[test]
    fn test_md_falls_back_to_sm() {
        let styles = sparse_styles();
        assert_eq!(
            resolve_property(&styles, Breakpoint::Md, "font-size"),
            Some("14px")
        );
    }

    #[test]
    fn test_xxl_falls_back_to_xl() {
        let styles = sparse_styles();
        assert_eq!(
            resolve_property(&styles, Breakpoint::Xxl, "font-size"),
            Some("20px")
        );
    }

    #[test]
    fn test_base_value_applies_everywhere() {
        let styles = sparse_styles();
        assert_eq!(resolve_property(&styles, Breakpoint::Sm, "color"), Some("#111"));
        assert_eq!(resolve_property(&styles, Breakpoint::Xxl, "color"), Some("#111"));
    }

    #[test]
    fn test_resolve_at_folds_cascade() {
        let styles = sparse_styles();
        let resolved = resolve_at(&styles, Breakpoint::Xl);
        assert_eq!(resolved.get("font-size"), Some(&"20px".to_string()));
        assert_eq!(resolved.get("color"), Some(&"#111".to_string()));
    }

    #[test]
    fn test_resolve_state_overlays_hover() {
        let mut styles = sparse_styles();
        styles
            .states
            .entry(PseudoState::Hover)
            .or_default()
            .insert("color".to_string(), "#f00".to_string());

        let resolved = resolve_state(&styles, Breakpoint::Md, PseudoState::Hover);
        assert_eq!(resolved.get("color"), Some(&"#f00".to_string()));
        assert_eq!(resolved.get("font-size"), Some(&"14px".to_string()));
    }
}
