//! Injected-stylesheet cache keyed by component id and style content hash.
//! Entries regenerate when a component's style data changes and are pruned
//! when components disappear from the tree.

use std::collections::HashMap;

use tracing::debug;

use pagecraft_document::Component;

use crate::css::{generate_styles, style_hash, CssDocument, GeneratedStyles};

/// Per-session stylesheet cache
#[derive(Debug, Default)]
pub struct StyleSheetCache {
    entries: HashMap<String, GeneratedStyles>,
}

impl StyleSheetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Generated styles for `component`, regenerating when the style
    /// content hash no longer matches the cached entry
    pub fn ensure(&mut self, component: &Component) -> &GeneratedStyles {
        let current_hash = style_hash(&component.styles);
        let stale = self
            .entries
            .get(&component.id)
            .map(|e| e.hash != current_hash)
            .unwrap_or(true);

        if stale {
            debug!(component_id = %component.id, "Regenerating cached styles");
            self.entries
                .insert(component.id.clone(), generate_styles(component));
        }

        // Entry exists: either cached or just inserted
        &self.entries[&component.id]
    }

    pub fn get(&self, component_id: &str) -> Option<&GeneratedStyles> {
        self.entries.get(component_id)
    }

    /// Drop the cached entry for one component
    pub fn invalidate(&mut self, component_id: &str) {
        self.entries.remove(component_id);
    }

    /// Drop entries whose component no longer exists
    pub fn prune<'a>(&mut self, live_ids: impl Iterator<Item = &'a str>) {
        let live: std::collections::HashSet<&str> = live_ids.collect();
        self.entries.retain(|id, _| live.contains(id.as_str()));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Render every cached rule into one stylesheet
    pub fn stylesheet(&self) -> String {
        let mut ids: Vec<&String> = self.entries.keys().collect();
        ids.sort();

        let mut doc = CssDocument::new();
        for id in ids {
            for rule in &self.entries[id].rules {
                doc.add_rule(rule.clone());
            }
        }
        doc.to_css()
    }
}
