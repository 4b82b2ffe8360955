//! # Component Tree
//!
//! Id-indexed storage for the document tree. Each component carries its own
//! `parent_id` and sibling `order`; those two fields are the source of
//! truth, and nested children views are derived on demand.
//!
//! ## Mutation Semantics
//!
//! Every mutating operation validates its inputs before touching the map;
//! on error the tree is left exactly as it was. After any structural change
//! the affected sibling groups are resequenced to 0..n.
//!
//! Removing an unknown id is a no-op signalled by `None` rather than an
//! error; all other operations on unknown ids fail with
//! [`TreeError::ComponentNotFound`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pagecraft_common::IdGenerator;

use crate::component::{Component, ComponentKind, PropsPatch};
use crate::styles::StylePatch;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeError {
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("{parent} does not accept {child} children")]
    InvalidChild {
        parent: ComponentKind,
        child: ComponentKind,
    },

    #[error("Duplicate component id: {0}")]
    DuplicateId(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Invalid style: {0}")]
    InvalidStyle(String),
}

/// Automatic repair applied while rebuilding a tree from a flat list
#[derive(Debug, Clone, PartialEq)]
pub enum TreeFix {
    /// `parent_id` referenced a missing component; node promoted to root
    OrphanPromoted { id: String, missing_parent: String },
    /// A later component reused an existing id and was dropped
    DuplicateIdDropped { id: String },
    /// Sibling orders were missing or colliding and were reassigned
    OrderResequenced { parent_id: Option<String> },
}

/// Id-indexed component tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentTree {
    components: HashMap<String, Component>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tree from a flat component list, applying best-effort
    /// fixes: duplicate ids are dropped, orphans are promoted to root, and
    /// every sibling group is resequenced by stored order (ties broken by
    /// list position).
    pub fn from_components(components: Vec<Component>) -> (Self, Vec<TreeFix>) {
        let mut fixes = Vec::new();
        let mut tree = ComponentTree::new();

        let ids: std::collections::HashSet<String> =
            components.iter().map(|c| c.id.clone()).collect();

        for mut component in components {
            if tree.contains(&component.id) {
                fixes.push(TreeFix::DuplicateIdDropped {
                    id: component.id.clone(),
                });
                continue;
            }
            if let Some(parent_id) = component.parent_id.clone() {
                if !ids.contains(&parent_id) {
                    fixes.push(TreeFix::OrphanPromoted {
                        id: component.id.clone(),
                        missing_parent: parent_id,
                    });
                    component.parent_id = None;
                }
            }
            tree.components.insert(component.id.clone(), component);
        }

        // Resequence every sibling group; report the groups whose stored
        // orders were missing or colliding
        let mut groups: Vec<Option<String>> = vec![None];
        groups.extend(tree.components.keys().cloned().map(Some));
        for group in groups {
            let children = tree.child_ids(group.as_deref());
            if children.is_empty() {
                continue;
            }
            let needs_fix = children
                .iter()
                .enumerate()
                .any(|(i, id)| tree.get(id).map(|c| c.order != i as i32).unwrap_or(false));
            tree.resequence(group.as_deref());
            if needs_fix {
                fixes.push(TreeFix::OrderResequenced { parent_id: group });
            }
        }

        (tree, fixes)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Root component ids, sorted by order
    pub fn root_ids(&self) -> Vec<String> {
        self.child_ids(None)
    }

    /// Child ids of the given parent, sorted by order
    pub fn children_of(&self, parent_id: &str) -> Vec<String> {
        self.child_ids(Some(parent_id))
    }

    fn child_ids(&self, parent_id: Option<&str>) -> Vec<String> {
        let mut children: Vec<(i32, &str)> = self
            .components
            .values()
            .filter(|c| c.parent_id.as_deref() == parent_id)
            .map(|c| (c.order, c.id.as_str()))
            .collect();
        // Tie-break by id so sibling iteration is deterministic
        children.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        children.into_iter().map(|(_, id)| id.to_string()).collect()
    }

    /// Ids of the subtree rooted at `id`, preorder (root first)
    pub fn descendant_ids(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            let children = self.children_of(&current);
            out.push(current);
            // Reverse so preorder pops left-to-right
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Whether `ancestor_id` appears in the parent chain of `id`
    pub fn is_ancestor_of(&self, ancestor_id: &str, id: &str) -> bool {
        let mut current = self.get(id).and_then(|c| c.parent_id.clone());
        while let Some(parent) = current {
            if parent == ancestor_id {
                return true;
            }
            current = self.get(&parent).and_then(|c| c.parent_id.clone());
        }
        false
    }

    /// Renumber the sibling group under `parent_id` to 0..n
    fn resequence(&mut self, parent_id: Option<&str>) {
        let ids = self.child_ids(parent_id);
        for (index, id) in ids.iter().enumerate() {
            if let Some(component) = self.components.get_mut(id) {
                component.order = index as i32;
            }
        }
    }

    fn check_parent_accepts(
        &self,
        parent_id: &str,
        child_kind: ComponentKind,
    ) -> Result<(), TreeError> {
        let parent = self
            .get(parent_id)
            .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;
        if !parent.kind.child_policy().accepts(child_kind) {
            return Err(TreeError::InvalidChild {
                parent: parent.kind,
                child: child_kind,
            });
        }
        Ok(())
    }

    /// Insert a single component under `parent_id` (or as a root) at
    /// `index` among its siblings (clamped; default: append).
    pub fn insert(
        &mut self,
        mut component: Component,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        if self.contains(&component.id) {
            return Err(TreeError::DuplicateId(component.id));
        }
        if let Some(pid) = parent_id {
            self.check_parent_accepts(pid, component.kind)?;
        }

        let siblings = self.child_ids(parent_id);
        let index = index.unwrap_or(siblings.len()).min(siblings.len());

        // Shift siblings at or after the insertion point
        for (position, id) in siblings.iter().enumerate() {
            if let Some(sibling) = self.components.get_mut(id) {
                sibling.order = if position < index {
                    position as i32
                } else {
                    position as i32 + 1
                };
            }
        }

        component.parent_id = parent_id.map(|s| s.to_string());
        component.order = index as i32;
        self.components.insert(component.id.clone(), component);
        Ok(())
    }

    /// Remove the component and all descendants, returning the removed
    /// subtree in preorder. Unknown id is a no-op returning `None`.
    pub fn remove(&mut self, id: &str) -> Option<Vec<Component>> {
        if !self.contains(id) {
            return None;
        }
        let ids = self.descendant_ids(id);
        let parent_id = self.get(id).and_then(|c| c.parent_id.clone());

        let mut removed = Vec::with_capacity(ids.len());
        for node_id in &ids {
            if let Some(component) = self.components.remove(node_id) {
                removed.push(component);
            }
        }

        self.resequence(parent_id.as_deref());
        Some(removed)
    }

    /// Reinsert a previously removed subtree (preorder, root first).
    ///
    /// The root keeps its recorded `order`: siblings at or after that rank
    /// shift down to make room. Descendants land verbatim since their whole
    /// sibling groups travel together.
    pub fn restore(&mut self, components: Vec<Component>) -> Result<(), TreeError> {
        let root = components
            .first()
            .ok_or_else(|| TreeError::InvalidStructure("empty subtree".to_string()))?;

        for component in &components {
            if self.contains(&component.id) {
                return Err(TreeError::DuplicateId(component.id.clone()));
            }
        }
        if let Some(pid) = root.parent_id.as_deref() {
            self.check_parent_accepts(pid, root.kind)?;
        }

        let root_parent = root.parent_id.clone();
        let root_order = root.order;
        let sibling_ids = self.child_ids(root_parent.as_deref());
        for id in sibling_ids {
            if let Some(sibling) = self.components.get_mut(&id) {
                if sibling.order >= root_order {
                    sibling.order += 1;
                }
            }
        }

        for component in components {
            self.components.insert(component.id.clone(), component);
        }
        self.resequence(root_parent.as_deref());
        Ok(())
    }

    /// Shallow-merge a props patch, returning the inverse patch
    pub fn update_props(&mut self, id: &str, patch: &PropsPatch) -> Result<PropsPatch, TreeError> {
        let component = self
            .components
            .get_mut(id)
            .ok_or_else(|| TreeError::ComponentNotFound(id.to_string()))?;
        Ok(component.apply_props_patch(patch))
    }

    /// Shallow-merge a style patch, returning the inverse patch
    pub fn update_styles(&mut self, id: &str, patch: &StylePatch) -> Result<StylePatch, TreeError> {
        let component = self
            .components
            .get_mut(id)
            .ok_or_else(|| TreeError::ComponentNotFound(id.to_string()))?;
        Ok(component.styles.apply_patch(patch))
    }

    /// Freeform position coordinates; writes `left`/`top` into base styles
    pub fn set_position(&mut self, id: &str, x: f64, y: f64) -> Result<(), TreeError> {
        let component = self
            .components
            .get_mut(id)
            .ok_or_else(|| TreeError::ComponentNotFound(id.to_string()))?;
        component
            .styles
            .base
            .insert("left".to_string(), format!("{x}px"));
        component
            .styles
            .base
            .insert("top".to_string(), format!("{y}px"));
        Ok(())
    }

    /// Move a node under a new parent at `index` (default: end).
    ///
    /// Fails with [`TreeError::CycleDetected`] when the new parent is the
    /// node itself or one of its descendants. Both the old and the new
    /// sibling groups are resequenced.
    pub fn reparent(
        &mut self,
        id: &str,
        new_parent_id: Option<&str>,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        let component = self
            .get(id)
            .ok_or_else(|| TreeError::ComponentNotFound(id.to_string()))?;
        let kind = component.kind;
        let old_parent = component.parent_id.clone();

        if let Some(new_parent) = new_parent_id {
            if new_parent == id || self.is_ancestor_of(id, new_parent) {
                return Err(TreeError::CycleDetected);
            }
            self.check_parent_accepts(new_parent, kind)?;
        }

        // Detach, resequence old group
        if let Some(component) = self.components.get_mut(id) {
            component.parent_id = new_parent_id.map(|s| s.to_string());
        }
        if old_parent.as_deref() != new_parent_id {
            self.resequence(old_parent.as_deref());
        }

        // Attach at index (exclude the moved node from the count)
        let siblings: Vec<String> = self
            .child_ids(new_parent_id)
            .into_iter()
            .filter(|s| s != id)
            .collect();
        let index = index.unwrap_or(siblings.len()).min(siblings.len());
        for (position, sibling_id) in siblings.iter().enumerate() {
            if let Some(sibling) = self.components.get_mut(sibling_id) {
                sibling.order = if position < index {
                    position as i32
                } else {
                    position as i32 + 1
                };
            }
        }
        if let Some(component) = self.components.get_mut(id) {
            component.order = index as i32;
        }
        Ok(())
    }

    /// Change sibling rank within the same parent; clamped and stable
    pub fn reorder(&mut self, id: &str, new_index: usize) -> Result<(), TreeError> {
        let parent_id = self
            .get(id)
            .ok_or_else(|| TreeError::ComponentNotFound(id.to_string()))?
            .parent_id
            .clone();

        let mut siblings = self.child_ids(parent_id.as_deref());
        let current = siblings
            .iter()
            .position(|s| s == id)
            .ok_or_else(|| TreeError::InvalidStructure(format!("{id} missing from siblings")))?;
        siblings.remove(current);
        let new_index = new_index.min(siblings.len());
        siblings.insert(new_index, id.to_string());

        for (position, sibling_id) in siblings.iter().enumerate() {
            if let Some(sibling) = self.components.get_mut(sibling_id) {
                sibling.order = position as i32;
            }
        }
        Ok(())
    }

    /// Sibling position of `id` within its parent group
    pub fn index_of(&self, id: &str) -> Result<usize, TreeError> {
        let parent_id = self
            .get(id)
            .ok_or_else(|| TreeError::ComponentNotFound(id.to_string()))?
            .parent_id
            .clone();
        self.child_ids(parent_id.as_deref())
            .iter()
            .position(|s| s == id)
            .ok_or_else(|| TreeError::InvalidStructure(format!("{id} missing from siblings")))
    }

    /// Build a deep clone of the subtree rooted at `id` with fresh ids,
    /// positioned as the sibling immediately after the source. The clone
    /// is returned in preorder, ready for [`ComponentTree::restore`].
    pub fn clone_subtree(
        &self,
        id: &str,
        ids: &mut IdGenerator,
    ) -> Result<Vec<Component>, TreeError> {
        let source_ids = self.descendant_ids(id);
        if source_ids.is_empty() {
            return Err(TreeError::ComponentNotFound(id.to_string()));
        }

        let mut id_map: HashMap<String, String> = HashMap::new();
        for old_id in &source_ids {
            let mut new_id = ids.new_id();
            while self.contains(&new_id) || id_map.values().any(|v| v == &new_id) {
                new_id = ids.new_id();
            }
            id_map.insert(old_id.clone(), new_id);
        }

        let mut clones = Vec::with_capacity(source_ids.len());
        for old_id in &source_ids {
            let source = self
                .get(old_id)
                .ok_or_else(|| TreeError::ComponentNotFound(old_id.clone()))?;
            let mut clone = source.clone();
            clone.id = id_map[old_id].clone();
            if old_id == id {
                // Root keeps the source parent, lands right after it
                clone.order = source.order + 1;
            } else if let Some(parent) = &clone.parent_id {
                clone.parent_id = Some(id_map[parent].clone());
            }
            clones.push(clone);
        }
        Ok(clones)
    }

    /// Deep-clone the subtree at `id` and insert it after the source
    pub fn duplicate(&mut self, id: &str, ids: &mut IdGenerator) -> Result<String, TreeError> {
        let clones = self.clone_subtree(id, ids)?;
        let clone_root = clones[0].id.clone();
        self.restore(clones)?;
        Ok(clone_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    fn container(id: &str) -> Component {
        Component::new(id, ComponentKind::Container, id)
    }

    fn text(id: &str) -> Component {
        Component::new(id, ComponentKind::Text, id)
    }

    fn sample_tree() -> ComponentTree {
        let mut tree = ComponentTree::new();
        tree.insert(container("c1"), None, None).unwrap();
        tree.insert(text("t1"), Some("c1"), None).unwrap();
        tree.insert(text("t2"), Some("c1"), None).unwrap();
        tree
    }

    #[test]
    fn test_insert_under_parent() {
        let tree = sample_tree();
        assert_eq!(tree.children_of("c1"), vec!["t1", "t2"]);
        assert_eq!(tree.get("t1").unwrap().parent_id.as_deref(), Some("c1"));
        assert_eq!(tree.get("t1").unwrap().order, 0);
        assert_eq!(tree.get("t2").unwrap().order, 1);
    }

    #[test]
    fn test_insert_at_index_shifts_siblings() {
        let mut tree = sample_tree();
        tree.insert(text("t0"), Some("c1"), Some(0)).unwrap();
        assert_eq!(tree.children_of("c1"), vec!["t0", "t1", "t2"]);
        assert_eq!(tree.get("t1").unwrap().order, 1);
    }

    #[test]
    fn test_insert_index_is_clamped() {
        let mut tree = sample_tree();
        tree.insert(text("t9"), Some("c1"), Some(42)).unwrap();
        assert_eq!(tree.children_of("c1"), vec!["t1", "t2", "t9"]);
    }

    #[test]
    fn test_insert_unknown_parent_fails() {
        let mut tree = ComponentTree::new();
        let err = tree.insert(text("t1"), Some("nope"), None).unwrap_err();
        assert_eq!(err, TreeError::ParentNotFound("nope".to_string()));
    }

    #[test]
    fn test_insert_into_leaf_fails() {
        let mut tree = ComponentTree::new();
        tree.insert(
            Component::new("img", ComponentKind::Image, "img"),
            None,
            None,
        )
        .unwrap();
        let err = tree.insert(text("t1"), Some("img"), None).unwrap_err();
        assert!(matches!(err, TreeError::InvalidChild { .. }));
    }

    #[test]
    fn test_form_only_accepts_form_controls() {
        let mut tree = ComponentTree::new();
        tree.insert(Component::new("f", ComponentKind::Form, "f"), None, None)
            .unwrap();
        tree.insert(Component::new("i", ComponentKind::Input, "i"), Some("f"), None)
            .unwrap();
        let err = tree
            .insert(Component::new("img", ComponentKind::Image, "img"), Some("f"), None)
            .unwrap_err();
        assert!(matches!(err, TreeError::InvalidChild { .. }));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut tree = sample_tree();
        let err = tree.insert(text("t1"), None, None).unwrap_err();
        assert_eq!(err, TreeError::DuplicateId("t1".to_string()));
    }

    #[test]
    fn test_remove_cascades_to_descendants() {
        let mut tree = sample_tree();
        let removed = tree.remove("c1").unwrap();
        assert_eq!(removed.len(), 3);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut tree = sample_tree();
        assert!(tree.remove("nope").is_none());
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_remove_resequences_siblings() {
        let mut tree = sample_tree();
        tree.remove("t1").unwrap();
        assert_eq!(tree.get("t2").unwrap().order, 0);
    }

    #[test]
    fn test_restore_round_trips_remove() {
        let mut tree = sample_tree();
        let before = tree.clone();
        let removed = tree.remove("t1").unwrap();
        tree.restore(removed).unwrap();
        assert_eq!(tree.children_of("c1"), before.children_of("c1"));
        assert_eq!(tree.get("t1").unwrap().order, 0);
        assert_eq!(tree.get("t2").unwrap().order, 1);
    }

    #[test]
    fn test_reparent_moves_between_containers() {
        let mut tree = sample_tree();
        tree.insert(container("c2"), None, None).unwrap();
        tree.insert(text("t3"), Some("c2"), None).unwrap();

        tree.reparent("t1", Some("c2"), Some(0)).unwrap();

        assert_eq!(tree.get("t1").unwrap().parent_id.as_deref(), Some("c2"));
        assert_eq!(tree.children_of("c2"), vec!["t1", "t3"]);
        assert_eq!(tree.get("t1").unwrap().order, 0);
        assert_eq!(tree.get("t3").unwrap().order, 1);
        // Old sibling group resequenced
        assert_eq!(tree.get("t2").unwrap().order, 0);
    }

    #[test]
    fn test_reparent_under_own_descendant_fails() {
        let mut tree = ComponentTree::new();
        tree.insert(container("c1"), None, None).unwrap();
        tree.insert(container("c2"), Some("c1"), None).unwrap();
        tree.insert(container("c3"), Some("c2"), None).unwrap();

        let before = tree.clone();
        let err = tree.reparent("c1", Some("c3"), None).unwrap_err();
        assert_eq!(err, TreeError::CycleDetected);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_reparent_under_self_fails() {
        let mut tree = sample_tree();
        let err = tree.reparent("c1", Some("c1"), None).unwrap_err();
        assert_eq!(err, TreeError::CycleDetected);
    }

    #[test]
    fn test_reorder_moves_to_index() {
        let mut tree = sample_tree();
        tree.insert(text("t3"), Some("c1"), None).unwrap();

        tree.reorder("t3", 0).unwrap();
        assert_eq!(tree.children_of("c1"), vec!["t3", "t1", "t2"]);

        tree.reorder("t3", 2).unwrap();
        assert_eq!(tree.children_of("c1"), vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn test_duplicate_assigns_fresh_ids() {
        let mut tree = sample_tree();
        let mut ids = IdGenerator::new("proj");

        let clone_id = tree.duplicate("c1", &mut ids).unwrap();
        assert_ne!(clone_id, "c1");

        let originals = tree.descendant_ids("c1");
        let clones = tree.descendant_ids(&clone_id);
        assert_eq!(originals.len(), clones.len());
        for id in &clones {
            assert!(!originals.contains(id));
        }

        // Clone lands immediately after the source among roots
        assert_eq!(tree.root_ids(), vec!["c1".to_string(), clone_id.clone()]);
        // Structure preserved
        assert_eq!(tree.children_of(&clone_id).len(), 2);
    }

    #[test]
    fn test_duplicate_preserves_props() {
        let mut tree = sample_tree();
        let mut ids = IdGenerator::new("proj");
        let clone_id = tree.duplicate("t1", &mut ids).unwrap();
        assert_eq!(tree.get(&clone_id).unwrap().props, tree.get("t1").unwrap().props);
    }

    #[test]
    fn test_parent_links_stay_consistent() {
        let mut tree = sample_tree();
        tree.insert(container("c2"), None, None).unwrap();
        tree.reparent("t2", Some("c2"), None).unwrap();
        tree.reorder("t1", 0).unwrap();
        tree.remove("c2").unwrap();

        for component in tree.iter() {
            if let Some(parent) = &component.parent_id {
                assert!(tree.contains(parent));
            }
            assert!(!tree.is_ancestor_of(&component.id, &component.id));
        }
    }

    #[test]
    fn test_from_components_rebuilds_hierarchy() {
        let mut c1 = container("c1");
        c1.order = 7; // sparse orders are tolerated
        let mut t1 = text("t1");
        t1.parent_id = Some("c1".to_string());
        t1.order = 3;
        let mut t2 = text("t2");
        t2.parent_id = Some("c1".to_string());
        t2.order = 9;

        let (tree, fixes) = ComponentTree::from_components(vec![c1, t2, t1]);
        assert_eq!(tree.children_of("c1"), vec!["t1", "t2"]);
        assert_eq!(tree.get("t1").unwrap().order, 0);
        assert!(fixes
            .iter()
            .any(|f| matches!(f, TreeFix::OrderResequenced { .. })));
    }

    #[test]
    fn test_from_components_promotes_orphans() {
        let mut orphan = text("t1");
        orphan.parent_id = Some("ghost".to_string());

        let (tree, fixes) = ComponentTree::from_components(vec![orphan]);
        assert_eq!(tree.root_ids(), vec!["t1"]);
        assert!(tree.get("t1").unwrap().parent_id.is_none());
        assert!(matches!(
            fixes[0],
            TreeFix::OrphanPromoted { .. }
        ));
    }

    #[test]
    fn test_from_components_drops_duplicate_ids() {
        let (tree, fixes) =
            ComponentTree::from_components(vec![text("t1"), text("t1")]);
        assert_eq!(tree.len(), 1);
        assert!(matches!(fixes[0], TreeFix::DuplicateIdDropped { .. }));
    }

    #[test]
    fn test_set_position_writes_coordinates() {
        let mut tree = sample_tree();
        tree.set_position("t1", 120.0, 48.5).unwrap();
        let styles = &tree.get("t1").unwrap().styles.base;
        assert_eq!(styles.get("left"), Some(&"120px".to_string()));
        assert_eq!(styles.get("top"), Some(&"48.5px".to_string()));
    }
}
