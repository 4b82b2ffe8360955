//! # Tree Mutations
//!
//! High-level semantic operations on a page's component tree.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: Each mutation represents a semantic operation
//! 2. **Validated**: All mutations validate structural constraints before
//!    touching the tree
//! 3. **Invertible**: Every mutation produces an exact inverse *before* it
//!    is applied, so undo never has to diff trees
//!
//! ## Mutation Semantics
//!
//! ### Reparent
//! - Atomic relocation of a node (and its subtree) to a new parent
//! - Fails if the new parent is missing, rejects the child kind, or is
//!   the node itself / one of its descendants (cycle)
//!
//! ### Remove
//! - Removes the node and all descendants as one unit
//! - The inverse restores the whole subtree, ids and sibling rank intact
//!
//! ### Duplicate
//! - Carries the pre-generated clone so redo reproduces identical ids

use pagecraft_document::{
    Component, ComponentTree, PropsPatch, StyleMap, StylePatch, TreeError,
};
use pagecraft_validator::validate_style_map;
use serde::{Deserialize, Serialize};

/// Classifies mutations for merge-window coalescing.
///
/// Consecutive implicit single-mutation batches in the same category
/// collapse into one undo step when they land within the merge window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeCategory {
    /// Prop edits (typing into a text field)
    TextEdit,
    /// Style patch edits (dragging a slider)
    StyleEdit,
    /// Freeform position moves (dragging on canvas)
    Position,
}

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a new component under `parent_id` (or as a root) at `index`
    Insert {
        component: Component,
        parent_id: Option<String>,
        index: Option<usize>,
    },

    /// Remove a component and all its descendants
    Remove { node_id: String },

    /// Reinsert a previously removed subtree (preorder, root first)
    RestoreSubtree { components: Vec<Component> },

    /// Shallow-merge a props patch (`None` values delete keys)
    UpdateProps { node_id: String, patch: PropsPatch },

    /// Shallow-merge a style patch across layers
    UpdateStyles { node_id: String, patch: StylePatch },

    /// Set the freeform canvas position (`left`/`top` base styles)
    SetPosition { node_id: String, x: f64, y: f64 },

    /// Move a node under a new parent at `index` (default: end)
    Reparent {
        node_id: String,
        new_parent_id: Option<String>,
        index: Option<usize>,
    },

    /// Move a node to a new rank among its current siblings
    Reorder { node_id: String, new_index: usize },

    /// Insert a pre-generated deep clone of a subtree. The clone travels
    /// with the mutation so redo reuses the same ids.
    Duplicate {
        node_id: String,
        clone: Vec<Component>,
    },
}

impl Mutation {
    /// Validate structural constraints without applying
    pub fn validate(&self, tree: &ComponentTree) -> Result<(), TreeError> {
        match self {
            Mutation::Insert {
                component,
                parent_id,
                ..
            } => {
                if tree.contains(&component.id) {
                    return Err(TreeError::DuplicateId(component.id.clone()));
                }
                if let Some(pid) = parent_id {
                    if !tree.contains(pid) {
                        return Err(TreeError::ParentNotFound(pid.clone()));
                    }
                }
                Ok(())
            }

            Mutation::Remove { node_id }
            | Mutation::UpdateProps { node_id, .. }
            | Mutation::SetPosition { node_id, .. }
            | Mutation::Reorder { node_id, .. } => {
                if !tree.contains(node_id) {
                    return Err(TreeError::ComponentNotFound(node_id.clone()));
                }
                Ok(())
            }

            Mutation::UpdateStyles { node_id, patch } => {
                if !tree.contains(node_id) {
                    return Err(TreeError::ComponentNotFound(node_id.clone()));
                }
                validate_style_patch(patch)
            }

            Mutation::RestoreSubtree { components } => {
                if components.is_empty() {
                    return Err(TreeError::InvalidStructure(
                        "empty subtree".to_string(),
                    ));
                }
                for component in components {
                    if tree.contains(&component.id) {
                        return Err(TreeError::DuplicateId(component.id.clone()));
                    }
                }
                Ok(())
            }

            Mutation::Reparent {
                node_id,
                new_parent_id,
                ..
            } => {
                if !tree.contains(node_id) {
                    return Err(TreeError::ComponentNotFound(node_id.clone()));
                }
                if let Some(new_parent) = new_parent_id {
                    if !tree.contains(new_parent) {
                        return Err(TreeError::ParentNotFound(new_parent.clone()));
                    }
                    if new_parent == node_id || tree.is_ancestor_of(node_id, new_parent) {
                        return Err(TreeError::CycleDetected);
                    }
                }
                Ok(())
            }

            Mutation::Duplicate { node_id, clone } => {
                if !tree.contains(node_id) {
                    return Err(TreeError::ComponentNotFound(node_id.clone()));
                }
                for component in clone {
                    if tree.contains(&component.id) {
                        return Err(TreeError::DuplicateId(component.id.clone()));
                    }
                }
                Ok(())
            }
        }
    }

    /// Apply the mutation to the tree with validation
    pub fn apply(&self, tree: &mut ComponentTree) -> Result<(), TreeError> {
        self.validate(tree)?;

        match self {
            Mutation::Insert {
                component,
                parent_id,
                index,
            } => tree.insert(component.clone(), parent_id.as_deref(), *index),

            Mutation::Remove { node_id } => {
                tree.remove(node_id)
                    .ok_or_else(|| TreeError::ComponentNotFound(node_id.clone()))?;
                Ok(())
            }

            Mutation::RestoreSubtree { components } => tree.restore(components.clone()),

            Mutation::UpdateProps { node_id, patch } => {
                tree.update_props(node_id, patch).map(|_| ())
            }

            Mutation::UpdateStyles { node_id, patch } => {
                tree.update_styles(node_id, patch).map(|_| ())
            }

            Mutation::SetPosition { node_id, x, y } => tree.set_position(node_id, *x, *y),

            Mutation::Reparent {
                node_id,
                new_parent_id,
                index,
            } => tree.reparent(node_id, new_parent_id.as_deref(), *index),

            Mutation::Reorder { node_id, new_index } => tree.reorder(node_id, *new_index),

            Mutation::Duplicate { clone, .. } => tree.restore(clone.clone()),
        }
    }

    /// Compute the exact inverse against the *current* tree state.
    ///
    /// Must be called before [`Mutation::apply`]; the inverse captures
    /// whatever the mutation is about to overwrite or detach.
    pub fn to_inverse(&self, tree: &ComponentTree) -> Result<Mutation, TreeError> {
        match self {
            Mutation::Insert { component, .. } => Ok(Mutation::Remove {
                node_id: component.id.clone(),
            }),

            Mutation::Remove { node_id } => {
                let components = Self::snapshot_subtree(tree, node_id)?;
                Ok(Mutation::RestoreSubtree { components })
            }

            Mutation::RestoreSubtree { components } => {
                let root = components.first().ok_or_else(|| {
                    TreeError::InvalidStructure("empty subtree".to_string())
                })?;
                Ok(Mutation::Remove {
                    node_id: root.id.clone(),
                })
            }

            Mutation::UpdateProps { node_id, patch } => {
                let component = tree
                    .get(node_id)
                    .ok_or_else(|| TreeError::ComponentNotFound(node_id.clone()))?;
                let mut inverse = PropsPatch::new();
                for key in patch.keys() {
                    inverse.insert(key.clone(), component.props.get(key).cloned());
                }
                Ok(Mutation::UpdateProps {
                    node_id: node_id.clone(),
                    patch: inverse,
                })
            }

            Mutation::UpdateStyles { node_id, patch } => {
                let component = tree
                    .get(node_id)
                    .ok_or_else(|| TreeError::ComponentNotFound(node_id.clone()))?;
                let styles = &component.styles;

                let mut inverse = StylePatch::default();
                for key in patch.base.keys() {
                    inverse
                        .base
                        .insert(key.clone(), styles.base.get(key).cloned());
                }
                for (breakpoint, map_patch) in &patch.breakpoints {
                    let layer = styles.breakpoints.get(breakpoint);
                    let entry = inverse.breakpoints.entry(*breakpoint).or_default();
                    for key in map_patch.keys() {
                        entry.insert(key.clone(), layer.and_then(|l| l.get(key)).cloned());
                    }
                }
                for (state, map_patch) in &patch.states {
                    let layer = styles.states.get(state);
                    let entry = inverse.states.entry(*state).or_default();
                    for key in map_patch.keys() {
                        entry.insert(key.clone(), layer.and_then(|l| l.get(key)).cloned());
                    }
                }
                Ok(Mutation::UpdateStyles {
                    node_id: node_id.clone(),
                    patch: inverse,
                })
            }

            Mutation::SetPosition { node_id, .. } => {
                // Restore the raw declarations so that undoing the first
                // move of a component removes `left`/`top` again instead of
                // pinning it at 0,0.
                let component = tree
                    .get(node_id)
                    .ok_or_else(|| TreeError::ComponentNotFound(node_id.clone()))?;
                let mut inverse = StylePatch::default();
                inverse
                    .base
                    .insert("left".to_string(), component.styles.base.get("left").cloned());
                inverse
                    .base
                    .insert("top".to_string(), component.styles.base.get("top").cloned());
                Ok(Mutation::UpdateStyles {
                    node_id: node_id.clone(),
                    patch: inverse,
                })
            }

            Mutation::Reparent { node_id, .. } => {
                let component = tree
                    .get(node_id)
                    .ok_or_else(|| TreeError::ComponentNotFound(node_id.clone()))?;
                let old_parent = component.parent_id.clone();
                let old_index = tree.index_of(node_id)?;
                Ok(Mutation::Reparent {
                    node_id: node_id.clone(),
                    new_parent_id: old_parent,
                    index: Some(old_index),
                })
            }

            Mutation::Reorder { node_id, .. } => {
                let old_index = tree.index_of(node_id)?;
                Ok(Mutation::Reorder {
                    node_id: node_id.clone(),
                    new_index: old_index,
                })
            }

            Mutation::Duplicate { clone, .. } => {
                let root = clone.first().ok_or_else(|| {
                    TreeError::InvalidStructure("empty clone".to_string())
                })?;
                Ok(Mutation::Remove {
                    node_id: root.id.clone(),
                })
            }
        }
    }

    /// Merge category, or `None` for mutations that never coalesce
    pub fn merge_category(&self) -> Option<MergeCategory> {
        match self {
            Mutation::UpdateProps { .. } => Some(MergeCategory::TextEdit),
            Mutation::UpdateStyles { .. } => Some(MergeCategory::StyleEdit),
            Mutation::SetPosition { .. } => Some(MergeCategory::Position),
            _ => None,
        }
    }

    /// Human-readable label for history displays
    pub fn describe(&self) -> String {
        match self {
            Mutation::Insert { component, .. } => {
                format!("Insert {}", component.kind.as_str())
            }
            Mutation::Remove { node_id } => format!("Remove {node_id}"),
            Mutation::RestoreSubtree { components } => match components.first() {
                Some(root) => format!("Restore {}", root.id),
                None => "Restore".to_string(),
            },
            Mutation::UpdateProps { node_id, .. } => format!("Edit {node_id}"),
            Mutation::UpdateStyles { node_id, .. } => format!("Style {node_id}"),
            Mutation::SetPosition { node_id, .. } => format!("Move {node_id}"),
            Mutation::Reparent { node_id, .. } => format!("Reparent {node_id}"),
            Mutation::Reorder { node_id, .. } => format!("Reorder {node_id}"),
            Mutation::Duplicate { node_id, .. } => format!("Duplicate {node_id}"),
        }
    }

    /// Clone a node and all its descendants in preorder
    fn snapshot_subtree(
        tree: &ComponentTree,
        node_id: &str,
    ) -> Result<Vec<Component>, TreeError> {
        if !tree.contains(node_id) {
            return Err(TreeError::ComponentNotFound(node_id.to_string()));
        }
        let ids = tree.descendant_ids(node_id);
        let mut components = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(component) = tree.get(id) {
                components.push(component.clone());
            }
        }
        Ok(components)
    }
}

/// Reject a style patch whose incoming declarations fail validation.
///
/// Deletions (`None` values) always pass; only values about to be written
/// are checked, so inverses built from previously accepted state stay
/// appliable.
fn validate_style_patch(patch: &StylePatch) -> Result<(), TreeError> {
    let mut incoming = StyleMap::new();
    for (property, value) in &patch.base {
        if let Some(value) = value {
            incoming.insert(property.clone(), value.clone());
        }
    }
    for layer in patch.breakpoints.values() {
        for (property, value) in layer {
            if let Some(value) = value {
                incoming.insert(property.clone(), value.clone());
            }
        }
    }
    for layer in patch.states.values() {
        for (property, value) in layer {
            if let Some(value) = value {
                incoming.insert(property.clone(), value.clone());
            }
        }
    }

    let report = validate_style_map(&incoming);
    if let Some(problem) = report.errors().next() {
        return Err(TreeError::InvalidStyle(problem.message.clone()));
    }
    Ok(())
}

/// Outcome of a successfully applied mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationResult {
    /// Document version after the mutation landed
    pub version: u64,
}
