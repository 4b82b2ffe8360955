//! # Edit Session Management
//!
//! An EditSession represents one client editing an open document: the
//! active page, selection and hover state, the undo history, and the
//! project-scoped id generator for new components.
//!
//! All edits funnel through [`EditSession::apply`], which records the
//! undo step, bumps the document version, and prunes selection of any
//! ids the mutation removed.

use std::sync::Arc;

use pagecraft_common::IdGenerator;
use pagecraft_document::{
    Component, ComponentKind, ComponentRegistry, ComponentTree, PropsPatch, StylePatch,
};
use tracing::debug;

use crate::document::Document;
use crate::errors::EditorError;
use crate::mutations::{Mutation, MutationResult};
use crate::undo_stack::UndoStack;

/// Single edit session over an open document
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    /// Document being edited
    pub document: Document,

    registry: Arc<ComponentRegistry>,
    history: UndoStack,
    ids: IdGenerator,
    active_page: usize,
    selection: Vec<String>,
    hovered: Option<String>,
}

impl EditSession {
    /// Create a new edit session over a document
    pub fn new(id: impl Into<String>, document: Document, registry: Arc<ComponentRegistry>) -> Self {
        let ids = IdGenerator::new(&document.project().id);
        Self {
            id: id.into(),
            document,
            registry,
            history: UndoStack::new(),
            ids,
            active_page: 0,
            selection: Vec::new(),
            hovered: None,
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    // ---- Pages ----

    pub fn active_page(&self) -> usize {
        self.active_page
    }

    /// Switch the active page. History is per-session, not per-page, so
    /// switching does not clear it.
    pub fn set_active_page(&mut self, index: usize) -> Result<(), EditorError> {
        if index >= self.document.project().pages.len() {
            return Err(EditorError::PageOutOfRange(index));
        }
        self.active_page = index;
        self.selection.clear();
        self.hovered = None;
        Ok(())
    }

    /// Component tree of the active page
    pub fn tree(&self) -> &ComponentTree {
        &self.document.project().pages[self.active_page].tree
    }

    // ---- Mutations ----

    /// Apply a mutation as one undo step
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let page = self.active_page;
        let tree = &mut self.document.project_mut().pages[page].tree;
        self.history.apply(&mutation, tree)?;
        self.commit(&mutation)
    }

    /// Apply a mutation with a history description
    pub fn apply_described(
        &mut self,
        mutation: Mutation,
        description: impl Into<String>,
    ) -> Result<MutationResult, EditorError> {
        let page = self.active_page;
        let tree = &mut self.document.project_mut().pages[page].tree;
        self.history.apply_described(&mutation, tree, description)?;
        self.commit(&mutation)
    }

    fn commit(&mut self, mutation: &Mutation) -> Result<MutationResult, EditorError> {
        self.document.touch();
        self.prune_selection();
        debug!(session = %self.id, version = self.document.version, "applied {}", mutation.describe());
        Ok(MutationResult {
            version: self.document.version,
        })
    }

    // ---- Convenience operations ----

    /// Create and insert a fresh component, returning its id
    pub fn add_component(
        &mut self,
        kind: ComponentKind,
        name: impl Into<String>,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> Result<String, EditorError> {
        // Ids are unique per project, so skip ids already present on any
        // page (the generator restarts its counter after a reload)
        let mut id = self.ids.new_id();
        while self.id_in_use(&id) {
            id = self.ids.new_id();
        }

        let component = Component::new(id.clone(), kind, name);
        let description = format!("Add {}", kind.as_str());
        self.apply_described(
            Mutation::Insert {
                component,
                parent_id: parent_id.map(|s| s.to_string()),
                index,
            },
            description,
        )?;
        Ok(id)
    }

    /// Remove a component and its subtree. Unknown ids are a no-op
    /// returning `false` rather than an error.
    pub fn remove_component(&mut self, node_id: &str) -> Result<bool, EditorError> {
        if !self.tree().contains(node_id) {
            return Ok(false);
        }
        self.apply_described(
            Mutation::Remove {
                node_id: node_id.to_string(),
            },
            "Remove component",
        )?;
        Ok(true)
    }

    pub fn update_props(
        &mut self,
        node_id: &str,
        patch: PropsPatch,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::UpdateProps {
            node_id: node_id.to_string(),
            patch,
        })
    }

    pub fn update_styles(
        &mut self,
        node_id: &str,
        patch: StylePatch,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::UpdateStyles {
            node_id: node_id.to_string(),
            patch,
        })
    }

    pub fn move_component(
        &mut self,
        node_id: &str,
        x: f64,
        y: f64,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::SetPosition {
            node_id: node_id.to_string(),
            x,
            y,
        })
    }

    pub fn reparent(
        &mut self,
        node_id: &str,
        new_parent_id: Option<&str>,
        index: Option<usize>,
    ) -> Result<MutationResult, EditorError> {
        self.apply_described(
            Mutation::Reparent {
                node_id: node_id.to_string(),
                new_parent_id: new_parent_id.map(|s| s.to_string()),
                index,
            },
            "Move component",
        )
    }

    pub fn reorder(
        &mut self,
        node_id: &str,
        new_index: usize,
    ) -> Result<MutationResult, EditorError> {
        self.apply_described(
            Mutation::Reorder {
                node_id: node_id.to_string(),
                new_index,
            },
            "Reorder component",
        )
    }

    /// Deep-copy a subtree next to its source, returning the clone's root id
    pub fn duplicate(&mut self, node_id: &str) -> Result<String, EditorError> {
        let clone = loop {
            let tree = &self.document.project().pages[self.active_page].tree;
            let candidate = tree.clone_subtree(node_id, &mut self.ids)?;
            if candidate.iter().all(|c| !self.id_in_use(&c.id)) {
                break candidate;
            }
        };
        let clone_root = clone
            .first()
            .map(|c| c.id.clone())
            .ok_or_else(|| {
                pagecraft_document::TreeError::InvalidStructure("empty clone".to_string())
            })?;
        self.apply_described(
            Mutation::Duplicate {
                node_id: node_id.to_string(),
                clone,
            },
            "Duplicate component",
        )?;
        Ok(clone_root)
    }

    // ---- History ----

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let page = self.active_page;
        let tree = &mut self.document.project_mut().pages[page].tree;
        let undone = self.history.undo(tree)?;
        if undone {
            self.document.touch();
            self.prune_selection();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let page = self.active_page;
        let tree = &mut self.document.project_mut().pages[page].tree;
        let redone = self.history.redo(tree)?;
        if redone {
            self.document.touch();
            self.prune_selection();
        }
        Ok(redone)
    }

    pub fn begin_batch(&mut self, description: Option<String>) -> Result<(), EditorError> {
        Ok(self.history.begin_batch(description)?)
    }

    pub fn end_batch(&mut self) -> Result<(), EditorError> {
        Ok(self.history.end_batch()?)
    }

    /// Abort the open batch, rolling back everything applied inside it
    pub fn cancel_batch(&mut self) -> Result<(), EditorError> {
        let page = self.active_page;
        let tree = &mut self.document.project_mut().pages[page].tree;
        self.history.cancel_batch(tree)?;
        self.document.touch();
        self.prune_selection();
        Ok(())
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    // ---- Selection ----

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn select(&mut self, node_id: &str) -> Result<(), EditorError> {
        if !self.tree().contains(node_id) {
            return Err(pagecraft_document::TreeError::ComponentNotFound(
                node_id.to_string(),
            )
            .into());
        }
        self.selection = vec![node_id.to_string()];
        Ok(())
    }

    pub fn select_many(&mut self, node_ids: &[String]) -> Result<(), EditorError> {
        for id in node_ids {
            if !self.tree().contains(id) {
                return Err(
                    pagecraft_document::TreeError::ComponentNotFound(id.clone()).into(),
                );
            }
        }
        self.selection = node_ids.to_vec();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Hover state tolerates stale ids; it is advisory only
    pub fn set_hover(&mut self, node_id: Option<&str>) {
        self.hovered = node_id.map(|s| s.to_string());
    }

    /// Whether any page in the project already uses this component id
    fn id_in_use(&self, id: &str) -> bool {
        self.document
            .project()
            .pages
            .iter()
            .any(|page| page.tree.contains(id))
    }

    /// Drop selection/hover entries that no longer exist in the tree
    fn prune_selection(&mut self) {
        let tree = &self.document.project().pages[self.active_page].tree;
        self.selection.retain(|id| tree.contains(id));
        if let Some(hovered) = &self.hovered {
            if !tree.contains(hovered) {
                self.hovered = None;
            }
        }
    }
}
