//! # Pagecraft Editor
//!
//! Core document editing engine for Pagecraft.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ serializer: JSON file ↔ Project             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Load/save project documents              │
//! │  - Apply mutations with validation          │
//! │  - Invertible undo/redo with batching       │
//! │  - Session state: selection, active page    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ styling: component styles → CSS             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree is source of truth**: rendered views and CSS are derived
//! 2. **Every mutation is invertible**: inverses are captured before
//!    applying, so undo never diffs trees
//! 3. **Validation before mutation**: failed operations leave the tree
//!    exactly as it was
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{Document, EditSession};
//! use pagecraft_document::{ComponentKind, ComponentRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ComponentRegistry::new());
//! let (doc, _report) = Document::load("site.pagecraft.json", &registry)?;
//! let mut session = EditSession::new("client-1", doc, registry);
//!
//! let id = session.add_component(ComponentKind::Heading, "Title", None, None)?;
//! session.undo()?;
//! session.redo()?;
//! session.document.save()?;
//! ```

mod document;
mod errors;
mod mutations;
mod session;
mod undo_stack;

pub use document::{Document, DocumentStorage};
pub use errors::EditorError;
pub use mutations::{MergeCategory, Mutation, MutationResult};
pub use session::EditSession;
pub use undo_stack::{HistoryError, MutationBatch, UndoStack, DEFAULT_MAX_LEVELS, MERGE_WINDOW_MS};

// Re-export common types for convenience
pub use pagecraft_document::{Component, ComponentKind, ComponentRegistry, ComponentTree, Project};
