//! # Pagecraft Document Model
//!
//! The in-memory document model for the site builder: components forming a
//! tree, layered responsive styles, and the project aggregate.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: Component / ComponentTree / Project│
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: mutations + undo/redo + sessions    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ serializer / styling / validator            │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The tree is stored as an id-indexed map with `parent_id`/`order` as the
//! single source of truth; nested child views are derived, never stored.

pub mod component;
pub mod project;
pub mod registry;
pub mod styles;
pub mod tree;

pub use component::{
    ChildPolicy, Component, ComponentKind, Metadata, PropValue, Props, PropsPatch,
    ACTION_SENTINEL, DATE_SENTINEL, ORIGINAL_TYPE_KEY, PLACEHOLDER_KEY,
};
pub use project::{
    Asset, Page, Project, ProjectMetadata, ProjectSettings, SeoSettings, ThemeSettings,
    PROJECT_VERSION,
};
pub use registry::{ActionDescriptor, ComponentRegistry};
pub use styles::{Breakpoint, PseudoState, StyleLayers, StyleMap, StyleMapPatch, StylePatch};
pub use tree::{ComponentTree, TreeError, TreeFix};
