//! # Pagecraft Serializer
//!
//! Lossless, versioned conversion between the live component tree and the
//! flat, storage-safe JSON representation.
//!
//! Round-trip law: deserializing a serialized project yields a tree with
//! the same component set, parent/child structure, order, props, and
//! styles as the original, for any project that was valid to begin with.

mod component;
mod error;
mod export;
mod project;

pub use component::{
    build_component_hierarchy, deserialize_component, flatten_serialized,
    serialize_component, serialize_flat, SerializedComponent,
};
pub use error::SerializeError;
pub use export::{export_project, import_project, ProjectExport, EXPORT_VERSION};
pub use project::{
    deserialize_project, project_from_json, project_to_json, serialize_project,
    SerializedPage, SerializedProject,
};
