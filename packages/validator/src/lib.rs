//! # Pagecraft Validator
//!
//! Validation passes gating persistence and publishing. Validators return a
//! [`ValidationReport`] of collected errors and warnings instead of failing
//! fast, so callers can surface every problem at once and decide severity.
//! Validation never mutates its input.

mod component;
mod diagnostic;
mod project;
mod style;
mod tree;

pub use component::{validate_children, validate_component};
pub use diagnostic::{Diagnostic, DiagnosticLevel, ValidationReport};
pub use project::{
    validate_for_publish, validate_project, validate_publish_content, MAX_ASSET_BYTES, MAX_COMPONENTS,
    MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_PAGES,
};
pub use style::{validate_style_map, validate_styles, ALLOWED_PROPERTIES, MAX_VALUE_LENGTH};
pub use tree::{validate_flat_components, validate_tree};
