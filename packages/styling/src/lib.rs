//! # Pagecraft Styling Engine
//!
//! Resolves a component's final style across responsive breakpoints and
//! pseudo-states, generates the CSS rules for the injected stylesheet, and
//! caches generated rules by content hash.
//!
//! Breakpoints are mobile-first min-width queries: a value defined at a
//! smaller breakpoint applies until a larger one overrides it.

mod cache;
mod css;
mod resolve;

pub use cache::StyleSheetCache;
pub use css::{generate_styles, style_hash, CssDocument, CssRule, GeneratedStyles};
pub use resolve::{resolve_at, resolve_property, resolve_state};
