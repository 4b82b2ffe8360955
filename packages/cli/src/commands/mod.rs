pub mod export;
pub mod import;
pub mod validate;

pub use export::{export, ExportArgs};
pub use import::{import, ImportArgs};
pub use validate::{validate, ValidateArgs};
