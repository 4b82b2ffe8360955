use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("Invalid project file: {0}")]
    InvalidProjectFile(String),

    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Structural error: {0}")]
    Tree(#[from] pagecraft_document::TreeError),
}
