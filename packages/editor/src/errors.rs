use pagecraft_document::TreeError;
use pagecraft_serializer::SerializeError;
use thiserror::Error;

use crate::undo_stack::HistoryError;

/// Errors surfaced by editing sessions and document storage
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] TreeError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document is not backed by a file")]
    NotFileBacked,

    #[error("Page index out of range: {0}")]
    PageOutOfRange(usize),
}
