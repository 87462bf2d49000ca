//! Error types for the editor

use bined_common::DataError;
use thiserror::Error;

use crate::codec::CodecError;

/// Failure while executing a single operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("Invalid position {position} (document size {size})")]
    InvalidPosition { position: u64, size: u64 },

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Command at position {0} cannot be reverted")]
    NotInvertible(usize),

    #[error("Sync position is no longer in the undo history")]
    SyncUnreachable,

    #[error("Document is read-only")]
    ReadOnly,

    #[error("Edit mode does not allow changing the document size")]
    SizeChangeNotAllowed,

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CodecError> for EditorError {
    fn from(e: CodecError) -> Self {
        EditorError::Operation(OperationError::Codec(e))
    }
}

impl From<DataError> for EditorError {
    fn from(e: DataError) -> Self {
        EditorError::Operation(OperationError::Data(e))
    }
}
