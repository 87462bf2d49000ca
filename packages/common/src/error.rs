use thiserror::Error;

/// Errors raised by document and caret collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("Position {position} is out of bounds (size {size})")]
    OutOfBounds { position: u64, size: u64 },

    #[error("Range {position}+{length} exceeds document size {size}")]
    RangeOutOfBounds { position: u64, length: u64, size: u64 },

    #[error("Document size limit exceeded")]
    Overflow,
}
