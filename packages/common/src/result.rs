use crate::error::DataError;

/// Result type for document access
pub type DataResult<T> = Result<T, DataError>;
