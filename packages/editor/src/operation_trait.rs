use crate::errors::OperationError;
use crate::operations::{BinaryDataOperation, EditTarget, OperationType};

/// Trait for data operations
///
/// Each operation type implements this trait to provide:
/// - Apply logic
/// - Apply logic that also yields the exact inverse for undo
/// - Accounting of the bytes captured for undo
pub trait DataOperation {
    fn operation_type(&self) -> OperationType;

    /// Apply this operation to the document
    ///
    /// Primitive operations apply their full payload on every call. Edit
    /// operations (typing and delete runs) apply their pending keystroke once
    /// and later calls change nothing; replaying a run goes through the
    /// primitive operation returned by `undo_operation` and its inverse.
    fn execute(&mut self, target: &mut EditTarget<'_>) -> Result<(), OperationError>;

    /// Apply this operation and return its inverse, or `None` if it changed nothing
    fn execute_with_undo(
        &mut self,
        target: &mut EditTarget<'_>,
    ) -> Result<Option<BinaryDataOperation>, OperationError>;

    /// Inverse of everything a live edit has applied so far
    fn undo_operation(&self) -> Option<BinaryDataOperation> {
        None
    }

    /// Bytes held by this operation
    fn payload_size(&self) -> usize;

    /// Get a debug name for this operation
    fn name(&self) -> &'static str;
}
