use serde::{Deserialize, Serialize};

use super::{BinaryDataOperation, EditTarget, InsertDataOperation, OperationType};
use crate::errors::OperationError;
use crate::operation_trait::DataOperation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeleteDirection {
    /// Remove the byte before the caret
    Backspace,
    /// Remove the byte at the caret
    Delete,
}

/// Run of single-byte deletions in one direction
///
/// Removed bytes are kept in document order so the whole run is restored by
/// one insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteEditOperation {
    direction: DeleteDirection,
    pending: bool,
    position: u64,
    removed: Vec<u8>,
}

impl DeleteEditOperation {
    pub fn new(position: u64, direction: DeleteDirection) -> Self {
        Self {
            direction,
            pending: true,
            position,
            removed: Vec::new(),
        }
    }

    pub fn direction(&self) -> DeleteDirection {
        self.direction
    }

    pub fn caret(&self) -> u64 {
        self.position
    }

    pub(crate) fn append(
        &mut self,
        next: &DeleteEditOperation,
        target: &mut EditTarget<'_>,
    ) -> Result<bool, OperationError> {
        if next.direction != self.direction || next.position != self.position || !next.pending {
            return Ok(false);
        }
        self.apply(target)?;
        Ok(true)
    }

    fn apply(&mut self, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        let size = target.size();
        match self.direction {
            DeleteDirection::Backspace => {
                if self.position == 0 || self.position > size {
                    return Err(OperationError::InvalidPosition {
                        position: self.position,
                        size,
                    });
                }
                let position = self.position - 1;
                let byte = target.data.get_byte(position)?;
                target.data.remove(position, 1)?;
                self.removed.insert(0, byte);
                self.position = position;
            }
            DeleteDirection::Delete => {
                if self.position >= size {
                    return Err(OperationError::InvalidPosition {
                        position: self.position,
                        size,
                    });
                }
                let byte = target.data.get_byte(self.position)?;
                target.data.remove(self.position, 1)?;
                self.removed.push(byte);
            }
        }
        target.caret.set_caret_position(self.position, 0);
        Ok(())
    }
}

impl DataOperation for DeleteEditOperation {
    fn operation_type(&self) -> OperationType {
        OperationType::EditData
    }

    fn execute(&mut self, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        if !self.pending {
            return Ok(());
        }
        self.pending = false;
        self.apply(target)
    }

    fn execute_with_undo(
        &mut self,
        target: &mut EditTarget<'_>,
    ) -> Result<Option<BinaryDataOperation>, OperationError> {
        self.execute(target)?;
        Ok(self.undo_operation())
    }

    fn undo_operation(&self) -> Option<BinaryDataOperation> {
        (!self.removed.is_empty())
            .then(|| InsertDataOperation::new(self.position, 0, self.removed.clone()).into())
    }

    fn payload_size(&self) -> usize {
        self.removed.len()
    }

    fn name(&self) -> &'static str {
        match self.direction {
            DeleteDirection::Backspace => "backspace",
            DeleteDirection::Delete => "delete",
        }
    }
}
