use serde::{Deserialize, Serialize};

use super::{BinaryDataOperation, EditTarget, OperationType};
use crate::errors::OperationError;
use crate::operation_trait::DataOperation;

/// Insert bytes at a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertDataOperation {
    pub position: u64,
    /// Caret code offset restored when the insert is undone
    pub code_offset: usize,
    pub data: Vec<u8>,
}

impl InsertDataOperation {
    pub fn new(position: u64, code_offset: usize, data: Vec<u8>) -> Self {
        Self {
            position,
            code_offset,
            data,
        }
    }
}

impl DataOperation for InsertDataOperation {
    fn operation_type(&self) -> OperationType {
        OperationType::Insert
    }

    fn execute(&mut self, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        target.check_range(self.position, 0)?;
        target.data.insert(self.position, &self.data)?;
        target
            .caret
            .set_caret_position(self.position + self.data.len() as u64, 0);
        Ok(())
    }

    fn execute_with_undo(
        &mut self,
        target: &mut EditTarget<'_>,
    ) -> Result<Option<BinaryDataOperation>, OperationError> {
        self.execute(target)?;
        if self.data.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            RemoveDataOperation::new(self.position, self.code_offset, self.data.len() as u64).into(),
        ))
    }

    fn payload_size(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &'static str {
        "insert data"
    }
}

/// Remove a byte range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveDataOperation {
    pub position: u64,
    pub code_offset: usize,
    pub length: u64,
}

impl RemoveDataOperation {
    pub fn new(position: u64, code_offset: usize, length: u64) -> Self {
        Self {
            position,
            code_offset,
            length,
        }
    }
}

impl DataOperation for RemoveDataOperation {
    fn operation_type(&self) -> OperationType {
        OperationType::Remove
    }

    fn execute(&mut self, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        target.check_range(self.position, self.length)?;
        target.data.remove(self.position, self.length)?;
        target
            .caret
            .set_caret_position(self.position, self.code_offset);
        Ok(())
    }

    fn execute_with_undo(
        &mut self,
        target: &mut EditTarget<'_>,
    ) -> Result<Option<BinaryDataOperation>, OperationError> {
        target.check_range(self.position, self.length)?;
        let removed = target.data.copy(self.position, self.length)?;
        self.execute(target)?;
        if self.length == 0 {
            return Ok(None);
        }
        Ok(Some(
            InsertDataOperation::new(self.position, self.code_offset, removed.into_inner()).into(),
        ))
    }

    fn payload_size(&self) -> usize {
        0
    }

    fn name(&self) -> &'static str {
        "remove data"
    }
}

/// Overwrite an existing byte range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyDataOperation {
    pub position: u64,
    pub data: Vec<u8>,
}

impl ModifyDataOperation {
    pub fn new(position: u64, data: Vec<u8>) -> Self {
        Self { position, data }
    }
}

impl DataOperation for ModifyDataOperation {
    fn operation_type(&self) -> OperationType {
        OperationType::Modify
    }

    fn execute(&mut self, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        target.check_range(self.position, self.data.len() as u64)?;
        target.data.replace(self.position, &self.data)?;
        Ok(())
    }

    fn execute_with_undo(
        &mut self,
        target: &mut EditTarget<'_>,
    ) -> Result<Option<BinaryDataOperation>, OperationError> {
        target.check_range(self.position, self.data.len() as u64)?;
        let previous = target.data.copy(self.position, self.data.len() as u64)?;
        self.execute(target)?;
        if self.data.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            ModifyDataOperation::new(self.position, previous.into_inner()).into(),
        ))
    }

    fn payload_size(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &'static str {
        "modify data"
    }
}

/// Ordered group of operations executed and undone as one unit
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundOperation {
    pub operations: Vec<BinaryDataOperation>,
}

impl CompoundOperation {
    pub fn new(operations: Vec<BinaryDataOperation>) -> Self {
        Self { operations }
    }

    /// `None` for no steps, the step itself for one, a compound otherwise
    pub fn collapse(mut operations: Vec<BinaryDataOperation>) -> Option<BinaryDataOperation> {
        match operations.len() {
            0 => None,
            1 => operations.pop(),
            _ => Some(CompoundOperation::new(operations).into()),
        }
    }

    pub fn push(&mut self, operation: BinaryDataOperation) {
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl DataOperation for CompoundOperation {
    fn operation_type(&self) -> OperationType {
        OperationType::Compound
    }

    fn execute(&mut self, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        for operation in &mut self.operations {
            operation.execute(target)?;
        }
        Ok(())
    }

    fn execute_with_undo(
        &mut self,
        target: &mut EditTarget<'_>,
    ) -> Result<Option<BinaryDataOperation>, OperationError> {
        let mut inverses = Vec::with_capacity(self.operations.len());
        for operation in &mut self.operations {
            match operation.execute_with_undo(target) {
                Ok(Some(inverse)) => inverses.push(inverse),
                Ok(None) => {}
                Err(err) => {
                    // Roll back the children that already ran
                    for mut inverse in inverses.into_iter().rev() {
                        if let Err(rollback) = inverse.execute(target) {
                            tracing::error!("compound rollback failed: {}", rollback);
                        }
                    }
                    return Err(err);
                }
            }
        }
        if inverses.is_empty() {
            return Ok(None);
        }
        inverses.reverse();
        Ok(Some(CompoundOperation::new(inverses).into()))
    }

    fn payload_size(&self) -> usize {
        self.operations
            .iter()
            .map(BinaryDataOperation::payload_size)
            .sum()
    }

    fn name(&self) -> &'static str {
        "compound"
    }
}
