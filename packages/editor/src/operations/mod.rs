//! # Data Operations
//!
//! Self-contained, invertible mutations of a byte document.
//!
//! ## Taxonomy
//!
//! - **Insert / Remove / Modify**: primitive mutations. Each one captures
//!   what it needs (the removed or overwritten bytes) so its inverse can be
//!   built when it is executed.
//! - **Compound**: an ordered group. Children run in order; the inverse runs
//!   the child inverses last-to-first.
//! - **Edit operations**: one typing run (digits, characters, deletes). They
//!   apply their first keystroke on execution, absorb following keystrokes
//!   through [`BinaryDataOperation::append_operation`], and express their
//!   inverse with primitive operations.
//!
//! ## Borrowing
//!
//! Operations never keep a reference to the document. Every call receives an
//! [`EditTarget`] that borrows the document and caret for that call only.

mod basic;
mod char_edit;
mod code_edit;
mod delete_edit;

pub use basic::{CompoundOperation, InsertDataOperation, ModifyDataOperation, RemoveDataOperation};
pub use char_edit::{InsertCharEditOperation, OverwriteCharEditOperation};
pub use code_edit::{InsertCodeEditOperation, OverwriteCodeEditOperation};
pub use delete_edit::{DeleteDirection, DeleteEditOperation};

use bined_common::{CaretCapability, EditableBinaryData};
use serde::{Deserialize, Serialize};

use crate::errors::OperationError;
use crate::operation_trait::DataOperation;

/// Coarse classification of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    Insert,
    Remove,
    Modify,
    EditData,
    Compound,
}

/// Document and caret borrowed for the duration of one operation call
pub struct EditTarget<'a> {
    pub data: &'a mut dyn EditableBinaryData,
    pub caret: &'a mut dyn CaretCapability,
}

impl<'a> EditTarget<'a> {
    pub fn new(data: &'a mut dyn EditableBinaryData, caret: &'a mut dyn CaretCapability) -> Self {
        Self { data, caret }
    }

    pub fn size(&self) -> u64 {
        self.data.size()
    }

    /// Fail unless `position..position + length` lies inside the document
    pub(crate) fn check_range(&self, position: u64, length: u64) -> Result<(), OperationError> {
        let size = self.size();
        match position.checked_add(length) {
            Some(end) if end <= size => Ok(()),
            _ => Err(OperationError::InvalidPosition { position, size }),
        }
    }
}

/// Every operation the engine can execute, undo or coalesce
#[derive(Debug, Clone, PartialEq)]
pub enum BinaryDataOperation {
    Insert(InsertDataOperation),
    Remove(RemoveDataOperation),
    Modify(ModifyDataOperation),
    Compound(CompoundOperation),
    InsertCode(InsertCodeEditOperation),
    OverwriteCode(OverwriteCodeEditOperation),
    InsertChar(InsertCharEditOperation),
    OverwriteChar(OverwriteCharEditOperation),
    DeleteCode(DeleteEditOperation),
    DeleteChar(DeleteEditOperation),
}

impl BinaryDataOperation {
    fn as_operation(&self) -> &dyn DataOperation {
        match self {
            BinaryDataOperation::Insert(op) => op,
            BinaryDataOperation::Remove(op) => op,
            BinaryDataOperation::Modify(op) => op,
            BinaryDataOperation::Compound(op) => op,
            BinaryDataOperation::InsertCode(op) => op,
            BinaryDataOperation::OverwriteCode(op) => op,
            BinaryDataOperation::InsertChar(op) => op,
            BinaryDataOperation::OverwriteChar(op) => op,
            BinaryDataOperation::DeleteCode(op) | BinaryDataOperation::DeleteChar(op) => op,
        }
    }

    fn as_operation_mut(&mut self) -> &mut dyn DataOperation {
        match self {
            BinaryDataOperation::Insert(op) => op,
            BinaryDataOperation::Remove(op) => op,
            BinaryDataOperation::Modify(op) => op,
            BinaryDataOperation::Compound(op) => op,
            BinaryDataOperation::InsertCode(op) => op,
            BinaryDataOperation::OverwriteCode(op) => op,
            BinaryDataOperation::InsertChar(op) => op,
            BinaryDataOperation::OverwriteChar(op) => op,
            BinaryDataOperation::DeleteCode(op) | BinaryDataOperation::DeleteChar(op) => op,
        }
    }

    pub fn operation_type(&self) -> OperationType {
        self.as_operation().operation_type()
    }

    pub fn execute(&mut self, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        self.as_operation_mut().execute(target)
    }

    pub fn execute_with_undo(
        &mut self,
        target: &mut EditTarget<'_>,
    ) -> Result<Option<BinaryDataOperation>, OperationError> {
        self.as_operation_mut().execute_with_undo(target)
    }

    pub fn undo_operation(&self) -> Option<BinaryDataOperation> {
        self.as_operation().undo_operation()
    }

    pub fn payload_size(&self) -> usize {
        self.as_operation().payload_size()
    }

    pub fn name(&self) -> &'static str {
        self.as_operation().name()
    }

    /// Whether this operation can absorb following keystrokes
    pub fn is_appendable(&self) -> bool {
        self.operation_type() == OperationType::EditData
    }

    /// Absorb `other` into this run
    ///
    /// Succeeds only for the same kind of edit, with the same code type,
    /// charset or direction, starting exactly where this run left the caret.
    /// On success the keystroke carried by `other` has been applied to the
    /// document and `other` can be dropped. `Ok(false)` means "start a new
    /// step" and leaves the document untouched.
    pub fn append_operation(
        &mut self,
        other: &BinaryDataOperation,
        target: &mut EditTarget<'_>,
    ) -> Result<bool, OperationError> {
        match (self, other) {
            (BinaryDataOperation::InsertCode(run), BinaryDataOperation::InsertCode(next)) => {
                run.append(next, target)
            }
            (BinaryDataOperation::OverwriteCode(run), BinaryDataOperation::OverwriteCode(next)) => {
                run.append(next, target)
            }
            (BinaryDataOperation::InsertChar(run), BinaryDataOperation::InsertChar(next)) => {
                run.append(next, target)
            }
            (BinaryDataOperation::OverwriteChar(run), BinaryDataOperation::OverwriteChar(next)) => {
                run.append(next, target)
            }
            (BinaryDataOperation::DeleteCode(run), BinaryDataOperation::DeleteCode(next))
            | (BinaryDataOperation::DeleteChar(run), BinaryDataOperation::DeleteChar(next)) => {
                run.append(next, target)
            }
            _ => Ok(false),
        }
    }

    /// Release the operation and any bytes it captured
    pub fn dispose(self) {
        tracing::trace!(
            operation = self.name(),
            payload = self.payload_size(),
            "disposing operation"
        );
    }
}

impl From<InsertDataOperation> for BinaryDataOperation {
    fn from(op: InsertDataOperation) -> Self {
        BinaryDataOperation::Insert(op)
    }
}

impl From<RemoveDataOperation> for BinaryDataOperation {
    fn from(op: RemoveDataOperation) -> Self {
        BinaryDataOperation::Remove(op)
    }
}

impl From<ModifyDataOperation> for BinaryDataOperation {
    fn from(op: ModifyDataOperation) -> Self {
        BinaryDataOperation::Modify(op)
    }
}

impl From<CompoundOperation> for BinaryDataOperation {
    fn from(op: CompoundOperation) -> Self {
        BinaryDataOperation::Compound(op)
    }
}

impl From<InsertCodeEditOperation> for BinaryDataOperation {
    fn from(op: InsertCodeEditOperation) -> Self {
        BinaryDataOperation::InsertCode(op)
    }
}

impl From<OverwriteCodeEditOperation> for BinaryDataOperation {
    fn from(op: OverwriteCodeEditOperation) -> Self {
        BinaryDataOperation::OverwriteCode(op)
    }
}

impl From<InsertCharEditOperation> for BinaryDataOperation {
    fn from(op: InsertCharEditOperation) -> Self {
        BinaryDataOperation::InsertChar(op)
    }
}

impl From<OverwriteCharEditOperation> for BinaryDataOperation {
    fn from(op: OverwriteCharEditOperation) -> Self {
        BinaryDataOperation::OverwriteChar(op)
    }
}

/// Inverse of an in-place overwrite that may have grown the document
///
/// `originals` are the bytes that were overwritten starting at `start`;
/// `appended` bytes were added right after them.
pub(crate) fn overwrite_undo(
    start: u64,
    originals: &[u8],
    appended: u64,
) -> Option<BinaryDataOperation> {
    let mut steps = Vec::new();
    if !originals.is_empty() {
        steps.push(ModifyDataOperation::new(start, originals.to_vec()).into());
    }
    if appended > 0 {
        steps.push(RemoveDataOperation::new(start + originals.len() as u64, 0, appended).into());
    }
    CompoundOperation::collapse(steps)
}

#[cfg(test)]
pub(crate) mod test_support {
    use bined_common::{ByteArrayData, DefaultCodeAreaCaret};

    use super::*;

    /// Execute `op`, then its inverse, and check the document is back to `initial`
    pub fn assert_round_trip(initial: &[u8], mut op: BinaryDataOperation) {
        let mut data = ByteArrayData::from(initial.to_vec());
        let mut caret = DefaultCodeAreaCaret::new();
        let mut target = EditTarget::new(&mut data, &mut caret);

        let undo = op.execute_with_undo(&mut target).unwrap();
        if let Some(mut undo) = undo {
            undo.execute(&mut target).unwrap();
        }
        assert_eq!(data.as_slice(), initial);
    }
}
