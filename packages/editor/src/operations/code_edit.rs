//! Digit-at-a-time editing in the code matrix.

use super::{
    overwrite_undo, BinaryDataOperation, CompoundOperation, EditTarget, ModifyDataOperation,
    OperationType, RemoveDataOperation,
};
use crate::codec::{check_digit, set_digit, trailing_value, CodeType};
use crate::errors::OperationError;
use crate::operation_trait::DataOperation;

/// Caret position after typing the digit at `code_offset`
fn advance(position: u64, code_offset: usize, code_type: CodeType) -> (u64, usize) {
    if code_offset + 1 >= code_type.max_digits() {
        (position + 1, 0)
    } else {
        (position, code_offset + 1)
    }
}

/// Typing digits in insert mode
///
/// Starting at code offset 0 inserts a fresh byte per digit group. Starting
/// mid-byte keeps the digits before the caret in the edited byte and moves
/// the digits from the caret on (the trailing remainder) into a new byte
/// right after it, so nothing typed over is lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertCodeEditOperation {
    start_position: u64,
    start_code_offset: usize,
    code_type: CodeType,
    pending: Option<u8>,
    position: u64,
    code_offset: usize,
    /// Bytes this run inserted, including a split-off trailing byte
    inserted: u64,
    /// Value of the edited byte before a mid-byte start
    original: Option<u8>,
}

impl InsertCodeEditOperation {
    pub fn new(position: u64, code_offset: usize, code_type: CodeType, digit: u8) -> Self {
        Self {
            start_position: position,
            start_code_offset: code_offset,
            code_type,
            pending: Some(digit),
            position,
            code_offset,
            inserted: 0,
            original: None,
        }
    }

    pub fn code_type(&self) -> CodeType {
        self.code_type
    }

    /// Where the next digit of this run goes
    pub fn caret(&self) -> (u64, usize) {
        (self.position, self.code_offset)
    }

    pub(crate) fn append(
        &mut self,
        next: &InsertCodeEditOperation,
        target: &mut EditTarget<'_>,
    ) -> Result<bool, OperationError> {
        if next.code_type != self.code_type
            || (next.start_position, next.start_code_offset) != self.caret()
        {
            return Ok(false);
        }
        match next.pending {
            Some(digit) => {
                self.apply_digit(digit, target)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn apply_digit(&mut self, digit: u8, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        let (position, offset) = self.caret();
        check_digit(digit, offset, self.code_type)?;

        if offset == 0 {
            let byte = set_digit(0, digit, 0, self.code_type)?;
            target.check_range(position, 0)?;
            target.data.insert(position, &[byte])?;
            self.inserted += 1;
        } else if position == self.start_position && self.original.is_none() && self.inserted == 0 {
            target.check_range(position, 1)?;
            let byte = target.data.get_byte(position)?;
            let rest = trailing_value(byte, offset, self.code_type);
            let value = set_digit(byte - rest, digit, offset, self.code_type)?;
            if rest > 0 {
                target.data.insert(position + 1, &[rest])?;
                self.inserted += 1;
            }
            target.data.set_byte(position, value)?;
            self.original = Some(byte);
        } else {
            let byte = target.data.get_byte(position)?;
            target
                .data
                .set_byte(position, set_digit(byte, digit, offset, self.code_type)?)?;
        }

        let (position, offset) = advance(position, offset, self.code_type);
        self.position = position;
        self.code_offset = offset;
        target.caret.set_caret_position(position, offset);
        Ok(())
    }
}

impl DataOperation for InsertCodeEditOperation {
    fn operation_type(&self) -> OperationType {
        OperationType::EditData
    }

    fn execute(&mut self, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        match self.pending.take() {
            Some(digit) => self.apply_digit(digit, target),
            None => Ok(()),
        }
    }

    fn execute_with_undo(
        &mut self,
        target: &mut EditTarget<'_>,
    ) -> Result<Option<BinaryDataOperation>, OperationError> {
        self.execute(target)?;
        Ok(self.undo_operation())
    }

    fn undo_operation(&self) -> Option<BinaryDataOperation> {
        match self.original {
            Some(original) => {
                let mut steps = vec![ModifyDataOperation::new(self.start_position, vec![original]).into()];
                if self.inserted > 0 {
                    steps.push(RemoveDataOperation::new(self.start_position + 1, 0, self.inserted).into());
                }
                CompoundOperation::collapse(steps)
            }
            None if self.inserted > 0 => Some(
                RemoveDataOperation::new(self.start_position, self.start_code_offset, self.inserted)
                    .into(),
            ),
            None => None,
        }
    }

    fn payload_size(&self) -> usize {
        usize::from(self.original.is_some())
    }

    fn name(&self) -> &'static str {
        "insert code"
    }
}

/// Typing digits in overwrite mode
///
/// Each byte's original value is captured the first time one of its digits
/// is replaced. With `expanding` set, typing at the end of the document
/// appends a zero byte to write into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverwriteCodeEditOperation {
    start_position: u64,
    start_code_offset: usize,
    code_type: CodeType,
    expanding: bool,
    pending: Option<u8>,
    position: u64,
    code_offset: usize,
    originals: Vec<u8>,
    appended: u64,
}

impl OverwriteCodeEditOperation {
    pub fn new(position: u64, code_offset: usize, code_type: CodeType, digit: u8) -> Self {
        Self {
            start_position: position,
            start_code_offset: code_offset,
            code_type,
            expanding: true,
            pending: Some(digit),
            position,
            code_offset,
            originals: Vec::new(),
            appended: 0,
        }
    }

    /// Forbid growing the document past its end
    pub fn in_place(mut self) -> Self {
        self.expanding = false;
        self
    }

    pub fn code_type(&self) -> CodeType {
        self.code_type
    }

    pub fn caret(&self) -> (u64, usize) {
        (self.position, self.code_offset)
    }

    pub(crate) fn append(
        &mut self,
        next: &OverwriteCodeEditOperation,
        target: &mut EditTarget<'_>,
    ) -> Result<bool, OperationError> {
        if next.code_type != self.code_type
            || next.expanding != self.expanding
            || (next.start_position, next.start_code_offset) != self.caret()
        {
            return Ok(false);
        }
        match next.pending {
            Some(digit) => {
                self.apply_digit(digit, target)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn apply_digit(&mut self, digit: u8, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        let (position, offset) = self.caret();
        check_digit(digit, offset, self.code_type)?;
        let touched = self.originals.len() as u64 + self.appended;

        if position - self.start_position >= touched {
            let size = target.size();
            if position < size {
                self.originals.push(target.data.get_byte(position)?);
            } else if position == size && self.expanding {
                target.data.insert(position, &[0])?;
                self.appended += 1;
            } else {
                return Err(OperationError::InvalidPosition { position, size });
            }
        }

        let byte = target.data.get_byte(position)?;
        target
            .data
            .set_byte(position, set_digit(byte, digit, offset, self.code_type)?)?;

        let (position, offset) = advance(position, offset, self.code_type);
        self.position = position;
        self.code_offset = offset;
        target.caret.set_caret_position(position, offset);
        Ok(())
    }
}

impl DataOperation for OverwriteCodeEditOperation {
    fn operation_type(&self) -> OperationType {
        OperationType::EditData
    }

    fn execute(&mut self, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        match self.pending.take() {
            Some(digit) => self.apply_digit(digit, target),
            None => Ok(()),
        }
    }

    fn execute_with_undo(
        &mut self,
        target: &mut EditTarget<'_>,
    ) -> Result<Option<BinaryDataOperation>, OperationError> {
        self.execute(target)?;
        Ok(self.undo_operation())
    }

    fn undo_operation(&self) -> Option<BinaryDataOperation> {
        overwrite_undo(self.start_position, &self.originals, self.appended)
    }

    fn payload_size(&self) -> usize {
        self.originals.len()
    }

    fn name(&self) -> &'static str {
        "overwrite code"
    }
}
