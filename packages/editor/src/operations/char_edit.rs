//! Character typing in the text preview.

use super::{overwrite_undo, BinaryDataOperation, EditTarget, OperationType, RemoveDataOperation};
use crate::charset::Charset;
use crate::errors::OperationError;
use crate::operation_trait::DataOperation;

/// Typing characters in insert mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertCharEditOperation {
    start_position: u64,
    charset: Charset,
    pending: Option<char>,
    position: u64,
    inserted: u64,
}

impl InsertCharEditOperation {
    pub fn new(position: u64, charset: Charset, ch: char) -> Self {
        Self {
            start_position: position,
            charset,
            pending: Some(ch),
            position,
            inserted: 0,
        }
    }

    pub fn caret(&self) -> u64 {
        self.position
    }

    pub(crate) fn append(
        &mut self,
        next: &InsertCharEditOperation,
        target: &mut EditTarget<'_>,
    ) -> Result<bool, OperationError> {
        if next.charset != self.charset || next.start_position != self.position {
            return Ok(false);
        }
        match next.pending {
            Some(ch) => {
                self.apply_char(ch, target)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn apply_char(&mut self, ch: char, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        let bytes = self.charset.encode_char(ch);
        target.check_range(self.position, 0)?;
        target.data.insert(self.position, &bytes)?;

        self.position += bytes.len() as u64;
        self.inserted += bytes.len() as u64;
        target.caret.set_caret_position(self.position, 0);
        Ok(())
    }
}

impl DataOperation for InsertCharEditOperation {
    fn operation_type(&self) -> OperationType {
        OperationType::EditData
    }

    fn execute(&mut self, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        match self.pending.take() {
            Some(ch) => self.apply_char(ch, target),
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
        (self.inserted > 0)
            .then(|| RemoveDataOperation::new(self.start_position, 0, self.inserted).into())
    }

    fn payload_size(&self) -> usize {
        0
    }

    fn name(&self) -> &'static str {
        "insert characters"
    }
}

/// Typing characters in overwrite mode
///
/// A character may encode to several bytes; exactly the bytes it covers are
/// captured, and whatever does not fit before the end is appended when
/// `expanding` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverwriteCharEditOperation {
    start_position: u64,
    charset: Charset,
    expanding: bool,
    pending: Option<char>,
    position: u64,
    originals: Vec<u8>,
    appended: u64,
}

impl OverwriteCharEditOperation {
    pub fn new(position: u64, charset: Charset, ch: char) -> Self {
        Self {
            start_position: position,
            charset,
            expanding: true,
            pending: Some(ch),
            position,
            originals: Vec::new(),
            appended: 0,
        }
    }

    pub fn in_place(mut self) -> Self {
        self.expanding = false;
        self
    }

    pub fn caret(&self) -> u64 {
        self.position
    }

    pub(crate) fn append(
        &mut self,
        next: &OverwriteCharEditOperation,
        target: &mut EditTarget<'_>,
    ) -> Result<bool, OperationError> {
        if next.charset != self.charset
            || next.expanding != self.expanding
            || next.start_position != self.position
        {
            return Ok(false);
        }
        match next.pending {
            Some(ch) => {
                self.apply_char(ch, target)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn apply_char(&mut self, ch: char, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        let bytes = self.charset.encode_char(ch);
        let size = target.size();
        if self.position > size {
            return Err(OperationError::InvalidPosition {
                position: self.position,
                size,
            });
        }

        let overlap = (bytes.len() as u64).min(size - self.position) as usize;
        if overlap < bytes.len() && !self.expanding {
            return Err(OperationError::InvalidPosition {
                position: self.position + bytes.len() as u64,
                size,
            });
        }

        if overlap > 0 {
            let previous = target.data.copy(self.position, overlap as u64)?;
            target.data.replace(self.position, &bytes[..overlap])?;
            self.originals.extend_from_slice(previous.as_slice());
        }
        if overlap < bytes.len() {
            target
                .data
                .insert(self.position + overlap as u64, &bytes[overlap..])?;
            self.appended += (bytes.len() - overlap) as u64;
        }

        self.position += bytes.len() as u64;
        target.caret.set_caret_position(self.position, 0);
        Ok(())
    }
}

impl DataOperation for OverwriteCharEditOperation {
    fn operation_type(&self) -> OperationType {
        OperationType::EditData
    }

    fn execute(&mut self, target: &mut EditTarget<'_>) -> Result<(), OperationError> {
        match self.pending.take() {
            Some(ch) => self.apply_char(ch, target),
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
        "overwrite characters"
    }
}

#[cfg(test)]
mod tests {
    use bined_common::{ByteArrayData, DefaultCodeAreaCaret};

    use super::*;
    use crate::operations::test_support::assert_round_trip;

    #[test]
    fn test_insert_chars_coalesce() {
        let mut data = ByteArrayData::from(b"ad".to_vec());
        let mut caret = DefaultCodeAreaCaret::new();
        let mut target = EditTarget::new(&mut data, &mut caret);

        let mut run: BinaryDataOperation = InsertCharEditOperation::new(1, Charset::Utf8, 'b').into();
        run.execute(&mut target).unwrap();
        let next = InsertCharEditOperation::new(2, Charset::Utf8, 'é').into();
        assert!(run.append_operation(&next, &mut target).unwrap());
        assert_eq!(target.data.to_vec().unwrap(), b"ab\xC3\xA9d".to_vec());

        let mut undo = run.undo_operation().unwrap();
        undo.execute(&mut target).unwrap();
        assert_eq!(data.as_slice(), b"ad");
    }

    #[test]
    fn test_overwrite_multibyte_char_captures_exact_range() {
        let mut data = ByteArrayData::from(b"xyz".to_vec());
        let mut caret = DefaultCodeAreaCaret::new();
        let mut target = EditTarget::new(&mut data, &mut caret);

        let mut op = OverwriteCharEditOperation::new(1, Charset::Utf8, '€');
        let undo = op.execute_with_undo(&mut target).unwrap();

        assert_eq!(op.payload_size(), 2);
        assert_eq!(target.data.to_vec().unwrap(), vec![b'x', 0xE2, 0x82, 0xAC]);
        assert!(undo.is_some());
    }

    #[test]
    fn test_overwrite_in_place_rejects_growth() {
        let mut data = ByteArrayData::from(b"x".to_vec());
        let mut caret = DefaultCodeAreaCaret::new();
        let mut target = EditTarget::new(&mut data, &mut caret);

        let mut op = OverwriteCharEditOperation::new(0, Charset::Utf16Le, 'A').in_place();
        assert!(op.execute(&mut target).is_err());
        assert_eq!(data.as_slice(), b"x");
    }

    #[test]
    fn test_char_edit_round_trips() {
        for charset in [Charset::Utf8, Charset::Latin1, Charset::Utf16Be] {
            assert_round_trip(b"abc", InsertCharEditOperation::new(3, charset, 'ß').into());
            assert_round_trip(b"abc", OverwriteCharEditOperation::new(2, charset, 'ß').into());
            assert_round_trip(b"", OverwriteCharEditOperation::new(0, charset, 'q').into());
        }
    }
}
