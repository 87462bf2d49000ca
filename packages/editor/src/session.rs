//! # Edit Session
//!
//! Turns user intents (a typed digit or character, backspace, delete, paste)
//! into operations and records them on the undo stack.
//!
//! Consecutive keystrokes of the same kind form a run: the session tries to
//! append each keystroke to the live edit on top of the undo stack and only
//! records a new step when that fails. Moving the caret, switching section,
//! code type, charset or mode, undo/redo, paste and saving all end the run
//! (a sequence break).
//!
//! ```text
//! type '4' '1'   → one step  [41]
//! move caret     → sequence break
//! type '2'       → new step  [41 20]
//! ```

use bined_common::{
    BinaryData, CaretCapability, CodeAreaSection, DefaultCodeAreaCaret, EditableBinaryData,
    SelectionCapability, SelectionRange,
};
use tracing::{debug, trace};

use crate::charset::Charset;
use crate::codec::{digit_value, is_valid_digit_key, CodeCharactersCase, CodeType, CodecError};
use crate::config::{EditMode, EditOperation, EditorConfig};
use crate::errors::{EditorError, OperationError};
use crate::events::{DataChangedListener, ListenerId, Listeners, UndoListener};
use crate::operations::{
    BinaryDataOperation, DeleteDirection, DeleteEditOperation, EditTarget,
    InsertCharEditOperation, InsertCodeEditOperation, InsertDataOperation, ModifyDataOperation,
    OverwriteCharEditOperation, OverwriteCodeEditOperation, RemoveDataOperation,
};
use crate::undo_stack::UndoStack;

/// Interactive editing state for one document
pub struct EditSession<D, C = DefaultCodeAreaCaret> {
    data: D,
    caret: C,
    undo_stack: UndoStack,
    config: EditorConfig,

    /// The top undo command is a live edit the next keystroke may extend
    in_run: bool,

    /// Bumped on every committed change of the document
    version: u64,

    listeners: Listeners<dyn DataChangedListener>,
}

impl<D: EditableBinaryData> EditSession<D> {
    pub fn new(data: D) -> Self {
        Self::with_config(data, EditorConfig::default())
    }

    pub fn with_config(data: D, config: EditorConfig) -> Self {
        Self::with_caret(data, DefaultCodeAreaCaret::new(), config)
    }
}

impl<D, C> EditSession<D, C>
where
    D: EditableBinaryData,
    C: CaretCapability + SelectionCapability,
{
    pub fn with_caret(data: D, caret: C, config: EditorConfig) -> Self {
        Self {
            data,
            caret,
            undo_stack: UndoStack::with_limits(config.undo),
            config,
            in_run: false,
            version: 0,
            listeners: Listeners::new(),
        }
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn caret(&self) -> &C {
        &self.caret
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo_stack
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the next keystroke may extend the current undo step
    pub fn has_open_run(&self) -> bool {
        self.in_run
    }

    pub fn into_parts(self) -> (D, C) {
        (self.data, self.caret)
    }

    pub fn add_data_changed_listener(&mut self, listener: Box<dyn DataChangedListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_data_changed_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn add_undo_listener(&mut self, listener: Box<dyn UndoListener>) -> ListenerId {
        self.undo_stack.add_listener(listener)
    }

    pub fn remove_undo_listener(&mut self, id: ListenerId) -> bool {
        self.undo_stack.remove_listener(id)
    }

    // ---- settings (each one ends the current run) ----

    pub fn set_code_type(&mut self, code_type: CodeType) {
        self.sequence_break();
        self.config.code_type = code_type;

        let caret = self.caret.caret_position();
        if caret.code_offset >= code_type.max_digits() {
            self.caret.set_caret_position(caret.data_position, 0);
        }
    }

    pub fn set_code_characters_case(&mut self, case: CodeCharactersCase) {
        self.config.code_characters_case = case;
    }

    pub fn set_charset(&mut self, charset: Charset) {
        self.sequence_break();
        self.config.charset = charset;
    }

    pub fn set_edit_operation(&mut self, edit_operation: EditOperation) {
        self.sequence_break();
        self.config.edit_operation = edit_operation;
    }

    /// Switch between insert and overwrite
    pub fn toggle_edit_operation(&mut self) {
        let next = match self.config.edit_operation {
            EditOperation::Insert => EditOperation::Overwrite,
            EditOperation::Overwrite => EditOperation::Insert,
        };
        self.set_edit_operation(next);
    }

    pub fn set_edit_mode(&mut self, edit_mode: EditMode) {
        self.sequence_break();
        self.config.edit_mode = edit_mode;
    }

    /// Operation typing actually performs; in-place mode never inserts
    pub fn effective_edit_operation(&self) -> EditOperation {
        match self.config.edit_mode {
            EditMode::InPlace => EditOperation::Overwrite,
            _ => self.config.edit_operation,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.config.edit_mode != EditMode::ReadOnly
    }

    // ---- caret and selection ----

    /// Move the caret, dropping any selection
    pub fn move_caret(&mut self, position: u64, code_offset: usize) -> Result<(), EditorError> {
        let size = self.data.size();
        if position > size {
            return Err(OperationError::InvalidPosition { position, size }.into());
        }
        if code_offset >= self.config.code_type.max_digits() {
            return Err(CodecError::InvalidCodeOffset {
                offset: code_offset,
                code_type: self.config.code_type,
            }
            .into());
        }

        self.sequence_break();
        self.caret.clear_selection();
        self.caret.set_caret_position(position, code_offset);
        Ok(())
    }

    pub fn set_active_section(&mut self, section: CodeAreaSection) {
        self.sequence_break();
        self.caret.set_active_section(section);
    }

    pub fn set_selection(&mut self, selection: Option<SelectionRange>) -> Result<(), EditorError> {
        if let Some(range) = selection {
            let size = self.data.size();
            if range.end() > size {
                return Err(OperationError::InvalidPosition {
                    position: range.end(),
                    size,
                }
                .into());
            }
        }
        self.sequence_break();
        self.caret.set_selection(selection);
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.sequence_break();
        let size = self.data.size();
        self.caret.set_selection(Some(SelectionRange::new(0, size)));
    }

    pub fn copy_selection(&self) -> Result<Option<Vec<u8>>, EditorError> {
        match self.caret.selection() {
            Some(range) => Ok(Some(self.data.copy(range.start(), range.len())?.into_inner())),
            None => Ok(None),
        }
    }

    // ---- typing ----

    /// Handle a key typed in the code matrix
    ///
    /// Returns `Ok(false)` when the key is not a digit that may be typed at
    /// the caret; the document is left untouched in that case.
    pub fn input_code_char(&mut self, ch: char) -> Result<bool, EditorError> {
        self.ensure_editable()?;
        let code_type = self.config.code_type;
        let caret = self.caret.caret_position();
        if caret.section != CodeAreaSection::CodeMatrix {
            return Ok(false);
        }

        let offset = if self.caret.has_selection() {
            0
        } else {
            caret.code_offset
        };
        if !is_valid_digit_key(ch, offset, code_type) {
            trace!(%ch, offset, "rejected code key");
            return Ok(false);
        }
        match digit_value(ch, code_type) {
            Some(value) => {
                self.input_code_digit(value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Type one digit value at the caret in the code matrix
    pub fn input_code_digit(&mut self, value: u8) -> Result<(), EditorError> {
        self.ensure_editable()?;
        self.prepare_typing()?;

        let caret = self.caret.caret_position();
        let code_type = self.config.code_type;
        let operation = match self.effective_edit_operation() {
            EditOperation::Insert => {
                InsertCodeEditOperation::new(caret.data_position, caret.code_offset, code_type, value)
                    .into()
            }
            EditOperation::Overwrite => {
                let op = OverwriteCodeEditOperation::new(
                    caret.data_position,
                    caret.code_offset,
                    code_type,
                    value,
                );
                if self.config.edit_mode == EditMode::InPlace {
                    op.in_place().into()
                } else {
                    op.into()
                }
            }
        };
        self.commit(operation)
    }

    /// Type one character in the text preview
    pub fn input_char(&mut self, ch: char) -> Result<(), EditorError> {
        self.ensure_editable()?;
        self.prepare_typing()?;

        let position = self.caret.caret_position().data_position;
        let charset = self.config.charset;
        let operation = match self.effective_edit_operation() {
            EditOperation::Insert => InsertCharEditOperation::new(position, charset, ch).into(),
            EditOperation::Overwrite => {
                let op = OverwriteCharEditOperation::new(position, charset, ch);
                if self.config.edit_mode == EditMode::InPlace {
                    op.in_place().into()
                } else {
                    op.into()
                }
            }
        };
        self.commit(operation)
    }

    // ---- deleting ----

    pub fn can_backspace(&self) -> bool {
        self.is_resizable() && (self.caret.has_selection() || self.backspace_position() > 0)
    }

    pub fn can_delete(&self) -> bool {
        self.is_resizable()
            && (self.caret.has_selection()
                || self.caret.caret_position().data_position < self.data.size())
    }

    /// Remove the byte before the caret, or the selection
    pub fn backspace(&mut self) -> Result<(), EditorError> {
        self.ensure_resizable()?;
        if self.delete_selection()? {
            return Ok(());
        }
        let operation = self.delete_operation(self.backspace_position(), DeleteDirection::Backspace);
        self.commit(operation)
    }

    /// Remove the byte at the caret, or the selection
    pub fn delete(&mut self) -> Result<(), EditorError> {
        self.ensure_resizable()?;
        if self.delete_selection()? {
            return Ok(());
        }
        let position = self.caret.caret_position().data_position;
        let operation = self.delete_operation(position, DeleteDirection::Delete);
        self.commit(operation)
    }

    /// Remove the selected bytes as one undo step
    ///
    /// Returns `Ok(false)` when nothing is selected.
    pub fn delete_selection(&mut self) -> Result<bool, EditorError> {
        self.ensure_resizable()?;
        let Some(range) = self.caret.selection() else {
            return Ok(false);
        };

        self.sequence_break();
        let operation = RemoveDataOperation::new(range.start(), 0, range.len()).into();
        let (stack, mut target) = self.parts();
        stack.execute(operation, &mut target)?;
        self.caret.clear_selection();
        debug!(start = range.start(), length = range.len(), "deleted selection");
        self.data_changed();
        Ok(true)
    }

    // ---- clipboard ----

    /// Insert or overwrite `bytes` at the caret as one undo step
    ///
    /// A selection is replaced. In in-place mode nothing past the end of the
    /// document is written and the pasted bytes are truncated instead.
    pub fn paste(&mut self, bytes: &[u8]) -> Result<(), EditorError> {
        self.ensure_editable()?;
        if bytes.is_empty() {
            return Ok(());
        }
        self.sequence_break();

        let in_place = self.config.edit_mode == EditMode::InPlace;
        let edit_operation = self.effective_edit_operation();
        let selection = self.caret.selection();

        self.undo_stack.begin_batch();
        self.undo_stack.set_batch_description("paste");
        let result = self.paste_steps(bytes, selection, edit_operation, in_place);
        let recorded = self.undo_stack.end_batch();
        self.caret.clear_selection();
        // Steps applied before a failure stay in the document and the log
        if recorded {
            self.data_changed();
        }

        let written = result?;
        debug!(length = bytes.len(), written, "pasted");
        Ok(())
    }

    fn paste_steps(
        &mut self,
        bytes: &[u8],
        selection: Option<SelectionRange>,
        edit_operation: EditOperation,
        in_place: bool,
    ) -> Result<u64, EditorError> {
        let mut position = self.caret.caret_position().data_position;
        if let Some(range) = selection {
            position = range.start();
            if !in_place {
                let operation = RemoveDataOperation::new(range.start(), 0, range.len()).into();
                let (stack, mut target) = self.parts();
                stack.execute(operation, &mut target)?;
            }
        }

        let length = bytes.len() as u64;
        let written = match edit_operation {
            EditOperation::Insert => {
                let operation = InsertDataOperation::new(position, 0, bytes.to_vec()).into();
                let (stack, mut target) = self.parts();
                stack.execute(operation, &mut target)?;
                length
            }
            EditOperation::Overwrite => {
                let available = self.data.size().saturating_sub(position);
                let head = length.min(available);
                if head > 0 {
                    let operation =
                        ModifyDataOperation::new(position, bytes[..head as usize].to_vec()).into();
                    let (stack, mut target) = self.parts();
                    stack.execute(operation, &mut target)?;
                }
                let tail = if in_place { 0 } else { length - head };
                if tail > 0 {
                    let operation =
                        InsertDataOperation::new(position + head, 0, bytes[head as usize..].to_vec())
                            .into();
                    let (stack, mut target) = self.parts();
                    stack.execute(operation, &mut target)?;
                }
                head + tail
            }
        };

        self.caret.set_caret_position(position + written, 0);
        Ok(written)
    }

    // ---- history ----

    pub fn can_undo(&self) -> bool {
        self.is_editable() && self.undo_stack.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.is_editable() && self.undo_stack.can_redo()
    }

    pub fn undo(&mut self) -> Result<(), EditorError> {
        self.ensure_editable()?;
        self.sequence_break();
        self.caret.clear_selection();
        let (stack, mut target) = self.parts();
        stack.undo(&mut target)?;
        self.data_changed();
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), EditorError> {
        self.ensure_editable()?;
        self.sequence_break();
        self.caret.clear_selection();
        let (stack, mut target) = self.parts();
        stack.redo(&mut target)?;
        self.data_changed();
        Ok(())
    }

    /// Whether the document differs from the last saved state
    pub fn is_modified(&self) -> bool {
        self.undo_stack.is_modified()
    }

    /// Record the current state as saved
    pub fn mark_saved(&mut self) {
        self.sequence_break();
        self.undo_stack.set_sync_position();
    }

    /// Undo or redo back to the last saved state
    pub fn revert_to_saved(&mut self) -> Result<(), EditorError> {
        self.ensure_editable()?;
        self.sequence_break();
        self.caret.clear_selection();
        let before = self.undo_stack.command_position();
        let (stack, mut target) = self.parts();
        let result = stack.perform_sync(&mut target);
        if self.undo_stack.command_position() != before {
            self.data_changed();
        }
        result
    }

    pub fn clear_history(&mut self) {
        self.sequence_break();
        self.undo_stack.clear();
    }

    /// End the current typing run; the next keystroke starts a new step
    pub fn sequence_break(&mut self) {
        if self.in_run {
            trace!("sequence break");
        }
        self.in_run = false;
    }

    // ---- internals ----

    fn parts(&mut self) -> (&mut UndoStack, EditTarget<'_>) {
        (
            &mut self.undo_stack,
            EditTarget::new(&mut self.data, &mut self.caret),
        )
    }

    /// Append `operation` to the live run or record it as a new step
    fn commit(&mut self, operation: BinaryDataOperation) -> Result<(), EditorError> {
        let in_run = self.in_run;
        let appendable = operation.is_appendable();
        let (stack, mut target) = self.parts();

        let outcome = if in_run {
            match stack.append_to_last(&operation, &mut target) {
                Ok(true) => {
                    operation.dispose();
                    Ok(())
                }
                Ok(false) => stack.execute(operation, &mut target),
                Err(err) => Err(err),
            }
        } else {
            stack.execute(operation, &mut target)
        };

        match outcome {
            Ok(()) => {
                self.in_run = appendable;
                self.data_changed();
                Ok(())
            }
            Err(err) => {
                debug!(error = %err, "edit rejected");
                self.in_run = false;
                Err(err)
            }
        }
    }

    /// Deal with a selection before a keystroke is applied
    ///
    /// Insert typing replaces the selection; overwrite typing starts at its
    /// first byte.
    fn prepare_typing(&mut self) -> Result<(), EditorError> {
        let Some(range) = self.caret.selection() else {
            return Ok(());
        };
        match self.effective_edit_operation() {
            EditOperation::Insert => {
                self.delete_selection()?;
            }
            EditOperation::Overwrite => {
                self.sequence_break();
                self.caret.clear_selection();
                self.caret.set_caret_position(range.start(), 0);
            }
        }
        Ok(())
    }

    /// Position a backspace removes from
    ///
    /// Inside a byte in the code matrix the byte under the caret goes.
    fn backspace_position(&self) -> u64 {
        let caret = self.caret.caret_position();
        if caret.section == CodeAreaSection::CodeMatrix && caret.code_offset > 0 {
            caret.data_position + 1
        } else {
            caret.data_position
        }
    }

    fn delete_operation(&self, position: u64, direction: DeleteDirection) -> BinaryDataOperation {
        let op = DeleteEditOperation::new(position, direction);
        match self.caret.active_section() {
            CodeAreaSection::CodeMatrix => BinaryDataOperation::DeleteCode(op),
            CodeAreaSection::TextPreview => BinaryDataOperation::DeleteChar(op),
        }
    }

    fn is_resizable(&self) -> bool {
        self.config.edit_mode == EditMode::Expanding
    }

    fn ensure_editable(&self) -> Result<(), EditorError> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(EditorError::ReadOnly)
        }
    }

    fn ensure_resizable(&self) -> Result<(), EditorError> {
        self.ensure_editable()?;
        if self.is_resizable() {
            Ok(())
        } else {
            Err(EditorError::SizeChangeNotAllowed)
        }
    }

    fn data_changed(&mut self) {
        self.version += 1;
        self.listeners.notify();
    }
}

impl<D, C> std::fmt::Debug for EditSession<D, C>
where
    D: EditableBinaryData,
    C: CaretCapability,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("size", &self.data.size())
            .field("caret", &self.caret.caret_position())
            .field("config", &self.config)
            .field("undo_stack", &self.undo_stack)
            .field("in_run", &self.in_run)
            .field("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bined_common::{ByteArrayData, DataError, DataResult};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session(bytes: &[u8]) -> EditSession<ByteArrayData> {
        EditSession::new(ByteArrayData::from(bytes.to_vec()))
    }

    fn type_hex(session: &mut EditSession<ByteArrayData>, keys: &str) {
        for ch in keys.chars() {
            assert!(session.input_code_char(ch).unwrap(), "key {ch} rejected");
        }
    }

    #[test]
    fn test_typing_run_is_one_step() {
        let mut session = session(&[]);
        type_hex(&mut session, "41");

        assert_eq!(session.data().as_slice(), &[0x41]);
        assert_eq!(session.undo_stack().len(), 1);
        assert_eq!(session.caret().caret_position().data_position, 1);

        session.undo().unwrap();
        assert!(session.data().is_empty());
        session.redo().unwrap();
        assert_eq!(session.data().as_slice(), &[0x41]);
    }

    #[test]
    fn test_caret_move_breaks_run() {
        let mut session = session(&[]);
        type_hex(&mut session, "41");
        session.move_caret(1, 0).unwrap();
        type_hex(&mut session, "2");

        assert_eq!(session.data().as_slice(), &[0x41, 0x20]);
        assert_eq!(session.undo_stack().len(), 2);

        session.undo().unwrap();
        assert_eq!(session.data().as_slice(), &[0x41]);
    }

    #[test]
    fn test_invalid_key_is_ignored() {
        let mut session = session(&[0x10]);
        assert!(!session.input_code_char('g').unwrap());

        session.set_code_type(CodeType::Decimal);
        assert!(!session.input_code_char('3').unwrap());
        assert!(session.undo_stack().is_empty());
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn test_overwrite_typing_in_place() {
        let mut session = session(&[0x41, 0x42]);
        session.set_edit_mode(EditMode::InPlace);
        type_hex(&mut session, "ffee");

        assert_eq!(session.data().as_slice(), &[0xFF, 0xEE]);
        assert!(session.input_code_char('1').is_err());
        assert_eq!(session.data().size(), 2);

        session.undo().unwrap();
        assert_eq!(session.data().as_slice(), &[0x41, 0x42]);
    }

    #[test]
    fn test_backspace_and_delete_runs() {
        let mut session = session(&[1, 2, 3, 4, 5]);
        session.move_caret(3, 0).unwrap();
        session.backspace().unwrap();
        session.backspace().unwrap();
        assert_eq!(session.data().as_slice(), &[1, 4, 5]);
        assert_eq!(session.undo_stack().len(), 1);

        session.delete().unwrap();
        assert_eq!(session.data().as_slice(), &[1, 5]);
        assert_eq!(session.undo_stack().len(), 2);

        session.undo().unwrap();
        session.undo().unwrap();
        assert_eq!(session.data().as_slice(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_backspace_at_start_fails() {
        let mut session = session(&[1]);
        assert!(!session.can_backspace());
        assert!(session.backspace().is_err());
        assert!(session.undo_stack().is_empty());
    }

    #[test]
    fn test_read_only_rejects_edits() {
        let mut session = session(&[1]);
        session.set_edit_mode(EditMode::ReadOnly);

        assert!(matches!(session.input_code_char('1'), Err(EditorError::ReadOnly)));
        assert!(matches!(session.paste(&[2]), Err(EditorError::ReadOnly)));
        assert!(matches!(session.delete(), Err(EditorError::ReadOnly)));
        assert_eq!(session.data().as_slice(), &[1]);
    }

    #[test]
    fn test_in_place_rejects_size_changes() {
        let mut session = session(&[1, 2]);
        session.set_edit_mode(EditMode::InPlace);
        assert!(matches!(session.delete(), Err(EditorError::SizeChangeNotAllowed)));
        assert!(!session.can_delete());
    }

    #[test]
    fn test_insert_typing_replaces_selection() {
        let mut session = session(&[1, 2, 3]);
        session.set_selection(Some(SelectionRange::new(0, 2))).unwrap();
        type_hex(&mut session, "aa");

        assert_eq!(session.data().as_slice(), &[0xAA, 3]);
        assert_eq!(session.undo_stack().len(), 2);
        assert!(!session.caret().has_selection());
    }

    #[test]
    fn test_paste_overwrite_extends_document() {
        let mut session = session(&[1, 2, 3]);
        session.set_edit_operation(EditOperation::Overwrite);
        session.move_caret(2, 0).unwrap();
        session.paste(&[7, 8, 9]).unwrap();

        assert_eq!(session.data().as_slice(), &[1, 2, 7, 8, 9]);
        assert_eq!(session.caret().caret_position().data_position, 5);
        assert_eq!(session.undo_stack().len(), 1);

        session.undo().unwrap();
        assert_eq!(session.data().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_paste_in_place_truncates() {
        let mut session = session(&[1, 2, 3]);
        session.set_edit_mode(EditMode::InPlace);
        session.move_caret(2, 0).unwrap();
        session.paste(&[7, 8, 9]).unwrap();
        assert_eq!(session.data().as_slice(), &[1, 2, 7]);
    }

    /// Document that refuses to grow past `limit` bytes
    struct CappedData {
        bytes: ByteArrayData,
        limit: u64,
    }

    impl BinaryData for CappedData {
        fn size(&self) -> u64 {
            self.bytes.size()
        }

        fn get_byte(&self, position: u64) -> DataResult<u8> {
            self.bytes.get_byte(position)
        }

        fn copy(&self, position: u64, length: u64) -> DataResult<ByteArrayData> {
            self.bytes.copy(position, length)
        }
    }

    impl EditableBinaryData for CappedData {
        fn insert(&mut self, position: u64, data: &[u8]) -> DataResult<()> {
            if self.size() + data.len() as u64 > self.limit {
                return Err(DataError::Overflow);
            }
            self.bytes.insert(position, data)
        }

        fn remove(&mut self, position: u64, length: u64) -> DataResult<()> {
            self.bytes.remove(position, length)
        }

        fn replace(&mut self, position: u64, data: &[u8]) -> DataResult<()> {
            self.bytes.replace(position, data)
        }
    }

    #[test]
    fn test_failed_paste_still_reports_applied_steps() {
        let mut session = EditSession::new(CappedData {
            bytes: ByteArrayData::from(vec![1, 2, 3, 4]),
            limit: 8,
        });
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        session.add_data_changed_listener(Box::new(move || *counter.borrow_mut() += 1));

        session.set_selection(Some(SelectionRange::new(1, 3))).unwrap();
        assert!(session.paste(&[9; 10]).is_err());

        // The selection removal went through before the insert was refused
        assert_eq!(session.data().bytes.as_slice(), &[1, 4]);
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(session.undo_stack().len(), 1);
        assert_eq!(session.version(), 1);

        session.undo().unwrap();
        assert_eq!(session.data().bytes.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn test_paste_breaks_typing_run() {
        let mut session = session(&[]);
        type_hex(&mut session, "4");
        session.paste(&[0xEE]).unwrap();
        assert!(!session.has_open_run());
        type_hex(&mut session, "1");
        assert_eq!(session.undo_stack().len(), 3);
    }

    #[test]
    fn test_text_preview_typing() {
        let mut session = session(&[]);
        session.set_active_section(CodeAreaSection::TextPreview);
        session.input_char('h').unwrap();
        session.input_char('i').unwrap();

        assert_eq!(session.data().as_slice(), b"hi");
        assert_eq!(session.undo_stack().len(), 1);
        assert!(!session.input_code_char('1').unwrap());
    }

    #[test]
    fn test_save_point_and_revert() {
        let mut session = session(&[]);
        type_hex(&mut session, "41");
        session.mark_saved();
        assert!(!session.is_modified());

        type_hex(&mut session, "42");
        assert!(session.is_modified());
        assert_eq!(session.undo_stack().len(), 2);

        session.revert_to_saved().unwrap();
        assert!(!session.is_modified());
        assert_eq!(session.data().as_slice(), &[0x41]);
    }

    #[test]
    fn test_listeners_fire_per_committed_change() {
        let mut session = session(&[]);
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        session.add_data_changed_listener(Box::new(move || *counter.borrow_mut() += 1));

        type_hex(&mut session, "41");
        session.input_code_char('x').unwrap();
        session.undo().unwrap();

        assert_eq!(*calls.borrow(), 3);
        assert_eq!(session.version(), 3);
    }

    #[test]
    fn test_code_type_change_clamps_offset() {
        let mut session = session(&[0]);
        session.set_code_type(CodeType::Binary);
        session.move_caret(0, 5).unwrap();
        session.set_code_type(CodeType::Hexadecimal);
        assert_eq!(session.caret().caret_position().code_offset, 0);
    }
}
