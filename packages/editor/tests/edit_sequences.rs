//! Longer editing sequences
//!
//! This tests:
//! - Typing runs split by caret moves, mode switches and saves
//! - Undo/redo chains across mixed intents
//! - Batched and compound steps
//! - Listener notifications

use std::cell::RefCell;
use std::rc::Rc;

use bined_editor::operations::{CompoundOperation, ModifyDataOperation};
use bined_editor::{
    BinaryData, ByteArrayData, CaretCapability, Charset, CodeAreaSection, DefaultCodeAreaCaret,
    EditMode, EditOperation, EditSession, EditTarget, SelectionRange, UndoEvent, UndoStack,
};

fn session(bytes: &[u8]) -> EditSession<ByteArrayData> {
    EditSession::new(ByteArrayData::from(bytes))
}

fn type_keys(session: &mut EditSession<ByteArrayData>, keys: &str) {
    for ch in keys.chars() {
        assert!(session.input_code_char(ch).unwrap(), "key {ch} rejected");
    }
}

#[test]
fn test_mixed_intents_undo_in_reverse() {
    let mut session = session(&[0x10, 0x20, 0x30]);

    session.move_caret(3, 0).unwrap();
    type_keys(&mut session, "aabb");
    assert_eq!(session.data().as_slice(), &[0x10, 0x20, 0x30, 0xAA, 0xBB]);

    session.move_caret(1, 0).unwrap();
    session.delete().unwrap();
    session.delete().unwrap();
    assert_eq!(session.data().as_slice(), &[0x10, 0xAA, 0xBB]);

    session.set_edit_operation(EditOperation::Overwrite);
    type_keys(&mut session, "ff");
    assert_eq!(session.data().as_slice(), &[0x10, 0xFF, 0xBB]);
    assert_eq!(session.undo_stack().len(), 3);

    session.undo().unwrap();
    assert_eq!(session.data().as_slice(), &[0x10, 0xAA, 0xBB]);
    session.undo().unwrap();
    assert_eq!(session.data().as_slice(), &[0x10, 0x20, 0x30, 0xAA, 0xBB]);
    session.undo().unwrap();
    assert_eq!(session.data().as_slice(), &[0x10, 0x20, 0x30]);
    assert!(!session.can_undo());

    for _ in 0..3 {
        session.redo().unwrap();
    }
    assert_eq!(session.data().as_slice(), &[0x10, 0xFF, 0xBB]);
    assert!(!session.can_redo());
}

#[test]
fn test_typing_after_undo_discards_redo() {
    let mut session = session(&[]);
    type_keys(&mut session, "01");
    session.move_caret(1, 0).unwrap();
    type_keys(&mut session, "02");

    session.undo().unwrap();
    assert!(session.can_redo());

    type_keys(&mut session, "03");
    assert!(!session.can_redo());
    assert_eq!(session.data().as_slice(), &[0x01, 0x03]);
}

#[test]
fn test_undo_restores_caret_of_the_step() {
    let mut session = session(&[0; 4]);
    session.move_caret(2, 0).unwrap();
    type_keys(&mut session, "7");
    session.move_caret(0, 0).unwrap();

    session.undo().unwrap();
    assert_eq!(session.caret().caret_position().data_position, 2);
    assert_eq!(session.caret().caret_position().code_offset, 0);

    session.redo().unwrap();
    assert_eq!(session.caret().caret_position().data_position, 2);
    assert_eq!(session.caret().caret_position().code_offset, 1);
}

#[test]
fn test_saved_state_is_never_extended() {
    let mut session = session(&[]);
    type_keys(&mut session, "4");
    session.mark_saved();
    assert!(!session.has_open_run());

    type_keys(&mut session, "1");
    assert!(session.is_modified());
    assert_eq!(session.undo_stack().len(), 2);

    session.undo().unwrap();
    assert!(!session.is_modified());
    assert_eq!(session.data().as_slice(), &[0x40]);
}

#[test]
fn test_paste_replaces_selection_as_one_step() {
    let mut session = session(&[1, 2, 3, 4]);
    session.set_selection(Some(SelectionRange::new(3, 1))).unwrap();
    assert_eq!(session.copy_selection().unwrap(), Some(vec![2, 3]));

    session.paste(&[9, 9, 9]).unwrap();
    assert_eq!(session.data().as_slice(), &[1, 9, 9, 9, 4]);
    assert_eq!(session.undo_stack().len(), 1);
    assert_eq!(session.undo_stack().undo_description(), Some("paste"));

    session.undo().unwrap();
    assert_eq!(session.data().as_slice(), &[1, 2, 3, 4]);
}

#[test]
fn test_select_all_then_backspace() {
    let mut session = session(&[1, 2, 3]);
    session.select_all();
    session.backspace().unwrap();
    assert!(session.data().is_empty());

    session.undo().unwrap();
    assert_eq!(session.data().as_slice(), &[1, 2, 3]);
}

#[test]
fn test_text_preview_utf16_run() {
    let mut session = session(&[]);
    session.set_active_section(CodeAreaSection::TextPreview);
    session.set_charset(Charset::Utf16Le);
    for ch in "ok".chars() {
        session.input_char(ch).unwrap();
    }
    assert_eq!(session.data().as_slice(), &[b'o', 0, b'k', 0]);
    assert_eq!(session.undo_stack().len(), 1);

    session.backspace().unwrap();
    session.backspace().unwrap();
    assert_eq!(session.data().as_slice(), &[b'o', 0]);
    assert_eq!(session.undo_stack().len(), 2);
}

#[test]
fn test_charset_switch_breaks_run() {
    let mut session = session(&[]);
    session.set_active_section(CodeAreaSection::TextPreview);
    session.input_char('a').unwrap();
    session.set_charset(Charset::Latin1);
    session.input_char('é').unwrap();

    assert_eq!(session.data().as_slice(), &[b'a', 0xE9]);
    assert_eq!(session.undo_stack().len(), 2);
}

#[test]
fn test_in_place_mode_keeps_size() {
    let mut session = session(&[0xAB, 0xCD]);
    session.set_edit_mode(EditMode::InPlace);
    session.set_edit_operation(EditOperation::Insert);

    type_keys(&mut session, "12");
    assert_eq!(session.data().as_slice(), &[0x12, 0xCD]);
    assert!(session.backspace().is_err());
    assert_eq!(session.data().size(), 2);
}

#[test]
fn test_compound_inverse_restores_overlapping_edits() {
    let mut data = ByteArrayData::from(vec![0, 0, 0]);
    let mut caret = DefaultCodeAreaCaret::new();
    let mut target = EditTarget::new(&mut data, &mut caret);
    let mut stack = UndoStack::new();

    let compound = CompoundOperation::new(vec![
        ModifyDataOperation::new(0, vec![1, 1]).into(),
        ModifyDataOperation::new(1, vec![2, 2]).into(),
    ]);
    stack.execute(compound.into(), &mut target).unwrap();
    assert_eq!(target.data.to_vec().unwrap(), vec![1, 2, 2]);

    stack.undo(&mut target).unwrap();
    assert_eq!(data.as_slice(), &[0, 0, 0]);
}

#[test]
fn test_undo_events_through_session() {
    let mut session = session(&[]);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    session.add_undo_listener(Box::new(move |event: &UndoEvent| sink.borrow_mut().push(*event)));

    type_keys(&mut session, "41");
    session.mark_saved();
    session.undo().unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            UndoEvent::Executed { position: 1 },
            UndoEvent::Appended { position: 1 },
            UndoEvent::SyncPositionChanged { position: 1 },
            UndoEvent::Undone { position: 0 },
        ]
    );
    assert!(session.is_modified());
}
