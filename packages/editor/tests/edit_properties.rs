//! Property tests for the codec and for operation inverses

use bined_editor::codec::{digit_of, set_digit, trailing_value};
use bined_editor::operations::{
    InsertCodeEditOperation, InsertDataOperation, ModifyDataOperation,
    OverwriteCodeEditOperation, RemoveDataOperation,
};
use bined_editor::{
    BinaryDataOperation, ByteArrayData, CodeType, DefaultCodeAreaCaret, EditSession, EditTarget,
};
use proptest::test_runner::Config as ProptestConfig;
use proptest::{prelude::*, prop_oneof};

#[derive(Debug, Clone)]
enum Intent {
    Key(char),
    Backspace,
    Delete,
    Move(u16),
    Paste(Vec<u8>),
}

fn code_type_strategy() -> impl Strategy<Value = CodeType> {
    prop_oneof![
        Just(CodeType::Binary),
        Just(CodeType::Octal),
        Just(CodeType::Decimal),
        Just(CodeType::Hexadecimal),
    ]
}

fn intent_strategy() -> impl Strategy<Value = Intent> {
    prop_oneof![
        4 => proptest::sample::select(vec!['0', '1', '7', '9', 'a', 'f']).prop_map(Intent::Key),
        1 => Just(Intent::Backspace),
        1 => Just(Intent::Delete),
        1 => (0u16..64).prop_map(Intent::Move),
        1 => proptest::collection::vec(any::<u8>(), 1..6).prop_map(Intent::Paste),
    ]
}

/// Execute `op`, apply the inverse and compare with `initial`
fn round_trip(initial: &[u8], mut op: BinaryDataOperation) -> Result<(), TestCaseError> {
    let mut data = ByteArrayData::from(initial);
    let mut caret = DefaultCodeAreaCaret::new();
    let mut target = EditTarget::new(&mut data, &mut caret);

    let Ok(undo) = op.execute_with_undo(&mut target) else {
        // Rejected operations must not have touched the document
        prop_assert_eq!(data.as_slice(), initial);
        return Ok(());
    };
    if let Some(mut undo) = undo {
        prop_assert!(undo.execute(&mut target).is_ok());
    }
    prop_assert_eq!(data.as_slice(), initial);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn set_digit_writes_the_digit(byte in any::<u8>(), code_type in code_type_strategy(), seed in any::<u8>()) {
        let offset = usize::from(seed) % code_type.max_digits();
        let digit = seed % code_type.base() as u8;
        let updated = set_digit(byte, digit, offset, code_type).unwrap();

        // Overflow folding only exists for decimal and the octal leading digit
        let folds = code_type == CodeType::Decimal || (code_type == CodeType::Octal && offset == 0);
        if !folds {
            prop_assert_eq!(digit_of(updated, offset, code_type), digit);
            for other in (0..code_type.max_digits()).filter(|&o| o != offset) {
                prop_assert_eq!(digit_of(updated, other, code_type), digit_of(byte, other, code_type));
            }
        }
    }

    #[test]
    fn trailing_value_is_below_the_split_digit(byte in any::<u8>(), code_type in code_type_strategy(), seed in 1usize..8) {
        let offset = seed % code_type.max_digits();
        let rest = trailing_value(byte, offset, code_type);
        prop_assert!(rest <= byte);
        for higher in 0..offset {
            prop_assert_eq!(digit_of(rest, higher, code_type), 0);
        }
    }

    #[test]
    fn primitive_operations_invert(
        initial in proptest::collection::vec(any::<u8>(), 0..32),
        position in 0u64..40,
        payload in proptest::collection::vec(any::<u8>(), 1..8),
        length in 0u64..8,
    ) {
        round_trip(&initial, InsertDataOperation::new(position, 0, payload.clone()).into())?;
        round_trip(&initial, RemoveDataOperation::new(position, 0, length).into())?;
        round_trip(&initial, ModifyDataOperation::new(position, payload).into())?;
    }

    #[test]
    fn code_edits_invert(
        initial in proptest::collection::vec(any::<u8>(), 0..16),
        position in 0u64..20,
        code_type in code_type_strategy(),
        seed in any::<u8>(),
    ) {
        let offset = usize::from(seed) % code_type.max_digits();
        let digit = seed % code_type.base() as u8;
        round_trip(&initial, InsertCodeEditOperation::new(position, offset, code_type, digit).into())?;
        round_trip(&initial, OverwriteCodeEditOperation::new(position, offset, code_type, digit).into())?;
    }

    #[test]
    fn session_history_replays(
        initial in proptest::collection::vec(any::<u8>(), 0..16),
        intents in proptest::collection::vec(intent_strategy(), 1..24),
    ) {
        let mut session = EditSession::new(ByteArrayData::from(initial.as_slice()));
        for intent in intents {
            // Rejected intents are fine; they must leave history consistent
            let _ = match intent {
                Intent::Key(ch) => session.input_code_char(ch).map(|_| ()),
                Intent::Backspace => session.backspace(),
                Intent::Delete => session.delete(),
                Intent::Move(position) => {
                    let size = session.data().as_slice().len() as u64;
                    session.move_caret(u64::from(position).min(size), 0)
                }
                Intent::Paste(bytes) => session.paste(&bytes),
            };
        }

        let edited = session.data().as_slice().to_vec();
        while session.can_undo() {
            session.undo().unwrap();
        }
        prop_assert_eq!(session.data().as_slice(), initial.as_slice());

        while session.can_redo() {
            session.redo().unwrap();
        }
        prop_assert_eq!(session.data().as_slice(), edited.as_slice());
    }
}
