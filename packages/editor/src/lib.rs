//! # Bined Editor
//!
//! Editing engine for binary documents shown as a code matrix (one byte per
//! cell, rendered in binary, octal, decimal or hexadecimal) next to a text
//! preview.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ session: user intents → operations          │
//! │  - typing runs, backspace/delete, paste     │
//! │  - sequence breaks, edit modes              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ undo_stack: command log + saved marker      │
//! │  - append to the live edit                  │
//! │  - batches, limits, listeners               │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ operations: invertible byte mutations       │
//! │  - codec (digits) and charset (characters)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Operations own their undo data**: the bytes an operation overwrites
//!    or removes are captured when it runs, never re-read later
//! 2. **One keystroke run, one undo step**: typing extends the top command
//!    until something breaks the sequence
//! 3. **The document is borrowed, not shared**: operations receive the data
//!    and caret for the duration of a call
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bined_common::ByteArrayData;
//! use bined_editor::EditSession;
//!
//! let mut session = EditSession::new(ByteArrayData::new());
//! session.input_code_char('4')?;
//! session.input_code_char('1')?;
//! assert_eq!(session.data().as_slice(), &[0x41]);
//!
//! session.undo()?;
//! assert!(session.data().is_empty());
//! ```

pub mod charset;
pub mod codec;
mod config;
mod errors;
mod events;
mod operation_trait;
pub mod operations;
mod session;
mod undo_stack;

pub use charset::Charset;
pub use codec::{CodeCharactersCase, CodeType, CodecError};
pub use config::{EditMode, EditOperation, EditorConfig, DEFAULT_CONFIG_NAME};
pub use errors::{EditorError, OperationError};
pub use events::{DataChangedListener, ListenerId, Listeners, UndoEvent, UndoListener};
pub use operation_trait::DataOperation;
pub use operations::{BinaryDataOperation, EditTarget, OperationType};
pub use session::EditSession;
pub use undo_stack::{UndoCommand, UndoLimits, UndoStack};

// Re-export common types for convenience
pub use bined_common::{
    BinaryData, ByteArrayData, CaretCapability, CaretPosition, CodeAreaSection,
    DefaultCodeAreaCaret, EditableBinaryData, SelectionCapability, SelectionRange,
};
