//! Capabilities shared between the binary editing engine and the
//! components embedding it: byte documents, caret and selection.

pub mod caret;
pub mod data;
pub mod error;
pub mod result;

pub use caret::*;
pub use data::*;
pub use error::*;
pub use result::*;
