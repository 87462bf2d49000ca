use serde::{Deserialize, Serialize};

/// Which part of the code area the caret is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeAreaSection {
    /// Digit-oriented view (two hex digits per byte, eight binary digits...)
    #[default]
    CodeMatrix,

    /// Character view of the same bytes
    TextPreview,
}

/// Caret location inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaretPosition {
    pub data_position: u64,

    /// Digit within the byte; always 0 in the text preview
    pub code_offset: usize,

    pub section: CodeAreaSection,
}

impl CaretPosition {
    pub fn new(data_position: u64, code_offset: usize, section: CodeAreaSection) -> Self {
        let code_offset = match section {
            CodeAreaSection::CodeMatrix => code_offset,
            CodeAreaSection::TextPreview => 0,
        };
        Self {
            data_position,
            code_offset,
            section,
        }
    }
}

/// Half-open byte range, always stored with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionRange {
    start: u64,
    end: u64,
}

impl SelectionRange {
    /// Build a range from two caret positions in either order
    pub fn new(anchor: u64, head: u64) -> Self {
        Self {
            start: anchor.min(head),
            end: anchor.max(head),
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, position: u64) -> bool {
        position >= self.start && position < self.end
    }
}

/// Caret collaborator consumed by the editing engine
pub trait CaretCapability {
    fn caret_position(&self) -> CaretPosition;

    /// Move within the currently active section
    fn set_caret_position(&mut self, data_position: u64, code_offset: usize);

    fn set_active_section(&mut self, section: CodeAreaSection);

    fn active_section(&self) -> CodeAreaSection {
        self.caret_position().section
    }
}

/// Selection collaborator consumed by the editing engine
pub trait SelectionCapability {
    fn selection(&self) -> Option<SelectionRange>;

    fn set_selection(&mut self, selection: Option<SelectionRange>);

    fn has_selection(&self) -> bool {
        self.selection().is_some_and(|range| !range.is_empty())
    }

    fn clear_selection(&mut self) {
        self.set_selection(None);
    }
}

/// Plain caret + selection holder for embedding without a UI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultCodeAreaCaret {
    position: CaretPosition,
    selection: Option<SelectionRange>,
}

impl DefaultCodeAreaCaret {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(data_position: u64, code_offset: usize) -> Self {
        Self {
            position: CaretPosition::new(data_position, code_offset, CodeAreaSection::CodeMatrix),
            selection: None,
        }
    }
}

impl CaretCapability for DefaultCodeAreaCaret {
    fn caret_position(&self) -> CaretPosition {
        self.position
    }

    fn set_caret_position(&mut self, data_position: u64, code_offset: usize) {
        self.position = CaretPosition::new(data_position, code_offset, self.position.section);
    }

    fn set_active_section(&mut self, section: CodeAreaSection) {
        self.position = CaretPosition::new(self.position.data_position, 0, section);
    }
}

impl SelectionCapability for DefaultCodeAreaCaret {
    fn selection(&self) -> Option<SelectionRange> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<SelectionRange>) {
        self.selection = selection.filter(|range| !range.is_empty());
    }
}
