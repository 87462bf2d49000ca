//! # Change Notifications
//!
//! Outward-facing hooks fired by the editing engine.
//!
//! - [`DataChangedListener`]: called once after every committed mutation of
//!   the document (typing, delete, paste, undo, redo). Rendering and layout
//!   collaborators hang off this.
//! - [`UndoListener`]: told about every transition of the undo history, so a
//!   UI can refresh its undo/redo/save affordances.
//!
//! Closures implement both traits, so most callers just register a `FnMut`.

/// Observer of document content changes
pub trait DataChangedListener {
    fn on_data_changed(&mut self);
}

impl<F: FnMut()> DataChangedListener for F {
    fn on_data_changed(&mut self) {
        self()
    }
}

/// Transition of the undo history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoEvent {
    /// A new command was recorded; `position` is the new command position
    Executed { position: usize },
    /// The top command absorbed another keystroke
    Appended { position: usize },
    Undone { position: usize },
    Redone { position: usize },
    SyncPositionChanged { position: usize },
    /// Oldest commands were dropped to respect the configured limits
    Evicted { count: usize },
    Cleared,
}

/// Observer of undo history transitions
pub trait UndoListener {
    fn on_undo_event(&mut self, event: &UndoEvent);
}

impl<F: FnMut(&UndoEvent)> UndoListener for F {
    fn on_undo_event(&mut self, event: &UndoEvent) {
        self(event)
    }
}

/// Handle returned on registration, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Ordered set of listeners of one kind
pub struct Listeners<L: ?Sized> {
    entries: Vec<(ListenerId, Box<L>)>,
    next_id: usize,
}

impl<L: ?Sized> Listeners<L> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub fn add(&mut self, listener: Box<L>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Returns `false` if the id was not registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn for_each(&mut self, mut f: impl FnMut(&mut L)) {
        for (_, listener) in &mut self.entries {
            f(listener.as_mut());
        }
    }
}

impl<L: ?Sized> Default for Listeners<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> std::fmt::Debug for Listeners<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl Listeners<dyn DataChangedListener> {
    pub fn notify(&mut self) {
        self.for_each(|listener| listener.on_data_changed());
    }
}

impl Listeners<dyn UndoListener> {
    pub fn notify(&mut self, event: UndoEvent) {
        self.for_each(|listener| listener.on_undo_event(&event));
    }
}
