//! # Undo/Redo Stack
//!
//! Linear command log with a movable cursor and a "saved" marker.
//!
//! ## Design
//!
//! - Each command records the inverse of its operation when it is executed
//! - Undo executes the inverse, which yields the operation to redo with
//! - Commands at or after the cursor are disposed when a new one is recorded
//! - The top command can keep absorbing keystrokes while it is a live edit
//! - Supports batched operations (group multiple operations as one undo step)
//! - Oldest commands are evicted once the configured limits are exceeded
//!
//! ## State
//!
//! ```text
//! commands:  [c0] [c1] [c2] [c3]
//!                        ^cursor = 3      0 <= cursor <= len
//! sync = 1   →  is_modified() == (sync != cursor)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let mut target = EditTarget::new(&mut data, &mut caret);
//!
//! stack.execute(InsertDataOperation::new(0, 0, vec![1, 2]).into(), &mut target)?;
//! stack.undo(&mut target)?;
//! stack.redo(&mut target)?;
//! ```

use bined_common::{CaretCapability, CaretPosition};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::errors::EditorError;
use crate::events::{ListenerId, Listeners, UndoEvent, UndoListener};
use crate::operations::{BinaryDataOperation, CompoundOperation, EditTarget};

/// Limits enforced on the undo history (0 = unlimited)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoLimits {
    /// Maximum number of commands kept
    #[serde(default = "default_max_count")]
    pub max_count: usize,

    /// Maximum number of captured undo bytes kept
    #[serde(default)]
    pub max_size: usize,
}

fn default_max_count() -> usize {
    1024
}

impl Default for UndoLimits {
    fn default() -> Self {
        Self {
            max_count: default_max_count(),
            max_size: 0,
        }
    }
}

impl UndoLimits {
    pub fn unlimited() -> Self {
        Self {
            max_count: 0,
            max_size: 0,
        }
    }
}

/// One undoable step in the history
#[derive(Debug)]
pub struct UndoCommand {
    /// Operation to apply on redo; the live edit while the command is on top
    operation: Option<BinaryDataOperation>,

    /// Operation that reverts this command
    undo: Option<BinaryDataOperation>,

    description: String,
    caret_before: CaretPosition,
    caret_after: CaretPosition,
}

impl UndoCommand {
    fn new(
        operation: BinaryDataOperation,
        undo: Option<BinaryDataOperation>,
        description: String,
        caret_before: CaretPosition,
        caret_after: CaretPosition,
    ) -> Self {
        Self {
            operation: Some(operation),
            undo,
            description,
            caret_before,
            caret_after,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Bytes captured by this command
    pub fn payload_size(&self) -> usize {
        self.operation
            .iter()
            .chain(self.undo.iter())
            .map(BinaryDataOperation::payload_size)
            .sum()
    }

    fn undo(&mut self, index: usize, target: &mut EditTarget<'_>) -> Result<(), EditorError> {
        let mut inverse = self.undo.take().ok_or(EditorError::NotInvertible(index))?;
        match inverse.execute_with_undo(target) {
            Ok(redo) => {
                if let Some(previous) = std::mem::replace(&mut self.operation, redo) {
                    previous.dispose();
                }
                inverse.dispose();
                restore_caret(target.caret, self.caret_before);
                Ok(())
            }
            Err(err) => {
                self.undo = Some(inverse);
                Err(err.into())
            }
        }
    }

    fn redo(&mut self, index: usize, target: &mut EditTarget<'_>) -> Result<(), EditorError> {
        let mut operation = self.operation.take().ok_or(EditorError::NotInvertible(index))?;
        match operation.execute_with_undo(target) {
            Ok(undo) => {
                self.undo = undo;
                self.operation = Some(operation);
                restore_caret(target.caret, self.caret_after);
                Ok(())
            }
            Err(err) => {
                self.operation = Some(operation);
                Err(err.into())
            }
        }
    }

    fn dispose(self) {
        if let Some(operation) = self.operation {
            operation.dispose();
        }
        if let Some(undo) = self.undo {
            undo.dispose();
        }
    }
}

fn restore_caret(caret: &mut dyn CaretCapability, position: CaretPosition) {
    if caret.active_section() != position.section {
        caret.set_active_section(position.section);
    }
    caret.set_caret_position(position.data_position, position.code_offset);
}

/// Operations collected between `begin_batch` and `end_batch`
#[derive(Debug)]
struct PendingBatch {
    /// The operations in this batch (in application order)
    operations: Vec<BinaryDataOperation>,

    /// The inverse operations (in reverse order for undo)
    inverses: Vec<BinaryDataOperation>,

    description: Option<String>,
    caret_before: Option<CaretPosition>,
    caret_after: Option<CaretPosition>,
}

/// Undo/redo history for one document
pub struct UndoStack {
    commands: Vec<UndoCommand>,

    /// Number of commands currently applied
    command_position: usize,

    /// Command position considered saved; `None` once it has been evicted
    sync_position: Option<usize>,

    limits: UndoLimits,

    /// Currently building a batch
    current_batch: Option<PendingBatch>,

    listeners: Listeners<dyn UndoListener>,
}

impl UndoStack {
    /// Create a new undo stack with default limits
    pub fn new() -> Self {
        Self::with_limits(UndoLimits::default())
    }

    pub fn with_limits(limits: UndoLimits) -> Self {
        Self {
            commands: Vec::new(),
            command_position: 0,
            sync_position: Some(0),
            limits,
            current_batch: None,
            listeners: Listeners::new(),
        }
    }

    /// Create an undo stack keeping at most `max_count` commands
    pub fn with_max_levels(max_count: usize) -> Self {
        Self::with_limits(UndoLimits {
            max_count,
            max_size: 0,
        })
    }

    pub fn limits(&self) -> UndoLimits {
        self.limits
    }

    pub fn set_limits(&mut self, limits: UndoLimits) {
        self.limits = limits;
        self.enforce_limits();
    }

    pub fn add_listener(&mut self, listener: Box<dyn UndoListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Execute an operation and record it for undo
    pub fn execute(
        &mut self,
        mut operation: BinaryDataOperation,
        target: &mut EditTarget<'_>,
    ) -> Result<(), EditorError> {
        let caret_before = target.caret.caret_position();
        let undo = operation.execute_with_undo(target)?;
        let caret_after = target.caret.caret_position();

        if let Some(batch) = &mut self.current_batch {
            batch.caret_before.get_or_insert(caret_before);
            batch.caret_after = Some(caret_after);
            batch.operations.push(operation);
            if let Some(undo) = undo {
                batch.inverses.insert(0, undo); // Inverses go in reverse order
            }
            return Ok(());
        }

        let description = operation.name().to_string();
        self.push_command(UndoCommand::new(
            operation,
            undo,
            description,
            caret_before,
            caret_after,
        ));
        Ok(())
    }

    /// Let the top command absorb `operation`
    ///
    /// Only the most recent, still applied, not yet saved command is
    /// considered. Returns `Ok(false)` when a new step has to be recorded.
    pub fn append_to_last(
        &mut self,
        operation: &BinaryDataOperation,
        target: &mut EditTarget<'_>,
    ) -> Result<bool, EditorError> {
        if self.current_batch.is_some()
            || self.command_position == 0
            || self.command_position != self.commands.len()
            || self.sync_position == Some(self.command_position)
        {
            return Ok(false);
        }

        let command = &mut self.commands[self.command_position - 1];
        let Some(live) = command.operation.as_mut().filter(|op| op.is_appendable()) else {
            return Ok(false);
        };
        if !live.append_operation(operation, target)? {
            return Ok(false);
        }

        let refreshed = live.undo_operation();
        if let Some(stale) = std::mem::replace(&mut command.undo, refreshed) {
            stale.dispose();
        }
        command.caret_after = target.caret.caret_position();
        trace!(position = self.command_position, "appended to {}", command.description);

        self.listeners.notify(UndoEvent::Appended {
            position: self.command_position,
        });
        self.enforce_limits();
        Ok(true)
    }

    /// Start a batch of operations (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(PendingBatch {
            operations: Vec::new(),
            inverses: Vec::new(),
            description: None,
            caret_before: None,
            caret_after: None,
        });
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    /// End the current batch and record it as one command
    ///
    /// Returns whether a command was recorded.
    pub fn end_batch(&mut self) -> bool {
        let Some(batch) = self.current_batch.take() else {
            return false;
        };
        if batch.operations.is_empty() {
            return false;
        }

        let caret_before = batch.caret_before.unwrap_or_default();
        let command = UndoCommand::new(
            CompoundOperation::new(batch.operations).into(),
            (!batch.inverses.is_empty())
                .then(|| CompoundOperation::new(batch.inverses).into()),
            batch.description.unwrap_or_else(|| "batch".to_string()),
            caret_before,
            batch.caret_after.unwrap_or(caret_before),
        );
        self.push_command(command);
        true
    }

    /// Record an executed command
    fn push_command(&mut self, command: UndoCommand) {
        // New command invalidates the redo tail
        for discarded in self.commands.drain(self.command_position..) {
            discarded.dispose();
        }
        if self
            .sync_position
            .is_some_and(|sync| sync > self.command_position)
        {
            self.sync_position = None;
        }

        debug!(
            position = self.command_position,
            "recording command: {}", command.description
        );
        self.commands.push(command);
        self.command_position += 1;

        self.listeners.notify(UndoEvent::Executed {
            position: self.command_position,
        });
        self.enforce_limits();
    }

    /// Drop the oldest commands until the limits hold
    ///
    /// Only applied commands (below the cursor) are dropped, so the redo tail
    /// stays replayable, and the newest command is always kept. With undone
    /// commands pending the limits may stay exceeded until the next record
    /// discards the redo tail.
    fn enforce_limits(&mut self) {
        let UndoLimits { max_count, max_size } = self.limits;
        let mut total_size: usize = if max_size > 0 {
            self.total_payload_size()
        } else {
            0
        };
        let mut evicted = 0;

        while self.command_position > 0 && self.commands.len() > 1 {
            let over_count = max_count > 0 && self.commands.len() > max_count;
            let over_size = max_size > 0 && total_size > max_size;
            if !over_count && !over_size {
                break;
            }

            let oldest = self.commands.remove(0);
            total_size = total_size.saturating_sub(oldest.payload_size());
            oldest.dispose();
            evicted += 1;

            self.command_position -= 1;
            self.sync_position = match self.sync_position {
                Some(0) | None => None,
                Some(sync) => Some(sync - 1),
            };
        }

        if evicted > 0 {
            debug!(evicted, remaining = self.commands.len(), "evicted undo history");
            self.listeners.notify(UndoEvent::Evicted { count: evicted });
        }
        debug_assert!(self.command_position <= self.commands.len());
    }

    /// Undo the most recent command
    pub fn undo(&mut self, target: &mut EditTarget<'_>) -> Result<(), EditorError> {
        self.end_batch();
        if self.command_position == 0 {
            return Err(EditorError::NothingToUndo);
        }

        let index = self.command_position - 1;
        self.commands[index].undo(index, target)?;
        self.command_position -= 1;
        debug!(position = self.command_position, "undo {}", self.commands[index].description);

        self.listeners.notify(UndoEvent::Undone {
            position: self.command_position,
        });
        Ok(())
    }

    /// Redo the most recently undone command
    pub fn redo(&mut self, target: &mut EditTarget<'_>) -> Result<(), EditorError> {
        self.end_batch();
        if self.command_position >= self.commands.len() {
            return Err(EditorError::NothingToRedo);
        }

        let index = self.command_position;
        self.commands[index].redo(index, target)?;
        self.command_position += 1;
        debug!(position = self.command_position, "redo {}", self.commands[index].description);

        self.listeners.notify(UndoEvent::Redone {
            position: self.command_position,
        });
        Ok(())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.command_position > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.command_position < self.commands.len()
    }

    pub fn command_position(&self) -> usize {
        self.command_position
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[UndoCommand] {
        &self.commands
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.command_position
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.commands.len() - self.command_position
    }

    pub fn total_payload_size(&self) -> usize {
        self.commands.iter().map(UndoCommand::payload_size).sum()
    }

    /// Mark the current position as saved
    pub fn set_sync_position(&mut self) {
        self.sync_position = Some(self.command_position);
        self.listeners.notify(UndoEvent::SyncPositionChanged {
            position: self.command_position,
        });
    }

    pub fn sync_position(&self) -> Option<usize> {
        self.sync_position
    }

    pub fn is_modified(&self) -> bool {
        self.sync_position != Some(self.command_position)
    }

    /// Undo or redo until the saved position is reached
    pub fn perform_sync(&mut self, target: &mut EditTarget<'_>) -> Result<(), EditorError> {
        let sync = self.sync_position.ok_or(EditorError::SyncUnreachable)?;
        while self.command_position > sync {
            self.undo(target)?;
        }
        while self.command_position < sync {
            self.redo(target)?;
        }
        Ok(())
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        for command in self.commands.drain(..) {
            command.dispose();
        }
        self.command_position = 0;
        self.sync_position = Some(0);
        self.current_batch = None;
        self.listeners.notify(UndoEvent::Cleared);
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.command_position
            .checked_sub(1)
            .and_then(|index| self.commands.get(index))
            .map(UndoCommand::description)
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.commands
            .get(self.command_position)
            .map(UndoCommand::description)
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UndoStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoStack")
            .field("commands", &self.commands.len())
            .field("command_position", &self.command_position)
            .field("sync_position", &self.sync_position)
            .field("limits", &self.limits)
            .field("batching", &self.current_batch.is_some())
            .finish()
    }
}
