//! Snapshot-based undo/redo history.

use crate::surface::Snapshot;

/// Default maximum number of undo states to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Undo and redo stacks of full-surface snapshots.
///
/// The history is session-wide: it is not tied to a page, so undoing right
/// after a page change restores whatever bitmap was on the surface before
/// the last recorded action, even if that was another page.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo depth. `None` keeps everything.
    limit: Option<usize>,
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Record the state before a mutating action.
    pub fn record(&mut self, before: Snapshot) {
        self.undo_stack.push(before);

        // A new edit invalidates everything that could be redone
        self.redo_stack.clear();

        self.enforce_limit();
    }

    /// Pop the last undo state, pushing `current` onto the redo stack.
    /// Returns `None` and leaves both stacks untouched when there is nothing
    /// to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Pop the last redo state, pushing `current` onto the undo stack.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        self.enforce_limit();
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            if self.undo_stack.len() > limit {
                let excess = self.undo_stack.len() - limit;
                self.undo_stack.drain(..excess);
            }
        }
    }
}
