//! Edit history.
//!
//! [`UndoHistory`] keeps whole-document snapshots, one per
//! document-changing command, up to a fixed depth.

use crate::document::EditorDocument;
use crate::model::Document;
use crate::types::Selection;

/// Trait for managing undo/redo state.
///
/// `undo` and `redo` exchange the current state for the recorded one, so the
/// caller stays the owner of whatever is live.
pub trait UndoManager {
    type State;

    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Record the state from before an edit. Clears the redo stack.
    fn record(&mut self, before: Self::State);

    /// Swap `current` for the most recent undo state.
    fn undo(&mut self, current: Self::State) -> Result<Self::State, Self::State>;

    /// Swap `current` for the most recent redo state.
    fn redo(&mut self, current: Self::State) -> Result<Self::State, Self::State>;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// Document and selection as they were before an edit.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub document: Document,
    pub selection: Selection,
}

impl Snapshot {
    pub fn capture<D: EditorDocument>(doc: &D) -> Self {
        Self {
            document: doc.document().clone(),
            selection: doc.selection(),
        }
    }

    /// Write this snapshot back into `doc`, clearing stored marks.
    pub fn restore<D: EditorDocument>(self, doc: &mut D) {
        *doc.document_mut() = self.document;
        doc.set_selection(self.selection);
        doc.set_stored_marks(None);
    }
}

/// Bounded undo/redo stacks of whole states.
#[derive(Clone, Debug)]
pub struct UndoHistory<T> {
    undo_stack: Vec<T>,
    redo_stack: Vec<T>,
    max_steps: usize,
}

impl<T> Default for UndoHistory<T> {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_HISTORY_DEPTH)
    }
}

impl<T> UndoHistory<T> {
    pub fn new(max_steps: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_steps,
        }
    }

    /// Number of steps that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of steps that can be redone.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }
}

impl<T> UndoManager for UndoHistory<T> {
    type State = T;

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn record(&mut self, before: T) {
        self.undo_stack.push(before);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_steps {
            let excess = self.undo_stack.len() - self.max_steps;
            self.undo_stack.drain(..excess);
            tracing::trace!(excess, max_steps = self.max_steps, "undo history trimmed");
        }
    }

    fn undo(&mut self, current: T) -> Result<T, T> {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.redo_stack.push(current);
                Ok(previous)
            }
            None => Err(current),
        }
    }

    fn redo(&mut self, current: T) -> Result<T, T> {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push(current);
                Ok(next)
            }
            None => Err(current),
        }
    }

    fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_exchange() {
        let mut history = UndoHistory::new(10);
        assert!(!history.can_undo());
        history.record("a");
        history.record("ab");

        assert_eq!(history.undo("abc"), Ok("ab"));
        assert_eq!(history.undo("ab"), Ok("a"));
        assert_eq!(history.undo("a"), Err("a"));
        assert!(history.can_redo());

        assert_eq!(history.redo("a"), Ok("ab"));
        assert_eq!(history.redo_depth(), 1);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut history = UndoHistory::new(10);
        history.record(1);
        assert_eq!(history.undo(2), Ok(1));
        assert!(history.can_redo());
        history.record(1);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_max_steps() {
        let mut history = UndoHistory::new(3);
        for step in 0..5 {
            history.record(step);
        }
        assert_eq!(history.undo_depth(), 3);
        assert_eq!(history.undo(5), Ok(4));
        assert_eq!(history.undo(4), Ok(3));
        assert_eq!(history.undo(3), Ok(2));
        assert_eq!(history.undo(2), Err(2));
    }

    #[test]
    fn test_clear_history() {
        let mut history = UndoHistory::new(3);
        history.record(0);
        history.clear_history();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
