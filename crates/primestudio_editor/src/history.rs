//! Undo/redo history for the editing surface.
//!
//! Every discrete edit is its own operation: a newline and the indentation
//! inserted after it undo separately, as does an operator substitution.
//! Adjacent typing can optionally be coalesced within a short window.

use std::ops::Range;
use std::time::{Duration, Instant};

const DEFAULT_MAX_OPS: usize = 500;
const DEFAULT_MAX_BYTES: usize = 8 * 1024 * 1024;
const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(750);

/// Why an edit happened; drives coalescing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditIntent {
    Insert,
    Newline,
    AutoIndent,
    Substitution,
    DeleteBackward,
    DeleteForward,
    Other,
}

/// Mutation metadata to persist into undo history.
#[derive(Clone, Debug)]
pub struct RecordedEdit {
    pub start: usize,
    pub deleted: String,
    pub inserted: String,
    pub intent: EditIntent,
    pub before_cursor: usize,
    pub after_cursor: usize,
    pub at: Instant,
}

/// Replacement the surface must apply to move through history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryStep {
    /// Char range to replace in the current text.
    pub range: Range<usize>,
    pub text: String,
    /// Cursor position after applying the step.
    pub cursor: usize,
}

fn op_bytes(op: &RecordedEdit) -> usize {
    op.deleted.len().saturating_add(op.inserted.len())
}

/// Operation-based undo/redo stack with bounded memory.
#[derive(Debug)]
pub struct EditHistory {
    undo: Vec<RecordedEdit>,
    redo: Vec<RecordedEdit>,
    undo_bytes: usize,
    max_ops: usize,
    max_bytes: usize,
    coalesce_window: Option<Duration>,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(false)
    }
}

impl EditHistory {
    /// History keeping one operation per edit, or coalescing adjacent typing
    /// when `coalesce_typing` is set.
    pub fn new(coalesce_typing: bool) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            undo_bytes: 0,
            max_ops: DEFAULT_MAX_OPS,
            max_bytes: DEFAULT_MAX_BYTES,
            coalesce_window: coalesce_typing.then_some(DEFAULT_COALESCE_WINDOW),
        }
    }

    pub fn record_edit(&mut self, edit: RecordedEdit) {
        if edit.deleted.is_empty() && edit.inserted.is_empty() {
            return;
        }
        self.redo.clear();
        if let (Some(last), Some(window)) = (self.undo.last_mut(), self.coalesce_window) {
            if can_coalesce(last, &edit, window) {
                self.undo_bytes = self.undo_bytes.saturating_sub(op_bytes(last));
                last.inserted.push_str(&edit.inserted);
                last.after_cursor = edit.after_cursor;
                last.at = edit.at;
                self.undo_bytes = self.undo_bytes.saturating_add(op_bytes(last));
                self.trim_undo();
                return;
            }
        }
        self.undo_bytes = self.undo_bytes.saturating_add(op_bytes(&edit));
        self.undo.push(edit);
        self.trim_undo();
    }

    fn trim_undo(&mut self) {
        while !self.undo.is_empty()
            && (self.undo.len() > self.max_ops || self.undo_bytes > self.max_bytes)
        {
            let removed = self.undo.remove(0);
            self.undo_bytes = self.undo_bytes.saturating_sub(op_bytes(&removed));
        }
    }

    /// Pop the most recent operation and return its inverse.
    pub fn undo(&mut self) -> Option<HistoryStep> {
        let op = self.undo.pop()?;
        self.undo_bytes = self.undo_bytes.saturating_sub(op_bytes(&op));
        let end = op.start + op.inserted.chars().count();
        let step = HistoryStep {
            range: op.start..end,
            text: op.deleted.clone(),
            cursor: op.before_cursor,
        };
        self.redo.push(op);
        Some(step)
    }

    /// Re-apply the most recently undone operation.
    pub fn redo(&mut self) -> Option<HistoryStep> {
        let op = self.redo.pop()?;
        let end = op.start + op.deleted.chars().count();
        let step = HistoryStep {
            range: op.start..end,
            text: op.inserted.clone(),
            cursor: op.after_cursor,
        };
        self.undo_bytes = self.undo_bytes.saturating_add(op_bytes(&op));
        self.undo.push(op);
        self.trim_undo();
        Some(step)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.undo_bytes = 0;
    }
}

fn can_coalesce(previous: &RecordedEdit, next: &RecordedEdit, window: Duration) -> bool {
    if previous.intent != EditIntent::Insert || next.intent != EditIntent::Insert {
        return false;
    }
    if next.at.saturating_duration_since(previous.at) > window {
        return false;
    }
    if !previous.deleted.is_empty() || !next.deleted.is_empty() {
        return false;
    }
    next.start == previous.start + previous.inserted.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(start: usize, text: &str, at: Instant) -> RecordedEdit {
        let len = text.chars().count();
        RecordedEdit {
            start,
            deleted: String::new(),
            inserted: text.to_string(),
            intent: EditIntent::Insert,
            before_cursor: start,
            after_cursor: start + len,
            at,
        }
    }

    #[test]
    fn typing_is_one_op_per_edit_by_default() {
        let mut history = EditHistory::default();
        let now = Instant::now();
        history.record_edit(typed(0, "h", now));
        history.record_edit(typed(1, "i", now + Duration::from_millis(10)));
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn coalescing_merges_adjacent_typing_when_enabled() {
        let mut history = EditHistory::new(true);
        let now = Instant::now();
        history.record_edit(typed(0, "h", now));
        history.record_edit(typed(1, "i", now + Duration::from_millis(10)));
        history.record_edit(typed(7, "x", now + Duration::from_millis(20)));
        assert_eq!(history.undo_len(), 2);
        let step = history.undo().expect("undo");
        assert_eq!(step.range, 7..8);
        let step = history.undo().expect("undo");
        assert_eq!(step.range, 0..2);
        assert_eq!(step.text, "");
        assert_eq!(step.cursor, 0);
    }

    #[test]
    fn undo_and_redo_produce_inverse_steps() {
        let mut history = EditHistory::default();
        history.record_edit(RecordedEdit {
            start: 1,
            deleted: "b".to_string(),
            inserted: "XYZ".to_string(),
            intent: EditIntent::Other,
            before_cursor: 1,
            after_cursor: 4,
            at: Instant::now(),
        });

        let undo = history.undo().expect("undo");
        assert_eq!(
            undo,
            HistoryStep {
                range: 1..4,
                text: "b".to_string(),
                cursor: 1
            }
        );
        assert!(history.undo().is_none());
        let redo = history.redo().expect("redo");
        assert_eq!(redo.range, 1..2);
        assert_eq!(redo.text, "XYZ");
        assert_eq!(redo.cursor, 4);
        assert!(!history.can_redo());
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut history = EditHistory::default();
        let now = Instant::now();
        history.record_edit(typed(0, "a", now));
        history.undo();
        assert!(history.can_redo());
        history.record_edit(typed(0, "b", now));
        assert!(!history.can_redo());
    }
}
