//! Caret and selection state, in char coordinates.

use std::ops::Range;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    cursor: usize,
    anchor: Option<usize>,
}

impl SelectionState {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sets the cursor, clearing any active selection.
    pub fn set_cursor(&mut self, char_index: usize, text_len: usize) {
        self.cursor = char_index.min(text_len);
        self.anchor = None;
    }

    /// Moves the cursor, extending the selection from the old position when `select` is set.
    pub fn move_cursor(&mut self, new_index: usize, text_len: usize, select: bool) {
        if select {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
        self.cursor = new_index.min(text_len);
    }

    /// Selects `range`, leaving the cursor at its end.
    pub fn select(&mut self, range: Range<usize>, text_len: usize) {
        let start = range.start.min(text_len);
        let end = range.end.min(text_len).max(start);
        self.anchor = Some(start);
        self.cursor = end;
    }

    pub fn select_all(&mut self, text_len: usize) {
        self.select(0..text_len, text_len);
    }

    /// Normalized selection, `None` when empty.
    pub fn selection_range(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        match anchor.cmp(&self.cursor) {
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Less => Some(anchor..self.cursor),
            std::cmp::Ordering::Greater => Some(self.cursor..anchor),
        }
    }

    /// Selection if any, otherwise the empty range at the cursor.
    pub fn edit_range(&self) -> Range<usize> {
        self.selection_range().unwrap_or(self.cursor..self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_movement_extends_from_original_anchor() {
        let mut state = SelectionState::default();
        state.set_cursor(4, 10);
        state.move_cursor(6, 10, true);
        state.move_cursor(2, 10, true);
        assert_eq!(state.selection_range(), Some(2..4));
        state.move_cursor(3, 10, false);
        assert_eq!(state.selection_range(), None);
        assert_eq!(state.edit_range(), 3..3);
    }

    #[test]
    fn select_clamps_to_text() {
        let mut state = SelectionState::default();
        state.select(3..50, 8);
        assert_eq!(state.selection_range(), Some(3..8));
        state.select(6..2, 8);
        assert_eq!(state.selection_range(), None);
        assert_eq!(state.cursor(), 6);
        state.select_all(0);
        assert_eq!(state.selection_range(), None);
    }
}
