//! Rope-backed text storage for the editing surface.
//!
//! Positions are char indices. [`RopeBuffer::char_to_byte`] bridges to the
//! byte offsets used by attributed text.

use ropey::Rope;
use std::ops::Range;

fn line_for_char(rope: &Rope, char_index: usize) -> usize {
    rope.char_to_line(char_index.min(rope.len_chars()))
}

#[derive(Clone, Debug, Default)]
pub struct RopeBuffer {
    rope: Rope,
}

impl RopeBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Physical line count; an empty buffer has one line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines().max(1)
    }

    pub fn reset(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// Byte offset of a char index, clamped to the buffer end.
    pub fn char_to_byte(&self, char_index: usize) -> usize {
        self.rope.char_to_byte(char_index.min(self.len_chars()))
    }

    /// Convert a global char index into `(line, column)` coordinates.
    pub fn char_to_line_col(&self, char_index: usize) -> (usize, usize) {
        let clamped = char_index.min(self.len_chars());
        let line = line_for_char(&self.rope, clamped);
        let line_start = self.rope.line_to_char(line);
        let col = clamped
            .saturating_sub(line_start)
            .min(self.line_len_chars(line));
        (line, col)
    }

    /// Convert `(line, column)` into a global char index.
    pub fn line_col_to_char(&self, line: usize, column: usize) -> usize {
        if line >= self.line_count() {
            return self.len_chars();
        }
        let line_start = self.rope.line_to_char(line);
        line_start + column.min(self.line_len_chars(line))
    }

    /// Returns a line without its trailing `\r?\n`.
    pub fn line_without_newline(&self, line: usize) -> String {
        if line >= self.line_count() {
            return String::new();
        }
        let keep_chars = self.line_len_chars(line);
        self.rope.line(line).slice(..keep_chars).to_string()
    }

    /// Character length of a line without its trailing `\r?\n`.
    pub fn line_len_chars(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return 0;
        }
        let line_slice = self.rope.line(line);
        let mut len = line_slice.len_chars();
        if len == 0 {
            return 0;
        }
        let last_char = line_slice.char(len - 1);
        if last_char == '\n' {
            len -= 1;
            if len > 0 && line_slice.char(len - 1) == '\r' {
                len -= 1;
            }
        } else if last_char == '\r' {
            len -= 1;
        }
        len
    }

    pub fn slice_chars(&self, range: Range<usize>) -> String {
        let start = range.start.min(self.len_chars());
        let end = range.end.min(self.len_chars());
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    /// Replace a char range with new text. Range bounds are clamped to the
    /// buffer; an empty range with empty text leaves the rope untouched.
    pub fn replace_char_range(&mut self, range: Range<usize>, text: &str) {
        let len = self.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
    }
}
