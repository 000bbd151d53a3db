//! Line-number gutter model.
//!
//! The gutter keeps no per-line cache: numbers are derived on every layout by
//! counting line breaks up to the first visible char, then walking wrapped
//! fragments. Only continuation fragments of a wrapped line go unnumbered.

use crate::buffer::RopeBuffer;
use crate::events::EditorEvent;
use unicode_width::UnicodeWidthChar;

/// Visible window of the text view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Char index shown at the top-left of the view.
    pub first_visible_char: usize,
    pub visible_rows: usize,
    /// Display columns per visual row; `None` disables wrapping.
    pub wrap_columns: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GutterRow {
    /// Visual row within the viewport, from 0.
    pub row: usize,
    /// 1-based line number, `None` on wrapped continuation rows.
    pub line_number: Option<usize>,
    /// Char index where the fragment starts.
    pub first_char: usize,
}

/// Char offsets where each wrapped fragment of `line` starts; always begins with 0.
fn fragment_starts(line: &str, wrap_columns: Option<usize>) -> Vec<usize> {
    let mut starts = vec![0];
    let Some(columns) = wrap_columns.filter(|cols| *cols > 0) else {
        return starts;
    };
    let mut used = 0usize;
    for (idx, ch) in line.chars().enumerate() {
        let width = ch.width().unwrap_or(0);
        if used > 0 && used + width > columns {
            starts.push(idx);
            used = 0;
        }
        used += width;
    }
    starts
}

#[derive(Clone, Debug)]
pub struct LineNumberGutter {
    needs_redraw: bool,
}

impl Default for LineNumberGutter {
    fn default() -> Self {
        Self { needs_redraw: true }
    }
}

impl LineNumberGutter {
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Flag a redraw for text, scroll, and theme changes.
    pub fn observe(&mut self, event: &EditorEvent) {
        if matches!(
            event,
            EditorEvent::TextChanged { .. }
                | EditorEvent::ScrollChanged { .. }
                | EditorEvent::ThemeChanged { .. }
        ) {
            self.needs_redraw = true;
        }
    }

    /// Compute the rows to paint and clear the redraw flag.
    pub fn layout(&mut self, buffer: &RopeBuffer, viewport: Viewport) -> Vec<GutterRow> {
        self.needs_redraw = false;
        let mut rows = Vec::with_capacity(viewport.visible_rows);
        if viewport.visible_rows == 0 {
            return rows;
        }

        let first = viewport.first_visible_char.min(buffer.len_chars());
        let (mut line, mut skip_before) = buffer.char_to_line_col(first);
        while line < buffer.line_count() {
            let line_start = buffer.line_col_to_char(line, 0);
            let text = buffer.line_without_newline(line);
            let starts = fragment_starts(&text, viewport.wrap_columns);
            for (idx, start) in starts.iter().enumerate() {
                let end = starts.get(idx + 1).copied().unwrap_or(usize::MAX);
                if end <= skip_before {
                    continue;
                }
                rows.push(GutterRow {
                    row: rows.len(),
                    line_number: (idx == 0).then_some(line + 1),
                    first_char: line_start + start,
                });
                if rows.len() == viewport.visible_rows {
                    return rows;
                }
            }
            skip_before = 0;
            line += 1;
        }
        rows
    }
}
