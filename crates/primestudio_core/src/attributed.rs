//! Attributed text: a string plus gap-free attribute runs over byte ranges.
//!
//! Attribute writes go through [`AttributeBatch`], which stages changes on a
//! private copy of the runs. Readers only ever observe the committed runs, so
//! a highlight pass is never visible half-painted.

use crate::color::Color;
use crate::constants::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TAB_WIDTH};
use crate::theme::{FontWeight, Theme};
use std::ops::Range;

/// Font face description.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
    pub weight: FontWeight,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32, weight: FontWeight) -> Self {
        Self {
            family: family.into(),
            size,
            weight,
            italic: false,
        }
    }

    /// Same family, size, and slant with a bold weight.
    pub fn bold_variant(&self) -> Self {
        Self {
            weight: self.weight.bolded(),
            ..self.clone()
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, FontWeight::Regular)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParagraphStyle {
    pub tab_width: u8,
    pub line_spacing: f32,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            line_spacing: 1.0,
        }
    }
}

/// Visual attributes applied to a run of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextAttributes {
    pub font: FontSpec,
    pub foreground: Color,
    pub background: Option<Color>,
    pub kerning: f32,
    pub ligatures: u8,
    pub paragraph: ParagraphStyle,
}

impl Default for TextAttributes {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            foreground: Color::BLACK,
            background: None,
            kerning: 0.0,
            ligatures: 0,
            paragraph: ParagraphStyle::default(),
        }
    }
}

impl TextAttributes {
    /// Baseline attributes for a theme: editor font at the theme weight,
    /// no kerning, no ligatures, theme foreground.
    pub fn base(theme: &Theme, font_family: &str, font_size: f32, tab_width: u8) -> Self {
        Self {
            font: FontSpec::new(font_family, font_size, theme.font_weight),
            foreground: theme.editor_foreground(),
            background: None,
            kerning: 0.0,
            ligatures: 0,
            paragraph: ParagraphStyle {
                tab_width,
                line_spacing: 1.0,
            },
        }
    }
}

/// A maximal byte range sharing one attribute value.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeRun {
    pub range: Range<usize>,
    pub attributes: TextAttributes,
}

/// Text plus attribute runs that always cover `0..len` exactly.
#[derive(Clone, Debug, Default)]
pub struct AttributedText {
    text: String,
    runs: Vec<AttributeRun>,
    revision: u64,
}

impl AttributedText {
    pub fn new(text: &str, attributes: TextAttributes) -> Self {
        let mut out = Self::default();
        out.set_text(text, attributes);
        out.revision = 0;
        out
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Committed runs in ascending order.
    pub fn runs(&self) -> &[AttributeRun] {
        &self.runs
    }

    /// Counter bumped by every committed text or attribute change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Attributes in effect at `byte`, if it lies inside the text.
    pub fn attributes_at(&self, byte: usize) -> Option<&TextAttributes> {
        run_index_at(&self.runs, byte).map(|idx| &self.runs[idx].attributes)
    }

    pub fn foreground_at(&self, byte: usize) -> Option<Color> {
        self.attributes_at(byte).map(|attrs| attrs.foreground)
    }

    /// Replace all text with a single run of `attributes`.
    pub fn set_text(&mut self, text: &str, attributes: TextAttributes) {
        self.text = text.to_string();
        self.runs.clear();
        if !self.text.is_empty() {
            self.runs.push(AttributeRun {
                range: 0..self.text.len(),
                attributes,
            });
        }
        self.revision = self.revision.wrapping_add(1);
    }

    /// Splice `replacement` over `range`; inserted bytes take `attributes`.
    pub fn replace_text(
        &mut self,
        range: Range<usize>,
        replacement: &str,
        attributes: TextAttributes,
    ) {
        let range = snap_range(&self.text, range);
        if range.is_empty() && replacement.is_empty() {
            return;
        }
        split_run_at(&mut self.runs, range.start);
        split_run_at(&mut self.runs, range.end);
        let first = self.runs.partition_point(|run| run.range.end <= range.start);
        let last = self.runs.partition_point(|run| run.range.start < range.end);
        self.runs.drain(first..last);

        let removed = range.end - range.start;
        let inserted = replacement.len();
        for run in &mut self.runs[first..] {
            run.range =
                (run.range.start - removed + inserted)..(run.range.end - removed + inserted);
        }
        if inserted > 0 {
            self.runs.insert(
                first,
                AttributeRun {
                    range: range.start..range.start + inserted,
                    attributes,
                },
            );
        }
        self.text.replace_range(range, replacement);
        coalesce_runs(&mut self.runs);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Open a batched-edit scope. Changes become visible on commit or drop.
    pub fn begin_editing(&mut self) -> AttributeBatch<'_> {
        let staged = self.runs.clone();
        AttributeBatch {
            target: self,
            staged,
            finished: false,
        }
    }
}

/// Batched-edit scope over an [`AttributedText`].
pub struct AttributeBatch<'a> {
    target: &'a mut AttributedText,
    staged: Vec<AttributeRun>,
    finished: bool,
}

impl AttributeBatch<'_> {
    /// Text being edited; text is fixed for the lifetime of the batch.
    pub fn text(&self) -> &str {
        self.target.text()
    }

    /// Replace attributes over `range`.
    pub fn set_attributes(&mut self, range: Range<usize>, attributes: &TextAttributes) {
        self.update(range, |attrs| *attrs = attributes.clone());
    }

    pub fn set_foreground(&mut self, range: Range<usize>, color: Color) {
        self.update(range, |attrs| attrs.foreground = color);
    }

    pub fn set_font(&mut self, range: Range<usize>, font: &FontSpec) {
        self.update(range, |attrs| attrs.font = font.clone());
    }

    /// Apply `edit` to every staged run inside `range`, splitting at the edges.
    pub fn update(&mut self, range: Range<usize>, mut edit: impl FnMut(&mut TextAttributes)) {
        let range = snap_range(&self.target.text, range);
        if range.is_empty() {
            return;
        }
        split_run_at(&mut self.staged, range.start);
        split_run_at(&mut self.staged, range.end);
        let first = self.staged.partition_point(|run| run.range.end <= range.start);
        for run in &mut self.staged[first..] {
            if run.range.start >= range.end {
                break;
            }
            edit(&mut run.attributes);
        }
    }

    /// Publish staged runs.
    pub fn commit(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let mut staged = std::mem::take(&mut self.staged);
        coalesce_runs(&mut staged);
        if staged != self.target.runs {
            self.target.runs = staged;
            self.target.revision = self.target.revision.wrapping_add(1);
        }
    }
}

impl Drop for AttributeBatch<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut idx = index.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut idx = index.min(text.len());
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Clamp to the text and widen to char boundaries.
fn snap_range(text: &str, range: Range<usize>) -> Range<usize> {
    let start = floor_char_boundary(text, range.start);
    let end = ceil_char_boundary(text, range.end).max(start);
    start..end
}

fn run_index_at(runs: &[AttributeRun], byte: usize) -> Option<usize> {
    let idx = runs.partition_point(|run| run.range.end <= byte);
    (idx < runs.len() && runs[idx].range.start <= byte).then_some(idx)
}

fn split_run_at(runs: &mut Vec<AttributeRun>, at: usize) {
    let Some(idx) = run_index_at(runs, at) else {
        return;
    };
    if runs[idx].range.start == at {
        return;
    }
    let end = runs[idx].range.end;
    runs[idx].range.end = at;
    let tail = AttributeRun {
        range: at..end,
        attributes: runs[idx].attributes.clone(),
    };
    runs.insert(idx + 1, tail);
}

fn coalesce_runs(runs: &mut Vec<AttributeRun>) {
    runs.retain(|run| !run.range.is_empty());
    let mut merged: Vec<AttributeRun> = Vec::with_capacity(runs.len());
    for run in runs.drain(..) {
        if let Some(last) = merged.last_mut() {
            if last.range.end == run.range.start && last.attributes == run.attributes {
                last.range.end = run.range.end;
                continue;
            }
        }
        merged.push(run);
    }
    *runs = merged;
}
