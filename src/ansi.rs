//! Render attributed text as 24-bit ANSI escape sequences.

use primestudio_core::{AttributedText, Color, FontWeight};
use std::fmt::Write;

const RESET: &str = "\x1b[0m";

fn push_style(out: &mut String, foreground: Color, bold: bool) {
    if bold {
        out.push_str("\x1b[1m");
    }
    // Writing to a String cannot fail.
    let _ = write!(
        out,
        "\x1b[38;2;{};{};{}m",
        foreground.r, foreground.g, foreground.b
    );
}

/// One escape sequence per attribute run; line breaks reset styling so a
/// pager never carries color across lines.
pub fn render_ansi(text: &AttributedText) -> String {
    let source = text.text();
    let mut out = String::with_capacity(source.len() * 2);
    for run in text.runs() {
        let bold = run.attributes.font.weight >= FontWeight::Bold;
        let mut lines = source[run.range.clone()].split('\n').peekable();
        while let Some(segment) = lines.next() {
            if !segment.is_empty() {
                push_style(&mut out, run.attributes.foreground, bold);
                out.push_str(segment);
                out.push_str(RESET);
            }
            if lines.peek().is_some() {
                out.push('\n');
            }
        }
    }
    out
}
