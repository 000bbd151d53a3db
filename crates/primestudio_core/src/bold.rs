//! Bolds literal marker strings (`Syntax:`, `Example:`, ...) in static help
//! text. Independent of grammars and themes; colors are never touched.

use crate::attributed::AttributedText;
use std::ops::Range;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

fn chars_match(a: char, b: char, case: CaseSensitivity) -> bool {
    match case {
        CaseSensitivity::Sensitive => a == b,
        CaseSensitivity::Insensitive => a == b || a.to_lowercase().eq(b.to_lowercase()),
    }
}

/// Byte ranges of non-overlapping occurrences of `marker`, scanning left to right.
pub fn find_occurrences(text: &str, marker: &str, case: CaseSensitivity) -> Vec<Range<usize>> {
    if marker.is_empty() {
        return Vec::new();
    }
    if case == CaseSensitivity::Sensitive {
        return text
            .match_indices(marker)
            .map(|(start, found)| start..start + found.len())
            .collect();
    }

    let mut out = Vec::new();
    let mut offset = 0;
    while offset < text.len() {
        let rest = &text[offset..];
        let mut haystack = rest.char_indices();
        let mut end = None;
        let mut matched = true;
        for expected in marker.chars() {
            match haystack.next() {
                Some((_, actual)) if chars_match(actual, expected, case) => {}
                _ => {
                    matched = false;
                    break;
                }
            }
        }
        if matched {
            end = Some(haystack.next().map_or(rest.len(), |(idx, _)| idx));
        }
        match end {
            Some(len) => {
                out.push(offset..offset + len);
                offset += len;
            }
            None => {
                offset += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    out
}

/// Bold every occurrence of `marker`, keeping each run's other font traits.
///
/// # Returns
/// Number of occurrences emboldened.
pub fn embolden_markers(text: &mut AttributedText, marker: &str, case: CaseSensitivity) -> usize {
    let ranges = find_occurrences(text.text(), marker, case);
    if ranges.is_empty() {
        return 0;
    }
    let mut batch = text.begin_editing();
    for range in &ranges {
        batch.update(range.clone(), |attrs| attrs.font = attrs.font.bold_variant());
    }
    batch.commit();
    ranges.len()
}

/// Apply [`embolden_markers`] for each marker in turn.
pub fn embolden_all(text: &mut AttributedText, markers: &[&str], case: CaseSensitivity) -> usize {
    markers
        .iter()
        .map(|marker| embolden_markers(text, marker, case))
        .sum()
}
