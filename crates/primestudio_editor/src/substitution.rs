//! Smart operator substitution: typed ASCII digraphs become the calculator's
//! single-glyph operators.

/// Digraph to glyph table, checked in order; the first suffix match wins.
pub const SUBSTITUTIONS: &[(&str, char)] = &[
    ("!=", '≠'),
    ("<>", '≠'),
    (">=", '≥'),
    ("<=", '≤'),
    ("=>", '▶'),
];

/// Chars before the cursor inspected for a digraph.
pub const LOOKBEHIND_CHARS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Substitution {
    /// Chars immediately before the cursor to replace.
    pub replace_chars: usize,
    pub glyph: char,
}

/// Find the substitution for the text just before the cursor.
///
/// `preceding` should hold at most [`LOOKBEHIND_CHARS`] chars.
pub fn find_substitution(preceding: &str) -> Option<Substitution> {
    SUBSTITUTIONS
        .iter()
        .find(|(digraph, _)| preceding.ends_with(digraph))
        .map(|(digraph, glyph)| Substitution {
            replace_chars: digraph.chars().count(),
            glyph: *glyph,
        })
}
