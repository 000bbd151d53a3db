//! Auto-indent after block-opening PPL keywords.

/// Extra indentation added after a block opener.
pub const INDENT_UNIT: &str = "  ";

/// Keywords that open an indented block when they end a line.
pub const BLOCK_OPENERS: &[&str] = &["then", "do", "repeat", "case"];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Leading spaces and tabs of `line`.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map_or(line.len(), |(idx, _)| idx);
    &line[..end]
}

/// True when `line`, ignoring trailing whitespace, ends with a block opener
/// as a whole word. Matching is case-insensitive.
pub fn opens_block(line: &str) -> bool {
    let trimmed = line.trim_end();
    BLOCK_OPENERS.iter().any(|keyword| {
        let Some(split) = trimmed.len().checked_sub(keyword.len()) else {
            return false;
        };
        let Some(tail) = trimmed.get(split..) else {
            return false;
        };
        tail.eq_ignore_ascii_case(keyword)
            && !trimmed[..split].chars().next_back().is_some_and(is_word_char)
    })
}

/// Indentation to insert after a newline typed at the end of `previous_line`.
pub fn indent_after(previous_line: &str) -> String {
    let mut indent = leading_whitespace(previous_line).to_string();
    if opens_block(previous_line) {
        indent.push_str(INDENT_UNIT);
    }
    indent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_openers_add_one_unit() {
        assert_eq!(indent_after("  IF x THEN"), "    ");
        assert_eq!(indent_after("FOR I FROM 1 TO 3 DO  "), "  ");
        assert_eq!(indent_after("\tREPEAT"), "\t  ");
        assert_eq!(indent_after("CASE"), "  ");
        assert_eq!(indent_after("if x then"), "  ");
    }

    #[test]
    fn other_lines_keep_their_indentation() {
        assert_eq!(indent_after("    x := 1;"), "    ");
        assert_eq!(indent_after(""), "");
        assert_eq!(indent_after("  END;"), "  ");
    }

    #[test]
    fn openers_must_be_whole_words() {
        assert!(!opens_block("undo"));
        assert!(!opens_block("my_case"));
        assert!(!opens_block("x≠then2"));
        assert!(opens_block("x≠ then"));
        assert!(opens_block("(x)then"));
    }
}
