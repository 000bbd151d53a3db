//! Scope-to-color resolution computed once per theme load.

use crate::color::Color;
use crate::grammar::Grammar;
use crate::theme::Theme;
use std::collections::HashMap;

/// Scope names shared by every bundled grammar.
pub const KNOWN_SCOPES: &[&str] = &[
    "Functions",
    "Keywords",
    "Numbers",
    "Strings",
    "Operators",
    "Brackets",
    "Comments",
    "Preprocessor Statements",
    "Backquotes",
    "Namespace",
    "Symbols",
    "Units",
];

/// Resolved foreground per scope name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorMap {
    colors: HashMap<String, Color>,
}

impl ColorMap {
    /// Resolve every known scope; unresolved scopes take the editor foreground.
    pub fn from_theme(theme: &Theme) -> Self {
        let mut map = Self::default();
        for scope in KNOWN_SCOPES {
            map.resolve(theme, scope);
        }
        map
    }

    /// Resolve known scopes plus every scope `grammar` references.
    pub fn for_grammar(theme: &Theme, grammar: &Grammar) -> Self {
        let mut map = Self::from_theme(theme);
        for scope in grammar.referenced_scopes() {
            map.resolve(theme, scope);
        }
        map
    }

    fn resolve(&mut self, theme: &Theme, scope: &str) {
        if self.colors.contains_key(scope) {
            return;
        }
        let color = theme
            .token_color(scope)
            .unwrap_or_else(|| theme.editor_foreground());
        self.colors.insert(scope.to_string(), color);
    }

    pub fn get(&self, scope: &str) -> Option<Color> {
        self.colors.get(scope).copied()
    }

    /// Override or add a single scope color.
    pub fn insert(&mut self, scope: impl Into<String>, color: Color) {
        self.colors.insert(scope.into(), color);
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
