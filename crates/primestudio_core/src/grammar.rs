//! Grammar model: an ordered list of scope/regex patterns.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// One grammar entry. Later patterns repaint earlier ones where they overlap.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(rename = "name")]
    pub scope: String,
    #[serde(rename = "match", default)]
    pub match_expr: String,
}

impl Pattern {
    pub fn new(scope: impl Into<String>, match_expr: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            match_expr: match_expr.into(),
        }
    }

    /// True for placeholder entries with no match expression.
    pub fn is_placeholder(&self) -> bool {
        self.match_expr.trim().is_empty()
    }
}

/// A parsed, immutable grammar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grammar {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scope_name: String,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
}

impl Grammar {
    /// Parse a grammar document, filling a missing `name` from `fallback_name`.
    ///
    /// # Errors
    /// Returns [`CoreError::Json`] when the document is not a valid grammar shape.
    pub fn from_json(source: &str, fallback_name: &str) -> Result<Self, CoreError> {
        let mut grammar: Grammar = serde_json::from_str(source)?;
        if grammar.name.trim().is_empty() {
            grammar.name = fallback_name.to_string();
        }
        Ok(grammar)
    }

    /// Distinct scope names referenced by the patterns, in first-use order.
    pub fn referenced_scopes(&self) -> Vec<&str> {
        let mut scopes: Vec<&str> = Vec::new();
        for pattern in &self.patterns {
            if !scopes.contains(&pattern.scope.as_str()) {
                scopes.push(pattern.scope.as_str());
            }
        }
        scopes
    }

    /// Stable fingerprint of name, scope name, and every pattern.
    pub fn identity(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
