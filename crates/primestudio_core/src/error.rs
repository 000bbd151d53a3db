//! Error types for resource loading, highlighting, and tool invocation.
use thiserror::Error;

/// Top-level core error type.
///
/// The highlighting path never surfaces these to the user; loaders and the
/// highlighter turn them into fallbacks plus a log line.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid pattern for scope '{scope}': {message}")]
    Pattern { scope: String, message: String },

    #[error("Failed to launch '{program}': {source}")]
    ToolLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Builds a [`CoreError::NotFound`] for a named resource.
    pub fn not_found(kind: &'static str, name: &str) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
        }
    }
}
