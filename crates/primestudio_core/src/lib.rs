//! Core library for PrimeStudio (models, loader, highlighting, tools).

/// Attributed text storage with batched edits.
pub mod attributed;
/// Bold-marker pass for static help text.
pub mod bold;
/// Hex colors.
pub mod color;
/// Scope-to-color resolution derived from a theme.
pub mod color_map;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants (defaults, settings keys, file extensions).
pub mod constants;
/// Core error types.
pub mod error;
/// Grammar model and document parsing.
pub mod grammar;
/// Grammar-driven highlighter engine.
pub mod highlight;
/// Theme and grammar resource loader.
pub mod loader;
/// Persisted preference stores.
pub mod settings;
/// Theme model and document parsing.
pub mod theme;
#[cfg(test)]
pub(crate) mod test_support;
/// External compiler/pretty-printer invocation.
pub mod tools;

pub use attributed::{
    AttributeBatch, AttributeRun, AttributedText, FontSpec, ParagraphStyle, TextAttributes,
};
pub use bold::{embolden_all, embolden_markers, CaseSensitivity};
pub use color::Color;
pub use color_map::{ColorMap, KNOWN_SCOPES};
pub use config::Config;
pub use error::CoreError;
pub use grammar::{Grammar, Pattern};
pub use highlight::{compile_pattern, HighlightReport, Highlighter};
pub use loader::ResourceLoader;
pub use settings::{JsonFileSettings, MemorySettings, SettingsStore};
pub use theme::{FontWeight, Theme, TokenColor};
pub use tools::{run_tool, ToolInvocation, ToolOutput};
