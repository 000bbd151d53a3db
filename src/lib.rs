//! Root crate facade for PrimeStudio: the highlighting core, the editing
//! surface, and the terminal rendering used by the `primestudio` binary.

pub mod ansi;
pub mod logging;

pub use primestudio_core::{
    config, constants, error, Color, ColorMap, Config, CoreError, Grammar, Highlighter,
    ResourceLoader, SettingsStore, Theme,
};
pub use primestudio_editor as editor;
pub use primestudio_editor::{EditorConfig, EditorSurface};
