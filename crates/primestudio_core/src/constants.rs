//! Shared constants used across PrimeStudio crates.

/// Theme used when no preference is stored or the preferred theme fails to load.
pub const DEFAULT_THEME_NAME: &str = "Default";

/// Grammar used when no preference is stored or the preferred grammar fails to load.
pub const DEFAULT_GRAMMAR_NAME: &str = "HP Prime PPL";

/// File extension for theme resources.
pub const THEME_EXTENSION: &str = "pstheme";
/// File extension for grammar resources.
pub const GRAMMAR_EXTENSION: &str = "psgrammar";

/// Settings key holding the last successfully loaded theme name.
pub const PREFERRED_THEME_KEY: &str = "preferredTheme";
/// Settings key holding the last successfully loaded grammar name.
pub const PREFERRED_GRAMMAR_KEY: &str = "preferredGrammar";
/// Settings key for the smart operator substitution toggle.
pub const SMART_SUBSTITUTION_KEY: &str = "smartSubstitution";

/// Default editor font family.
pub const DEFAULT_FONT_FAMILY: &str = "Menlo";
/// Default editor font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 13.0;
/// Default tab width in columns.
pub const DEFAULT_TAB_WIDTH: u8 = 2;

/// Theme UI keys read by the editor.
pub const EDITOR_FOREGROUND_KEY: &str = "editor.foreground";
/// Background color key.
pub const EDITOR_BACKGROUND_KEY: &str = "editor.background";
/// Selection background color key.
pub const EDITOR_SELECTION_KEY: &str = "editor.selectionBackground";
/// Cursor color key.
pub const EDITOR_CURSOR_KEY: &str = "editor.cursor";
