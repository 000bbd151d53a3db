//! Theme and grammar resolution by name, with preference persistence and a
//! built-in default fallback.

use crate::config::Config;
use crate::constants::{
    DEFAULT_GRAMMAR_NAME, DEFAULT_THEME_NAME, GRAMMAR_EXTENSION, PREFERRED_GRAMMAR_KEY,
    PREFERRED_THEME_KEY, THEME_EXTENSION,
};
use crate::error::CoreError;
use crate::grammar::Grammar;
use crate::settings::SettingsStore;
use crate::theme::Theme;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

const BUILTIN_THEMES: &[(&str, &str)] = &[
    ("Default", include_str!("../resources/Default.pstheme")),
    ("Prime Light", include_str!("../resources/Prime Light.pstheme")),
];

const BUILTIN_GRAMMARS: &[(&str, &str)] = &[(
    "HP Prime PPL",
    include_str!("../resources/HP Prime PPL.psgrammar"),
)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ResourceKind {
    Theme,
    Grammar,
}

impl ResourceKind {
    fn label(self) -> &'static str {
        match self {
            Self::Theme => "theme",
            Self::Grammar => "grammar",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Theme => THEME_EXTENSION,
            Self::Grammar => GRAMMAR_EXTENSION,
        }
    }

    fn builtins(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Theme => BUILTIN_THEMES,
            Self::Grammar => BUILTIN_GRAMMARS,
        }
    }
}

fn is_valid_resource_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty()
        && trimmed != "."
        && trimmed != ".."
        && !trimmed.contains(['/', '\\'])
}

/// Resolves named themes and grammars from search directories and built-ins.
pub struct ResourceLoader {
    search_dirs: Vec<PathBuf>,
    settings: Arc<dyn SettingsStore>,
    current_theme: Option<String>,
    current_grammar: Option<String>,
}

impl ResourceLoader {
    /// Create a loader searching `search_dirs` in order before the built-ins.
    pub fn new(search_dirs: Vec<PathBuf>, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            search_dirs,
            settings,
            current_theme: None,
            current_grammar: None,
        }
    }

    pub fn from_config(config: &Config, settings: Arc<dyn SettingsStore>) -> Self {
        Self::new(config.resource_dirs.clone(), settings)
    }

    pub fn settings(&self) -> &Arc<dyn SettingsStore> {
        &self.settings
    }

    fn read_resource(&self, kind: ResourceKind, name: &str) -> Result<String, CoreError> {
        if !is_valid_resource_name(name) {
            return Err(CoreError::not_found(kind.label(), name));
        }
        let name = name.trim();
        let file_name = format!("{}.{}", name, kind.extension());
        for dir in &self.search_dirs {
            let path = dir.join(&file_name);
            if path.is_file() {
                debug!(path = %path.display(), "reading {} resource", kind.label());
                return Ok(fs::read_to_string(&path)?);
            }
        }
        kind.builtins()
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, body)| body.to_string())
            .ok_or_else(|| CoreError::not_found(kind.label(), name))
    }

    /// Load and parse a theme without touching preferences.
    ///
    /// # Errors
    /// [`CoreError::NotFound`] when no resource has that name, or an I/O or
    /// parse error from reading it.
    pub fn try_load_theme(&self, name: &str) -> Result<Theme, CoreError> {
        let body = self.read_resource(ResourceKind::Theme, name)?;
        Theme::from_json(&body, name.trim())
    }

    /// Load and parse a grammar without touching preferences.
    ///
    /// # Errors
    /// Same contract as [`Self::try_load_theme`].
    pub fn try_load_grammar(&self, name: &str) -> Result<Grammar, CoreError> {
        let body = self.read_resource(ResourceKind::Grammar, name)?;
        Grammar::from_json(&body, name.trim())
    }

    /// Load a theme and persist it as the preferred theme.
    ///
    /// # Returns
    /// `None` when the theme is missing or malformed; callers keep their
    /// previous theme in that case.
    pub fn load_theme(&mut self, name: &str) -> Option<Theme> {
        match self.try_load_theme(name) {
            Ok(theme) => {
                let name = name.trim();
                self.settings.set_string(PREFERRED_THEME_KEY, name);
                self.current_theme = Some(name.to_string());
                info!(theme = name, "theme loaded");
                Some(theme)
            }
            Err(err) => {
                warn!(theme = name, "failed to load theme: {}", err);
                None
            }
        }
    }

    /// Load the persisted theme, falling back to the default theme.
    pub fn load_preferred_theme(&mut self) -> Option<Theme> {
        if let Some(preferred) = self.preferred(PREFERRED_THEME_KEY) {
            if let Some(theme) = self.load_theme(&preferred) {
                return Some(theme);
            }
        }
        self.load_theme(DEFAULT_THEME_NAME)
    }

    /// Load a grammar and persist it as the preferred grammar.
    pub fn load_grammar(&mut self, name: &str) -> Option<Grammar> {
        match self.try_load_grammar(name) {
            Ok(grammar) => {
                let name = name.trim();
                self.settings.set_string(PREFERRED_GRAMMAR_KEY, name);
                self.current_grammar = Some(name.to_string());
                info!(grammar = name, "grammar loaded");
                Some(grammar)
            }
            Err(err) => {
                warn!(grammar = name, "failed to load grammar: {}", err);
                None
            }
        }
    }

    /// Load the persisted grammar, falling back to the default grammar.
    pub fn load_preferred_grammar(&mut self) -> Option<Grammar> {
        if let Some(preferred) = self.preferred(PREFERRED_GRAMMAR_KEY) {
            if let Some(grammar) = self.load_grammar(&preferred) {
                return Some(grammar);
            }
        }
        self.load_grammar(DEFAULT_GRAMMAR_NAME)
    }

    fn preferred(&self, key: &str) -> Option<String> {
        self.settings
            .get_string(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// True when `name` is the grammar most recently loaded by this loader.
    pub fn is_grammar_loaded(&self, name: &str) -> bool {
        self.current_grammar.as_deref() == Some(name.trim())
    }

    pub fn is_theme_loaded(&self, name: &str) -> bool {
        self.current_theme.as_deref() == Some(name.trim())
    }

    pub fn current_theme_name(&self) -> Option<&str> {
        self.current_theme.as_deref()
    }

    pub fn current_grammar_name(&self) -> Option<&str> {
        self.current_grammar.as_deref()
    }

    /// Sorted theme names from search directories and built-ins.
    pub fn available_themes(&self) -> Vec<String> {
        self.available(ResourceKind::Theme)
    }

    /// Sorted grammar names from search directories and built-ins.
    pub fn available_grammars(&self) -> Vec<String> {
        self.available(ResourceKind::Grammar)
    }

    fn available(&self, kind: ResourceKind) -> Vec<String> {
        let mut names: BTreeSet<String> = kind
            .builtins()
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        for dir in &self.search_dirs {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some(kind.extension()) {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    names.insert(stem.to_string());
                }
            }
        }
        names.into_iter().collect()
    }
}
