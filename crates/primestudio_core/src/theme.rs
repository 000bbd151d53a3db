//! Theme model: UI colors, scope colors, and font weight.

use crate::color::Color;
use crate::constants::{
    EDITOR_BACKGROUND_KEY, EDITOR_CURSOR_KEY, EDITOR_FOREGROUND_KEY, EDITOR_SELECTION_KEY,
};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

const FALLBACK_FOREGROUND: Color = Color::rgb(0xD4, 0xD4, 0xD4);
const FALLBACK_BACKGROUND: Color = Color::rgb(0x1E, 0x1E, 0x1E);
const FALLBACK_SELECTION: Color = Color::rgb(0x26, 0x4F, 0x78);

/// Font weight applied to editor text, lightest to heaviest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FontWeight {
    UltraLight,
    Thin,
    Light,
    #[default]
    Regular,
    Medium,
    Semibold,
    Bold,
    Heavy,
    Black,
}

impl FontWeight {
    /// Parse a weight name case-insensitively (`ultraLight`, `semibold`, ...).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let weight = match normalized.as_str() {
            "ultralight" => Self::UltraLight,
            "thin" => Self::Thin,
            "light" => Self::Light,
            "regular" => Self::Regular,
            "medium" => Self::Medium,
            "semibold" => Self::Semibold,
            "bold" => Self::Bold,
            "heavy" => Self::Heavy,
            "black" => Self::Black,
            _ => return None,
        };
        Some(weight)
    }

    /// Bold variant of this weight; weights at or above bold are kept.
    pub fn bolded(self) -> Self {
        self.max(Self::Bold)
    }
}

/// One `tokenColors` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenColor {
    pub scopes: Vec<String>,
    pub foreground: Color,
}

/// A parsed, immutable color theme.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub name: String,
    pub colors: BTreeMap<String, Color>,
    pub token_colors: Vec<TokenColor>,
    pub font_weight: FontWeight,
}

impl Theme {
    /// Theme with no token colors; every scope renders in the fallback foreground.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colors: BTreeMap::new(),
            token_colors: Vec::new(),
            font_weight: FontWeight::Regular,
        }
    }

    /// Foreground for `scope` from the first `tokenColors` entry listing it.
    pub fn token_color(&self, scope: &str) -> Option<Color> {
        self.token_colors
            .iter()
            .find(|entry| entry.scopes.iter().any(|candidate| candidate == scope))
            .map(|entry| entry.foreground)
    }

    /// UI color by key, if the theme defines it.
    pub fn color(&self, key: &str) -> Option<Color> {
        self.colors.get(key).copied()
    }

    pub fn editor_foreground(&self) -> Color {
        self.color(EDITOR_FOREGROUND_KEY).unwrap_or(FALLBACK_FOREGROUND)
    }

    pub fn editor_background(&self) -> Color {
        self.color(EDITOR_BACKGROUND_KEY).unwrap_or(FALLBACK_BACKGROUND)
    }

    pub fn selection_background(&self) -> Color {
        self.color(EDITOR_SELECTION_KEY).unwrap_or(FALLBACK_SELECTION)
    }

    /// Cursor color, defaulting to the editor foreground.
    pub fn cursor_color(&self) -> Color {
        self.color(EDITOR_CURSOR_KEY)
            .unwrap_or_else(|| self.editor_foreground())
    }

    /// Parse a theme document.
    ///
    /// # Arguments
    /// - `source`: JSON theme document.
    /// - `fallback_name`: Name used when the document omits `name`.
    ///
    /// # Returns
    /// The theme with unparseable colors dropped.
    ///
    /// # Errors
    /// Returns [`CoreError::Json`] when the document is not a valid theme shape.
    pub fn from_json(source: &str, fallback_name: &str) -> Result<Self, CoreError> {
        let document: ThemeDocument = serde_json::from_str(source)?;
        Ok(document.into_theme(fallback_name))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScopeList {
    One(String),
    Many(Vec<String>),
}

impl ScopeList {
    fn into_scopes(self) -> Vec<String> {
        let raw = match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        };
        raw.iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|scope| !scope.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Deserialize, Default)]
struct TokenSettingsDocument {
    foreground: Option<String>,
}

#[derive(Deserialize)]
struct TokenColorDocument {
    scope: Option<ScopeList>,
    #[serde(default)]
    settings: TokenSettingsDocument,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeDocument {
    name: Option<String>,
    #[serde(default)]
    colors: HashMap<String, String>,
    #[serde(default)]
    token_colors: Vec<TokenColorDocument>,
    #[serde(alias = "weight")]
    font_weight: Option<String>,
}

impl ThemeDocument {
    fn into_theme(self, fallback_name: &str) -> Theme {
        let name = self
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| fallback_name.to_string());

        let mut colors = BTreeMap::new();
        for (key, raw) in self.colors {
            match Color::from_hex(&raw) {
                Some(color) => {
                    colors.insert(key, color);
                }
                None => warn!(
                    theme = name.as_str(),
                    key = key.as_str(),
                    value = raw.as_str(),
                    "ignoring unparseable theme color"
                ),
            }
        }

        let mut token_colors = Vec::with_capacity(self.token_colors.len());
        for entry in self.token_colors {
            let scopes = entry.scope.map(ScopeList::into_scopes).unwrap_or_default();
            if scopes.is_empty() {
                continue;
            }
            let Some(raw) = entry.settings.foreground else {
                continue;
            };
            match Color::from_hex(&raw) {
                Some(foreground) => token_colors.push(TokenColor { scopes, foreground }),
                None => warn!(
                    theme = name.as_str(),
                    value = raw.as_str(),
                    "ignoring token color with unparseable foreground"
                ),
            }
        }

        let font_weight = match self.font_weight.as_deref() {
            None => FontWeight::Regular,
            Some(raw) => FontWeight::parse(raw).unwrap_or_else(|| {
                warn!(theme = name.as_str(), value = raw, "unknown font weight, using regular");
                FontWeight::Regular
            }),
        };

        Theme {
            name,
            colors,
            token_colors,
            font_weight,
        }
    }
}
