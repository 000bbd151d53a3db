//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TAB_WIDTH};
use std::env;
use std::path::PathBuf;

/// Runtime configuration for PrimeStudio.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directories searched for `.pstheme` / `.psgrammar` resources, in order.
    pub resource_dirs: Vec<PathBuf>,
    pub settings_path: PathBuf,
    pub font_family: String,
    pub font_size: f32,
    pub tab_width: u8,
    /// Log timing for every highlight pass.
    pub highlight_trace: bool,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn resolve_home_dir() -> Option<PathBuf> {
    // Prefer explicit HOME if set (Unix, some Windows shells)
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    if let (Ok(drive), Ok(path)) = (env::var("HOMEDRIVE"), env::var("HOMEPATH")) {
        if !drive.trim().is_empty() && !path.trim().is_empty() {
            return Some(PathBuf::from(format!("{}{}", drive, path)));
        }
    }

    std::env::current_dir().ok()
}

fn config_root() -> PathBuf {
    resolve_home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("primestudio")
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn parse_resource_dirs(raw: &str) -> Vec<PathBuf> {
    env::split_paths(raw)
        .filter(|path| !path.as_os_str().is_empty())
        .map(|path| expand_tilde(path.to_string_lossy().to_string()))
        .collect()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            resource_dirs: env::var("PRIMESTUDIO_RESOURCE_DIRS")
                .ok()
                .map(|raw| parse_resource_dirs(&raw))
                .filter(|dirs| !dirs.is_empty())
                .unwrap_or_else(|| vec![config_root().join("resources")]),
            settings_path: env::var("PRIMESTUDIO_SETTINGS_PATH")
                .map(expand_tilde)
                .unwrap_or_else(|_| config_root().join("settings.json")),
            font_family: env::var("PRIMESTUDIO_FONT")
                .ok()
                .map(|font| font.trim().to_string())
                .filter(|font| !font.is_empty())
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
            font_size: env::var("PRIMESTUDIO_FONT_SIZE")
                .ok()
                .and_then(|s| s.trim().parse::<f32>().ok())
                .filter(|size| *size > 0.0)
                .unwrap_or(DEFAULT_FONT_SIZE),
            tab_width: env::var("PRIMESTUDIO_TAB_WIDTH")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .filter(|width| *width > 0)
                .unwrap_or(DEFAULT_TAB_WIDTH),
            highlight_trace: env_flag_enabled("PRIMESTUDIO_HIGHLIGHT_TRACE"),
        }
    }
}
