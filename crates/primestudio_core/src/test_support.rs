//! Shared test-only helpers for primestudio_core.

use crate::grammar::{Grammar, Pattern};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Lock serializing environment mutation across test threads.
pub(crate) fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[allow(unused_unsafe)]
fn write_env(key: &str, value: Option<&str>) {
    // SAFETY: callers hold `env_lock()` for the lifetime of the guard.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// Restores an environment variable value on drop.
pub(crate) struct EnvGuard {
    key: String,
    previous: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        write_env(key, Some(value));
        Self {
            key: key.to_string(),
            previous,
        }
    }

    pub(crate) fn remove(key: &str) -> Self {
        let previous = std::env::var(key).ok();
        write_env(key, None);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        write_env(self.key.as_str(), self.previous.as_deref());
    }
}

/// Writes `<dir>/<name>.<extension>` with `body`.
///
/// # Panics
/// Panics if the file cannot be written.
pub(crate) fn write_resource(dir: &Path, name: &str, extension: &str, body: &str) {
    let path = dir.join(format!("{}.{}", name, extension));
    std::fs::write(&path, body).expect("write resource");
}

/// Small grammar with overlapping scopes: a broad identifier catch-all
/// followed by an exact keyword list.
pub(crate) fn overlapping_grammar() -> Grammar {
    Grammar {
        name: "Overlap".to_string(),
        scope_name: "source.overlap".to_string(),
        patterns: vec![
            Pattern::new("Symbols", r"[A-Za-z]+"),
            Pattern::new("Keywords", r"\b(?:BEGIN|END|IF|THEN)\b"),
            Pattern::new("Numbers", r"\b[0-9]+\b"),
        ],
    }
}
