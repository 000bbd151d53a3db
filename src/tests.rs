//! Unit tests for the `primestudio` CLI entrypoint module.

use super::{format_listing, highlight_file, Cli, Commands};
use clap::Parser;
use primestudio::constants::DEFAULT_THEME_NAME;
use primestudio::{Config, ResourceLoader};
use primestudio_core::{CaseSensitivity, MemorySettings};
use std::sync::Arc;
use tempfile::TempDir;

fn test_config(dir: &TempDir) -> Config {
    Config {
        resource_dirs: vec![dir.path().join("resources")],
        settings_path: dir.path().join("settings.json"),
        font_family: "Menlo".to_string(),
        font_size: 13.0,
        tab_width: 2,
        highlight_trace: false,
    }
}

#[test]
fn listing_marks_preferred_entry() {
    let names = vec!["Default".to_string(), "Prime Light".to_string()];
    assert_eq!(
        format_listing(&names, "Prime Light"),
        "  Default\n* Prime Light"
    );
    assert_eq!(format_listing(&[], DEFAULT_THEME_NAME), "");
}

#[test]
fn run_collects_flags_after_separator() {
    let cli = Cli::try_parse_from([
        "primestudio",
        "run",
        "ppl-compile",
        "demo.hpppl",
        "-o",
        "demo.hpprgm",
        "--",
        "--strict",
        "-v",
    ])
    .expect("parse");
    let Commands::Run {
        program,
        dest,
        flags,
        ..
    } = cli.command
    else {
        panic!("expected run");
    };
    assert_eq!(program.to_str(), Some("ppl-compile"));
    assert_eq!(dest.to_str(), Some("demo.hpprgm"));
    assert_eq!(flags, vec!["--strict".to_string(), "-v".to_string()]);
}

#[test]
fn highlight_accepts_repeated_bold_markers() {
    let cli = Cli::try_parse_from([
        "primestudio",
        "highlight",
        "help.txt",
        "--bold",
        "Syntax:",
        "--bold",
        "Example:",
        "--resource-dir",
        "/tmp/themes",
    ])
    .expect("parse");
    assert_eq!(cli.resource_dirs.len(), 1);
    let Commands::Highlight { bold, theme, .. } = cli.command else {
        panic!("expected highlight");
    };
    assert_eq!(bold, vec!["Syntax:".to_string(), "Example:".to_string()]);
    assert!(theme.is_none());
}

#[test]
fn highlight_file_renders_colored_output() {
    let dir = TempDir::new().expect("temp dir");
    let config = test_config(&dir);
    let file = dir.path().join("demo.hpppl");
    std::fs::write(&file, "BEGIN\n  RETURN 1;\nEND;\n").expect("write");
    let mut loader = ResourceLoader::new(Vec::new(), Arc::new(MemorySettings::new()));

    let rendered = highlight_file(
        &config,
        &mut loader,
        &file,
        None,
        None,
        &["return".to_string()],
        CaseSensitivity::Insensitive,
    )
    .expect("highlight");
    assert!(rendered.contains("BEGIN"));
    assert!(rendered.contains("\x1b[38;2;"));
    assert!(rendered.contains("\x1b[1m"));
    assert_eq!(rendered.matches('\n').count(), 3);
}

#[test]
fn highlight_file_reports_missing_inputs() {
    let dir = TempDir::new().expect("temp dir");
    let config = test_config(&dir);
    let mut loader = ResourceLoader::new(Vec::new(), Arc::new(MemorySettings::new()));
    let missing = dir.path().join("missing.hpppl");
    assert!(highlight_file(
        &config,
        &mut loader,
        &missing,
        None,
        None,
        &[],
        CaseSensitivity::Sensitive
    )
    .is_err());

    let file = dir.path().join("demo.hpppl");
    std::fs::write(&file, "BEGIN").expect("write");
    assert!(highlight_file(
        &config,
        &mut loader,
        &file,
        Some("No Such Theme"),
        None,
        &[],
        CaseSensitivity::Sensitive
    )
    .is_err());
}
