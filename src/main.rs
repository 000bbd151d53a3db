//! `primestudio` command-line entrypoint: highlight PPL files in the
//! terminal, list resources, and run external tools.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use primestudio::ansi::render_ansi;
use primestudio::constants::{
    DEFAULT_GRAMMAR_NAME, DEFAULT_THEME_NAME, PREFERRED_GRAMMAR_KEY, PREFERRED_THEME_KEY,
};
use primestudio::logging::init_tracing;
use primestudio::{ColorMap, Config, Highlighter, ResourceLoader, SettingsStore};
use primestudio_core::{
    embolden_all, run_tool, AttributedText, CaseSensitivity, JsonFileSettings, TextAttributes,
    ToolInvocation,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "primestudio", about = "HP Prime PPL highlighting tools", version)]
struct Cli {
    /// Extra resource directory, searched before the configured ones
    #[arg(long = "resource-dir", global = true)]
    resource_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a file with syntax colors
    Highlight {
        file: PathBuf,
        /// Theme name (defaults to the preferred theme)
        #[arg(long)]
        theme: Option<String>,
        /// Grammar name (defaults to the preferred grammar)
        #[arg(long)]
        grammar: Option<String>,
        /// Literal marker to embolden; repeatable
        #[arg(long = "bold")]
        bold: Vec<String>,
        /// Match bold markers case-insensitively
        #[arg(long)]
        ignore_case: bool,
    },
    /// List available themes
    Themes,
    /// List available grammars
    Grammars,
    /// Run an external compiler or formatter
    Run {
        program: PathBuf,
        source: PathBuf,
        #[arg(short = 'o', long)]
        dest: PathBuf,
        /// Extra flags passed after the destination
        #[arg(last = true)]
        flags: Vec<String>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn open_loader(config: &Config, extra_dirs: Vec<PathBuf>) -> ResourceLoader {
    let settings: Arc<dyn SettingsStore> =
        Arc::new(JsonFileSettings::open(config.settings_path.clone()));
    let mut dirs = extra_dirs;
    dirs.extend(config.resource_dirs.iter().cloned());
    ResourceLoader::new(dirs, settings)
}

/// One name per line, the preferred entry marked with `*`.
fn format_listing(names: &[String], preferred: &str) -> String {
    names
        .iter()
        .map(|name| {
            let marker = if name == preferred { '*' } else { ' ' };
            format!("{} {}", marker, name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn preferred_name(loader: &ResourceLoader, key: &str, fallback: &str) -> String {
    loader
        .settings()
        .get_string(key)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn highlight_file(
    config: &Config,
    loader: &mut ResourceLoader,
    file: &Path,
    theme: Option<&str>,
    grammar: Option<&str>,
    markers: &[String],
    case: CaseSensitivity,
) -> anyhow::Result<String> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let theme = match theme {
        Some(name) => loader.try_load_theme(name)?,
        None => loader
            .load_preferred_theme()
            .context("no theme could be loaded")?,
    };
    let grammar = match grammar {
        Some(name) => loader.try_load_grammar(name)?,
        None => loader
            .load_preferred_grammar()
            .context("no grammar could be loaded")?,
    };

    let base = TextAttributes::base(
        &theme,
        &config.font_family,
        config.font_size,
        config.tab_width,
    );
    let color_map = ColorMap::for_grammar(&theme, &grammar);
    let mut text = AttributedText::new(&source, base.clone());
    let report = Highlighter::with_trace(config.highlight_trace)
        .highlight(&mut text, &grammar, &color_map, &base);
    for error in &report.pattern_errors {
        tracing::warn!(grammar = grammar.name.as_str(), "{}", error);
    }
    let markers: Vec<&str> = markers.iter().map(String::as_str).collect();
    embolden_all(&mut text, &markers, case);
    Ok(render_ansi(&text))
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let Cli {
        resource_dirs,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let config = Config::from_env();
    let mut loader = open_loader(&config, resource_dirs);

    match command {
        Commands::Completions { .. } => {}
        Commands::Highlight {
            file,
            theme,
            grammar,
            bold,
            ignore_case,
        } => {
            let case = if ignore_case {
                CaseSensitivity::Insensitive
            } else {
                CaseSensitivity::Sensitive
            };
            let rendered = highlight_file(
                &config,
                &mut loader,
                &file,
                theme.as_deref(),
                grammar.as_deref(),
                &bold,
                case,
            )?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
        Commands::Themes => {
            let preferred = preferred_name(&loader, PREFERRED_THEME_KEY, DEFAULT_THEME_NAME);
            println!("{}", format_listing(&loader.available_themes(), &preferred));
        }
        Commands::Grammars => {
            let preferred = preferred_name(&loader, PREFERRED_GRAMMAR_KEY, DEFAULT_GRAMMAR_NAME);
            println!("{}", format_listing(&loader.available_grammars(), &preferred));
        }
        Commands::Run {
            program,
            source,
            dest,
            flags,
        } => {
            let invocation = ToolInvocation::new(program, source, dest).with_flags(flags);
            let output = run_tool(&invocation)?;
            let message = output.message();
            if output.success() {
                if !message.is_empty() {
                    println!("{}", message);
                }
            } else {
                eprintln!("{}", message);
                std::process::exit(output.exit_code);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
