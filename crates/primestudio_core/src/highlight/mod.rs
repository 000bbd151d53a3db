//! Grammar-driven highlighter: resets the whole buffer to base attributes,
//! then paints every pattern's matches in grammar order.
//!
//! Later patterns overwrite earlier ones where matches overlap, so a grammar
//! lists broad catch-alls first and exact keyword lists last.


use crate::attributed::{AttributedText, TextAttributes};
use crate::color_map::ColorMap;
use crate::error::CoreError;
use crate::grammar::{Grammar, Pattern};
use fancy_regex::Regex;
use std::ops::Range;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Counters from one highlight pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightReport {
    /// Number of match ranges painted.
    pub painted_ranges: usize,
    /// Patterns skipped because their scope had no color.
    pub skipped_scopes: usize,
    /// Patterns skipped because their expression failed to compile.
    pub invalid_patterns: usize,
    /// One message per pattern counted in `invalid_patterns`.
    pub pattern_errors: Vec<String>,
    pub elapsed: Duration,
}

struct CompiledPattern {
    scope: String,
    /// `None` for placeholders and expressions that failed to compile.
    regex: Option<Regex>,
}

struct CompiledGrammar {
    identity: u64,
    patterns: Vec<CompiledPattern>,
    errors: Vec<String>,
}

/// Compile one grammar pattern.
///
/// # Errors
/// Returns [`CoreError::Pattern`] naming the scope when the expression is
/// rejected by the regex engine.
pub fn compile_pattern(pattern: &Pattern) -> Result<Regex, CoreError> {
    Regex::new(&pattern.match_expr).map_err(|err| CoreError::Pattern {
        scope: pattern.scope.clone(),
        message: err.to_string(),
    })
}

impl CompiledGrammar {
    fn compile(grammar: &Grammar) -> Self {
        let mut errors = Vec::new();
        let patterns = grammar
            .patterns
            .iter()
            .map(|pattern| {
                let regex = if pattern.is_placeholder() {
                    None
                } else {
                    match compile_pattern(pattern) {
                        Ok(regex) => Some(regex),
                        Err(err) => {
                            warn!(
                                grammar = grammar.name.as_str(),
                                "skipping pattern: {}",
                                err
                            );
                            errors.push(err.to_string());
                            None
                        }
                    }
                };
                CompiledPattern {
                    scope: pattern.scope.clone(),
                    regex,
                }
            })
            .collect();
        Self {
            identity: grammar.identity(),
            patterns,
            errors,
        }
    }
}

/// Highlighter with a compiled-pattern cache keyed by grammar identity.
#[derive(Default)]
pub struct Highlighter {
    compiled: Option<CompiledGrammar>,
    trace: bool,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlighter that logs every pass at info level.
    pub fn with_trace(trace: bool) -> Self {
        Self {
            compiled: None,
            trace,
        }
    }

    /// Drop compiled patterns; the next pass recompiles.
    pub fn invalidate(&mut self) {
        self.compiled = None;
    }

    /// Identity of the grammar whose patterns are currently compiled.
    pub fn compiled_identity(&self) -> Option<u64> {
        self.compiled.as_ref().map(|compiled| compiled.identity)
    }

    fn compiled_for(&mut self, grammar: &Grammar) -> &CompiledGrammar {
        if self.compiled_identity() != Some(grammar.identity()) {
            debug!(grammar = grammar.name.as_str(), "compiling grammar patterns");
            self.compiled = None;
        }
        self.compiled
            .get_or_insert_with(|| CompiledGrammar::compile(grammar))
    }

    /// Recolor all of `text`.
    ///
    /// # Arguments
    /// - `text`: Display text to repaint.
    /// - `grammar`: Ordered patterns; later patterns win on overlap.
    /// - `color_map`: Resolved color per scope name.
    /// - `base`: Attributes every byte is reset to before painting.
    ///
    /// # Returns
    /// Counters for the pass. The pass never fails: bad patterns and unknown
    /// scopes are skipped and the rest of the grammar still applies.
    pub fn highlight(
        &mut self,
        text: &mut AttributedText,
        grammar: &Grammar,
        color_map: &ColorMap,
        base: &TextAttributes,
    ) -> HighlightReport {
        let started = Instant::now();
        let trace = self.trace;
        let compiled = self.compiled_for(grammar);
        let mut report = HighlightReport {
            invalid_patterns: compiled.errors.len(),
            pattern_errors: compiled.errors.clone(),
            ..HighlightReport::default()
        };

        let full = 0..text.len();
        let mut batch = text.begin_editing();
        batch.set_attributes(full, base);

        for pattern in &compiled.patterns {
            let Some(regex) = pattern.regex.as_ref() else {
                continue;
            };
            let Some(color) = color_map.get(&pattern.scope) else {
                report.skipped_scopes += 1;
                continue;
            };
            let ranges = match_ranges(regex, batch.text(), &pattern.scope);
            report.painted_ranges += ranges.len();
            for range in ranges {
                batch.set_foreground(range, color);
            }
        }
        batch.commit();

        report.elapsed = started.elapsed();
        if trace {
            info!(
                target: "primestudio_core::highlight",
                event = "highlight_pass",
                grammar = grammar.name.as_str(),
                text_len = text.len(),
                painted = report.painted_ranges,
                elapsed_ms = report.elapsed.as_secs_f32() * 1000.0,
                "highlight pass"
            );
        } else {
            debug!(
                grammar = grammar.name.as_str(),
                text_len = text.len(),
                painted = report.painted_ranges,
                "highlight pass"
            );
        }
        report
    }
}

/// Non-overlapping leftmost-first matches; empty matches paint nothing.
fn match_ranges(regex: &Regex, text: &str, scope: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    for found in regex.find_iter(text) {
        match found {
            Ok(m) if m.start() < m.end() => ranges.push(m.start()..m.end()),
            Ok(_) => {}
            Err(err) => {
                warn!(scope, "stopping pattern after match error: {}", err);
                break;
            }
        }
    }
    ranges
}

/// One-off highlight without a reusable pattern cache.
pub fn highlight_once(
    text: &mut AttributedText,
    grammar: &Grammar,
    color_map: &ColorMap,
    base: &TextAttributes,
) -> HighlightReport {
    Highlighter::new().highlight(text, grammar, color_map, base)
}
