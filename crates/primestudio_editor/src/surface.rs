//! The editable text surface: one mutation path that keeps the rope, the
//! attributed display text, undo history, and highlighting in step.

use crate::buffer::RopeBuffer;
use crate::commands::{CommandTable, EditorCommand, UiEvent};
use crate::events::{EditorEvent, EventBus, SubscriptionId};
use crate::gutter::{GutterRow, LineNumberGutter, Viewport};
use crate::history::{EditHistory, EditIntent, RecordedEdit};
use crate::indent::indent_after;
use crate::state::SelectionState;
use crate::substitution::{find_substitution, LOOKBEHIND_CHARS};
use primestudio_core::constants::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_GRAMMAR_NAME, DEFAULT_TAB_WIDTH,
    DEFAULT_THEME_NAME, SMART_SUBSTITUTION_KEY,
};
use primestudio_core::{
    AttributedText, ColorMap, Config, CoreError, Grammar, HighlightReport, Highlighter,
    ResourceLoader, SettingsStore, TextAttributes, Theme,
};
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Editor presentation and behavior knobs.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    pub font_family: String,
    pub font_size: f32,
    pub tab_width: u8,
    /// Merge adjacent typed characters into one undo step.
    pub coalesce_typing: bool,
    pub highlight_trace: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            tab_width: DEFAULT_TAB_WIDTH,
            coalesce_typing: false,
            highlight_trace: false,
        }
    }
}

impl EditorConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            font_family: config.font_family.clone(),
            font_size: config.font_size,
            tab_width: config.tab_width,
            coalesce_typing: false,
            highlight_trace: config.highlight_trace,
        }
    }
}

/// Where the surface is in its edit cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SurfacePhase {
    #[default]
    Idle,
    Mutating,
    Highlighting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EditOrigin {
    User(EditIntent),
    History,
}

pub struct EditorSurface {
    buffer: RopeBuffer,
    display: AttributedText,
    state: SelectionState,
    history: EditHistory,
    highlighter: Highlighter,
    loader: ResourceLoader,
    settings: Arc<dyn SettingsStore>,
    theme: Theme,
    grammar: Grammar,
    color_map: ColorMap,
    base: TextAttributes,
    config: EditorConfig,
    commands: CommandTable,
    events: EventBus,
    gutter: LineNumberGutter,
    smart_substitution: bool,
    substituting: bool,
    phase: SurfacePhase,
    first_visible_char: usize,
    last_report: HighlightReport,
    highlight_passes: u64,
}

impl EditorSurface {
    /// Create an empty surface with the preferred theme and grammar.
    ///
    /// Missing preferences fall back to the defaults; if even those fail the
    /// surface runs with a plain theme and an empty grammar.
    pub fn new(
        mut loader: ResourceLoader,
        settings: Arc<dyn SettingsStore>,
        config: EditorConfig,
    ) -> Self {
        let theme = loader.load_preferred_theme().unwrap_or_else(|| {
            warn!("no theme could be loaded, using a plain theme");
            Theme::plain(DEFAULT_THEME_NAME)
        });
        let grammar = loader.load_preferred_grammar().unwrap_or_else(|| {
            warn!("no grammar could be loaded, highlighting disabled");
            Grammar {
                name: DEFAULT_GRAMMAR_NAME.to_string(),
                ..Grammar::default()
            }
        });
        let smart_substitution = settings.get_bool(SMART_SUBSTITUTION_KEY).unwrap_or(false);
        let base = base_attributes(&theme, &config);
        let color_map = ColorMap::for_grammar(&theme, &grammar);
        let mut surface = Self {
            buffer: RopeBuffer::default(),
            display: AttributedText::new("", base.clone()),
            state: SelectionState::default(),
            history: EditHistory::new(config.coalesce_typing),
            highlighter: Highlighter::with_trace(config.highlight_trace),
            loader,
            settings,
            theme,
            grammar,
            color_map,
            base,
            config,
            commands: CommandTable::default(),
            events: EventBus::default(),
            gutter: LineNumberGutter::default(),
            smart_substitution,
            substituting: false,
            phase: SurfacePhase::Idle,
            first_visible_char: 0,
            last_report: HighlightReport::default(),
            highlight_passes: 0,
        };
        surface.rehighlight();
        surface
    }

    pub fn text(&self) -> &str {
        self.display.text()
    }

    pub fn buffer(&self) -> &RopeBuffer {
        &self.buffer
    }

    /// Highlighted display text.
    pub fn display(&self) -> &AttributedText {
        &self.display
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor()
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.state.selection_range()
    }

    /// Cursor as 0-based `(line, column)`.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        self.buffer.char_to_line_col(self.state.cursor())
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn loader(&self) -> &ResourceLoader {
        &self.loader
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Display revision; bumps on every text or attribute change.
    pub fn revision(&self) -> u64 {
        self.display.revision()
    }

    pub fn phase(&self) -> SurfacePhase {
        self.phase
    }

    pub fn last_report(&self) -> &HighlightReport {
        &self.last_report
    }

    /// Highlight passes run since construction.
    pub fn highlight_passes(&self) -> u64 {
        self.highlight_passes
    }

    pub fn smart_substitution(&self) -> bool {
        self.smart_substitution
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut CommandTable {
        &mut self.commands
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&EditorEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn emit(&mut self, event: EditorEvent) {
        self.gutter.observe(&event);
        self.events.publish(&event);
    }

    fn emit_selection(&mut self) {
        self.emit(EditorEvent::SelectionChanged {
            cursor: self.state.cursor(),
            selection: self.state.selection_range(),
        });
    }

    fn rehighlight(&mut self) {
        self.phase = SurfacePhase::Highlighting;
        let report = self.highlighter.highlight(
            &mut self.display,
            &self.grammar,
            &self.color_map,
            &self.base,
        );
        self.highlight_passes += 1;
        self.phase = SurfacePhase::Idle;
        self.last_report = report.clone();
        self.emit(EditorEvent::Highlighted {
            revision: self.display.revision(),
            report,
        });
    }

    /// Replace the whole document. Clears undo history and the selection.
    pub fn set_text(&mut self, text: &str) {
        self.phase = SurfacePhase::Mutating;
        self.buffer.reset(text);
        self.display.set_text(text, self.base.clone());
        self.history.clear();
        self.state.set_cursor(0, self.buffer.len_chars());
        self.first_visible_char = 0;
        self.rehighlight();
        self.emit(EditorEvent::TextChanged {
            revision: self.display.revision(),
        });
        self.emit_selection();
    }

    /// Load a document from disk.
    ///
    /// # Errors
    /// Returns [`CoreError::Io`] when the file cannot be read as UTF-8.
    pub fn open_file(&mut self, path: &Path) -> Result<(), CoreError> {
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), chars = text.chars().count(), "opened document");
        self.set_text(&text);
        Ok(())
    }

    /// Write the document to disk.
    ///
    /// # Errors
    /// Returns [`CoreError::Io`] when the file cannot be written.
    pub fn save_file(&self, path: &Path) -> Result<(), CoreError> {
        std::fs::write(path, self.text())?;
        debug!(path = %path.display(), "saved document");
        Ok(())
    }

    /// Single mutation path for every text change.
    ///
    /// # Returns
    /// `false` when the edit was a no-op.
    fn apply_edit(
        &mut self,
        range: Range<usize>,
        text: &str,
        origin: EditOrigin,
        cursor_after: Option<usize>,
    ) -> bool {
        let len = self.buffer.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        if start == end && text.is_empty() {
            return false;
        }

        self.phase = SurfacePhase::Mutating;
        let before_cursor = self.state.cursor();
        let deleted = self.buffer.slice_chars(start..end);
        let byte_range = self.buffer.char_to_byte(start)..self.buffer.char_to_byte(end);
        self.buffer.replace_char_range(start..end, text);
        self.display.replace_text(byte_range, text, self.base.clone());
        let after_cursor = cursor_after.unwrap_or(start + text.chars().count());
        self.state.set_cursor(after_cursor, self.buffer.len_chars());

        if let EditOrigin::User(intent) = origin {
            self.history.record_edit(RecordedEdit {
                start,
                deleted,
                inserted: text.to_string(),
                intent,
                before_cursor,
                after_cursor: self.state.cursor(),
                at: Instant::now(),
            });
        }

        self.rehighlight();
        self.emit(EditorEvent::TextChanged {
            revision: self.display.revision(),
        });
        self.emit_selection();
        true
    }

    /// Replace a char range, then run smart substitution.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) -> bool {
        let changed = self.apply_edit(range, text, EditOrigin::User(EditIntent::Other), None);
        if changed {
            self.apply_smart_substitution();
        }
        changed
    }

    /// Insert at the cursor, replacing any selection.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let range = self.state.edit_range();
        let changed = self.apply_edit(range, text, EditOrigin::User(EditIntent::Insert), None);
        if changed {
            self.apply_smart_substitution();
        }
        changed
    }

    /// Insert a line break, then the auto-indent as a separate edit.
    pub fn insert_newline(&mut self) -> bool {
        let range = self.state.edit_range();
        if !self.apply_edit(range, "\n", EditOrigin::User(EditIntent::Newline), None) {
            return false;
        }
        let (line, _) = self.cursor_line_col();
        let previous = self.buffer.line_without_newline(line.saturating_sub(1));
        let indent = indent_after(&previous);
        if !indent.is_empty() {
            let cursor = self.state.cursor();
            self.apply_edit(
                cursor..cursor,
                &indent,
                EditOrigin::User(EditIntent::AutoIndent),
                None,
            );
        }
        true
    }

    /// Insert spaces up to the configured tab width.
    pub fn insert_tab(&mut self) -> bool {
        let spaces = " ".repeat(usize::from(self.config.tab_width.max(1)));
        let range = self.state.edit_range();
        self.apply_edit(range, &spaces, EditOrigin::User(EditIntent::Insert), None)
    }

    pub fn backspace(&mut self) -> bool {
        let range = match self.state.selection_range() {
            Some(selection) => selection,
            None => {
                let cursor = self.state.cursor();
                if cursor == 0 {
                    return false;
                }
                cursor - 1..cursor
            }
        };
        self.apply_edit(range, "", EditOrigin::User(EditIntent::DeleteBackward), None)
    }

    pub fn delete_forward(&mut self) -> bool {
        let range = match self.state.selection_range() {
            Some(selection) => selection,
            None => {
                let cursor = self.state.cursor();
                if cursor >= self.buffer.len_chars() {
                    return false;
                }
                cursor..cursor + 1
            }
        };
        self.apply_edit(range, "", EditOrigin::User(EditIntent::DeleteForward), None)
    }

    pub fn undo(&mut self) -> bool {
        let Some(step) = self.history.undo() else {
            return false;
        };
        self.apply_edit(step.range, &step.text, EditOrigin::History, Some(step.cursor))
    }

    pub fn redo(&mut self) -> bool {
        let Some(step) = self.history.redo() else {
            return false;
        };
        self.apply_edit(step.range, &step.text, EditOrigin::History, Some(step.cursor))
    }

    pub fn set_cursor(&mut self, char_index: usize) {
        self.state.set_cursor(char_index, self.buffer.len_chars());
        self.emit_selection();
    }

    pub fn select(&mut self, range: Range<usize>) {
        self.state.select(range, self.buffer.len_chars());
        self.emit_selection();
    }

    pub fn select_all(&mut self) {
        self.state.select_all(self.buffer.len_chars());
        self.emit_selection();
    }

    fn move_cursor(&mut self, target: usize, select: bool) {
        self.state.move_cursor(target, self.buffer.len_chars(), select);
        self.emit_selection();
    }

    /// Scroll so `first_visible_char` is at the top of the view.
    pub fn scroll_to(&mut self, first_visible_char: usize) {
        let clamped = first_visible_char.min(self.buffer.len_chars());
        if clamped == self.first_visible_char {
            return;
        }
        self.first_visible_char = clamped;
        self.emit(EditorEvent::ScrollChanged {
            first_visible_char: clamped,
        });
    }

    pub fn first_visible_char(&self) -> usize {
        self.first_visible_char
    }

    pub fn gutter_needs_redraw(&self) -> bool {
        self.gutter.needs_redraw()
    }

    /// Line-number rows for the current scroll position.
    pub fn gutter_rows(
        &mut self,
        visible_rows: usize,
        wrap_columns: Option<usize>,
    ) -> Vec<GutterRow> {
        let viewport = Viewport {
            first_visible_char: self.first_visible_char,
            visible_rows,
            wrap_columns,
        };
        self.gutter.layout(&self.buffer, viewport)
    }

    /// Switch theme and recolor.
    ///
    /// # Returns
    /// `false` when the theme could not be loaded; the current theme stays.
    pub fn select_theme(&mut self, name: &str) -> bool {
        let Some(theme) = self.loader.load_theme(name) else {
            return false;
        };
        info!(theme = theme.name.as_str(), "switching theme");
        self.base = base_attributes(&theme, &self.config);
        self.color_map = ColorMap::for_grammar(&theme, &self.grammar);
        self.theme = theme;
        self.rehighlight();
        self.emit(EditorEvent::ThemeChanged {
            name: self.theme.name.clone(),
        });
        true
    }

    /// Switch grammar and recolor.
    ///
    /// # Returns
    /// `false` when the grammar is already active or could not be loaded.
    pub fn select_grammar(&mut self, name: &str) -> bool {
        if self.loader.is_grammar_loaded(name) {
            debug!(grammar = name, "grammar already active");
            return false;
        }
        let Some(grammar) = self.loader.load_grammar(name) else {
            return false;
        };
        info!(grammar = grammar.name.as_str(), "switching grammar");
        self.color_map = ColorMap::for_grammar(&self.theme, &grammar);
        self.grammar = grammar;
        self.rehighlight();
        self.emit(EditorEvent::GrammarChanged {
            name: self.grammar.name.clone(),
        });
        true
    }

    /// Enable or disable smart substitution and persist the choice.
    pub fn set_smart_substitution(&mut self, enabled: bool) {
        self.smart_substitution = enabled;
        self.settings.set_bool(SMART_SUBSTITUTION_KEY, enabled);
    }

    fn apply_smart_substitution(&mut self) {
        if !self.smart_substitution || self.substituting {
            return;
        }
        let cursor = self.state.cursor();
        let preceding = self
            .buffer
            .slice_chars(cursor.saturating_sub(LOOKBEHIND_CHARS)..cursor);
        let Some(substitution) = find_substitution(&preceding) else {
            return;
        };
        let start = cursor - substitution.replace_chars;
        debug!(glyph = %substitution.glyph, at = start, "substituting operator");
        self.substituting = true;
        let mut glyph = [0u8; 4];
        self.apply_edit(
            start..cursor,
            substitution.glyph.encode_utf8(&mut glyph),
            EditOrigin::User(EditIntent::Substitution),
            Some(start + 1),
        );
        self.substituting = false;
    }

    /// Dispatch one command.
    ///
    /// # Returns
    /// `true` when the command changed text, selection, scroll, theme,
    /// grammar, or the substitution toggle.
    pub fn execute(&mut self, command: EditorCommand) -> bool {
        match command {
            EditorCommand::InsertText(text) => self.insert_text(&text),
            EditorCommand::InsertNewline => self.insert_newline(),
            EditorCommand::InsertTab => self.insert_tab(),
            EditorCommand::Backspace => self.backspace(),
            EditorCommand::DeleteForward => self.delete_forward(),
            EditorCommand::MoveLeft { select } => {
                let target = match self.state.selection_range() {
                    Some(selection) if !select => selection.start,
                    _ => self.state.cursor().saturating_sub(1),
                };
                self.move_cursor(target, select);
                true
            }
            EditorCommand::MoveRight { select } => {
                let target = match self.state.selection_range() {
                    Some(selection) if !select => selection.end,
                    _ => self.state.cursor() + 1,
                };
                self.move_cursor(target, select);
                true
            }
            EditorCommand::MoveLineStart { select } => {
                let (line, _) = self.cursor_line_col();
                let target = self.buffer.line_col_to_char(line, 0);
                self.move_cursor(target, select);
                true
            }
            EditorCommand::MoveLineEnd { select } => {
                let (line, _) = self.cursor_line_col();
                let target = self.buffer.line_col_to_char(line, usize::MAX);
                self.move_cursor(target, select);
                true
            }
            EditorCommand::SelectAll => {
                self.select_all();
                true
            }
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::SelectTheme(name) => self.select_theme(&name),
            EditorCommand::SelectGrammar(name) => self.select_grammar(&name),
            EditorCommand::SetSmartSubstitution(enabled) => {
                let changed = self.smart_substitution != enabled;
                self.set_smart_substitution(enabled);
                changed
            }
            EditorCommand::ToggleSmartSubstitution => {
                self.set_smart_substitution(!self.smart_substitution);
                true
            }
            EditorCommand::ScrollTo { first_visible_char } => {
                let before = self.first_visible_char;
                self.scroll_to(first_visible_char);
                before != self.first_visible_char
            }
        }
    }

    /// Resolve a UI event through the command table and execute it.
    ///
    /// # Returns
    /// `false` for unbound events and commands that changed nothing.
    pub fn handle_event(&mut self, event: &UiEvent) -> bool {
        match self.commands.resolve(event) {
            Some(command) => self.execute(command),
            None => false,
        }
    }
}

fn base_attributes(theme: &Theme, config: &EditorConfig) -> TextAttributes {
    TextAttributes::base(theme, &config.font_family, config.font_size, config.tab_width)
}

#[cfg(test)]
mod tests;
