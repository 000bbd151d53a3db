use super::*;
use crate::commands::{Key, KeyChord, MenuAction, Modifiers};
use primestudio_core::MemorySettings;
use std::sync::Mutex;

fn surface_with(settings: Arc<MemorySettings>) -> EditorSurface {
    let loader = ResourceLoader::new(Vec::new(), settings.clone());
    EditorSurface::new(loader, settings, EditorConfig::default())
}

fn surface() -> (EditorSurface, Arc<MemorySettings>) {
    let settings = Arc::new(MemorySettings::new());
    (surface_with(settings.clone()), settings)
}

fn type_chars(surface: &mut EditorSurface, text: &str) {
    for ch in text.chars() {
        surface.insert_text(&ch.to_string());
    }
}

fn record_events(surface: &mut EditorSurface) -> Arc<Mutex<Vec<EditorEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    surface.subscribe(move |event| sink.lock().expect("lock").push(event.clone()));
    seen
}

#[test]
fn construction_loads_defaults_and_highlights() {
    let (surface, settings) = surface();
    assert_eq!(surface.theme().name, DEFAULT_THEME_NAME);
    assert_eq!(surface.grammar().name, DEFAULT_GRAMMAR_NAME);
    assert!(!surface.smart_substitution());
    assert_eq!(surface.highlight_passes(), 1);
    assert_eq!(surface.phase(), SurfacePhase::Idle);
    assert_eq!(
        settings.get_string(primestudio_core::constants::PREFERRED_THEME_KEY).as_deref(),
        Some(DEFAULT_THEME_NAME)
    );
}

#[test]
fn newline_after_then_indents_one_level_deeper() {
    let (mut surface, _settings) = surface();
    surface.set_text("  IF x THEN");
    surface.set_cursor(11);
    assert!(surface.insert_newline());
    assert_eq!(surface.text(), "  IF x THEN\n    ");
    assert_eq!(surface.cursor(), 16);
    assert_eq!(surface.cursor_line_col(), (1, 4));

    assert!(surface.undo());
    assert_eq!(surface.text(), "  IF x THEN\n");
    assert!(surface.undo());
    assert_eq!(surface.text(), "  IF x THEN");
    assert!(!surface.undo());
}

#[test]
fn newline_keeps_plain_indentation() {
    let (mut surface, _settings) = surface();
    surface.set_text("    x := 1;");
    surface.set_cursor(11);
    surface.insert_newline();
    assert_eq!(surface.text(), "    x := 1;\n    ");
    surface.set_text("END;");
    surface.set_cursor(4);
    surface.insert_newline();
    assert_eq!(surface.text(), "END;\n");
}

#[test]
fn substitution_is_off_until_opted_in() {
    let (mut surface, settings) = surface();
    type_chars(&mut surface, "x!=");
    assert_eq!(surface.text(), "x!=");
    assert_eq!(settings.get_bool(SMART_SUBSTITUTION_KEY), None);

    surface.set_smart_substitution(true);
    type_chars(&mut surface, "<=");
    assert_eq!(surface.text(), "x!=≤");
}

#[test]
fn typed_digraph_becomes_glyph_and_undoes_in_steps() {
    let (mut surface, _settings) = surface();
    surface.set_smart_substitution(true);
    type_chars(&mut surface, "x!=");
    assert_eq!(surface.text(), "x≠");
    assert_eq!(surface.cursor(), 2);

    assert!(surface.undo());
    assert_eq!(surface.text(), "x!=");
    assert_eq!(surface.cursor(), 3);
    assert!(surface.undo());
    assert_eq!(surface.text(), "x!");
    assert!(surface.redo());
    assert!(surface.redo());
    assert_eq!(surface.text(), "x≠");
}

#[test]
fn every_digraph_is_substituted() {
    let (mut surface, _settings) = surface();
    surface.set_smart_substitution(true);
    type_chars(&mut surface, "a<>b>=c<=d=>e");
    assert_eq!(surface.text(), "a≠b≥c≤d▶e");
}

#[test]
fn substitution_toggle_is_persisted() {
    let (mut surface, settings) = surface();
    surface.set_smart_substitution(true);
    assert_eq!(settings.get_bool(SMART_SUBSTITUTION_KEY), Some(true));
    assert!(surface_with(settings.clone()).smart_substitution());
    surface.set_smart_substitution(false);
    type_chars(&mut surface, "x!=");
    assert_eq!(surface.text(), "x!=");
    assert_eq!(settings.get_bool(SMART_SUBSTITUTION_KEY), Some(false));

    let reopened = surface_with(settings);
    assert!(!reopened.smart_substitution());
}

#[test]
fn deletions_and_history_do_not_substitute() {
    let (mut surface, _settings) = surface();
    surface.set_smart_substitution(false);
    type_chars(&mut surface, "a!=b");
    surface.set_smart_substitution(true);
    assert!(surface.backspace());
    assert_eq!(surface.text(), "a!=");
    assert!(surface.undo());
    assert_eq!(surface.text(), "a!=b");
    assert!(surface.undo());
    assert_eq!(surface.text(), "a!=");
    assert_eq!(surface.cursor(), 3);
    assert!(surface.redo());
    assert_eq!(surface.text(), "a!=b");
}

#[test]
fn replace_range_uses_char_indices_across_multibyte_text() {
    let (mut surface, _settings) = surface();
    surface.set_text("IF a≥b THEN");
    assert!(surface.replace_range(5..6, "c"));
    assert_eq!(surface.text(), "IF a≥c THEN");
    assert!(!surface.replace_range(3..3, ""));
    let keyword = surface.theme().token_color("Keywords");
    let then_byte = surface.text().find("THEN").expect("THEN");
    assert_eq!(surface.display().foreground_at(then_byte), keyword);
}

#[test]
fn selection_is_replaced_by_typing_and_deleted_by_backspace() {
    let (mut surface, _settings) = surface();
    surface.set_text("LOCAL abc;");
    surface.select(6..9);
    surface.insert_text("n");
    assert_eq!(surface.text(), "LOCAL n;");
    surface.select_all();
    assert!(surface.backspace());
    assert_eq!(surface.text(), "");
    assert!(!surface.backspace());
    assert!(!surface.delete_forward());
}

#[test]
fn delete_forward_removes_next_char() {
    let (mut surface, _settings) = surface();
    surface.set_text("ab≠");
    surface.set_cursor(1);
    assert!(surface.delete_forward());
    assert_eq!(surface.text(), "a≠");
    assert_eq!(surface.cursor(), 1);
}

#[test]
fn tab_inserts_configured_spaces() {
    let (mut surface, _settings) = surface();
    surface.insert_tab();
    assert_eq!(surface.text(), "  ");
}

#[test]
fn reselecting_current_grammar_is_a_no_op() {
    let (mut surface, _settings) = surface();
    let passes = surface.highlight_passes();
    assert!(!surface.select_grammar(DEFAULT_GRAMMAR_NAME));
    assert_eq!(surface.highlight_passes(), passes);
    assert!(!surface.select_grammar("Missing Grammar"));
    assert_eq!(surface.grammar().name, DEFAULT_GRAMMAR_NAME);
}

#[test]
fn failed_theme_switch_keeps_previous_theme() {
    let (mut surface, settings) = surface();
    surface.set_text("BEGIN");
    let before = surface.display().runs().to_vec();
    assert!(!surface.select_theme("Missing Theme"));
    assert_eq!(surface.theme().name, DEFAULT_THEME_NAME);
    assert_eq!(surface.display().runs(), before.as_slice());
    assert_eq!(
        settings.get_string(primestudio_core::constants::PREFERRED_THEME_KEY).as_deref(),
        Some(DEFAULT_THEME_NAME)
    );
}

#[test]
fn theme_switch_recolors_and_notifies() {
    let (mut surface, _settings) = surface();
    surface.set_text("BEGIN");
    let seen = record_events(&mut surface);
    assert!(surface.select_theme("Prime Light"));
    assert_eq!(
        surface.display().foreground_at(0),
        surface.theme().token_color("Keywords")
    );
    let seen = seen.lock().expect("lock");
    assert!(matches!(seen.first(), Some(EditorEvent::Highlighted { .. })));
    assert_eq!(
        seen.last(),
        Some(&EditorEvent::ThemeChanged {
            name: "Prime Light".to_string()
        })
    );
    assert!(surface.gutter_needs_redraw());
}

#[test]
fn edits_publish_highlight_then_text_then_selection() {
    let (mut surface, _settings) = surface();
    let seen = record_events(&mut surface);
    surface.insert_text("a");
    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 3);
    assert!(matches!(seen[0], EditorEvent::Highlighted { .. }));
    assert_eq!(
        seen[1],
        EditorEvent::TextChanged {
            revision: surface.revision()
        }
    );
    assert_eq!(
        seen[2],
        EditorEvent::SelectionChanged {
            cursor: 1,
            selection: None
        }
    );
}

#[test]
fn unsubscribe_stops_notifications() {
    let (mut surface, _settings) = surface();
    let seen = Arc::new(Mutex::new(0usize));
    let sink = seen.clone();
    let id = surface.subscribe(move |_| *sink.lock().expect("lock") += 1);
    surface.insert_text("a");
    assert!(surface.unsubscribe(id));
    surface.insert_text("b");
    assert_eq!(*seen.lock().expect("lock"), 3);
}

#[test]
fn ui_events_dispatch_through_command_table() {
    let (mut surface, _settings) = surface();
    assert!(surface.handle_event(&UiEvent::Text("IF x THEN".into())));
    assert!(surface.handle_event(&UiEvent::Key(KeyChord::plain(Key::Enter))));
    assert_eq!(surface.text(), "IF x THEN\n  ");
    assert!(surface.handle_event(&UiEvent::Key(KeyChord::new(
        Key::Char('a'),
        Modifiers::COMMAND
    ))));
    assert_eq!(surface.selection(), Some(0..12));
    assert!(surface.handle_event(&UiEvent::Key(KeyChord::plain(Key::ArrowLeft))));
    assert_eq!(surface.cursor(), 0);
    assert!(!surface.handle_event(&UiEvent::Key(KeyChord::new(
        Key::Char('q'),
        Modifiers::COMMAND
    ))));
    assert!(surface.handle_event(&UiEvent::Menu(MenuAction::ToggleSmartSubstitution)));
    assert!(surface.smart_substitution());
    assert!(surface.handle_event(&UiEvent::Menu(MenuAction::Theme("Prime Light".into()))));
}

#[test]
fn line_movement_commands_respect_shift() {
    let (mut surface, _settings) = surface();
    surface.set_text("BEGIN\n  END;");
    surface.set_cursor(8);
    surface.execute(EditorCommand::MoveLineEnd { select: true });
    assert_eq!(surface.selection(), Some(8..12));
    surface.execute(EditorCommand::MoveLineStart { select: false });
    assert_eq!(surface.cursor(), 6);
    assert_eq!(surface.selection(), None);
}

#[test]
fn scrolling_drives_gutter_numbering() {
    let (mut surface, _settings) = surface();
    surface.set_text("a\nb\nc");
    surface.gutter_rows(1, None);
    assert!(!surface.gutter_needs_redraw());
    assert!(surface.execute(EditorCommand::ScrollTo {
        first_visible_char: 2
    }));
    assert!(surface.gutter_needs_redraw());
    let numbers: Vec<_> = surface
        .gutter_rows(5, None)
        .iter()
        .map(|row| row.line_number)
        .collect();
    assert_eq!(numbers, vec![Some(2), Some(3)]);
    assert!(!surface.execute(EditorCommand::ScrollTo {
        first_visible_char: 2
    }));
}

#[test]
fn files_round_trip_through_the_surface() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("demo.hpppl");
    std::fs::write(&path, "EXPORT Demo()\nBEGIN\nEND;\n").expect("write");

    let (mut surface, _settings) = surface();
    surface.insert_text("stale");
    surface.open_file(&path).expect("open");
    assert_eq!(surface.text(), "EXPORT Demo()\nBEGIN\nEND;\n");
    assert!(!surface.can_undo());
    surface.set_cursor(surface.buffer().len_chars());
    surface.insert_text("// done");
    surface.save_file(&path).expect("save");
    assert!(std::fs::read_to_string(&path)
        .expect("read")
        .ends_with("END;\n// done"));
    assert!(surface.open_file(&dir.path().join("missing.hpppl")).is_err());
}

#[test]
fn coalesced_typing_undoes_as_one_step() {
    let settings = Arc::new(MemorySettings::new());
    let loader = ResourceLoader::new(Vec::new(), settings.clone());
    let config = EditorConfig {
        coalesce_typing: true,
        ..EditorConfig::default()
    };
    let mut surface = EditorSurface::new(loader, settings, config);
    type_chars(&mut surface, "LOCAL");
    assert!(surface.undo());
    assert_eq!(surface.text(), "");
}

#[test]
fn edited_display_matches_fresh_highlight() {
    let (mut surface, _settings) = surface();
    surface.set_smart_substitution(true);
    surface.set_text("EXPORT f(x)\r\nBEGIN\r\n  x := \"é≥\";\r\nEND;");
    surface.select(22..26);
    assert!(surface.backspace());
    surface.set_cursor(18);
    assert!(surface.insert_newline());
    type_chars(&mut surface, "IF x>=1 THEN");
    assert!(surface.text().contains("IF x≥1 THEN"));
    surface.replace_range(0..6, "LOCAL");
    assert!(surface.undo());
    assert!(surface.undo());
    assert!(surface.redo());
    surface.insert_text("é");

    let base = base_attributes(surface.theme(), surface.config());
    let color_map = ColorMap::for_grammar(surface.theme(), surface.grammar());
    let mut fresh = AttributedText::new(surface.text(), base.clone());
    primestudio_core::highlight::highlight_once(
        &mut fresh,
        surface.grammar(),
        &color_map,
        &base,
    );
    assert_eq!(fresh.text(), surface.text());
    assert_eq!(fresh.runs(), surface.display().runs());
    assert_eq!(surface.text(), surface.buffer().slice_chars(0..usize::MAX));
}
