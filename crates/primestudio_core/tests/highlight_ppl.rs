//! End-to-end highlighting of PPL source with the bundled theme and grammar.

use primestudio_core::constants::{DEFAULT_GRAMMAR_NAME, DEFAULT_THEME_NAME};
use primestudio_core::{
    AttributedText, ColorMap, Highlighter, MemorySettings, ResourceLoader, TextAttributes,
};
use std::sync::Arc;

const PROGRAM: &str = r#"#pragma mode( separator(.,;) integer(h32) )
EXPORT Demo(n)
BEGIN
  LOCAL s := "IF inside a string";
  // IF inside a comment
  IF n ≥ 10 THEN
    RETURN 2_m;
  END;
END;
"#;

fn offset_of(needle: &str) -> usize {
    PROGRAM.find(needle).expect("needle present")
}

fn loader() -> ResourceLoader {
    ResourceLoader::new(Vec::new(), Arc::new(MemorySettings::new()))
}

#[test]
fn bundled_grammar_colors_ppl_scopes() {
    let mut loader = loader();
    let theme = loader.load_theme(DEFAULT_THEME_NAME).expect("theme");
    let grammar = loader.load_grammar(DEFAULT_GRAMMAR_NAME).expect("grammar");
    let map = ColorMap::for_grammar(&theme, &grammar);
    let base = TextAttributes::base(&theme, "Menlo", 13.0, 2);
    let mut text = AttributedText::new(PROGRAM, base.clone());

    let report = Highlighter::new().highlight(&mut text, &grammar, &map, &base);
    assert_eq!(report.invalid_patterns, 0);

    let color = |needle: &str| text.foreground_at(offset_of(needle)).expect("color");
    let keyword = theme.token_color("Keywords").expect("keyword color");
    let string = theme.token_color("Strings").expect("string color");
    let comment = theme.token_color("Comments").expect("comment color");
    let function = theme.token_color("Functions").expect("function color");
    let preprocessor = theme
        .token_color("Preprocessor Statements")
        .expect("preprocessor color");

    assert_eq!(color("BEGIN"), keyword);
    assert_eq!(color("EXPORT"), keyword);
    assert_eq!(color("Demo"), function);
    assert_eq!(color("\"IF inside"), string);
    assert_eq!(color("IF inside a string"), string);
    assert_eq!(color("// IF"), comment);
    assert_eq!(color("IF inside a comment"), comment);
    assert_eq!(color("#pragma"), preprocessor);
    assert_eq!(color("10"), theme.token_color("Numbers").expect("number color"));
    assert_eq!(color("≥"), theme.token_color("Operators").expect("operator color"));
    assert_eq!(color("_m"), theme.token_color("Units").expect("unit color"));
    assert_eq!(color("  LOCAL"), theme.editor_foreground());
}

#[test]
fn switching_themes_recolors_without_touching_text() {
    let mut loader = loader();
    let grammar = loader.load_grammar(DEFAULT_GRAMMAR_NAME).expect("grammar");
    let dark = loader.load_theme(DEFAULT_THEME_NAME).expect("dark");
    let light = loader.load_theme("Prime Light").expect("light");
    let mut highlighter = Highlighter::new();
    let mut text = AttributedText::new(PROGRAM, TextAttributes::default());

    for theme in [&dark, &light] {
        let base = TextAttributes::base(theme, "Menlo", 13.0, 2);
        let map = ColorMap::for_grammar(theme, &grammar);
        highlighter.highlight(&mut text, &grammar, &map, &base);
        assert_eq!(text.text(), PROGRAM);
        assert_eq!(
            text.foreground_at(offset_of("BEGIN")),
            theme.token_color("Keywords")
        );
    }
    assert_eq!(
        text.foreground_at(0),
        light.token_color("Preprocessor Statements")
    );
}
