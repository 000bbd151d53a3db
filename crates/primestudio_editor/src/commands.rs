//! UI events and the table mapping them to editor commands.

use std::collections::HashMap;

/// Normalized commands consumed by [`crate::EditorSurface::execute`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorCommand {
    InsertText(String),
    InsertNewline,
    InsertTab,
    Backspace,
    DeleteForward,
    MoveLeft { select: bool },
    MoveRight { select: bool },
    MoveLineStart { select: bool },
    MoveLineEnd { select: bool },
    SelectAll,
    Undo,
    Redo,
    SelectTheme(String),
    SelectGrammar(String),
    SetSmartSubstitution(bool),
    ToggleSmartSubstitution,
    ScrollTo { first_visible_char: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Platform command key (Cmd on macOS, Ctrl elsewhere).
    pub command: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        command: false,
        shift: false,
        alt: false,
    };
    pub const COMMAND: Self = Self {
        command: true,
        shift: false,
        alt: false,
    };
    pub const SHIFT: Self = Self {
        command: false,
        shift: true,
        alt: false,
    };
    pub const COMMAND_SHIFT: Self = Self {
        command: true,
        shift: true,
        alt: false,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub const fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// Menu items that reach the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Undo,
    Redo,
    SelectAll,
    ToggleSmartSubstitution,
    Theme(String),
    Grammar(String),
}

/// Raw input delivered by the host UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Key(KeyChord),
    /// Committed text input (typing, paste).
    Text(String),
    Menu(MenuAction),
}

/// Explicit key-chord to command bindings.
#[derive(Clone, Debug)]
pub struct CommandTable {
    bindings: HashMap<KeyChord, EditorCommand>,
}

impl Default for CommandTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (chord, command) in default_bindings() {
            table.bind(chord, command);
        }
        table
    }
}

fn default_bindings() -> Vec<(KeyChord, EditorCommand)> {
    let mut bindings = vec![
        (KeyChord::plain(Key::Enter), EditorCommand::InsertNewline),
        (KeyChord::plain(Key::Tab), EditorCommand::InsertTab),
        (KeyChord::plain(Key::Backspace), EditorCommand::Backspace),
        (KeyChord::plain(Key::Delete), EditorCommand::DeleteForward),
        (
            KeyChord::new(Key::Char('a'), Modifiers::COMMAND),
            EditorCommand::SelectAll,
        ),
        (
            KeyChord::new(Key::Char('z'), Modifiers::COMMAND),
            EditorCommand::Undo,
        ),
        (
            KeyChord::new(Key::Char('z'), Modifiers::COMMAND_SHIFT),
            EditorCommand::Redo,
        ),
        (
            KeyChord::new(Key::Char('y'), Modifiers::COMMAND),
            EditorCommand::Redo,
        ),
    ];
    for (modifiers, select) in [(Modifiers::NONE, false), (Modifiers::SHIFT, true)] {
        bindings.extend([
            (
                KeyChord::new(Key::ArrowLeft, modifiers),
                EditorCommand::MoveLeft { select },
            ),
            (
                KeyChord::new(Key::ArrowRight, modifiers),
                EditorCommand::MoveRight { select },
            ),
            (
                KeyChord::new(Key::Home, modifiers),
                EditorCommand::MoveLineStart { select },
            ),
            (
                KeyChord::new(Key::End, modifiers),
                EditorCommand::MoveLineEnd { select },
            ),
        ]);
    }
    bindings
}

impl CommandTable {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a chord, returning the command it replaced.
    pub fn bind(&mut self, chord: KeyChord, command: EditorCommand) -> Option<EditorCommand> {
        self.bindings.insert(chord, command)
    }

    pub fn unbind(&mut self, chord: &KeyChord) -> Option<EditorCommand> {
        self.bindings.remove(chord)
    }

    pub fn lookup(&self, chord: &KeyChord) -> Option<&EditorCommand> {
        self.bindings.get(chord)
    }

    /// Translate a UI event; unbound chords and empty text yield `None`.
    pub fn resolve(&self, event: &UiEvent) -> Option<EditorCommand> {
        match event {
            UiEvent::Key(chord) => self.lookup(chord).cloned(),
            UiEvent::Text(text) if text.is_empty() => None,
            UiEvent::Text(text) => Some(EditorCommand::InsertText(text.clone())),
            UiEvent::Menu(action) => Some(match action {
                MenuAction::Undo => EditorCommand::Undo,
                MenuAction::Redo => EditorCommand::Redo,
                MenuAction::SelectAll => EditorCommand::SelectAll,
                MenuAction::ToggleSmartSubstitution => EditorCommand::ToggleSmartSubstitution,
                MenuAction::Theme(name) => EditorCommand::SelectTheme(name.clone()),
                MenuAction::Grammar(name) => EditorCommand::SelectGrammar(name.clone()),
            }),
        }
    }
}
