//! Headless editing surface for PPL source: rope-backed text, undo history,
//! auto-indent, smart operator substitution, live highlighting, and the
//! line-number gutter model.

pub mod buffer;
pub mod commands;
pub mod events;
pub mod gutter;
pub mod history;
pub mod indent;
pub mod state;
pub mod substitution;
pub mod surface;

pub use buffer::RopeBuffer;
pub use commands::{CommandTable, EditorCommand, Key, KeyChord, MenuAction, Modifiers, UiEvent};
pub use events::{EditorEvent, EventBus, SubscriptionId};
pub use gutter::{GutterRow, LineNumberGutter, Viewport};
pub use history::{EditHistory, EditIntent, HistoryStep, RecordedEdit};
pub use state::SelectionState;
pub use surface::{EditorConfig, EditorSurface, SurfacePhase};
