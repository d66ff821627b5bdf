//! Editor integration module for Inkpad
//!
//! Connects the formatting engine to a host text widget: keyboard shortcut
//! resolution, the text mutation seam, and a session that routes one to the
//! other.

mod keymap;
mod mutator;
mod session;

pub use keymap::{KeyEvent, Keymap, PrimaryModifier};
pub use mutator::{TextBuffer, TextMutator, DEFAULT_UNDO_LIMIT};
pub use session::{EditorSession, KeyDisposition};
