//! Editor session: key events in, host edits out
//!
//! Glues the [`Keymap`] and the formatting engine to a host through the
//! [`TextMutator`] seam. Undo is never performed here; the host runs its own
//! undo and calls [`EditorSession::after_host_edit`] once it has settled.

use super::keymap::{KeyEvent, Keymap};
use super::mutator::TextMutator;
use crate::markdown::{apply_command, clamp_selection, EditorCommand};
use log::debug;

/// What the session did with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// A formatting command was applied; the host should suppress the key
    Applied(EditorCommand),
    /// The key is bound (undo) but the host must perform the action itself
    PassThrough,
    /// Not a formatting shortcut
    Ignored,
}

/// A formatting session bound to one host text widget.
pub struct EditorSession<M: TextMutator> {
    mutator: M,
    keymap: Keymap,
}

impl<M: TextMutator> EditorSession<M> {
    pub fn new(mutator: M, keymap: Keymap) -> Self {
        Self { mutator, keymap }
    }

    pub fn mutator(&self) -> &M {
        &self.mutator
    }

    pub fn mutator_mut(&mut self) -> &mut M {
        &mut self.mutator
    }

    pub fn into_mutator(self) -> M {
        self.mutator
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Handle a key press from the host.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyDisposition {
        match self.keymap.resolve(event) {
            Some(EditorCommand::Undo) => KeyDisposition::PassThrough,
            Some(command) => {
                self.run(command);
                KeyDisposition::Applied(command)
            }
            None => KeyDisposition::Ignored,
        }
    }

    /// Apply `command` to the host's current text and selection.
    ///
    /// Returns `true` if the text changed.
    pub fn run(&mut self, command: EditorCommand) -> bool {
        let outcome = apply_command(self.mutator.text(), self.mutator.selection(), command);
        let changed = match &outcome.edit {
            Some(edit) => {
                debug!(
                    "{}: replacing {}..{} with {:?}",
                    command.name(),
                    edit.range.start,
                    edit.range.end,
                    edit.insert
                );
                self.mutator.replace_range(edit.range, &edit.insert);
                true
            }
            None => false,
        };
        self.mutator.set_selection(outcome.selection);
        changed
    }

    /// Re-clamp the selection after the host changed the text on its own
    /// (undo, redo, paste).
    pub fn after_host_edit(&mut self) {
        let selection = self.mutator.selection();
        let clamped = clamp_selection(self.mutator.text(), selection);
        if clamped != selection {
            debug!(
                "Clamped stale selection {}..{} to {}..{}",
                selection.start, selection.end, clamped.start, clamped.end
            );
            self.mutator.set_selection(clamped);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
