//! Host text mutation seam
//!
//! Formatting commands never assign a whole new document to the host.
//! They go through [`TextMutator::replace_range`], the same primitive the
//! host uses for typing, so the host's own undo history records the edit.
//!
//! [`TextBuffer`] is an in-memory host used by the command line and tests.

use crate::markdown::Selection;
use crate::string_utils::{char_to_byte, clamp_char_offset};
use log::debug;

/// Default number of undo snapshots kept by a [`TextBuffer`].
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// The editing primitives a host text widget exposes.
pub trait TextMutator {
    /// Current document text.
    fn text(&self) -> &str;

    /// Current selection in character offsets, as the host reports it.
    ///
    /// May be stale (past the end of the text) right after a host-side
    /// edit such as undo.
    fn selection(&self) -> Selection;

    /// Replace the characters in `range` with `insert` as one undoable edit.
    fn replace_range(&mut self, range: Selection, insert: &str);

    /// Move the selection.
    fn set_selection(&mut self, selection: Selection);
}

// ─────────────────────────────────────────────────────────────────────────────
// In-Memory Buffer
// ─────────────────────────────────────────────────────────────────────────────

/// A plain text buffer with a bounded undo history.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    content: String,
    selection: Selection,
    /// Undo history stack (previous contents)
    undo_stack: Vec<String>,
    /// Redo history stack
    redo_stack: Vec<String>,
    /// Maximum undo history size
    max_undo_size: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new("")
    }
}

impl TextBuffer {
    /// A buffer holding `content` with the caret at the start.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            selection: Selection::caret(0),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_size: DEFAULT_UNDO_LIMIT,
        }
    }

    /// Set the undo history size (at least 1).
    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.max_undo_size = limit.max(1);
        self
    }

    /// Replace the content as a user edit (e.g. typing), recording undo.
    pub fn set_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        if content != self.content {
            self.push_undo();
            self.content = content;
        }
    }

    fn push_undo(&mut self) {
        self.undo_stack.push(self.content.clone());
        if self.undo_stack.len() > self.max_undo_size {
            self.undo_stack.remove(0);
        }
        // Clear redo stack on new edit
        self.redo_stack.clear();
    }

    /// Undo the last edit.
    ///
    /// Only the text is restored; the selection is left as it was and may
    /// point past the end of the restored text.
    ///
    /// Returns `true` if undo was performed.
    pub fn undo(&mut self) -> bool {
        if let Some(previous) = self.undo_stack.pop() {
            self.redo_stack.push(std::mem::replace(&mut self.content, previous));
            debug!("Undo, {} steps left", self.undo_stack.len());
            true
        } else {
            false
        }
    }

    /// Redo the last undone edit.
    ///
    /// Returns `true` if redo was performed.
    pub fn redo(&mut self) -> bool {
        if let Some(next) = self.redo_stack.pop() {
            self.undo_stack.push(std::mem::replace(&mut self.content, next));
            true
        } else {
            false
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of items in the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Consume the buffer, returning its text.
    pub fn into_content(self) -> String {
        self.content
    }
}

impl TextMutator for TextBuffer {
    fn text(&self) -> &str {
        &self.content
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn replace_range(&mut self, range: Selection, insert: &str) {
        let range = Selection::new(range.start, range.end);
        let start = char_to_byte(&self.content, clamp_char_offset(&self.content, range.start));
        let end = char_to_byte(&self.content, clamp_char_offset(&self.content, range.end));
        if start == end && insert.is_empty() {
            return;
        }
        self.push_undo();
        self.content.replace_range(start..end, insert);
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_range_records_undo() {
        let mut buffer = TextBuffer::new("Hello world");
        buffer.replace_range(Selection::new(0, 5), "**Hello**");
        assert_eq!(buffer.text(), "**Hello** world");
        assert!(buffer.can_undo());

        assert!(buffer.undo());
        assert_eq!(buffer.text(), "Hello world");
        assert!(buffer.can_redo());

        assert!(buffer.redo());
        assert_eq!(buffer.text(), "**Hello** world");
    }

    #[test]
    fn test_replace_range_uses_char_offsets() {
        let mut buffer = TextBuffer::new("på deg");
        buffer.replace_range(Selection::new(0, 2), "*på*");
        assert_eq!(buffer.text(), "*på* deg");
    }

    #[test]
    fn test_replace_range_clamps() {
        let mut buffer = TextBuffer::new("abc");
        buffer.replace_range(Selection::new(2, 50), "X");
        assert_eq!(buffer.text(), "abX");
    }

    #[test]
    fn test_replace_range_with_reversed_literal_range() {
        let mut buffer = TextBuffer::new("abcdef");
        buffer.replace_range(Selection { start: 4, end: 1 }, "X");
        assert_eq!(buffer.text(), "aXef");
        assert_eq!(buffer.undo_count(), 1);
    }

    #[test]
    fn test_empty_replace_is_noop() {
        let mut buffer = TextBuffer::new("abc");
        buffer.replace_range(Selection::caret(1), "");
        assert!(!buffer.can_undo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut buffer = TextBuffer::new("a");
        buffer.set_content("ab");
        buffer.undo();
        assert!(buffer.can_redo());
        buffer.set_content("ac");
        assert!(!buffer.can_redo());
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let mut buffer = TextBuffer::new("").with_undo_limit(3);
        for i in 0..10 {
            buffer.set_content(i.to_string());
        }
        assert_eq!(buffer.undo_count(), 3);
        while buffer.undo() {}
        assert_eq!(buffer.text(), "6");
    }

    #[test]
    fn test_undo_leaves_selection_alone() {
        let mut buffer = TextBuffer::new("ab");
        buffer.replace_range(Selection::caret(2), "cdef");
        buffer.set_selection(Selection::caret(6));
        buffer.undo();
        assert_eq!(buffer.text(), "ab");
        assert_eq!(buffer.selection(), Selection::caret(6));
    }

    #[test]
    fn test_undo_on_fresh_buffer() {
        let mut buffer = TextBuffer::default();
        assert!(!buffer.undo());
        assert!(!buffer.redo());
    }
}
