//! Markdown Formatting Commands
//!
//! Selection-aware text transformations for the raw editor. Every command
//! is a pure function of the document text and the current selection and
//! returns the new text, the new selection and the single edit that turns
//! one into the other (so a host can replay it through its own editing
//! primitive and keep native undo history intact).
//!
//! # Supported Commands
//! - **Inline toggles**: Bold (`**`), Italic (`*`), Inline Code (`` ` ``)
//! - **Line prefix toggles**: Ordered list (`1. `), Unordered list (`- `)
//! - **Link insertion**: `[text](url)` with `url` selected afterwards
//! - **Undo**: handled by the host; the engine only re-clamps the selection
//!
//! Offsets are character offsets (Unicode scalar values), not bytes.
//!
//! # Usage
//! ```ignore
//! use crate::markdown::formatting::{apply_command, EditorCommand, Selection};
//!
//! let outcome = apply_command("Hello world", Selection::new(0, 5), EditorCommand::Bold);
//! assert_eq!(outcome.text, "**Hello** world");
//! assert_eq!(outcome.selection, Selection::new(2, 7));
//! ```

use crate::string_utils::{byte_to_char, char_len, char_slice, char_to_byte};

/// Link text used when the caret is not on a word.
const LINK_PLACEHOLDER_TEXT: &str = "text";

/// Destination placeholder selected after inserting a link.
const LINK_PLACEHOLDER_URL: &str = "url";

// ─────────────────────────────────────────────────────────────────────────────
// Command Enum
// ─────────────────────────────────────────────────────────────────────────────

/// Commands the engine recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    /// Bold text (**text**)
    Bold,
    /// Italic text (*text*)
    Italic,
    /// Inline code (`code`)
    InlineCode,
    /// Link ([text](url))
    Link,
    /// Numbered list item (1. item)
    OrderedList,
    /// Bullet list item (- item)
    UnorderedList,
    /// Host-native undo
    Undo,
}

impl EditorCommand {
    /// All commands, in toolbar order.
    pub fn all() -> &'static [EditorCommand] {
        &[
            Self::Bold,
            Self::Italic,
            Self::InlineCode,
            Self::Link,
            Self::OrderedList,
            Self::UnorderedList,
            Self::Undo,
        ]
    }

    /// Human readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::InlineCode => "Inline Code",
            Self::Link => "Insert Link",
            Self::OrderedList => "Numbered List",
            Self::UnorderedList => "Bullet List",
            Self::Undo => "Undo",
        }
    }

    /// Stable identifier used on the command line and in logs.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::InlineCode => "code",
            Self::Link => "link",
            Self::OrderedList => "ordered-list",
            Self::UnorderedList => "unordered-list",
            Self::Undo => "undo",
        }
    }

    /// Parse an identifier produced by [`EditorCommand::id`].
    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|command| command.id() == id)
    }

    /// The marker for inline wrap toggles.
    fn inline_marker(&self) -> Option<&'static str> {
        match self {
            Self::Bold => Some("**"),
            Self::Italic => Some("*"),
            Self::InlineCode => Some("`"),
            _ => None,
        }
    }

    /// The prefix for line prefix toggles.
    fn line_prefix(&self) -> Option<&'static str> {
        match self {
            Self::OrderedList => Some("1. "),
            Self::UnorderedList => Some("- "),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection & Results
// ─────────────────────────────────────────────────────────────────────────────

/// A selection as character offsets, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a selection; reversed bounds are swapped.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// A caret with nothing selected.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Number of selected characters.
    ///
    /// Fields are public, so a hand-built selection may be reversed.
    pub fn len(&self) -> usize {
        self.end.abs_diff(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.is_caret()
    }
}

/// Clamp a (possibly stale) selection into `[0, char_len(text)]`.
pub fn clamp_selection(text: &str, selection: Selection) -> Selection {
    let len = char_len(text);
    Selection::new(selection.start.min(len), selection.end.min(len))
}

/// A single replacement: `range` of the old text becomes `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Replaced character range in the text before the command
    pub range: Selection,
    /// Replacement text
    pub insert: String,
}

/// Result of applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// The new text after the command
    pub text: String,
    /// New selection in `text`
    pub selection: Selection,
    /// The replacement that produced `text`, `None` when nothing changed
    pub edit: Option<Edit>,
    /// Whether markup was added (vs removed or nothing done)
    pub applied: bool,
}

impl CommandOutcome {
    fn unchanged(text: &str, selection: Selection) -> Self {
        Self {
            text: text.to_string(),
            selection,
            edit: None,
            applied: false,
        }
    }

    fn edited(text: &str, edit: Edit, selection: Selection) -> Self {
        let start = char_to_byte(text, edit.range.start);
        let end = char_to_byte(text, edit.range.end);
        let mut new_text = String::with_capacity(text.len() + edit.insert.len());
        new_text.push_str(&text[..start]);
        new_text.push_str(&edit.insert);
        new_text.push_str(&text[end..]);
        Self {
            text: new_text,
            selection,
            edit: Some(edit),
            applied: true,
        }
    }

    fn toggled_off(mut self) -> Self {
        self.applied = false;
        self
    }

    /// Whether the text was modified.
    pub fn changed(&self) -> bool {
        self.edit.is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command Dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// Apply `command` to `text` with the given selection.
///
/// Offsets beyond the end of `text` are clamped first, so stale selections
/// never cause a panic.
pub fn apply_command(text: &str, selection: Selection, command: EditorCommand) -> CommandOutcome {
    let selection = clamp_selection(text, selection);

    if let Some(marker) = command.inline_marker() {
        return toggle_inline(text, selection, marker);
    }
    if let Some(prefix) = command.line_prefix() {
        return toggle_line_prefix(text, selection, prefix);
    }
    match command {
        EditorCommand::Link => insert_link(text, selection),
        // Undo belongs to the host; all that is left to do is the clamp above
        _ => CommandOutcome::unchanged(text, selection),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Toggle
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap the selection in `marker`, or unwrap it if the marker already sits
/// directly outside both ends of the selection.
fn toggle_inline(text: &str, selection: Selection, marker: &str) -> CommandOutcome {
    let len = char_len(text);
    let marker_len = char_len(marker);
    let Selection { start, end } = selection;

    // Adjacent slices that would run past either end are too short to match
    let wrapped = start >= marker_len
        && end + marker_len <= len
        && char_slice(text, start - marker_len, start) == marker
        && char_slice(text, end, end + marker_len) == marker;

    let selected = char_slice(text, start, end);

    if wrapped {
        let edit = Edit {
            range: Selection::new(start - marker_len, end + marker_len),
            insert: selected.to_string(),
        };
        let selection = Selection::new(start - marker_len, end - marker_len);
        return CommandOutcome::edited(text, edit, selection).toggled_off();
    }

    let edit = Edit {
        range: selection,
        insert: format!("{marker}{selected}{marker}"),
    };
    CommandOutcome::edited(
        text,
        edit,
        Selection::new(start + marker_len, end + marker_len),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Prefix Toggle
// ─────────────────────────────────────────────────────────────────────────────

/// Character bounds of the line containing `offset`, excluding its `\n`.
fn line_bounds(text: &str, offset: usize) -> (usize, usize) {
    let byte = char_to_byte(text, offset);
    let line_start = text[..byte].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = text[byte..]
        .find('\n')
        .map(|i| byte + i)
        .unwrap_or(text.len());
    (byte_to_char(text, line_start), byte_to_char(text, line_end))
}

/// Add or remove `prefix` at the start of the line holding the selection
/// start. Other lines covered by the selection are left alone.
fn toggle_line_prefix(text: &str, selection: Selection, prefix: &str) -> CommandOutcome {
    let (line_start, line_end) = line_bounds(text, selection.start);
    let prefix_len = char_len(prefix);
    let line = char_slice(text, line_start, line_end);

    if line.starts_with(prefix) {
        let edit = Edit {
            range: Selection::new(line_start, line_start + prefix_len),
            insert: String::new(),
        };
        let shift_left = |offset: usize| offset.saturating_sub(prefix_len).max(line_start);
        let selection = Selection::new(shift_left(selection.start), shift_left(selection.end));
        return CommandOutcome::edited(text, edit, selection).toggled_off();
    }

    let edit = Edit {
        range: Selection::caret(line_start),
        insert: prefix.to_string(),
    };
    let selection = Selection::new(selection.start + prefix_len, selection.end + prefix_len);
    CommandOutcome::edited(text, edit, selection)
}

// ─────────────────────────────────────────────────────────────────────────────
// Link Insertion
// ─────────────────────────────────────────────────────────────────────────────

fn is_link_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// The word around a caret as a character range (possibly empty).
fn word_at(text: &str, caret: usize) -> Selection {
    let chars: Vec<char> = text.chars().collect();
    let mut start = caret;
    while start > 0 && is_link_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = caret;
    while end < chars.len() && is_link_word_char(chars[end]) {
        end += 1;
    }
    Selection::new(start, end)
}

/// Turn the selection (or the word under the caret) into `[text](url)` and
/// select the `url` placeholder.
fn insert_link(text: &str, selection: Selection) -> CommandOutcome {
    let range = if selection.is_caret() {
        word_at(text, selection.start)
    } else {
        selection
    };

    let link_text = match char_slice(text, range.start, range.end) {
        "" => LINK_PLACEHOLDER_TEXT,
        word => word,
    };

    let url_start = range.start + char_len(link_text) + "[](".len();
    let edit = Edit {
        range,
        insert: format!("[{link_text}]({LINK_PLACEHOLDER_URL})"),
    };
    let selection = Selection::new(url_start, url_start + LINK_PLACEHOLDER_URL.len());
    CommandOutcome::edited(text, edit, selection)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Inline Toggle Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_bold_wraps_selection() {
        let outcome = apply_command("Hello world", Selection::new(0, 5), EditorCommand::Bold);
        assert_eq!(outcome.text, "**Hello** world");
        assert_eq!(outcome.selection, Selection::new(2, 7));
        assert!(outcome.applied);
        assert_eq!(
            outcome.edit,
            Some(Edit {
                range: Selection::new(0, 5),
                insert: "**Hello**".to_string(),
            })
        );
    }

    #[test]
    fn test_bold_unwraps_when_markers_outside_selection() {
        let outcome = apply_command("a **b** c", Selection::new(4, 5), EditorCommand::Bold);
        assert_eq!(outcome.text, "a b c");
        assert_eq!(outcome.selection, Selection::new(2, 3));
        assert!(!outcome.applied);
    }

    #[test]
    fn test_markers_inside_selection_are_wrapped_again() {
        // Only markers outside the selection count as "already wrapped"
        let outcome = apply_command("**Hello**", Selection::new(0, 9), EditorCommand::Bold);
        assert_eq!(outcome.text, "****Hello****");
    }

    #[test]
    fn test_italic_with_selection() {
        let outcome = apply_command("Hello world", Selection::new(6, 11), EditorCommand::Italic);
        assert_eq!(outcome.text, "Hello *world*");
        assert_eq!(outcome.selection, Selection::new(7, 12));
    }

    #[test]
    fn test_inline_code_toggle() {
        let wrapped = apply_command("run ls now", Selection::new(4, 6), EditorCommand::InlineCode);
        assert_eq!(wrapped.text, "run `ls` now");
        let unwrapped = apply_command(&wrapped.text, wrapped.selection, EditorCommand::InlineCode);
        assert_eq!(unwrapped.text, "run ls now");
        assert_eq!(unwrapped.selection, Selection::new(4, 6));
    }

    #[test]
    fn test_caret_wrap_places_caret_between_markers() {
        let outcome = apply_command("ab", Selection::caret(1), EditorCommand::Bold);
        assert_eq!(outcome.text, "a****b");
        assert_eq!(outcome.selection, Selection::caret(3));
    }

    #[test]
    fn test_wrap_at_document_start_and_end() {
        // A marker-like char at only one side must not count as wrapped
        let outcome = apply_command("*x", Selection::new(1, 2), EditorCommand::Italic);
        assert_eq!(outcome.text, "**x*");

        let outcome = apply_command("x*", Selection::new(0, 1), EditorCommand::Italic);
        assert_eq!(outcome.text, "*x**");

        let outcome = apply_command("", Selection::caret(0), EditorCommand::InlineCode);
        assert_eq!(outcome.text, "``");
        assert_eq!(outcome.selection, Selection::caret(1));
    }

    #[test]
    fn test_short_adjacent_slice_is_not_wrapped() {
        // Only one '*' before the selection: not a bold marker
        let outcome = apply_command("*a**", Selection::new(1, 2), EditorCommand::Bold);
        assert_eq!(outcome.text, "***a****");
    }

    #[test]
    fn test_italic_inside_bold_unwraps_one_star() {
        let outcome = apply_command("**b**", Selection::new(2, 3), EditorCommand::Italic);
        assert_eq!(outcome.text, "*b*");
        assert_eq!(outcome.selection, Selection::new(1, 2));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line Prefix Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_unordered_list_toggles_twice() {
        let first = apply_command("item", Selection::caret(2), EditorCommand::UnorderedList);
        assert_eq!(first.text, "- item");
        assert_eq!(first.selection, Selection::caret(4));
        assert!(first.applied);

        let second = apply_command(&first.text, first.selection, EditorCommand::UnorderedList);
        assert_eq!(second.text, "item");
        assert_eq!(second.selection, Selection::caret(2));
        assert!(!second.applied);
    }

    #[test]
    fn test_prefix_removal_clamps_to_line_start() {
        let outcome = apply_command("a\n- item", Selection::caret(3), EditorCommand::UnorderedList);
        assert_eq!(outcome.text, "a\nitem");
        assert_eq!(outcome.selection, Selection::caret(2));
    }

    #[test]
    fn test_ordered_list_on_middle_line() {
        let outcome = apply_command(
            "one\ntwo\nthree",
            Selection::new(5, 6),
            EditorCommand::OrderedList,
        );
        assert_eq!(outcome.text, "one\n1. two\nthree");
        assert_eq!(outcome.selection, Selection::new(8, 9));
        assert_eq!(
            outcome.edit,
            Some(Edit {
                range: Selection::caret(4),
                insert: "1. ".to_string(),
            })
        );
    }

    #[test]
    fn test_prefix_only_touches_line_of_selection_start() {
        let outcome = apply_command("a\nb\nc", Selection::new(0, 5), EditorCommand::UnorderedList);
        assert_eq!(outcome.text, "- a\nb\nc");
        assert_eq!(outcome.selection, Selection::new(2, 7));
    }

    #[test]
    fn test_caret_on_empty_trailing_line() {
        let outcome = apply_command("a\n", Selection::caret(2), EditorCommand::OrderedList);
        assert_eq!(outcome.text, "a\n1. ");
        assert_eq!(outcome.selection, Selection::caret(5));
    }

    #[test]
    fn test_other_list_prefix_is_not_removed() {
        let outcome = apply_command("- item", Selection::caret(0), EditorCommand::OrderedList);
        assert_eq!(outcome.text, "1. - item");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Link Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_link_on_caret_uses_word() {
        let outcome = apply_command("see foo bar", Selection::caret(5), EditorCommand::Link);
        assert_eq!(outcome.text, "see [foo](url) bar");
        assert_eq!(outcome.selection, Selection::new(10, 13));
        assert_eq!(char_slice(&outcome.text, 10, 13), "url");
    }

    #[test]
    fn test_link_word_includes_dash_and_underscore() {
        let outcome = apply_command("go to my-page_2 now", Selection::caret(9), EditorCommand::Link);
        assert_eq!(outcome.text, "go to [my-page_2](url) now");
    }

    #[test]
    fn test_link_without_word_uses_placeholder() {
        let outcome = apply_command("a  b", Selection::caret(2), EditorCommand::Link);
        assert_eq!(outcome.text, "a [text](url) b");
        assert_eq!(char_slice(&outcome.text, outcome.selection.start, outcome.selection.end), "url");
    }

    #[test]
    fn test_link_with_selection() {
        let outcome = apply_command("Click here", Selection::new(6, 10), EditorCommand::Link);
        assert_eq!(outcome.text, "Click [here](url)");
        assert_eq!(outcome.selection, Selection::new(13, 16));
    }

    #[test]
    fn test_link_on_empty_document() {
        let outcome = apply_command("", Selection::caret(0), EditorCommand::Link);
        assert_eq!(outcome.text, "[text](url)");
        assert_eq!(outcome.selection, Selection::new(7, 10));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Undo & Clamping Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_undo_only_clamps() {
        let outcome = apply_command("abc", Selection::new(1, 99), EditorCommand::Undo);
        assert_eq!(outcome.text, "abc");
        assert_eq!(outcome.selection, Selection::new(1, 3));
        assert!(!outcome.changed());
    }

    #[test]
    fn test_stale_selection_is_clamped() {
        let outcome = apply_command("abc", Selection::new(10, 20), EditorCommand::Bold);
        assert_eq!(outcome.text, "abc****");
        assert_eq!(outcome.selection, Selection::caret(5));
    }

    #[test]
    fn test_len_of_hand_built_reversed_selection() {
        let reversed = Selection { start: 4, end: 1 };
        assert_eq!(reversed.len(), 3);
        assert_eq!(Selection::new(1, 4).len(), 3);
        assert_eq!(Selection::caret(2).len(), 0);
    }

    #[test]
    fn test_reversed_selection_is_normalized() {
        assert_eq!(Selection::new(5, 2), Selection::new(2, 5));
        let outcome = apply_command("Hello", Selection::new(5, 0), EditorCommand::Italic);
        assert_eq!(outcome.text, "*Hello*");
    }

    #[test]
    fn test_command_ids_round_trip() {
        for command in EditorCommand::all() {
            assert_eq!(EditorCommand::from_id(command.id()), Some(*command));
        }
        assert_eq!(EditorCommand::from_id("strike"), None);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Unicode Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_bold_norwegian_chars() {
        let outcome = apply_command("Hei på deg", Selection::new(4, 6), EditorCommand::Bold);
        assert_eq!(outcome.text, "Hei **på** deg");
        assert_eq!(outcome.selection, Selection::new(6, 8));
    }

    #[test]
    fn test_bold_emoji_round_trip() {
        let wrapped = apply_command("Party 🎉 time", Selection::new(6, 7), EditorCommand::Bold);
        assert_eq!(wrapped.text, "Party **🎉** time");
        let unwrapped = apply_command(&wrapped.text, wrapped.selection, EditorCommand::Bold);
        assert_eq!(unwrapped.text, "Party 🎉 time");
    }

    #[test]
    fn test_list_prefix_after_multibyte_line() {
        let outcome = apply_command("日本\n語", Selection::caret(3), EditorCommand::UnorderedList);
        assert_eq!(outcome.text, "日本\n- 語");
        assert_eq!(outcome.selection, Selection::caret(5));
    }

    #[test]
    fn test_no_panic_on_any_offset() {
        let text = "Hei på deg 你好 🎉\n- x";
        let len = char_len(text);
        for i in 0..=len + 3 {
            for j in i..=len + 3 {
                for command in EditorCommand::all() {
                    let outcome = apply_command(text, Selection::new(i, j), *command);
                    assert!(outcome.selection.end <= char_len(&outcome.text));
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Properties
    // ─────────────────────────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn prop_wrap_then_unwrap_is_identity(
            text in "[a-z* `\n]{0,24}",
            a in 0usize..30,
            b in 0usize..30,
            which in 0usize..3,
        ) {
            let command = [EditorCommand::Bold, EditorCommand::Italic, EditorCommand::InlineCode][which];
            let selection = clamp_selection(&text, Selection::new(a, b));
            let first = apply_command(&text, selection, command);
            prop_assume!(first.applied);
            let second = apply_command(&first.text, first.selection, command);
            prop_assert_eq!(second.text, text);
            prop_assert_eq!(second.selection, selection);
        }

        #[test]
        fn prop_edit_reproduces_text(
            text in "\\PC{0,24}",
            a in 0usize..30,
            b in 0usize..30,
            which in 0usize..7,
        ) {
            let command = EditorCommand::all()[which];
            let outcome = apply_command(&text, Selection::new(a, b), command);
            prop_assert!(outcome.selection.end <= char_len(&outcome.text));
            if let Some(edit) = &outcome.edit {
                let replayed = format!(
                    "{}{}{}",
                    char_slice(&text, 0, edit.range.start),
                    edit.insert,
                    char_slice(&text, edit.range.end, usize::MAX),
                );
                prop_assert_eq!(replayed, outcome.text);
            }
        }
    }
}
