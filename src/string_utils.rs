//! Character Offset Utilities
//!
//! Selections coming from the host are expressed in characters (Unicode
//! scalar values), while Rust strings are indexed by UTF-8 bytes. The
//! helpers here translate between the two and clamp stale offsets so that
//! slicing never panics.
//!
//! # Example
//! ```ignore
//! use crate::string_utils::{char_to_byte, char_len};
//!
//! let text = "Hei på deg";
//! assert_eq!(char_len(text), 10);
//! assert_eq!(char_to_byte(text, 6), 7); // 'å' is 2 bytes
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Counting
// ─────────────────────────────────────────────────────────────────────────────

/// Number of characters in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Clamp a character offset into `[0, char_len(s)]`.
#[inline]
pub fn clamp_char_offset(s: &str, offset: usize) -> usize {
    offset.min(char_len(s))
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a character offset to a byte index.
///
/// Offsets past the end map to `s.len()`, so the result is always a valid
/// slice boundary.
pub fn char_to_byte(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert a byte index to a character offset.
///
/// A byte index that falls inside a multi-byte character counts only the
/// characters that start before it.
pub fn byte_to_char(s: &str, byte_index: usize) -> usize {
    let byte_index = byte_index.min(s.len());
    s.char_indices()
        .take_while(|(i, _)| *i < byte_index)
        .count()
}

/// Slice `s` by a character range, clamping both ends.
pub fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let start = char_to_byte(s, start);
    let end = char_to_byte(s, end);
    if start >= end {
        return "";
    }
    &s[start..end]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
