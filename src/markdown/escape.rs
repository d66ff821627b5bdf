//! Markup escaping for highlighter output.

use std::borrow::Cow;

/// Escape text so it can be embedded in HTML markup.
///
/// Replaces `&`, `<`, `>` and both quote characters. Borrows the input
/// untouched when there is nothing to escape, which is the common case for
/// highlighted token text.
pub fn escape_markup(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape_markup("Hello"), "Hello");
        assert_eq!(escape_markup("<script>"), "&lt;script&gt;");
        assert_eq!(escape_markup("a & b"), "a &amp; b");
        assert_eq!(escape_markup("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_markup("it's"), "it&#39;s");
    }

    #[test]
    fn test_escape_borrows_clean_input() {
        assert!(matches!(escape_markup("plain text"), Cow::Borrowed(_)));
        assert!(matches!(escape_markup("1 < 2"), Cow::Owned(_)));
    }

    #[test]
    fn test_escape_does_not_double_escape_order() {
        // '&' must be handled before the entities it introduces
        assert_eq!(escape_markup("&lt;"), "&amp;lt;");
    }
}
