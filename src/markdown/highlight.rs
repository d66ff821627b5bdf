//! Mixed-grammar Highlighting
//!
//! Produces the display markup for the raw editor: markdown regions are
//! tokenized by the `markdown` grammar, fenced code blocks by the grammar
//! their (alias-resolved) language tag names. Each fenced block is wrapped
//! in a `code-block` container so the editor can style it apart from
//! inline markdown.
//!
//! Highlighting is pure and total. It is recomputed from scratch for every
//! content change and never fails: unknown languages and grammar errors
//! degrade to escaped plain text.
//!
//! # Example
//! ```ignore
//! use crate::markdown::{GrammarRegistry, Highlighter, LanguageAliases};
//!
//! let registry = GrammarRegistry::bundled();
//! let aliases = LanguageAliases::builtin();
//! let highlighter = Highlighter::new(&registry, &aliases);
//! let html = highlighter.highlight_to_html("# Title\n```js\nlet x;\n```");
//! ```

use super::escape::escape_markup;
use super::fence::{scan_regions, FencedBlock, Region};
use super::grammar::{Grammar, GrammarRegistry, Token};
use super::languages::LanguageAliases;
use log::warn;

/// Grammar id used for everything outside fenced blocks.
pub const MARKDOWN_GRAMMAR: &str = "markdown";

/// Class carried by the opening and closing fence lines.
pub const FENCE_CLASS: &str = "punctuation code-fence";

/// Class of the container wrapping a fenced block.
pub const CODE_BLOCK_CLASS: &str = "code-block";

// ─────────────────────────────────────────────────────────────────────────────
// Output Model
// ─────────────────────────────────────────────────────────────────────────────

/// One piece of highlighter output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightSpan {
    /// Untokenized text
    Text(String),
    /// Text tagged with a token class
    Token { class: String, text: String },
    /// A fenced block: opener, body and closer spans in order
    CodeBlock {
        /// Raw tag as typed after the fence
        tag: String,
        /// Grammar selected for the body, if one is registered
        grammar: Option<String>,
        children: Vec<HighlightSpan>,
    },
}

impl HighlightSpan {
    fn from_token(token: Token) -> Self {
        match token.class {
            Some(class) => HighlightSpan::Token {
                class,
                text: token.text,
            },
            None => HighlightSpan::Text(token.text),
        }
    }

    fn push_visible(&self, out: &mut String) {
        match self {
            HighlightSpan::Text(text) | HighlightSpan::Token { text, .. } => out.push_str(text),
            HighlightSpan::CodeBlock { children, .. } => {
                for child in children {
                    child.push_visible(out);
                }
            }
        }
    }

    fn push_html(&self, out: &mut String) {
        match self {
            HighlightSpan::Text(text) => out.push_str(&escape_markup(text)),
            HighlightSpan::Token { class, text } => {
                out.push_str("<span class=\"token ");
                out.push_str(&escape_markup(class));
                out.push_str("\">");
                out.push_str(&escape_markup(text));
                out.push_str("</span>");
            }
            HighlightSpan::CodeBlock { tag, children, .. } => {
                out.push_str("<span class=\"");
                out.push_str(CODE_BLOCK_CLASS);
                out.push('"');
                if !tag.is_empty() {
                    out.push_str(" data-language=\"");
                    out.push_str(&escape_markup(tag));
                    out.push('"');
                }
                out.push('>');
                for child in children {
                    child.push_html(out);
                }
                out.push_str("</span>");
            }
        }
    }
}

/// The highlighted form of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlighted {
    spans: Vec<HighlightSpan>,
}

impl Highlighted {
    /// Top-level spans in document order.
    pub fn spans(&self) -> &[HighlightSpan] {
        &self.spans
    }

    /// The text the spans cover, without any markup.
    ///
    /// Always equal to the highlighted input.
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            span.push_visible(&mut out);
        }
        out
    }

    /// Render as HTML markup. All source text is escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            span.push_html(&mut out);
        }
        out
    }

    /// The fenced block containers, in order.
    pub fn code_blocks(&self) -> impl Iterator<Item = &HighlightSpan> {
        self.spans
            .iter()
            .filter(|span| matches!(span, HighlightSpan::CodeBlock { .. }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Highlights documents against a fixed grammar registry and alias table.
#[derive(Debug, Clone, Copy)]
pub struct Highlighter<'a> {
    registry: &'a GrammarRegistry,
    aliases: &'a LanguageAliases,
}

impl<'a> Highlighter<'a> {
    pub fn new(registry: &'a GrammarRegistry, aliases: &'a LanguageAliases) -> Self {
        Self { registry, aliases }
    }

    /// Highlight `text` into spans.
    pub fn highlight(&self, text: &str) -> Highlighted {
        let mut spans = Vec::new();
        for region in scan_regions(text) {
            match region {
                Region::Markdown(range) => {
                    let markdown = self.registry.get(MARKDOWN_GRAMMAR);
                    spans.extend(tokenize_or_plain(markdown, MARKDOWN_GRAMMAR, &text[range]));
                }
                Region::Fenced(block) => spans.push(self.code_block(text, &block)),
            }
        }
        Highlighted { spans }
    }

    /// Highlight `text` straight to HTML markup.
    pub fn highlight_to_html(&self, text: &str) -> String {
        self.highlight(text).to_html()
    }

    fn code_block(&self, text: &str, block: &FencedBlock<'_>) -> HighlightSpan {
        let language = self
            .aliases
            .resolve(block.tag)
            .filter(|language| self.registry.contains(language));
        let body = &text[block.body.clone()];

        let mut children = Vec::with_capacity(4);
        children.push(HighlightSpan::Token {
            class: FENCE_CLASS.to_string(),
            text: text[block.opener.clone()].to_string(),
        });
        match language.as_deref() {
            Some(language) => {
                let grammar = self.registry.get(language);
                children.extend(tokenize_or_plain(grammar, language, body));
            }
            None if !body.is_empty() => children.push(HighlightSpan::Text(body.to_string())),
            None => {}
        }
        children.push(HighlightSpan::Token {
            class: FENCE_CLASS.to_string(),
            text: text[block.closer.clone()].to_string(),
        });

        HighlightSpan::CodeBlock {
            tag: block.tag.to_string(),
            grammar: language,
            children,
        }
    }
}

/// Tokenize with `grammar`, falling back to a single plain span when there
/// is no grammar or it fails.
fn tokenize_or_plain(
    grammar: Option<&dyn Grammar>,
    language: &str,
    source: &str,
) -> Vec<HighlightSpan> {
    if source.is_empty() {
        return Vec::new();
    }
    let Some(grammar) = grammar else {
        return vec![HighlightSpan::Text(source.to_string())];
    };
    match grammar.tokenize(source) {
        Ok(tokens) => tokens.into_iter().map(HighlightSpan::from_token).collect(),
        Err(e) => {
            warn!("Highlighting {} as plain text: {}", language, e);
            vec![HighlightSpan::Text(source.to_string())]
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
