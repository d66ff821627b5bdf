//! Markdown source highlighting and formatting module
//!
//! This module works on raw markdown text, never on a parsed document:
//! - Split a document into markdown regions and fenced code blocks
//! - Highlight each region with the grammar for its language
//! - Toggle inline and line-prefix formatting around a selection
//!
//! # Example
//! ```ignore
//! use crate::markdown::{apply_command, EditorCommand, GrammarRegistry, Highlighter};
//! use crate::markdown::{LanguageAliases, Selection};
//!
//! // Highlighting
//! let registry = GrammarRegistry::bundled();
//! let aliases = LanguageAliases::builtin();
//! let html = Highlighter::new(&registry, &aliases).highlight_to_html("```js\nlet x;\n```");
//!
//! // Formatting
//! let outcome = apply_command("Hello", Selection::new(0, 5), EditorCommand::Bold);
//! ```

mod escape;
pub mod fence;
pub mod formatting;
pub mod grammar;
mod highlight;
mod languages;

pub use escape::escape_markup;
pub use fence::{fenced_blocks, scan_regions, FencedBlock, Region};
pub use formatting::{
    apply_command, clamp_selection, CommandOutcome, Edit, EditorCommand, Selection,
};
pub use grammar::{Grammar, GrammarError, GrammarRegistry, SyntectGrammar, Token};
pub use highlight::{HighlightSpan, Highlighted, Highlighter};
pub use languages::LanguageAliases;
