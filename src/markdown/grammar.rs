//! Grammar Registry
//!
//! Sub-grammars tokenize a region of text into classed tokens. The registry
//! maps canonical language ids (see [`super::languages`]) to grammars and is
//! built once at startup, then handed to the highlighter by reference.
//!
//! The bundled grammars are backed by syntect's default syntax set. Tests
//! and embedders can register their own [`Grammar`] implementations.
//!
//! # Example
//! ```ignore
//! use crate::markdown::grammar::GrammarRegistry;
//!
//! let registry = GrammarRegistry::bundled();
//! let tokens = registry.get("javascript").unwrap().tokenize("const x = 1;")?;
//! ```

use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use syntect::parsing::{ParseState, Scope, ScopeStack, ScopeStackOp, SyntaxSet};
use syntect::util::LinesWithEndings;

// ─────────────────────────────────────────────────────────────────────────────
// Tokens
// ─────────────────────────────────────────────────────────────────────────────

/// A run of source text produced by a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Space-separated token class, `None` for untokenized text
    pub class: Option<String>,
    /// The exact source text covered by this token
    pub text: String,
}

impl Token {
    /// A token with a class.
    pub fn classed(class: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            text: text.into(),
        }
    }

    /// A token without a class.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            class: None,
            text: text.into(),
        }
    }
}

/// Append `text` to `tokens`, merging into the previous token when the class
/// is the same.
fn push_token(tokens: &mut Vec<Token>, class: Option<String>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = tokens.last_mut() {
        if last.class == class {
            last.text.push_str(text);
            return;
        }
    }
    tokens.push(Token {
        class,
        text: text.to_string(),
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Grammar Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A grammar failed to tokenize its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError {
    /// Canonical id of the failing grammar
    pub language: String,
    /// Description from the underlying tokenizer
    pub message: String,
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to tokenize {}: {}", self.language, self.message)
    }
}

impl std::error::Error for GrammarError {}

/// A tokenizer for one language.
///
/// Implementations must be lossless: the concatenated text of the returned
/// tokens equals `source`.
pub trait Grammar: Send + Sync {
    /// Tokenize `source`.
    fn tokenize(&self, source: &str) -> Result<Vec<Token>, GrammarError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntect Grammar
// ─────────────────────────────────────────────────────────────────────────────

/// A grammar backed by one syntax of a shared syntect `SyntaxSet`.
pub struct SyntectGrammar {
    syntax_set: Arc<SyntaxSet>,
    syntax_index: usize,
    language: String,
}

impl SyntectGrammar {
    /// Look up `token` (extension or name, as in a fence tag) in `syntax_set`.
    ///
    /// Returns `None` when the set has no matching syntax.
    pub fn find(syntax_set: &Arc<SyntaxSet>, language: &str, token: &str) -> Option<Self> {
        let syntax = syntax_set.find_syntax_by_token(token)?;
        let syntax_index = syntax_set
            .syntaxes()
            .iter()
            .position(|candidate| std::ptr::eq(candidate, syntax))?;
        Some(Self {
            syntax_set: Arc::clone(syntax_set),
            syntax_index,
            language: language.to_string(),
        })
    }

    /// Name of the underlying syntect syntax (e.g. "JavaScript").
    pub fn syntax_name(&self) -> &str {
        &self.syntax_set.syntaxes()[self.syntax_index].name
    }
}

impl SyntectGrammar {
    fn error(&self, message: String) -> GrammarError {
        GrammarError {
            language: self.language.clone(),
            message,
        }
    }
}

impl Grammar for SyntectGrammar {
    fn tokenize(&self, source: &str) -> Result<Vec<Token>, GrammarError> {
        let syntax = &self.syntax_set.syntaxes()[self.syntax_index];
        let mut state = ParseState::new(syntax);
        let mut scopes = ScopeStack::new();
        let mut tokens = Vec::new();

        for line in LinesWithEndings::from(source) {
            let ops = state
                .parse_line(line, &self.syntax_set)
                .map_err(|e| self.error(e.to_string()))?;

            let mut pos = 0;
            for (offset, op) in ops {
                let offset = offset.min(line.len());
                if offset > pos {
                    push_token(&mut tokens, scope_class(&scopes), &line[pos..offset]);
                    pos = offset;
                }
                apply_scope_op(&mut scopes, &op).map_err(|message| self.error(message))?;
            }
            push_token(&mut tokens, scope_class(&scopes), &line[pos..]);
        }

        Ok(tokens)
    }
}

/// Apply one scope operation, failing on an unbalanced stack.
fn apply_scope_op(scopes: &mut ScopeStack, op: &ScopeStackOp) -> Result<(), String> {
    scopes
        .apply(op)
        .map_err(|e| format!("scope stack error: {:?}", e))
}

/// Token class for the innermost meaningful scope on the stack.
///
/// The root scope (`source.js`, `text.html.markdown`) and `meta.*` scopes
/// only describe structure, so text covered by nothing else is left plain.
fn scope_class(scopes: &ScopeStack) -> Option<String> {
    scopes
        .as_slice()
        .iter()
        .skip(1)
        .rev()
        .map(|scope: &Scope| scope.build_string())
        .find(|name| !name.starts_with("meta."))
        .map(|name| name.replace('.', " "))
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Canonical id → lookup token in syntect's bundled syntax set.
const BUNDLED_GRAMMARS: &[(&str, &str)] = &[
    ("javascript", "js"),
    ("typescript", "ts"),
    ("python", "py"),
    ("bash", "bash"),
    ("json", "json"),
    ("css", "css"),
    ("markdown", "md"),
    ("rust", "rs"),
    ("html", "html"),
    ("yaml", "yaml"),
];

/// Immutable mapping from canonical language id to grammar.
#[derive(Default)]
pub struct GrammarRegistry {
    grammars: BTreeMap<String, Box<dyn Grammar>>,
}

impl fmt::Debug for GrammarRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarRegistry")
            .field("languages", &self.languages().collect::<Vec<_>>())
            .finish()
    }
}

impl GrammarRegistry {
    /// A registry with no grammars; everything renders as plain text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the syntect-backed grammars for every bundled language
    /// that the default syntax set actually contains.
    ///
    /// Loading the syntax set is relatively expensive, so build this once
    /// and share it.
    pub fn bundled() -> Self {
        debug!("Loading syntect syntax set");
        let syntax_set = Arc::new(SyntaxSet::load_defaults_newlines());
        let mut registry = Self::new();

        for (language, token) in BUNDLED_GRAMMARS {
            match SyntectGrammar::find(&syntax_set, language, token) {
                Some(grammar) => {
                    debug!("Grammar {} -> {}", language, grammar.syntax_name());
                    registry = registry.with_grammar(*language, grammar);
                }
                None => debug!("No bundled syntax for {}, blocks render as text", language),
            }
        }

        debug!("Registered {} grammars", registry.len());
        registry
    }

    /// Add a grammar under a canonical id, replacing any previous one.
    pub fn with_grammar(
        mut self,
        language: impl Into<String>,
        grammar: impl Grammar + 'static,
    ) -> Self {
        self.grammars.insert(language.into(), Box::new(grammar));
        self
    }

    /// The grammar registered for `language`, if any.
    pub fn get(&self, language: &str) -> Option<&dyn Grammar> {
        self.grammars.get(language).map(|g| g.as_ref())
    }

    /// Whether a grammar is registered for `language`.
    pub fn contains(&self, language: &str) -> bool {
        self.grammars.contains_key(language)
    }

    /// Registered language ids in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.grammars.keys().map(String::as_str)
    }

    /// Number of registered grammars.
    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
