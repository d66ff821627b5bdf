//! Fenced code block language resolution
//!
//! Maps the short tags people type after a fence (```` ```js ````) to the
//! canonical ids grammars are registered under. The table is built once at
//! startup and is read-only afterwards.

use log::{debug, warn};
use std::collections::BTreeMap;

/// Built-in aliases: short tag → canonical grammar id.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("py", "python"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("md", "markdown"),
    ("yml", "yaml"),
    ("rs", "rust"),
];

/// Immutable alias table used by the highlighter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageAliases {
    table: BTreeMap<String, String>,
}

impl Default for LanguageAliases {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LanguageAliases {
    /// The built-in alias table.
    pub fn builtin() -> Self {
        let table = BUILTIN_ALIASES
            .iter()
            .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
            .collect();
        Self { table }
    }

    /// Built-in aliases plus user-configured extras.
    ///
    /// Extra keys are lower-cased. An extra that collides with a built-in
    /// alias is ignored so the documented short tags always mean the same
    /// thing.
    pub fn with_extra<'a, I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut aliases = Self::builtin();
        for (alias, canonical) in extra {
            let alias = alias.trim().to_lowercase();
            let canonical = canonical.trim().to_lowercase();
            if alias.is_empty() || canonical.is_empty() {
                continue;
            }
            if aliases.table.contains_key(&alias) {
                warn!(
                    "Ignoring configured alias '{}': it would shadow a built-in alias",
                    alias
                );
                continue;
            }
            debug!("Registering language alias {} -> {}", alias, canonical);
            aliases.table.insert(alias, canonical);
        }
        aliases
    }

    /// Resolve a raw fence tag to the id a grammar would be registered under.
    ///
    /// Known aliases map to their canonical id, anything else falls through
    /// lower-cased. Returns `None` for an empty tag.
    pub fn resolve(&self, tag: &str) -> Option<String> {
        if tag.is_empty() {
            return None;
        }
        let tag = tag.to_lowercase();
        match self.table.get(&tag) {
            Some(canonical) => Some(canonical.clone()),
            None => Some(tag),
        }
    }

    /// Number of aliases in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
