//! User settings and preferences for Inkpad
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::editor::{Keymap, PrimaryModifier, DEFAULT_UNDO_LIMIT};
use crate::markdown::LanguageAliases;
use crate::preview::PreviewOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─────────────────────────────────────────────────────────────────────────────
// Shortcut Modifier Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Which modifier formatting shortcuts use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModifierPreference {
    /// Follow the platform convention (Cmd on macOS, Ctrl elsewhere)
    #[default]
    Auto,
    /// Always Cmd / Super
    Meta,
    /// Always Ctrl
    Control,
}

impl ModifierPreference {
    /// Resolve to a concrete modifier for this platform.
    pub fn resolve(&self) -> PrimaryModifier {
        match self {
            ModifierPreference::Auto => PrimaryModifier::detect(),
            ModifierPreference::Meta => PrimaryModifier::Meta,
            ModifierPreference::Control => PrimaryModifier::Control,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Editor Behavior
    // ─────────────────────────────────────────────────────────────────────────
    /// Modifier for formatting shortcuts
    pub primary_modifier: ModifierPreference,

    /// Maximum number of undo snapshots kept per buffer
    pub undo_history_limit: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Syntax Highlighting
    // ─────────────────────────────────────────────────────────────────────────
    /// Extra fence tag aliases (tag → canonical language id)
    pub language_aliases: BTreeMap<String, String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Preview
    // ─────────────────────────────────────────────────────────────────────────
    /// Rendered preview options
    pub preview: PreviewOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            primary_modifier: ModifierPreference::default(),
            undo_history_limit: DEFAULT_UNDO_LIMIT,
            language_aliases: BTreeMap::new(),
            preview: PreviewOptions::default(),
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum undo history size.
    pub const MIN_UNDO_HISTORY: usize = 1;
    /// Maximum undo history size.
    pub const MAX_UNDO_HISTORY: usize = 1000;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.undo_history_limit = self
            .undo_history_limit
            .clamp(Self::MIN_UNDO_HISTORY, Self::MAX_UNDO_HISTORY);

        // Drop aliases that could never match a fence tag
        self.language_aliases
            .retain(|alias, canonical| !alias.trim().is_empty() && !canonical.trim().is_empty());
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// The fence alias table: built-ins plus configured extras.
    pub fn aliases(&self) -> LanguageAliases {
        LanguageAliases::with_extra(&self.language_aliases)
    }

    /// The keymap for the configured modifier.
    pub fn keymap(&self) -> Keymap {
        Keymap::new(self.primary_modifier.resolve())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
