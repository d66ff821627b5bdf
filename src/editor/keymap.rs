//! Keyboard shortcuts for formatting commands
//!
//! The platform's primary modifier (Cmd on macOS, Ctrl elsewhere) is
//! resolved once and injected into the [`Keymap`], so the matching logic
//! never consults the environment.

use crate::markdown::EditorCommand;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Primary Modifier
// ─────────────────────────────────────────────────────────────────────────────

/// The modifier key shortcuts are bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryModifier {
    /// Cmd / Super
    Meta,
    /// Ctrl
    Control,
}

impl PrimaryModifier {
    /// The conventional modifier for the platform this binary runs on.
    pub fn detect() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    /// The conventional modifier for an OS name as in `std::env::consts::OS`.
    pub fn for_os(os: &str) -> Self {
        match os {
            "macos" | "ios" => Self::Meta,
            _ => Self::Control,
        }
    }

    /// Short label used in shortcut hints.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Meta => "Cmd",
            Self::Control => "Ctrl",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Key Events
// ─────────────────────────────────────────────────────────────────────────────

/// A key press as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyEvent {
    /// The produced character, as reported (may be upper-case or shifted)
    pub key: char,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyEvent {
    /// A key without modifiers.
    pub fn new(key: char) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    /// The same key with `modifier` held.
    pub fn with(mut self, modifier: PrimaryModifier) -> Self {
        match modifier {
            PrimaryModifier::Meta => self.meta = true,
            PrimaryModifier::Control => self.ctrl = true,
        }
        self
    }

    /// The same key with shift held.
    pub fn shifted(mut self) -> Self {
        self.shift = true;
        self
    }

    /// The same key with alt held.
    pub fn alted(mut self) -> Self {
        self.alt = true;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Keymap
// ─────────────────────────────────────────────────────────────────────────────

/// Maps key events to formatting commands for one primary modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    modifier: PrimaryModifier,
}

impl Keymap {
    pub fn new(modifier: PrimaryModifier) -> Self {
        Self { modifier }
    }

    pub fn modifier(&self) -> PrimaryModifier {
        self.modifier
    }

    /// The command bound to `event`, if any.
    ///
    /// The primary modifier must be held and the other platform modifier and
    /// alt must not be.
    pub fn resolve(&self, event: &KeyEvent) -> Option<EditorCommand> {
        let (primary, other) = match self.modifier {
            PrimaryModifier::Meta => (event.meta, event.ctrl),
            PrimaryModifier::Control => (event.ctrl, event.meta),
        };
        if !primary || other || event.alt {
            return None;
        }

        let key = event.key.to_ascii_lowercase();
        if event.shift {
            // Browsers report the shifted glyph for digits on US layouts
            return match key {
                '7' | '&' => Some(EditorCommand::OrderedList),
                '8' | '*' => Some(EditorCommand::UnorderedList),
                _ => None,
            };
        }

        match key {
            'b' => Some(EditorCommand::Bold),
            'i' => Some(EditorCommand::Italic),
            'e' => Some(EditorCommand::InlineCode),
            'k' => Some(EditorCommand::Link),
            'z' => Some(EditorCommand::Undo),
            _ => None,
        }
    }

    /// Human readable shortcut for `command`, e.g. "Ctrl+Shift+7".
    pub fn shortcut_label(&self, command: EditorCommand) -> String {
        let modifier = self.modifier.label();
        match command {
            EditorCommand::Bold => format!("{}+B", modifier),
            EditorCommand::Italic => format!("{}+I", modifier),
            EditorCommand::InlineCode => format!("{}+E", modifier),
            EditorCommand::Link => format!("{}+K", modifier),
            EditorCommand::OrderedList => format!("{}+Shift+7", modifier),
            EditorCommand::UnorderedList => format!("{}+Shift+8", modifier),
            EditorCommand::Undo => format!("{}+Z", modifier),
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new(PrimaryModifier::detect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
