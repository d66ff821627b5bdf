//! Inkpad - markdown editor core
//!
//! Highlights raw markdown with per-language grammars for fenced code
//! blocks, and applies selection-aware formatting commands (bold, italic,
//! inline code, links, list prefixes) through a host text mutation seam.

pub mod config;
pub mod editor;
pub mod error;
pub mod markdown;
pub mod preview;
pub mod string_utils;
