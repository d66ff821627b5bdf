//! Rendered preview module for Inkpad
//!
//! The editor only highlights raw markdown; turning a document into rendered
//! HTML is delegated to comrak through this module.

mod render;

pub use render::{render_preview, PreviewOptions};
