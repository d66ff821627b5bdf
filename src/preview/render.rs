//! Markdown to HTML preview rendering
//!
//! The rendered preview is delegated to comrak. Raw HTML in the document is
//! dropped unless explicitly allowed, so the preview never injects markup
//! the user did not see in the raw view.

use comrak::{markdown_to_html, Options};
use serde::{Deserialize, Serialize};

/// Rendering options for the preview pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Pass raw HTML and dangerous URLs through to the output
    pub allow_raw_html: bool,
    /// Render soft line breaks as `<br />`
    pub hard_breaks: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            allow_raw_html: false,
            hard_breaks: false,
        }
    }
}

impl PreviewOptions {
    /// Convert to comrak Options.
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        // Extension options
        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;

        // Render options
        options.render.unsafe_ = self.allow_raw_html;
        options.render.hardbreaks = self.hard_breaks;

        options
    }
}

/// Render `markdown` to an HTML fragment.
pub fn render_preview(markdown: &str, options: &PreviewOptions) -> String {
    markdown_to_html(markdown, &options.to_comrak_options())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
