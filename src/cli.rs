//! Command-line argument parsing for Inkpad
//!
//! Supports:
//! - Highlighting a document to HTML
//! - Applying one formatting command to a selection
//! - Rendering the preview HTML
//! - Listing the formatting shortcuts
//! - Writing a default config file

use clap::{Parser, Subcommand};
use inkpad::markdown::{EditorCommand, Selection};
use std::path::PathBuf;

/// Markdown editor core tools
#[derive(Parser, Debug)]
#[command(
    name = "inkpad",
    version,
    about = "Markdown highlighting and formatting commands"
)]
pub struct CliArgs {
    /// Use this config file instead of the platform default
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print highlighted HTML for a markdown document
    Highlight {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Apply a formatting command and print the new text
    Format {
        /// bold, italic, code, link, ordered-list, unordered-list or undo
        #[arg(value_parser = parse_command)]
        command: EditorCommand,

        /// Selection as START:END character offsets, or a single caret offset
        #[arg(short, long, value_parser = parse_selection, default_value = "0")]
        selection: Selection,

        /// Input file (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Print the rendered preview HTML
    Preview {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// List formatting shortcuts for the configured modifier
    Shortcuts,

    /// Write a default config file (to --config or the platform location)
    InitConfig {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Parse a command identifier such as `bold` or `ordered-list`.
pub fn parse_command(value: &str) -> Result<EditorCommand, String> {
    EditorCommand::from_id(&value.to_ascii_lowercase()).ok_or_else(|| {
        let known: Vec<&str> = EditorCommand::all().iter().map(|c| c.id()).collect();
        format!("unknown command '{}' (expected one of: {})", value, known.join(", "))
    })
}

/// Parse `START:END` or a single caret offset.
pub fn parse_selection(value: &str) -> Result<Selection, String> {
    let offset = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|_| format!("'{}' is not a character offset", part))
    };

    match value.split_once(':') {
        Some((start, end)) => Ok(Selection::new(offset(start)?, offset(end)?)),
        None => Ok(Selection::caret(offset(value)?)),
    }
}
