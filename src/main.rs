//! Inkpad - Main Entry Point
//!
//! Command-line front end for the markdown highlighter, the selection
//! formatting commands, and the rendered preview.

mod cli;

use clap::Parser;
use cli::{CliArgs, Command};
use inkpad::config::{init_config, load_config, load_config_from, Settings};
use inkpad::editor::{EditorSession, TextBuffer, TextMutator};
use inkpad::error::{Error, Result};
use inkpad::markdown::{EditorCommand, GrammarRegistry, Highlighter, Selection};
use inkpad::preview::render_preview;
use inkpad::string_utils::char_len;
use log::{debug, error, info, warn};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Application name constant.
const APP_NAME: &str = "Inkpad";

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    debug!("Starting {} with {:?}", APP_NAME, args);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<()> {
    // Writing a config must not depend on being able to load one
    if let Command::InitConfig { force } = args.command {
        let path = init_config(args.config.as_deref(), force)?;
        info!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let settings = match &args.config {
        Some(path) if path.is_dir() => {
            return Err(Error::invalid_argument(
                "--config",
                format!("'{}' is a directory", path.display()),
            ));
        }
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };

    match args.command {
        Command::Highlight { file } => highlight(&settings, file.as_deref()),
        Command::Format {
            command,
            selection,
            file,
        } => format(&settings, command, selection, file.as_deref()),
        Command::Preview { file } => {
            let text = read_input(file.as_deref())?;
            write_stdout(&render_preview(&text, &settings.preview))
        }
        Command::Shortcuts => {
            let keymap = settings.keymap();
            let mut out = String::new();
            for command in EditorCommand::all() {
                out.push_str(&format!(
                    "{:<16}{}\n",
                    keymap.shortcut_label(*command),
                    command.name()
                ));
            }
            write_stdout(&out)
        }
        Command::InitConfig { .. } => Ok(()),
    }
}

fn highlight(settings: &Settings, file: Option<&Path>) -> Result<()> {
    let text = read_input(file)?;
    let registry = GrammarRegistry::bundled();
    let aliases = settings.aliases();
    info!(
        "Highlighting with {} grammars and {} aliases",
        registry.len(),
        aliases.len()
    );
    write_stdout(&Highlighter::new(&registry, &aliases).highlight_to_html(&text))
}

fn format(
    settings: &Settings,
    command: EditorCommand,
    selection: Selection,
    file: Option<&Path>,
) -> Result<()> {
    let text = read_input(file)?;
    if selection.end > char_len(&text) {
        warn!(
            "Selection {}:{} extends past the end of the input ({} characters)",
            selection.start,
            selection.end,
            char_len(&text)
        );
    }

    let mut buffer = TextBuffer::new(text).with_undo_limit(settings.undo_history_limit);
    buffer.set_selection(selection);
    let mut session = EditorSession::new(buffer, settings.keymap());

    if command == EditorCommand::Undo {
        // No host history here, so undo only settles the selection
        session.after_host_edit();
    } else if !session.run(command) {
        info!("{} left the text unchanged", command.name());
    }

    let buffer = session.into_mutator();
    let selection = buffer.selection();
    eprintln!("selection: {}:{}", selection.start, selection.end);
    write_stdout(buffer.text())
}

/// Read the whole input document from `file`, or stdin when absent.
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: PathBuf::from(path),
            source,
        }),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn write_stdout(output: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
