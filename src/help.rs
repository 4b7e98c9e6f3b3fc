//! Usage text and the interactive "press Enter" pause.
//!
//! The tool is normally launched by a file manager action, so a bare
//! invocation from a double-click shows help and keeps the window open
//! until the user acknowledges it.

use std::io::{self, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::constants::{APP_NAME, EXIT_PROMPT, VERSION};

/// Builds the usage text.
#[must_use]
pub fn help_text() -> String {
    format!(
        "
{APP_NAME} v{VERSION} - file path extractor

Reads a text file listing file paths (one per line) and copies the
cleaned-up list to the system clipboard.

USAGE:
    {APP_NAME} <INPUT_FILE>

FEATURES:
    - Copies a batch of selected file paths to the clipboard
    - Drops blank lines and duplicate entries
    - Sorts by name, ascending, ignoring case
    - Reads UTF-8 input, falling back to a legacy encoding (GBK by default)
    - Prints the list for manual copying where no clipboard is available

CONFIGURATION:
    Optional JSON file in the user config directory ({APP_NAME}/config.json),
    or the file named by PATHCLIP_CONFIG. Set RUST_LOG=debug for diagnostics.
"
    )
}

/// Prints the help text to `out`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_help(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", help_text())
}

/// Prints help to `out`, then runs `acknowledge`.
///
/// Neither step can fail the run: errors are logged and the help path still
/// ends with exit status 0.
pub fn show(out: &mut dyn Write, acknowledge: impl FnOnce() -> io::Result<()>) {
    if let Err(err) = print_help(out) {
        tracing::warn!("Could not print help: {err}");
    }
    if let Err(err) = acknowledge() {
        tracing::warn!("Help pause ended early: {err}");
    }
}

/// Waits for Enter, Esc, or Ctrl+C before returning.
///
/// Returns immediately when stdin is not an interactive terminal.
///
/// # Errors
///
/// Returns an error if the terminal cannot be switched into raw mode or an
/// event cannot be read.
pub fn wait_for_acknowledgment() -> io::Result<()> {
    if !io::stdin().is_terminal() {
        return Ok(());
    }

    let mut stdout = io::stdout();
    write!(stdout, "\n{EXIT_PROMPT}")?;
    stdout.flush()?;

    enable_raw_mode()?;
    let result = read_until_acknowledged();
    disable_raw_mode()?;
    writeln!(stdout)?;

    result
}

fn read_until_acknowledged() -> io::Result<()> {
    loop {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && is_acknowledgment(key.code, key.modifiers)
        {
            return Ok(());
        }
    }
}

/// Whether a key press ends the help pause.
fn is_acknowledgment(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Enter | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ============================================================================
// Tests
// ============================================================================
