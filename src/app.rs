//! Pipeline orchestration: load, normalize, copy, report.
//!
//! [`App::process`] drives one run and returns an [`Outcome`]. Only the
//! outcome decides the exit status; the stages themselves never exit.

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::config::AppConfig;
use crate::constants::SEPARATOR_WIDTH;
use crate::domain::{AppError, PathList, normalize};
use crate::loader::TextLoader;
use crate::platform::{ClipboardManager, CopyOutcome};

// ============================================================================
// Outcome
// ============================================================================

/// How a pipeline run ended.
#[derive(Debug)]
pub enum Outcome {
    /// The paths are on the clipboard.
    Copied {
        /// Number of paths copied.
        count: usize,
    },
    /// The input held no usable paths.
    NothingFound,
    /// No clipboard was available and the paths were printed instead.
    ConsoleFallback {
        /// Number of paths printed.
        count: usize,
    },
    /// The run failed.
    Failed(AppError),
}

impl Outcome {
    /// Process exit status for this outcome.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Copied { .. } | Self::NothingFound | Self::ConsoleFallback { .. } => 0,
            Self::Failed(_) => 1,
        }
    }
}

// ============================================================================
// App
// ============================================================================

/// Wires the loader, normalizer, and clipboard together.
pub struct App {
    loader: TextLoader,
    clipboard: ClipboardManager,
}

impl App {
    /// Creates an app from already built stages.
    #[must_use]
    pub fn new(loader: TextLoader, clipboard: ClipboardManager) -> Self {
        Self { loader, clipboard }
    }

    /// Creates an app from configuration, selecting the clipboard backend.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let loader = TextLoader::new(config.fallback_encoding());
        let clipboard = ClipboardManager::from_config(&config.clipboard_config());
        tracing::debug!(
            "Fallback encoding {}, clipboard backend {}",
            loader.fallback().name(),
            clipboard.backend_name()
        );
        Self::new(loader, clipboard)
    }

    /// Runs the whole pipeline for `input`, writing progress to `out`.
    ///
    /// Failures of any kind, panics included, come back as
    /// [`Outcome::Failed`] after being reported on `out`.
    pub fn process(&self, input: &Path, out: &mut dyn Write) -> Outcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.run(input, &mut *out)));

        let outcome = match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(io_err)) => {
                Outcome::Failed(AppError::unexpected(format!("console output failed: {io_err}")))
            }
            Err(payload) => Outcome::Failed(AppError::unexpected(panic_message(payload.as_ref()))),
        };

        if let Outcome::Failed(AppError::Unexpected(_)) = &outcome {
            // Best effort: the console itself may be what failed.
            let _ = report_failure(out, &outcome);
        }

        tracing::debug!("Pipeline finished: {outcome:?}");
        outcome
    }

    fn run(&self, input: &Path, out: &mut dyn Write) -> io::Result<Outcome> {
        writeln!(out, "Processing file: {}", input.display())?;

        let lines = match self.loader.load(input) {
            Ok(lines) => lines,
            Err(err) => {
                let outcome = Outcome::Failed(err.into());
                report_failure(out, &outcome)?;
                return Ok(outcome);
            }
        };
        tracing::info!("Loaded {} line(s) from {}", lines.len(), input.display());

        let paths = normalize(&lines);
        if paths.is_empty() {
            writeln!(out, "Note: no valid file paths found in the file")?;
            return Ok(Outcome::NothingFound);
        }

        write_listing(out, &paths)?;

        let outcome = match self.clipboard.copy_paths(&paths) {
            Ok(CopyOutcome::Copied { count }) => {
                writeln!(out, "Copied {count} file path(s) to the clipboard")?;
                Outcome::Copied { count }
            }
            Ok(CopyOutcome::Unsupported { text }) => {
                write_manual_copy(out, self.clipboard.backend_name(), &text)?;
                Outcome::ConsoleFallback { count: paths.len() }
            }
            Ok(CopyOutcome::NothingToCopy) => Outcome::NothingFound,
            Err(err) => {
                let outcome = Outcome::Failed(err.into());
                report_failure(out, &outcome)?;
                outcome
            }
        };

        Ok(outcome)
    }
}

// ============================================================================
// Console Output
// ============================================================================

/// Writes the count and the 1-based listing of `paths`.
fn write_listing(out: &mut dyn Write, paths: &PathList) -> io::Result<()> {
    writeln!(out, "Found {} file path(s):", paths.len())?;
    for (i, path) in paths.iter().enumerate() {
        writeln!(out, "  {:>3}. {path}", i + 1)?;
    }
    Ok(())
}

/// Writes `text` between separators for manual copying.
fn write_manual_copy(out: &mut dyn Write, backend: &str, text: &str) -> io::Result<()> {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    writeln!(
        out,
        "Warning: automatic clipboard copy is not supported here ({backend})"
    )?;
    writeln!(out, "Please copy the following manually:")?;
    writeln!(out, "{separator}")?;
    writeln!(out, "{text}")?;
    writeln!(out, "{separator}")
}

/// Writes the prefixed error line for a failed outcome.
pub fn report_failure(out: &mut dyn Write, outcome: &Outcome) -> io::Result<()> {
    if let Outcome::Failed(err) = outcome {
        writeln!(out, "{}: {err}", err.prefix())?;
    }
    Ok(())
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "internal error".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
