//! Error types for the path-copy pipeline.
//!
//! Each stage reports a typed failure and only the orchestrator decides how a
//! failure maps to console output and exit status.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Failures while acquiring the input file.
#[derive(Debug, Error)]
pub enum FileError {
    /// The input path does not exist.
    #[error("file does not exist - {}", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The input path exists but is a directory or other non-regular entry.
    #[error("path is not a file - {}", path.display())]
    NotAFile {
        /// The offending path.
        path: PathBuf,
    },

    /// Neither UTF-8 nor the fallback encoding could decode the file.
    #[error("unable to decode file as UTF-8 or {encoding} - {source}")]
    DecodeFailed {
        /// Name of the fallback encoding that was also tried.
        encoding: &'static str,
        /// The UTF-8 decode error.
        #[source]
        source: FromUtf8Error,
    },

    /// Reading the file or its metadata failed.
    #[error("error while reading file - {source}")]
    Read {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

/// Failures while handing text to the system clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No automatic clipboard mechanism exists in this environment.
    #[error("clipboard not available")]
    Unsupported,

    /// The text contains characters the clipboard encoding cannot express.
    #[error("text cannot be represented in {encoding}")]
    Encode {
        /// Name of the clipboard encoding.
        encoding: &'static str,
    },

    /// The clipboard backend was found but the copy itself failed.
    #[error("{0}")]
    CopyFailed(String),
}

impl ClipboardError {
    /// Create a new copy failure with the given message.
    #[must_use]
    pub fn copy_failed(message: impl Into<String>) -> Self {
        Self::CopyFailed(message.into())
    }
}

/// Fatal outcome of a pipeline run.
#[derive(Debug, Error)]
pub enum AppError {
    /// The input file could not be loaded.
    #[error(transparent)]
    File(#[from] FileError),

    /// The clipboard write failed for a reason other than missing support.
    #[error("failed to copy to clipboard - {0}")]
    Clipboard(#[from] ClipboardError),

    /// Anything the pipeline did not anticipate.
    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    /// Create an unexpected error from any displayable cause.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Console prefix used when the error is reported.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Unexpected(_) => "Unexpected error",
            Self::File(_) | Self::Clipboard(_) => "Error",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
