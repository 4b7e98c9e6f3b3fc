//! Shared test utilities and Mother pattern factories.
//!
//! Use these helpers to avoid copy-pasting setup code across tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use tempfile::NamedTempFile;

use crate::config::AppConfig;
use crate::domain::ClipboardError;
use crate::platform::clipboard::{ClipboardResult, ClipboardWriter};

// ============================================================================
// Clipboard Doubles
// ============================================================================

/// Clipboard backend that remembers every write.
///
/// Clones share the same record, so a test can keep one handle and give the
/// other to the code under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingClipboard {
    writes: Rc<RefCell<Vec<String>>>,
}

impl RecordingClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }
}

impl ClipboardWriter for RecordingClipboard {
    fn name(&self) -> &str {
        "recording"
    }

    fn write_text(&self, text: &str) -> ClipboardResult<()> {
        self.writes.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Clipboard backend whose every write fails with `CopyFailed`.
#[derive(Debug, Clone)]
pub struct FailingClipboard {
    message: String,
}

impl FailingClipboard {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ClipboardWriter for FailingClipboard {
    fn name(&self) -> &str {
        "failing"
    }

    fn write_text(&self, _text: &str) -> ClipboardResult<()> {
        Err(ClipboardError::copy_failed(self.message.clone()))
    }
}

/// Clipboard backend that panics, standing in for an unforeseen failure.
#[derive(Debug, Clone, Copy)]
pub struct PanickingClipboard;

impl ClipboardWriter for PanickingClipboard {
    fn name(&self) -> &str {
        "panicking"
    }

    fn write_text(&self, _text: &str) -> ClipboardResult<()> {
        panic!("clipboard backend exploded")
    }
}

// ============================================================================
// Mother Pattern Factories
// ============================================================================

pub struct LinesMother;

impl LinesMother {
    /// Blank line, exact duplicate with padding, and two case variants.
    #[must_use]
    pub fn mixed_case() -> Vec<&'static str> {
        vec!["b.txt", "", "A.txt", "a.txt", "  b.txt  "]
    }

    /// What Explorer's "Copy as path" style selections tend to look like.
    #[must_use]
    pub fn windows_selection() -> Vec<&'static str> {
        vec![
            "C:\\Users\\me\\Desktop\\report.docx",
            "C:\\Users\\me\\Desktop\\Budget.xlsx",
            "",
            "C:\\Users\\me\\Desktop\\budget.xlsx",
            "   C:\\Users\\me\\Desktop\\report.docx\t",
            "C:\\Users\\me\\Desktop\\中文.txt",
        ]
    }

    /// Only blank and whitespace lines.
    #[must_use]
    pub fn blank_only() -> Vec<&'static str> {
        vec!["", "   ", "\t", ""]
    }
}

pub struct InputFileMother;

impl InputFileMother {
    /// A temp file holding `lines` joined with `\n`, UTF-8 encoded.
    #[must_use]
    pub fn utf8(lines: &[&str]) -> NamedTempFile {
        Self::bytes(lines.join("\n").as_bytes())
    }

    /// A temp file holding raw `bytes`.
    #[must_use]
    pub fn bytes(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file creation should succeed");
        file.write_all(bytes).expect("temp file write should succeed");
        file.flush().expect("temp file flush should succeed");
        file
    }
}

// ============================================================================
// rstest Fixtures
// ============================================================================

use rstest::fixture;

#[fixture]
pub fn default_config() -> AppConfig {
    AppConfig::default()
}
