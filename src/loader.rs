//! Text loading for the input path list.
//!
//! Files produced by "copy selected paths" actions are usually UTF-8, but
//! older localized Windows tools write them in a legacy code page. The loader
//! tries strict UTF-8 first and then a single configured fallback encoding.

use std::fs;
use std::io;
use std::path::Path;

use encoding_rs::Encoding;

use crate::domain::FileError;

/// UTF-8 byte-order mark.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

// ============================================================================
// TextLoader
// ============================================================================

/// Reads an input file into its raw lines.
#[derive(Debug, Clone, Copy)]
pub struct TextLoader {
    fallback: &'static Encoding,
}

impl TextLoader {
    /// Creates a loader that falls back to `fallback` when UTF-8 fails.
    #[must_use]
    pub fn new(fallback: &'static Encoding) -> Self {
        Self { fallback }
    }

    /// The encoding tried after UTF-8.
    #[must_use]
    pub fn fallback(&self) -> &'static Encoding {
        self.fallback
    }

    /// Reads `path` and returns its lines in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist ([`FileError::NotFound`])
    /// - The path is not a regular file ([`FileError::NotAFile`])
    /// - The bytes decode under neither UTF-8 nor the fallback
    ///   ([`FileError::DecodeFailed`])
    /// - Any other I/O error occurs ([`FileError::Read`])
    pub fn load(&self, path: &Path) -> Result<Vec<String>, FileError> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(FileError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        if !metadata.is_file() {
            return Err(FileError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let bytes = fs::read(path)?;
        tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

        let text = decode_text(&bytes, self.fallback)?;
        Ok(split_lines(&text))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Decodes file bytes as UTF-8, retrying with `fallback` on failure.
///
/// A leading UTF-8 byte-order mark is dropped. Both decodes are strict: no
/// replacement characters are ever produced.
///
/// # Errors
///
/// Returns [`FileError::DecodeFailed`] carrying the UTF-8 error when the
/// fallback decode fails too.
pub fn decode_text(bytes: &[u8], fallback: &'static Encoding) -> Result<String, FileError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    match String::from_utf8(bytes.to_vec()) {
        Ok(text) => Ok(text),
        Err(utf8_err) => {
            tracing::warn!(
                "Input is not valid UTF-8, retrying with {}",
                fallback.name()
            );
            fallback
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned())
                .ok_or(FileError::DecodeFailed {
                    encoding: fallback.name(),
                    source: utf8_err,
                })
        }
    }
}

/// Splits text on `\n`, `\r\n`, or a lone `\r`.
///
/// A trailing terminator does not yield an extra empty line.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(idx) => {
                lines.push(rest[..idx].to_string());
                let terminator = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[idx + terminator..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }

    lines
}

// ============================================================================
// Tests
// ============================================================================
