//! Platform-specific abstractions.
//!
//! - [`clipboard`] - Cross-platform clipboard writing behind the
//!   [`clipboard::ClipboardWriter`] capability
//!
//! # Platform Support
//!
//! - Windows (`clip`)
//! - macOS (`pbcopy`)
//! - Linux (Wayland and X11 tools, then `arboard`)
//! - Anything else degrades to printing on the console

pub mod clipboard;

pub use clipboard::{ClipboardConfig, ClipboardManager, CopyOutcome, default_clipboard_encoding};
