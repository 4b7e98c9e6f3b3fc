//! Application constants for pathclip.

/// Program version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Program name from Cargo.toml.
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Width of the dashed lines around the manual-copy block.
pub const SEPARATOR_WIDTH: usize = 50;

/// Prompt shown after the help text.
pub const EXIT_PROMPT: &str = "Press Enter to exit... ";
