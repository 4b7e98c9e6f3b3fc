//! Domain types for the path-copy pipeline.
//!
//! # Module Organization
//!
//! - [`error`] - Typed failures for loading, copying, and the run as a whole
//! - [`path_list`] - Normalized path lists and the normalizer itself

// ============================================================================
// Module Declarations
// ============================================================================

pub mod error;
pub mod path_list;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{AppError, ClipboardError, FileError};
pub use path_list::{PathList, normalize};
