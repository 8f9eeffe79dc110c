//! Error types for cctree operations.
//!
//! Errors fall into three groups:
//!
//! - **`Error`**: setup failures that prevent any tree from being produced
//!   (the engine could not start, the translation unit could not be created,
//!   the options are unusable).
//! - **`Diagnostics`**: compiler diagnostics, collected as data and returned
//!   next to a still-usable tree. They only become an `Error` when the caller
//!   asks for it through [`ParsedFile::into_result`](crate::ParsedFile::into_result).
//! - **Invariant violations**: an engine that hands the builder a child whose
//!   parent was never visited. These are not represented here at all; the
//!   builder panics, since no caller-level recovery is meaningful.

use std::path::PathBuf;
use thiserror::Error;

use crate::diagnostics::Diagnostics;

/// Result type for cctree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for cctree operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The parsing engine could not be initialised (e.g. libclang missing)
    #[error("parsing engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine could not construct a translation unit for the file
    #[error("failed to parse {}: {message}", path.display())]
    ParseFailure {
        /// Source file that was being parsed
        path: PathBuf,
        /// Engine-provided reason
        message: String,
    },

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// Diagnostics escalated to a hard error by the caller
    #[error(transparent)]
    Diagnostics(#[from] Diagnostics),
}

impl Error {
    /// Returns `true` if a (possibly partial) tree existed when this error
    /// was produced.
    ///
    /// Only escalated diagnostics qualify; every other variant means the
    /// engine never got far enough to produce one.
    #[must_use]
    pub fn had_tree(&self) -> bool {
        matches!(self, Self::Diagnostics(_))
    }
}
