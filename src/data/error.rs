//! Errors produced while reading a corpus.

use thiserror::Error;

/// Reasons a corpus cannot be loaded.
#[derive(Debug, Error)]
pub enum DataError {
    /// The file could not be read (missing, unreadable, not UTF-8).
    #[error("data io: {0}")]
    Io(#[from] std::io::Error),

    /// The file was read but holds no non-blank line.
    #[error("data: corpus has no documents")]
    EmptyFile,
}
