//! Errors produced when encoding or decoding.

use thiserror::Error;

/// Reasons text and ids cannot be mapped onto each other.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizerError {
    /// A character outside the vocabulary was passed to `encode`.
    #[error("tokenizer: unknown symbol {0:?}")]
    UnknownSymbol(char),

    /// An id that is BOS or beyond it was passed to `decode`.
    #[error("tokenizer: invalid id {0}")]
    InvalidId(usize),
}
