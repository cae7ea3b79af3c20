//! Precondition violations detected by the forward pass and the parameter store.

use thiserror::Error;

/// Caller errors rejected by [`Gpt::forward`](super::Gpt::forward) and the
/// [`ParameterStore`](super::ParameterStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Position index is not below the block size; the caller must truncate.
    #[error("model: position {pos} out of range (block size {block_size})")]
    PositionOutOfRange {
        /// Requested position.
        pos: usize,
        /// Maximum context length.
        block_size: usize,
    },

    /// Token id is not a valid row of the embedding table.
    #[error("model: token {token} out of range (vocab size {vocab_size})")]
    TokenOutOfRange {
        /// Requested token id.
        token: usize,
        /// Number of ids the model knows (BOS included).
        vocab_size: usize,
    },

    /// The cache was built for a different number of layers.
    #[error("model: kv cache has {actual} layers, model has {expected}")]
    CacheLayerMismatch {
        /// Layers in the model.
        expected: usize,
        /// Layers in the cache.
        actual: usize,
    },

    /// Positions must be fed in order starting at 0 for one cache.
    #[error("model: position {pos} does not follow cache length {cached}")]
    PositionCacheMismatch {
        /// Requested position.
        pos: usize,
        /// Entries already in the cache.
        cached: usize,
    },

    /// A parameter matrix with this name already exists; shapes never change.
    #[error("model: parameter {0:?} already exists")]
    DuplicateParameter(String),

    /// A named parameter matrix is missing from the store.
    #[error("model: missing parameter {0:?}")]
    MissingParameter(String),
}
