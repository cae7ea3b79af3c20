//! The transformer: hyperparameters, parameter store, KV cache and forward pass.

mod error;
mod gpt;
mod kv_cache;
mod params;

pub use error::ModelError;
pub use gpt::Gpt;
pub use kv_cache::KvCache;
pub use params::ParameterStore;

use crate::config::ConfigError;

/// Shape and initialization of a [`Gpt`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelConfig {
    /// Number of stacked transformer layers.
    pub n_layer: usize,
    /// Embedding width.
    pub n_embed: usize,
    /// Attention heads; must divide `n_embed`.
    pub n_head: usize,
    /// Maximum context length.
    pub block_size: usize,
    /// Number of token ids including BOS, which is the last one.
    pub vocab_size: usize,
    /// MLP hidden width as a multiple of `n_embed`.
    pub mlp_ratio: usize,
    /// Standard deviation of the Gaussian weight init.
    pub init_std: f64,
    /// Epsilon inside every RMSNorm.
    pub rmsnorm_eps: f64,
}

impl ModelConfig {
    /// Checks the structural preconditions of the architecture.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Validation`] for zero sizes, `n_embed % n_head != 0`,
    /// or a non-positive init std / epsilon.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("n_layer", self.n_layer),
            ("n_embed", self.n_embed),
            ("n_head", self.n_head),
            ("block_size", self.block_size),
            ("vocab_size", self.vocab_size),
            ("mlp_ratio", self.mlp_ratio),
        ] {
            if value == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be greater than 0"
                )));
            }
        }
        if self.n_embed % self.n_head != 0 {
            return Err(ConfigError::Validation(format!(
                "n_embed ({}) must be divisible by n_head ({})",
                self.n_embed, self.n_head
            )));
        }
        for (name, value) in [("init_std", self.init_std), ("rmsnorm_eps", self.rmsnorm_eps)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Width of one attention head.
    #[must_use]
    pub fn head_dim(&self) -> usize {
        self.n_embed / self.n_head
    }

    /// Width of the MLP hidden layer.
    #[must_use]
    pub fn mlp_hidden(&self) -> usize {
        self.mlp_ratio * self.n_embed
    }

    /// BOS id: one past the last real symbol.
    #[must_use]
    pub fn bos_id(&self) -> usize {
        self.vocab_size - 1
    }
}
