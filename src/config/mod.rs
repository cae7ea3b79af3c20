//! Run configuration: model shape, optimizer, training and sampling knobs.
//!
//! Load from the environment via [`from_env`] and check with [`Config::validate`].
//! Defaults and env key names live in the `constants` submodule.

mod builder;
mod constants;
mod error;

use std::path::PathBuf;

use constants::{
    DEFAULT_BETA1, DEFAULT_BETA2, DEFAULT_BLOCK_SIZE, DEFAULT_EPSILON, DEFAULT_GRAD_CLIP,
    DEFAULT_INIT_STD, DEFAULT_INPUT_PATH, DEFAULT_LEARNING_RATE, DEFAULT_LOSS_LOG_EVERY,
    DEFAULT_MLP_RATIO, DEFAULT_NUM_STEPS, DEFAULT_N_EMBED, DEFAULT_N_HEAD, DEFAULT_N_LAYER,
    DEFAULT_RMSNORM_EPS, DEFAULT_SAMPLE_SIZE, DEFAULT_SEED, DEFAULT_TEMPERATURE,
};

use crate::model::ModelConfig;
use crate::train::AdamConfig;

pub use builder::{env_key, env_parsed, env_string, from_env};
pub use error::ConfigError;

/// Central configuration for a training + sampling run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Seed for the RNG (init, shuffling, sampling).
    pub seed: u64,
    /// Path to the corpus (one document per line).
    pub input_path: PathBuf,

    /// Embedding width (must be divisible by `n_head`).
    pub n_embed: usize,
    /// Number of attention heads.
    pub n_head: usize,
    /// Number of transformer layers.
    pub n_layer: usize,
    /// Maximum context length (positions).
    pub block_size: usize,
    /// MLP hidden width as a multiple of `n_embed`.
    pub mlp_ratio: usize,
    /// Weight init standard deviation.
    pub init_std: f64,
    /// RMSNorm epsilon.
    pub rmsnorm_eps: f64,

    /// Initial Adam learning rate (decays linearly to 0).
    pub learning_rate: f64,
    /// Adam first-moment decay.
    pub beta1: f64,
    /// Adam second-moment decay.
    pub beta2: f64,
    /// Adam denominator epsilon.
    pub epsilon: f64,
    /// Global gradient-norm clip; 0 disables.
    pub grad_clip: f64,

    /// Number of training steps.
    pub num_steps: usize,
    /// Log loss every this many steps.
    pub loss_log_every: usize,

    /// Sampling temperature (> 0).
    pub temperature: f64,
    /// Number of samples to generate after training.
    pub sample_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            n_embed: DEFAULT_N_EMBED,
            n_head: DEFAULT_N_HEAD,
            n_layer: DEFAULT_N_LAYER,
            block_size: DEFAULT_BLOCK_SIZE,
            mlp_ratio: DEFAULT_MLP_RATIO,
            init_std: DEFAULT_INIT_STD,
            rmsnorm_eps: DEFAULT_RMSNORM_EPS,
            learning_rate: DEFAULT_LEARNING_RATE,
            beta1: DEFAULT_BETA1,
            beta2: DEFAULT_BETA2,
            epsilon: DEFAULT_EPSILON,
            grad_clip: DEFAULT_GRAD_CLIP,
            num_steps: DEFAULT_NUM_STEPS,
            loss_log_every: DEFAULT_LOSS_LOG_EVERY,
            temperature: DEFAULT_TEMPERATURE,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl Config {
    /// Validates every section. Model shape is checked with a placeholder
    /// vocabulary since the real one is only known after tokenization.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Validation`] naming the first rule that failed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.model(2).validate()?;
        self.adam().validate()?;
        if self.num_steps == 0 {
            return Err(ConfigError::Validation(
                "num_steps must be greater than 0".to_string(),
            ));
        }
        if self.loss_log_every == 0 {
            return Err(ConfigError::Validation(
                "loss_log_every must be greater than 0".to_string(),
            ));
        }
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(ConfigError::Validation(format!(
                "temperature must be positive and finite, got {}",
                self.temperature
            )));
        }
        Ok(())
    }

    /// Model hyperparameters for a vocabulary of `vocab_size` ids (BOS included).
    #[must_use]
    pub fn model(&self, vocab_size: usize) -> ModelConfig {
        ModelConfig {
            n_layer: self.n_layer,
            n_embed: self.n_embed,
            n_head: self.n_head,
            block_size: self.block_size,
            vocab_size,
            mlp_ratio: self.mlp_ratio,
            init_std: self.init_std,
            rmsnorm_eps: self.rmsnorm_eps,
        }
    }

    /// Optimizer hyperparameters.
    #[must_use]
    pub fn adam(&self) -> AdamConfig {
        AdamConfig {
            learning_rate: self.learning_rate,
            beta1: self.beta1,
            beta2: self.beta2,
            epsilon: self.epsilon,
            grad_clip: self.grad_clip,
        }
    }
}
