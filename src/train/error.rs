//! Errors raised by a training step.

use thiserror::Error;

use crate::model::ModelError;

/// Reasons a training step is rejected or aborted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainError {
    /// The forward pass refused its inputs (e.g. a token outside the vocabulary).
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The loss came out NaN or infinite; parameters were left untouched.
    #[error("train: non-finite loss {loss} at step {step}")]
    NonFiniteLoss {
        /// The offending loss value.
        loss: f64,
        /// 0-indexed step that produced it.
        step: usize,
    },
}
