//! One document per step: frame, forward every position, backprop, Adam.

use crate::autograd::{Log, ScalarNode, ValueRef};
use crate::config::ConfigError;
use crate::model::{Gpt, ModelError};
use crate::nn::softmax;

use super::{AdamConfig, OptimizerState, TrainError};

/// Owns the model and its optimizer state for a planned number of steps.
#[derive(Debug)]
pub struct Trainer {
    model: Gpt,
    params: Vec<ValueRef>,
    optimizer: OptimizerState,
    total_steps: usize,
    step: usize,
}

impl Trainer {
    /// Prepares Adam buffers for every parameter of `model`.
    ///
    /// `total_steps` sets the length of the linear learning-rate decay.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Validation`] for invalid Adam settings or zero steps.
    pub fn new(model: Gpt, adam: AdamConfig, total_steps: usize) -> Result<Self, ConfigError> {
        adam.validate()?;
        if total_steps == 0 {
            return Err(ConfigError::Validation(
                "total_steps must be greater than 0".to_string(),
            ));
        }
        let params = model.params();
        let optimizer = OptimizerState::new(adam, params.len());
        Ok(Self {
            model,
            params,
            optimizer,
            total_steps,
            step: 0,
        })
    }

    /// The model being trained.
    #[must_use]
    pub fn model(&self) -> &Gpt {
        &self.model
    }

    /// Gives the trained model back.
    #[must_use]
    pub fn into_model(self) -> Gpt {
        self.model
    }

    /// Optimizer buffers and step count.
    #[must_use]
    pub fn optimizer(&self) -> &OptimizerState {
        &self.optimizer
    }

    /// Successful steps taken so far.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Length of the learning-rate schedule.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// `[BOS, doc.., BOS]`.
    ///
    /// # Errors
    ///
    /// [`ModelError::TokenOutOfRange`] if a token is BOS or beyond it.
    pub fn frame(&self, doc: &[usize]) -> Result<Vec<usize>, ModelError> {
        let bos = self.model.bos_id();
        if let Some(&token) = doc.iter().find(|&&t| t >= bos) {
            return Err(ModelError::TokenOutOfRange {
                token,
                vocab_size: bos,
            });
        }
        let mut tokens = Vec::with_capacity(doc.len() + 2);
        tokens.push(bos);
        tokens.extend_from_slice(doc);
        tokens.push(bos);
        Ok(tokens)
    }

    /// Mean next-token cross-entropy over the first `min(block_size, len - 1)`
    /// positions of a framed sequence, as a graph ready for `backward()`.
    ///
    /// No epsilon is added inside the log: a zero probability for the target
    /// gives an infinite loss, which [`Trainer::train_step`] refuses to apply.
    ///
    /// # Errors
    ///
    /// [`ModelError`] from the forward pass.
    pub fn sequence_loss(&self, tokens: &[usize]) -> Result<ValueRef, ModelError> {
        let n = self
            .model
            .config()
            .block_size
            .min(tokens.len().saturating_sub(1));
        let mut cache = self.model.new_cache();
        let mut losses = Vec::with_capacity(n);
        for pos in 0..n {
            let logits = self.model.forward(tokens[pos], pos, &mut cache)?;
            let probs = softmax(&logits);
            losses.push(-&(&probs[tokens[pos + 1]]).log());
        }
        let mut total = ValueRef::new(0.0);
        for l in &losses {
            total = &total + l;
        }
        Ok(&total / n.max(1) as f64)
    }

    /// Trains on one tokenized document and returns its loss.
    ///
    /// On success every parameter has been updated and its gradient zeroed.
    ///
    /// # Errors
    ///
    /// - [`TrainError::Model`] if the document holds an invalid token.
    /// - [`TrainError::NonFiniteLoss`] if the loss is NaN or infinite; the
    ///   step is skipped and no parameter changes.
    pub fn train_step(&mut self, doc: &[usize]) -> Result<f64, TrainError> {
        let tokens = self.frame(doc)?;
        let loss = self.sequence_loss(&tokens)?;
        let loss_val = loss.data();
        if !loss_val.is_finite() {
            log::warn!("step {}: non-finite loss {loss_val}, skipping update", self.step);
            return Err(TrainError::NonFiniteLoss {
                loss: loss_val,
                step: self.step,
            });
        }

        loss.backward();
        let lr = self
            .optimizer
            .config()
            .learning_rate_at(self.step, self.total_steps);
        let grad_norm = self.optimizer.update(&self.params, lr);
        log::debug!(
            "step {}: loss {loss_val:.4} lr {lr:.6} grad norm {grad_norm:.4}",
            self.step + 1
        );
        self.step += 1;
        Ok(loss_val)
    }
}
