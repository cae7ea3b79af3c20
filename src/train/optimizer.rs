//! Adam with bias correction, linear learning-rate decay and optional
//! global-norm gradient clipping.
//!
//! ```text
//! m = b1 * m + (1 - b1) * g
//! v = b2 * v + (1 - b2) * g^2
//! m_hat = m / (1 - b1^t)        t is 1-indexed
//! v_hat = v / (1 - b2^t)
//! p -= lr_t * m_hat / (sqrt(v_hat) + eps)
//! ```

use crate::autograd::{ScalarNode, ValueRef};
use crate::config::ConfigError;

/// Adam hyperparameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdamConfig {
    /// Initial learning rate, decayed linearly to 0 over the planned steps.
    pub learning_rate: f64,
    /// First-moment decay.
    pub beta1: f64,
    /// Second-moment decay.
    pub beta2: f64,
    /// Added to `sqrt(v_hat)` in the denominator.
    pub epsilon: f64,
    /// Maximum global L2 norm of the gradient; 0 disables clipping.
    pub grad_clip: f64,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            beta1: 0.85,
            beta2: 0.99,
            epsilon: 1e-8,
            grad_clip: 0.0,
        }
    }
}

impl AdamConfig {
    /// # Errors
    ///
    /// [`ConfigError::Validation`] for a non-positive learning rate or
    /// epsilon, betas outside `[0, 1)`, or a negative clip.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::Validation(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        for (name, beta) in [("beta1", self.beta1), ("beta2", self.beta2)] {
            if !(0.0..1.0).contains(&beta) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be in [0, 1), got {beta}"
                )));
            }
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ConfigError::Validation(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if !(self.grad_clip.is_finite() && self.grad_clip >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "grad_clip must be >= 0, got {}",
                self.grad_clip
            )));
        }
        Ok(())
    }

    /// Learning rate for 0-indexed `step` of `total_steps`: `lr0 * (1 - step/total)`,
    /// clamped at 0 past the end of the plan.
    #[must_use]
    pub fn learning_rate_at(&self, step: usize, total_steps: usize) -> f64 {
        if total_steps == 0 {
            return 0.0;
        }
        let frac = step as f64 / total_steps as f64;
        (self.learning_rate * (1.0 - frac)).max(0.0)
    }
}

/// Adam moment buffers, index-aligned with a flattened parameter list.
///
/// Allocated once per training run and never reset.
#[derive(Clone, Debug)]
pub struct OptimizerState {
    config: AdamConfig,
    m: Vec<f64>,
    v: Vec<f64>,
    step: usize,
}

impl OptimizerState {
    /// Zeroed buffers for `num_params` parameters.
    #[must_use]
    pub fn new(config: AdamConfig, num_params: usize) -> Self {
        Self {
            config,
            m: vec![0.0; num_params],
            v: vec![0.0; num_params],
            step: 0,
        }
    }

    /// Hyperparameters.
    #[must_use]
    pub fn config(&self) -> &AdamConfig {
        &self.config
    }

    /// Number of updates applied so far.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// First-moment buffer.
    #[must_use]
    pub fn first_moment(&self) -> &[f64] {
        &self.m
    }

    /// Second-moment buffer.
    #[must_use]
    pub fn second_moment(&self) -> &[f64] {
        &self.v
    }

    /// Applies one Adam update with learning rate `lr` and zeroes every gradient.
    ///
    /// Returns the global gradient norm before clipping.
    ///
    /// # Panics
    ///
    /// Panics if `params` is not the list these buffers were sized for.
    pub fn update(&mut self, params: &[ValueRef], lr: f64) -> f64 {
        assert_eq!(
            params.len(),
            self.m.len(),
            "optimizer: parameter count changed"
        );
        let AdamConfig {
            beta1,
            beta2,
            epsilon,
            grad_clip,
            ..
        } = self.config;

        let grad_norm = params
            .iter()
            .map(|p| p.grad() * p.grad())
            .sum::<f64>()
            .sqrt();
        let clip_scale = if grad_clip > 0.0 && grad_norm > grad_clip {
            grad_clip / grad_norm
        } else {
            1.0
        };

        self.step += 1;
        let t = i32::try_from(self.step).unwrap_or(i32::MAX);
        let bias1 = 1.0 - beta1.powi(t);
        let bias2 = 1.0 - beta2.powi(t);

        for (i, p) in params.iter().enumerate() {
            let g = p.grad() * clip_scale;
            self.m[i] = beta1 * self.m[i] + (1.0 - beta1) * g;
            self.v[i] = beta2 * self.v[i] + (1.0 - beta2) * g * g;
            let m_hat = self.m[i] / bias1;
            let v_hat = self.v[i] / bias2;
            p.set_data(p.data() - lr * m_hat / (v_hat.sqrt() + epsilon));
            p.zero_grad();
        }
        grad_norm
    }
}
