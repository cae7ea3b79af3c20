//! Autoregressive sampling from a trained [`Gpt`].

use thiserror::Error;

use crate::autograd::{ScalarNode, ValueRef};
use crate::model::{Gpt, ModelError};
use crate::nn::softmax;
use crate::rng::UniformSource;

/// Reasons generation cannot run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    /// Temperature must be positive and finite.
    #[error("sample: invalid temperature {0}")]
    InvalidTemperature(f64),

    /// The forward pass refused its inputs.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Index drawn from `probs` by consuming cumulative mass until it exceeds `u`.
///
/// `u` is a uniform draw in `[0, 1)`. If rounding leaves the total mass at or
/// below `u`, the last index is returned. `probs` must be non-empty.
#[must_use]
pub fn weighted_choice(probs: &[f64], u: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if u < cumulative {
            return i;
        }
    }
    probs.len().saturating_sub(1)
}

/// Samples one sequence starting from BOS.
///
/// Runs at most `min(max_len, block_size)` positions with a fresh cache,
/// dividing logits by `temperature` before the softmax. Stops without
/// emitting it when BOS is drawn. Returned ids never include BOS.
///
/// # Errors
///
/// [`SampleError::InvalidTemperature`] for a non-positive or non-finite
/// temperature.
pub fn generate<U: UniformSource + ?Sized>(
    model: &Gpt,
    max_len: usize,
    temperature: f64,
    rng: &mut U,
) -> Result<Vec<usize>, SampleError> {
    if !(temperature.is_finite() && temperature > 0.0) {
        return Err(SampleError::InvalidTemperature(temperature));
    }
    let bos = model.bos_id();
    let steps = max_len.min(model.config().block_size);
    let mut cache = model.new_cache();
    let mut token = bos;
    let mut out = Vec::new();

    for pos in 0..steps {
        let logits = model.forward(token, pos, &mut cache)?;
        let scaled: Vec<ValueRef> = logits.iter().map(|l| l / temperature).collect();
        let probs: Vec<f64> = softmax(&scaled).iter().map(ScalarNode::data).collect();
        token = weighted_choice(&probs, rng.next_uniform());
        if token == bos {
            break;
        }
        out.push(token);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Replays a fixed list of draws, cycling.
    struct Fixed(Vec<f64>, usize);

    impl UniformSource for Fixed {
        fn next_uniform(&mut self) -> f64 {
            let u = self.0[self.1 % self.0.len()];
            self.1 += 1;
            u
        }
    }

    fn model() -> Gpt {
        let cfg = ModelConfig {
            n_layer: 1,
            n_embed: 8,
            n_head: 2,
            block_size: 5,
            vocab_size: 4,
            mlp_ratio: 4,
            init_std: 0.08,
            rmsnorm_eps: 1e-5,
        };
        Gpt::new(cfg, &mut StdRng::seed_from_u64(11)).unwrap()
    }

    #[test]
    fn weighted_choice_consumes_cumulative_mass() {
        let probs = [0.2, 0.5, 0.3];
        assert_eq!(weighted_choice(&probs, 0.0), 0);
        assert_eq!(weighted_choice(&probs, 0.19), 0);
        assert_eq!(weighted_choice(&probs, 0.2), 1);
        assert_eq!(weighted_choice(&probs, 0.69), 1);
        assert_eq!(weighted_choice(&probs, 0.7), 2);
        assert_eq!(weighted_choice(&probs, 0.999_999), 2);
    }

    #[test]
    fn weighted_choice_skips_zero_mass_and_falls_back_to_last() {
        assert_eq!(weighted_choice(&[0.0, 1.0, 0.0], 0.0), 1);
        assert_eq!(weighted_choice(&[0.3, 0.3, 0.3], 0.95), 2);
    }

    #[test]
    fn generate_is_bounded_by_block_size() {
        let model = model();
        // Draws near 0 always pick id 0, never BOS (id 3).
        let mut rng = Fixed(vec![0.0], 0);
        let out = generate(&model, 100, 1.0, &mut rng).unwrap();
        assert_eq!(out, vec![0; 5]);
    }

    #[test]
    fn generate_respects_max_len() {
        let model = model();
        let mut rng = Fixed(vec![0.0], 0);
        assert_eq!(generate(&model, 2, 1.0, &mut rng).unwrap().len(), 2);
        assert!(generate(&model, 0, 1.0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn generate_stops_on_bos_without_emitting_it() {
        let model = model();
        // Draws near 1 fall into the last bucket, which is BOS.
        let mut rng = Fixed(vec![0.999_999_999], 0);
        let out = generate(&model, 5, 1.0, &mut rng).unwrap();
        assert!(out.is_empty());

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let out = generate(&model, 5, 1.0, &mut rng).unwrap();
            assert!(out.len() <= 5);
            assert!(out.iter().all(|&t| t < model.bos_id()));
        }
    }

    #[test]
    fn generate_rejects_bad_temperature() {
        let model = model();
        let mut rng = StdRng::seed_from_u64(0);
        for t in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                generate(&model, 3, t, &mut rng),
                Err(SampleError::InvalidTemperature(_))
            ));
        }
    }
}
