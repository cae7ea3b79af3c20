//! Decoder-only transformer: token + position → logits, one position per call.
//!
//! GPT-2 shaped with RMSNorm instead of LayerNorm, no biases, ReLU in the MLP
//! and no normalization before the final projection.

use crate::autograd::ValueRef;
use crate::config::ConfigError;
use crate::nn::{add_vec, dot, linear, rmsnorm, softmax};
use crate::rng::UniformSource;

use super::{KvCache, ModelConfig, ModelError, ParameterStore};

const WTE: &str = "wte";
const WPE: &str = "wpe";
const LM_HEAD: &str = "lm_head";

/// Store keys of one layer's matrices.
#[derive(Clone, Debug)]
struct LayerNames {
    attn_wq: String,
    attn_wk: String,
    attn_wv: String,
    attn_wo: String,
    mlp_fc1: String,
    mlp_fc2: String,
}

impl LayerNames {
    fn new(layer: usize) -> Self {
        let name = |suffix: &str| format!("layer{layer}.{suffix}");
        Self {
            attn_wq: name("attn_wq"),
            attn_wk: name("attn_wk"),
            attn_wv: name("attn_wv"),
            attn_wo: name("attn_wo"),
            mlp_fc1: name("mlp_fc1"),
            mlp_fc2: name("mlp_fc2"),
        }
    }
}

/// The model: hyperparameters plus the parameter store they shape.
#[derive(Clone, Debug)]
pub struct Gpt {
    config: ModelConfig,
    store: ParameterStore,
    layers: Vec<LayerNames>,
}

impl Gpt {
    /// Validates `config` and draws every weight from N(0, init_std²).
    ///
    /// # Errors
    ///
    /// [`ConfigError::Validation`] if the hyperparameters are inconsistent
    /// (zero sizes, `n_embed` not divisible by `n_head`, ...).
    pub fn new<U: UniformSource + ?Sized>(
        config: ModelConfig,
        rng: &mut U,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let n_layer = config.n_layer;
        let layers: Vec<LayerNames> = (0..n_layer).map(LayerNames::new).collect();
        let store = Self::init_store(&config, &layers, rng)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        log::debug!(
            "initialized model: {} matrices, {} params",
            store.len(),
            store.num_params()
        );
        Ok(Self {
            config,
            store,
            layers,
        })
    }

    fn init_store<U: UniformSource + ?Sized>(
        config: &ModelConfig,
        layers: &[LayerNames],
        rng: &mut U,
    ) -> Result<ParameterStore, ModelError> {
        let ModelConfig {
            n_embed,
            block_size,
            vocab_size,
            init_std,
            ..
        } = *config;
        let hidden = config.mlp_hidden();

        let mut store = ParameterStore::new();
        store.insert_gaussian(WTE, vocab_size, n_embed, init_std, rng)?;
        store.insert_gaussian(WPE, block_size, n_embed, init_std, rng)?;
        store.insert_gaussian(LM_HEAD, vocab_size, n_embed, init_std, rng)?;
        for names in layers {
            store.insert_gaussian(&names.attn_wq, n_embed, n_embed, init_std, rng)?;
            store.insert_gaussian(&names.attn_wk, n_embed, n_embed, init_std, rng)?;
            store.insert_gaussian(&names.attn_wv, n_embed, n_embed, init_std, rng)?;
            store.insert_gaussian(&names.attn_wo, n_embed, n_embed, init_std, rng)?;
            store.insert_gaussian(&names.mlp_fc1, hidden, n_embed, init_std, rng)?;
            store.insert_gaussian(&names.mlp_fc2, n_embed, hidden, init_std, rng)?;
        }
        Ok(store)
    }

    /// Hyperparameters the model was built with.
    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// The named weight matrices.
    #[must_use]
    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    /// Flattened parameter list, stable across calls.
    #[must_use]
    pub fn params(&self) -> Vec<ValueRef> {
        self.store.params()
    }

    /// Id of the beginning/end-of-sequence token.
    #[must_use]
    pub fn bos_id(&self) -> usize {
        self.config.bos_id()
    }

    /// An empty cache sized for this model.
    #[must_use]
    pub fn new_cache(&self) -> KvCache {
        KvCache::new(self.config.n_layer)
    }

    /// Logits over the vocabulary for `token` at position `pos`.
    ///
    /// Appends this position's keys and values to `cache`; attention sees
    /// only what the cache holds, i.e. positions `0..=pos`.
    ///
    /// # Errors
    ///
    /// [`ModelError`] when `pos` or `token` is out of range, or `cache` does
    /// not belong to this model or is not at position `pos`.
    pub fn forward(
        &self,
        token: usize,
        pos: usize,
        cache: &mut KvCache,
    ) -> Result<Vec<ValueRef>, ModelError> {
        self.check_inputs(token, pos, cache)?;
        let cfg = &self.config;
        let head_dim = cfg.head_dim();
        let scale = (head_dim as f64).sqrt();

        // Embeddings: what the token is + where it is
        let tok_emb = &self.store.matrix(WTE)?[token];
        let pos_emb = &self.store.matrix(WPE)?[pos];
        let mut x = rmsnorm(&add_vec(tok_emb, pos_emb), cfg.rmsnorm_eps);

        for (li, names) in self.layers.iter().enumerate() {
            // 1) Multi-head causal self-attention
            let x_residual = x.clone();
            x = rmsnorm(&x, cfg.rmsnorm_eps);
            let q = linear(&x, self.store.matrix(&names.attn_wq)?);
            let k = linear(&x, self.store.matrix(&names.attn_wk)?);
            let v = linear(&x, self.store.matrix(&names.attn_wv)?);
            cache.push(li, k, v);

            let keys = cache.keys(li);
            let values = cache.values(li);
            let mut x_attn = Vec::with_capacity(cfg.n_embed);
            for h in 0..cfg.n_head {
                let hs = h * head_dim;
                let q_h = &q[hs..hs + head_dim];
                let attn_logits: Vec<ValueRef> = keys
                    .iter()
                    .map(|k_t| &dot(q_h, &k_t[hs..hs + head_dim]) / scale)
                    .collect();
                let attn_weights = softmax(&attn_logits);
                for j in hs..hs + head_dim {
                    let mut head_out = ValueRef::new(0.0);
                    for (v_t, w_t) in values.iter().zip(&attn_weights) {
                        head_out = &head_out + &(w_t * &v_t[j]);
                    }
                    x_attn.push(head_out);
                }
            }
            x = linear(&x_attn, self.store.matrix(&names.attn_wo)?);
            x = add_vec(&x, &x_residual);

            // 2) MLP: up-project, ReLU, down-project
            let x_residual = x.clone();
            x = rmsnorm(&x, cfg.rmsnorm_eps);
            x = linear(&x, self.store.matrix(&names.mlp_fc1)?);
            x = x.iter().map(ValueRef::relu).collect();
            x = linear(&x, self.store.matrix(&names.mlp_fc2)?);
            x = add_vec(&x, &x_residual);
        }

        Ok(linear(&x, self.store.matrix(LM_HEAD)?))
    }

    fn check_inputs(&self, token: usize, pos: usize, cache: &KvCache) -> Result<(), ModelError> {
        let cfg = &self.config;
        if cache.n_layer() != cfg.n_layer {
            return Err(ModelError::CacheLayerMismatch {
                expected: cfg.n_layer,
                actual: cache.n_layer(),
            });
        }
        if pos >= cfg.block_size {
            return Err(ModelError::PositionOutOfRange {
                pos,
                block_size: cfg.block_size,
            });
        }
        if token >= cfg.vocab_size {
            return Err(ModelError::TokenOutOfRange {
                token,
                vocab_size: cfg.vocab_size,
            });
        }
        let cached = cache.len(0);
        if cached != pos {
            return Err(ModelError::PositionCacheMismatch { pos, cached });
        }
        Ok(())
    }
}
