//! Build [`Config`] from `SCALAR_GPT_*` environment variables.
//!
//! Unset variables fall back to [`Config::default`]; a variable that is set
//! but malformed is an error rather than a silent default.

use std::path::PathBuf;
use std::str::FromStr;

use super::constants::{
    ENV_BETA1, ENV_BETA2, ENV_BLOCK_SIZE, ENV_EPSILON, ENV_GRAD_CLIP, ENV_INIT_STD,
    ENV_INPUT_PATH, ENV_LEARNING_RATE, ENV_LOSS_LOG_EVERY, ENV_MLP_RATIO, ENV_NUM_STEPS,
    ENV_N_EMBED, ENV_N_HEAD, ENV_N_LAYER, ENV_PREFIX, ENV_RMSNORM_EPS, ENV_SAMPLE_SIZE, ENV_SEED,
    ENV_TEMPERATURE,
};
use super::{Config, ConfigError};

/// Full environment variable key for a suffix (e.g. `SEED` → `SCALAR_GPT_SEED`).
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Reads an environment variable as a string; `Ok(None)` when unset.
///
/// # Errors
///
/// [`ConfigError::EnvVar`] if the variable is set but not valid Unicode.
pub fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(s) => Ok(Some(s)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Reads an environment variable and parses it into `T`; `Ok(None)` when unset.
///
/// # Errors
///
/// [`ConfigError::Parse`] if set but unparsable (e.g. `SEED=abc` for `u64`),
/// [`ConfigError::EnvVar`] if not valid Unicode.
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = env_string(key)? else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::Parse {
            key: key.to_string(),
            value: raw.clone(),
            message: e.to_string(),
        })
}

fn parsed_or<T>(suffix: &str, fallback: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(env_parsed(&env_key(suffix))?.unwrap_or(fallback))
}

/// Builds [`Config`] from the environment over [`Config::default`].
///
/// The result is not validated; call [`Config::validate`] before use.
///
/// # Errors
///
/// Returns [`ConfigError`] if any set variable fails to read or parse.
pub fn from_env() -> Result<Config, ConfigError> {
    let d = Config::default();
    let input_path = env_string(&env_key(ENV_INPUT_PATH))?
        .map(PathBuf::from)
        .unwrap_or(d.input_path);

    Ok(Config {
        seed: parsed_or(ENV_SEED, d.seed)?,
        input_path,
        n_embed: parsed_or(ENV_N_EMBED, d.n_embed)?,
        n_head: parsed_or(ENV_N_HEAD, d.n_head)?,
        n_layer: parsed_or(ENV_N_LAYER, d.n_layer)?,
        block_size: parsed_or(ENV_BLOCK_SIZE, d.block_size)?,
        mlp_ratio: parsed_or(ENV_MLP_RATIO, d.mlp_ratio)?,
        init_std: parsed_or(ENV_INIT_STD, d.init_std)?,
        rmsnorm_eps: parsed_or(ENV_RMSNORM_EPS, d.rmsnorm_eps)?,
        learning_rate: parsed_or(ENV_LEARNING_RATE, d.learning_rate)?,
        beta1: parsed_or(ENV_BETA1, d.beta1)?,
        beta2: parsed_or(ENV_BETA2, d.beta2)?,
        epsilon: parsed_or(ENV_EPSILON, d.epsilon)?,
        grad_clip: parsed_or(ENV_GRAD_CLIP, d.grad_clip)?,
        num_steps: parsed_or(ENV_NUM_STEPS, d.num_steps)?,
        loss_log_every: parsed_or(ENV_LOSS_LOG_EVERY, d.loss_log_every)?,
        temperature: parsed_or(ENV_TEMPERATURE, d.temperature)?,
        sample_size: parsed_or(ENV_SAMPLE_SIZE, d.sample_size)?,
    })
}
