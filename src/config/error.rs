//! Configuration errors.
//!
//! All errors produced by the config module (validation and env loading) use [`ConfigError`].

use thiserror::Error;

/// Errors produced when building or validating configuration.
///
/// # Variants
///
/// - **Validation**: values are inconsistent or out of range (e.g. `n_embed` not divisible by `n_head`).
///   Raised by `Config::validate` and `ModelConfig::validate`; fatal at initialization.
/// - **EnvVar**: an environment variable could not be read (e.g. invalid Unicode).
/// - **Parse**: an environment variable was set but does not parse into the expected type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Configuration validation failed (e.g. invalid dimensions or ranges).
    #[error("config validation: {0}")]
    Validation(String),

    /// Failed to read an environment variable.
    #[error("env var {key}: {message}")]
    EnvVar {
        /// The full environment variable name that was read.
        key: String,
        /// Underlying cause (e.g. not unicode).
        message: String,
    },

    /// Environment variable was set but could not be parsed into the expected type.
    #[error("env var {key}={value:?}: {message}")]
    Parse {
        /// The full environment variable name.
        key: String,
        /// The raw value that failed to parse.
        value: String,
        /// Human-readable parse reason.
        message: String,
    },
}

impl ConfigError {
    /// Returns a short message suitable for logging or user display.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ConfigError::Validation(m) => m,
            ConfigError::EnvVar { message, .. } | ConfigError::Parse { message, .. } => message,
        }
    }
}
