//! Crate-level error: every module error, convertible with `?`.

use thiserror::Error;

use crate::autograd::AutogradError;
use crate::config::ConfigError;
use crate::data::DataError;
use crate::model::ModelError;
use crate::sample::SampleError;
use crate::tokenizer::TokenizerError;
use crate::train::TrainError;

/// Anything that can stop a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    /// From the `checked_*` ops on [`ValueRef`](crate::autograd::ValueRef).
    /// [`run`](crate::run) never uses them; library callers that do can
    /// propagate with `?`.
    #[error(transparent)]
    Autograd(#[from] AutogradError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Train(#[from] TrainError),

    #[error(transparent)]
    Sample(#[from] SampleError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::ValueRef;

    fn log_ratio(a: f64, b: f64) -> Result<ValueRef, Error> {
        let (a, b) = (ValueRef::new(a), ValueRef::new(b));
        Ok(a.checked_div(&b)?.checked_log()?)
    }

    #[test]
    fn checked_ops_propagate_into_crate_error() {
        assert!(log_ratio(2.0, 1.0).is_ok());
        assert!(matches!(
            log_ratio(1.0, 0.0),
            Err(Error::Autograd(AutogradError::DivisionByZero))
        ));
        let err = log_ratio(-1.0, 1.0).unwrap_err();
        assert!(matches!(err, Error::Autograd(AutogradError::Domain { .. })));
        assert!(err.to_string().starts_with("autograd:"));
    }
}
