//! Errors raised by the checked autograd operations.

use thiserror::Error;

/// Domain errors for operations that are undefined on real numbers.
///
/// Only the `checked_*` methods on [`ValueRef`](super::ValueRef) produce these;
/// the operator forms follow float semantics and yield NaN or infinity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutogradError {
    /// The operand lies outside the operation's real domain.
    #[error("autograd: {op} is undefined for {value}")]
    Domain {
        /// Operation name (`pow`, `log`).
        op: &'static str,
        /// The offending operand value.
        value: f64,
    },

    /// The divisor's data is exactly zero.
    #[error("autograd: division by zero")]
    DivisionByZero,
}
