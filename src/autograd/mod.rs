//! Autograd: a scalar computation graph with reverse-mode differentiation.
//!
//! The graph is built as a side effect of arithmetic on [`ValueRef`] handles.
//! [`ScalarNode::backward`] walks it from a loss node to every leaf, adding
//! `local_grad * parent.grad` into each child (chain rule, accumulated).
//!
//! Ownership is scoped to the handles: once the loss and any caches holding
//! intermediate nodes are dropped, the whole step's graph is released. Leaves
//! kept alive elsewhere (model parameters) survive with their data and grad.

mod error;
pub mod impls;
#[cfg(test)]
mod tests;

pub use error::AutogradError;
pub use impls::scalar::ValueRef;

/// Raise a node to a constant power (e.g. `(&a).pow(2.0)`).
pub trait Pow<Rhs> {
    /// Result of the power operation.
    type Output;

    /// Returns `self^exp` with gradient tracking.
    #[must_use]
    fn pow(self, exp: Rhs) -> Self::Output;
}

/// Exponential of a node (e.g. `(&a).exp()`).
pub trait Exp {
    /// Result of the exponential.
    type Output;

    /// Returns `exp(self)` with gradient tracking.
    #[must_use]
    fn exp(self) -> Self::Output;
}

/// Natural log of a node (e.g. `(&a).log()`).
pub trait Log {
    /// Result of the log.
    type Output;

    /// Returns `ln(self)` with gradient tracking.
    #[must_use]
    fn log(self) -> Self::Output;
}

/// A differentiable scalar node in the computation graph.
///
/// Use [`ScalarNode::data`] for the forward value and [`ScalarNode::grad`]
/// after [`ScalarNode::backward`].
pub trait ScalarNode: Clone {
    /// Returns the forward pass value.
    fn data(&self) -> f64;

    /// Returns the accumulated gradient of the loss with respect to this node.
    fn grad(&self) -> f64;

    /// Runs backpropagation from this node (the loss) to all leaves.
    ///
    /// Gradients are added into whatever the nodes already hold, so leaves
    /// must be zeroed between independent calls.
    fn backward(&self);

    /// Zeros the gradient at this node (e.g. after an optimizer step).
    fn zero_grad(&self);
}
