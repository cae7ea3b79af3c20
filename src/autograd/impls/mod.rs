//! Node implementations behind the autograd traits.

pub mod scalar;
