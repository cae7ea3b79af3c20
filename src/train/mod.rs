//! Training: cross-entropy over framed documents, backprop and Adam.

mod error;
mod optimizer;
mod trainer;

pub use error::TrainError;
pub use optimizer::{AdamConfig, OptimizerState};
pub use trainer::Trainer;
