//! Vector helpers expressed purely in autograd nodes: matrix-vector product,
//! softmax and RMS normalization. Every output stays in the graph, so
//! gradients flow back through all of them.

use crate::autograd::{Exp, Pow, ScalarNode, ValueRef};

/// A weight matrix: outer index = output row, inner index = input column.
pub type Matrix = Vec<Vec<ValueRef>>;

/// Differentiable dot product of two equal-length vectors.
///
/// # Panics
///
/// Panics if the lengths differ.
#[must_use]
pub fn dot(a: &[ValueRef], b: &[ValueRef]) -> ValueRef {
    assert_eq!(a.len(), b.len(), "dot: length mismatch");
    let mut sum = ValueRef::new(0.0);
    for (ai, bi) in a.iter().zip(b) {
        sum = &sum + &(ai * bi);
    }
    sum
}

/// Element-wise sum of two equal-length vectors (residual connections).
///
/// # Panics
///
/// Panics if the lengths differ.
#[must_use]
pub fn add_vec(a: &[ValueRef], b: &[ValueRef]) -> Vec<ValueRef> {
    assert_eq!(a.len(), b.len(), "add_vec: length mismatch");
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

/// Matrix-vector multiply: one dot product per row of `w`.
///
/// # Panics
///
/// Panics if any row of `w` has a length other than `x.len()`.
#[must_use]
pub fn linear(x: &[ValueRef], w: &[Vec<ValueRef>]) -> Vec<ValueRef> {
    w.iter()
        .map(|row| {
            assert_eq!(
                row.len(),
                x.len(),
                "linear: weight row length must equal input length"
            );
            dot(row, x)
        })
        .collect()
}

/// Logits to probabilities in `[0, 1]` summing to 1.
///
/// The maximum raw value is subtracted as a constant before exponentiating,
/// so large logits do not overflow.
#[must_use]
pub fn softmax(logits: &[ValueRef]) -> Vec<ValueRef> {
    let max_val = logits
        .iter()
        .map(ScalarNode::data)
        .fold(f64::NEG_INFINITY, f64::max);

    let exps: Vec<ValueRef> = logits.iter().map(|l| (&(l - max_val)).exp()).collect();
    let mut total = ValueRef::new(0.0);
    for e in &exps {
        total = &total + e;
    }
    exps.iter().map(|e| e / &total).collect()
}

/// Root-mean-square normalization without learned scale or bias.
///
/// `eps` is added to the mean square before the `-0.5` power so an all-zero
/// vector maps to zeros instead of NaN.
#[must_use]
pub fn rmsnorm(x: &[ValueRef], eps: f64) -> Vec<ValueRef> {
    let n = x.len() as f64;
    let mut ms = ValueRef::new(0.0);
    for xi in x {
        ms = &ms + &(xi * xi);
    }
    let ms = &ms / n;
    let scale = (&(&ms + eps)).pow(-0.5);
    x.iter().map(|xi| xi * &scale).collect()
}
