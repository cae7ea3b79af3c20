//! Tests for the scalar autograd engine.
//!
//! Analytic gradients of every op are checked against central finite
//! differences, alone and composed; accumulation, zero_grad and the checked
//! variants are covered separately.

use crate::autograd::{AutogradError, Exp, Log, Pow, ScalarNode, ValueRef};

const FD_STEP: f64 = 1e-6;
const FD_TOLERANCE: f64 = 1e-4;

/// Builds `f` over fresh leaves at `inputs`, runs backward and compares each
/// leaf's gradient with a central difference of `f`.
fn assert_grads_match(inputs: &[f64], f: impl Fn(&[ValueRef]) -> ValueRef) {
    let leaves: Vec<ValueRef> = inputs.iter().map(|&x| ValueRef::new(x)).collect();
    let out = f(&leaves);
    out.backward();

    let eval = |i: usize, delta: f64| {
        let perturbed: Vec<ValueRef> = inputs
            .iter()
            .enumerate()
            .map(|(j, &x)| ValueRef::new(if i == j { x + delta } else { x }))
            .collect();
        f(&perturbed).data()
    };

    for (i, leaf) in leaves.iter().enumerate() {
        let numeric = (eval(i, FD_STEP) - eval(i, -FD_STEP)) / (2.0 * FD_STEP);
        let analytic = leaf.grad();
        let scale = numeric.abs().max(analytic.abs()).max(1.0);
        assert!(
            (numeric - analytic).abs() / scale < FD_TOLERANCE,
            "input {i}: analytic {analytic} vs numeric {numeric}"
        );
    }
}

#[test]
fn scalar_add_backward() {
    let a = ValueRef::new(2.0);
    let b = ValueRef::new(3.0);
    let c = &a + &b;
    assert_eq!(c.data(), 5.0);
    c.backward();
    assert_eq!(a.grad(), 1.0);
    assert_eq!(b.grad(), 1.0);
}

#[test]
fn scalar_mul_backward() {
    let a = ValueRef::new(2.0);
    let b = ValueRef::new(3.0);
    let c = &a * &b;
    assert_eq!(c.data(), 6.0);
    c.backward();
    assert_eq!(a.grad(), 3.0);
    assert_eq!(b.grad(), 2.0);
}

#[test]
fn scalar_pow_backward() {
    let a = ValueRef::new(2.0);
    let b = (&a).pow(3.0);
    assert!((b.data() - 8.0).abs() < 1e-10);
    b.backward();
    // d/dx x^3 = 3x^2 = 12 at x=2
    assert!((a.grad() - 12.0).abs() < 1e-10);
}

#[test]
fn scalar_log_backward() {
    let a = ValueRef::new(std::f64::consts::E);
    let b = (&a).log();
    assert!((b.data() - 1.0).abs() < 1e-10);
    b.backward();
    assert!((a.grad() - 1.0 / std::f64::consts::E).abs() < 1e-10);
}

#[test]
fn scalar_exp_backward() {
    let a = ValueRef::new(1.0);
    let b = (&a).exp();
    assert!((b.data() - std::f64::consts::E).abs() < 1e-10);
    b.backward();
    assert!((a.grad() - std::f64::consts::E).abs() < 1e-10);
}

#[test]
fn scalar_relu_backward() {
    let pos = ValueRef::new(1.5);
    let neg = ValueRef::new(-0.5);
    let out = &pos.relu() + &neg.relu();
    assert_eq!(out.data(), 1.5);
    out.backward();
    assert_eq!(pos.grad(), 1.0);
    assert_eq!(neg.grad(), 0.0);
}

#[test]
fn scalar_neg_sub_div_backward() {
    let a = ValueRef::new(6.0);
    let b = ValueRef::new(2.0);

    let n = -&a;
    assert_eq!(n.data(), -6.0);

    let d = &a - &b;
    assert_eq!(d.data(), 4.0);

    let q = &a / &b;
    assert_eq!(q.data(), 3.0);
    q.backward();
    assert_eq!(a.grad(), 0.5);
    // d/db (a/b) = -a/b^2
    assert_eq!(b.grad(), -1.5);
}

#[test]
fn scalar_constant_operands() {
    let a = ValueRef::new(4.0);
    assert_eq!((&a + 1.0).data(), 5.0);
    assert_eq!((1.0 + &a).data(), 5.0);
    assert_eq!((&a - 1.0).data(), 3.0);
    assert_eq!((1.0 - &a).data(), -3.0);
    assert_eq!((&a * 0.5).data(), 2.0);
    assert_eq!((0.5 * &a).data(), 2.0);
    assert_eq!((&a / 2.0).data(), 2.0);
    assert_eq!((2.0 / &a).data(), 0.5);

    let y = 2.0 / &a;
    y.backward();
    // d/da 2/a = -2/a^2
    assert!((a.grad() + 0.125).abs() < 1e-12);
}

#[test]
fn leaf_and_interior_nodes_keep_children_and_local_grads_paired() {
    let a = ValueRef::new(1.0);
    let b = ValueRef::new(2.0);
    assert!(a.is_leaf());
    assert_eq!((&a * &b).num_children(), 2);
    assert_eq!((&a).exp().num_children(), 1);
    assert_eq!((&a + 3.0).num_children(), 1);
}

#[test]
fn finite_difference_each_op() {
    assert_grads_match(&[0.7, -1.3], |v| &v[0] + &v[1]);
    assert_grads_match(&[0.7, -1.3], |v| &v[0] * &v[1]);
    assert_grads_match(&[0.7, -1.3], |v| &v[0] - &v[1]);
    assert_grads_match(&[0.7, -1.3], |v| &v[0] / &v[1]);
    assert_grads_match(&[0.7], |v| -&v[0]);
    assert_grads_match(&[1.7], |v| (&v[0]).pow(2.5));
    assert_grads_match(&[-1.7], |v| (&v[0]).pow(3.0));
    assert_grads_match(&[1.7], |v| (&v[0]).pow(-0.5));
    assert_grads_match(&[0.3], |v| (&v[0]).log());
    assert_grads_match(&[0.3], |v| (&v[0]).exp());
    assert_grads_match(&[0.3], |v| v[0].relu());
    assert_grads_match(&[-0.3], |v| v[0].relu());
}

#[test]
fn finite_difference_composed_expression() {
    // f = log(exp(a*b) + relu(c)^2) / (a - c) + 3/b
    assert_grads_match(&[0.4, -0.9, 1.2], |v| {
        let (a, b, c) = (&v[0], &v[1], &v[2]);
        let inner = &(&(a * b)).exp() + &(&c.relu()).pow(2.0);
        &(&(&inner).log() / &(a - c)) + &(3.0 / b)
    });
}

#[test]
fn finite_difference_shared_subexpression() {
    // s = a*b is used by two parents; gradients must accumulate through both.
    assert_grads_match(&[1.1, 0.6], |v| {
        let s = &v[0] * &v[1];
        let left = (&s).exp();
        let right = &(&s).pow(2.0) * &v[0];
        &left + &right
    });
}

#[test]
fn self_product_accumulates_both_contributions() {
    let a = ValueRef::new(3.0);
    let y = &a * &a;
    assert_eq!(y.data(), 9.0);
    y.backward();
    assert_eq!(a.grad(), 2.0 * a.data());
}

#[test]
fn scalar_topo_and_gradient_accumulation() {
    let a = ValueRef::new(3.0);
    let c = &a + &a;
    c.backward();
    assert_eq!(a.grad(), 2.0);
}

#[test]
fn backward_accumulates_across_calls_until_zeroed() {
    let a = ValueRef::new(2.0);
    let b = &a * 3.0;
    b.backward();
    b.backward();
    assert_eq!(a.grad(), 6.0);
    a.zero_grad();
    assert_eq!(a.grad(), 0.0);
}

#[test]
fn deep_chain_backward_does_not_recurse() {
    let a = ValueRef::new(1.0);
    let mut acc = ValueRef::new(0.0);
    for _ in 0..20_000 {
        acc = &acc + &a;
    }
    acc.backward();
    assert_eq!(a.grad(), 20_000.0);
    drop(acc);
    assert!(a.is_leaf());
}

#[test]
fn set_data_mutates_leaf_in_place() {
    let a = ValueRef::new(1.0);
    let alias = a.clone();
    a.set_data(4.0);
    assert_eq!(alias.data(), 4.0);
    assert!(alias.same_node(&a));
}

#[test]
fn checked_ops_reject_out_of_domain_operands() {
    let neg = ValueRef::new(-2.0);
    let zero = ValueRef::new(0.0);
    let pos = ValueRef::new(4.0);

    assert!(matches!(
        neg.checked_pow(0.5),
        Err(AutogradError::Domain { op: "pow", .. })
    ));
    assert!(matches!(
        zero.checked_pow(-1.0),
        Err(AutogradError::DivisionByZero)
    ));
    assert_eq!(neg.checked_pow(2.0).unwrap().data(), 4.0);
    assert_eq!(pos.checked_pow(0.5).unwrap().data(), 2.0);

    assert!(matches!(
        zero.checked_log(),
        Err(AutogradError::Domain { op: "log", .. })
    ));
    assert!(pos.checked_log().is_ok());

    assert!(matches!(
        pos.checked_div(&zero),
        Err(AutogradError::DivisionByZero)
    ));
    assert_eq!(pos.checked_div(&ValueRef::new(2.0)).unwrap().data(), 2.0);
}

#[test]
fn unchecked_ops_follow_float_semantics() {
    assert!((&ValueRef::new(-2.0)).pow(0.5).data().is_nan());
    assert!((&ValueRef::new(0.0)).log().data().is_infinite());
    assert!((&ValueRef::new(1.0) / &ValueRef::new(0.0)).data().is_infinite());
}
