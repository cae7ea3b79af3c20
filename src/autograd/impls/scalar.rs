//! Scalar autograd: computation graph of single float values with backpropagation.

use crate::autograd::{AutogradError, Exp, Log, Pow, ScalarNode};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;

/// Internal scalar node: forward value, gradient, and graph edges for backprop.
struct Value {
    /// Forward pass value.
    data: f64,
    /// Gradient of the loss with respect to this node; accumulated during backward.
    grad: f64,
    /// Child nodes in the computation graph.
    children: Vec<ValueRef>,
    /// `d(self)/d(children[i])` at the forward point, one per child.
    local_grads: Vec<f64>,
}

impl Drop for Value {
    // Unlink uniquely owned descendants iteratively; long sum chains would
    // otherwise overflow the stack through nested Rc drops.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(child) = stack.pop() {
            if let Ok(cell) = Rc::try_unwrap(child.0) {
                let mut node = cell.into_inner();
                stack.append(&mut node.children);
            }
        }
    }
}

/// Handle to a scalar node in the autograd computation graph.
///
/// Wraps the node state in `Rc<RefCell<_>>` so that a node can be a child of
/// several parents and gradients can be accumulated during backward. Cloning
/// the handle shares the node.
///
/// ```
/// use scalar_gpt::autograd::{ScalarNode, ValueRef};
///
/// let a = ValueRef::new(2.0);
/// let b = ValueRef::new(3.0);
/// let c = &a * &b;
/// c.backward();
/// assert_eq!(a.grad(), 3.0);
/// assert_eq!(b.grad(), 2.0);
/// ```
#[derive(Clone)]
pub struct ValueRef(Rc<RefCell<Value>>);

impl ValueRef {
    /// Creates a leaf node (no children) with the given value and zero gradient.
    #[must_use]
    pub fn new(data: f64) -> Self {
        Self::new_with_graph(data, Vec::new(), Vec::new())
    }

    /// Creates a node that remembers its children and local grads for backprop.
    fn new_with_graph(data: f64, children: Vec<ValueRef>, local_grads: Vec<f64>) -> Self {
        debug_assert_eq!(children.len(), local_grads.len());
        ValueRef(Rc::new(RefCell::new(Value {
            data,
            grad: 0.0,
            children,
            local_grads,
        })))
    }

    /// Overwrites the forward value of this node. Used by the optimizer on leaves.
    pub(crate) fn set_data(&self, data: f64) {
        self.0.borrow_mut().data = data;
    }

    fn set_grad(&self, g: f64) {
        self.0.borrow_mut().grad = g;
    }

    fn add_grad(&self, g: f64) {
        self.0.borrow_mut().grad += g;
    }

    fn ptr(&self) -> *const RefCell<Value> {
        Rc::as_ptr(&self.0)
    }

    /// Returns `true` if this node has no children (parameter or constant).
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.0.borrow().children.is_empty()
    }

    /// Number of direct children of this node.
    #[must_use]
    pub fn num_children(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Returns `true` when both handles point at the same node.
    #[must_use]
    pub fn same_node(&self, other: &ValueRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// `self + c` for a constant `c`. Local grad is 1.
    fn shift(&self, c: f64) -> ValueRef {
        ValueRef::new_with_graph(self.data() + c, vec![self.clone()], vec![1.0])
    }

    /// `self * c` for a constant `c`. Local grad is `c`.
    fn scale(&self, c: f64) -> ValueRef {
        ValueRef::new_with_graph(self.data() * c, vec![self.clone()], vec![c])
    }

    /// ReLU: `max(0, self)`. Local grad is 1 if `self > 0`, else 0.
    #[must_use]
    pub fn relu(&self) -> ValueRef {
        let data = self.data().max(0.0);
        let local_grad = if self.data() > 0.0 { 1.0 } else { 0.0 };
        ValueRef::new_with_graph(data, vec![self.clone()], vec![local_grad])
    }

    /// [`Pow::pow`] that rejects operands outside the real domain.
    ///
    /// # Errors
    ///
    /// - [`AutogradError::Domain`] for a non-positive base with a non-integer exponent.
    /// - [`AutogradError::DivisionByZero`] for a zero base with a negative exponent.
    pub fn checked_pow(&self, exp: f64) -> Result<ValueRef, AutogradError> {
        let x = self.data();
        if x <= 0.0 && exp.fract() != 0.0 {
            return Err(AutogradError::Domain { op: "pow", value: x });
        }
        if x == 0.0 && exp < 0.0 {
            return Err(AutogradError::DivisionByZero);
        }
        Ok(self.pow(exp))
    }

    /// [`Log::log`] that rejects non-positive arguments.
    ///
    /// # Errors
    ///
    /// - [`AutogradError::Domain`] when `self.data() <= 0`.
    pub fn checked_log(&self) -> Result<ValueRef, AutogradError> {
        let x = self.data();
        if x <= 0.0 || x.is_nan() {
            return Err(AutogradError::Domain { op: "log", value: x });
        }
        Ok(self.log())
    }

    /// Division that rejects a zero divisor instead of producing infinity.
    ///
    /// # Errors
    ///
    /// - [`AutogradError::DivisionByZero`] when `rhs.data() == 0`.
    pub fn checked_div(&self, rhs: &ValueRef) -> Result<ValueRef, AutogradError> {
        if rhs.data() == 0.0 {
            return Err(AutogradError::DivisionByZero);
        }
        Ok(self / rhs)
    }

    /// Nodes reachable from `self`, each after all of its children.
    ///
    /// Iterative post-order DFS; the visited set makes shared sub-expressions
    /// appear once. Assumes the graph is acyclic.
    fn topo_order(&self) -> Vec<ValueRef> {
        let mut topo = Vec::new();
        let mut visited: HashSet<*const RefCell<Value>> = HashSet::new();
        let mut stack = vec![(self.clone(), false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                topo.push(node);
                continue;
            }
            if !visited.insert(node.ptr()) {
                continue;
            }
            stack.push((node.clone(), true));
            for child in node.0.borrow().children.iter().rev() {
                if !visited.contains(&child.ptr()) {
                    stack.push((child.clone(), false));
                }
            }
        }
        topo
    }
}

impl fmt::Debug for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0.borrow();
        f.debug_struct("ValueRef")
            .field("data", &v.data)
            .field("grad", &v.grad)
            .field("children", &v.children.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// std::ops: x + y, x - y, x * y, x / y, -x
// -----------------------------------------------------------------------------

impl Add for &ValueRef {
    type Output = ValueRef;

    fn add(self, rhs: Self) -> ValueRef {
        ValueRef::new_with_graph(
            self.data() + rhs.data(),
            vec![self.clone(), rhs.clone()],
            vec![1.0, 1.0],
        )
    }
}

impl Sub for &ValueRef {
    type Output = ValueRef;

    fn sub(self, rhs: Self) -> ValueRef {
        self + &(-rhs)
    }
}

impl Mul for &ValueRef {
    type Output = ValueRef;

    fn mul(self, rhs: Self) -> ValueRef {
        ValueRef::new_with_graph(
            self.data() * rhs.data(),
            vec![self.clone(), rhs.clone()],
            vec![rhs.data(), self.data()],
        )
    }
}

impl Div for &ValueRef {
    type Output = ValueRef;

    fn div(self, rhs: Self) -> ValueRef {
        self * &rhs.pow(-1.0)
    }
}

impl Neg for &ValueRef {
    type Output = ValueRef;

    fn neg(self) -> ValueRef {
        self.scale(-1.0)
    }
}

// -----------------------------------------------------------------------------
// std::ops with a constant operand: x + 1.0, 2.0 * x, 1.0 / x, ...
// -----------------------------------------------------------------------------

impl Add<f64> for &ValueRef {
    type Output = ValueRef;

    fn add(self, rhs: f64) -> ValueRef {
        self.shift(rhs)
    }
}

impl Add<&ValueRef> for f64 {
    type Output = ValueRef;

    fn add(self, rhs: &ValueRef) -> ValueRef {
        rhs.shift(self)
    }
}

impl Sub<f64> for &ValueRef {
    type Output = ValueRef;

    fn sub(self, rhs: f64) -> ValueRef {
        self.shift(-rhs)
    }
}

impl Sub<&ValueRef> for f64 {
    type Output = ValueRef;

    fn sub(self, rhs: &ValueRef) -> ValueRef {
        (-rhs).shift(self)
    }
}

impl Mul<f64> for &ValueRef {
    type Output = ValueRef;

    fn mul(self, rhs: f64) -> ValueRef {
        self.scale(rhs)
    }
}

impl Mul<&ValueRef> for f64 {
    type Output = ValueRef;

    fn mul(self, rhs: &ValueRef) -> ValueRef {
        rhs.scale(self)
    }
}

impl Div<f64> for &ValueRef {
    type Output = ValueRef;

    fn div(self, rhs: f64) -> ValueRef {
        self.scale(rhs.recip())
    }
}

impl Div<&ValueRef> for f64 {
    type Output = ValueRef;

    fn div(self, rhs: &ValueRef) -> ValueRef {
        rhs.pow(-1.0).scale(self)
    }
}

// -----------------------------------------------------------------------------
// Pow, Exp, Log: (&a).pow(exp), (&a).exp(), (&a).log()
// -----------------------------------------------------------------------------

impl Pow<f64> for &ValueRef {
    type Output = ValueRef;

    fn pow(self, exp: f64) -> ValueRef {
        let data = self.data().powf(exp);
        let local_grad = exp * self.data().powf(exp - 1.0);
        ValueRef::new_with_graph(data, vec![self.clone()], vec![local_grad])
    }
}

impl Exp for &ValueRef {
    type Output = ValueRef;

    fn exp(self) -> ValueRef {
        let data = self.data().exp();
        ValueRef::new_with_graph(data, vec![self.clone()], vec![data])
    }
}

impl Log for &ValueRef {
    type Output = ValueRef;

    fn log(self) -> ValueRef {
        let data = self.data().ln();
        let local_grad = 1.0 / self.data();
        ValueRef::new_with_graph(data, vec![self.clone()], vec![local_grad])
    }
}

impl ScalarNode for ValueRef {
    fn data(&self) -> f64 {
        self.0.borrow().data
    }

    fn grad(&self) -> f64 {
        self.0.borrow().grad
    }

    fn backward(&self) {
        let topo = self.topo_order();
        self.set_grad(1.0);
        for v in topo.iter().rev() {
            let v_grad = v.grad();
            let v_borrowed = v.0.borrow();
            for (child, &local_grad) in v_borrowed
                .children
                .iter()
                .zip(v_borrowed.local_grads.iter())
            {
                child.add_grad(local_grad * v_grad);
            }
        }
    }

    fn zero_grad(&self) {
        self.set_grad(0.0);
    }
}
