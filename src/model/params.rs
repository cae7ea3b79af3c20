//! Named weight matrices and their flattened view for the optimizer.

use std::collections::HashMap;

use crate::autograd::{ScalarNode, ValueRef};
use crate::nn::Matrix;
use crate::rng::{gauss, UniformSource};

use super::ModelError;

/// Insertion-ordered map from stable names to weight matrices of leaf nodes.
///
/// Shapes are fixed once inserted. [`ParameterStore::params`] flattens every
/// matrix row-major in insertion order; that order is stable for the life of
/// the store and is what optimizer state is aligned with.
#[derive(Clone, Debug, Default)]
pub struct ParameterStore {
    entries: Vec<(String, Matrix)>,
    index: HashMap<String, usize>,
}

impl ParameterStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `nout x nin` matrix drawn from N(0, std²). Returns its name.
    ///
    /// # Errors
    ///
    /// [`ModelError::DuplicateParameter`] if the name is taken; nothing is drawn.
    pub fn insert_gaussian<U: UniformSource + ?Sized>(
        &mut self,
        name: impl Into<String>,
        nout: usize,
        nin: usize,
        std: f64,
        rng: &mut U,
    ) -> Result<String, ModelError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(ModelError::DuplicateParameter(name));
        }
        let mut matrix: Matrix = Vec::with_capacity(nout);
        for _ in 0..nout {
            let mut row = Vec::with_capacity(nin);
            for _ in 0..nin {
                row.push(ValueRef::new(gauss(&mut *rng, 0.0, std)));
            }
            matrix.push(row);
        }
        self.insert(name, matrix)
    }

    /// Adds a prebuilt matrix. Returns its name.
    ///
    /// Shapes are fixed once a name is taken, so a second insert under the
    /// same name is refused rather than replacing the matrix.
    ///
    /// # Errors
    ///
    /// [`ModelError::DuplicateParameter`] if the name is taken.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        matrix: Matrix,
    ) -> Result<String, ModelError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(ModelError::DuplicateParameter(name));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name.clone(), matrix));
        Ok(name)
    }

    /// Looks up a matrix by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Matrix> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Looks up a matrix by name, as an error when absent.
    ///
    /// # Errors
    ///
    /// [`ModelError::MissingParameter`] when no matrix has that name.
    pub fn matrix(&self, name: &str) -> Result<&Matrix, ModelError> {
        self.get(name)
            .ok_or_else(|| ModelError::MissingParameter(name.to_string()))
    }

    /// `(rows, cols)` of a named matrix.
    #[must_use]
    pub fn shape(&self, name: &str) -> Option<(usize, usize)> {
        self.get(name)
            .map(|m| (m.len(), m.first().map_or(0, Vec::len)))
    }

    /// Names in flattening order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Number of matrices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no matrix has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of scalar parameters.
    #[must_use]
    pub fn num_params(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, m)| m.iter().map(Vec::len).sum::<usize>())
            .sum()
    }

    /// All parameters as one flat list of shared handles (for Adam).
    #[must_use]
    pub fn params(&self) -> Vec<ValueRef> {
        let mut params = Vec::with_capacity(self.num_params());
        for (_, matrix) in &self.entries {
            for row in matrix {
                params.extend(row.iter().cloned());
            }
        }
        params
    }

    /// Resets every parameter's gradient to 0.
    pub fn zero_grad(&self) {
        for (_, matrix) in &self.entries {
            for p in matrix.iter().flatten() {
                p.zero_grad();
            }
        }
    }
}
