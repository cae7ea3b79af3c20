//! Per-layer key/value cache for one sequence.

use crate::autograd::ValueRef;

/// Keys and values of every processed position, per layer.
///
/// Each forward call appends exactly one key and one value vector per layer,
/// so every layer's length equals the number of positions seen. A cache
/// belongs to one sequence; start the next one with [`KvCache::reset`] or a
/// fresh [`KvCache::new`].
#[derive(Clone, Debug)]
pub struct KvCache {
    keys: Vec<Vec<Vec<ValueRef>>>,
    values: Vec<Vec<Vec<ValueRef>>>,
}

impl KvCache {
    /// Empty cache for `n_layer` layers.
    #[must_use]
    pub fn new(n_layer: usize) -> Self {
        Self {
            keys: vec![Vec::new(); n_layer],
            values: vec![Vec::new(); n_layer],
        }
    }

    /// Number of layers this cache was built for.
    #[must_use]
    pub fn n_layer(&self) -> usize {
        self.keys.len()
    }

    /// Positions cached in `layer` (0 for an unknown layer).
    #[must_use]
    pub fn len(&self, layer: usize) -> usize {
        self.keys.get(layer).map_or(0, Vec::len)
    }

    /// `true` when no position has been processed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.iter().all(Vec::is_empty)
    }

    /// Appends this position's key and value to `layer`.
    pub(crate) fn push(&mut self, layer: usize, key: Vec<ValueRef>, value: Vec<ValueRef>) {
        self.keys[layer].push(key);
        self.values[layer].push(value);
    }

    /// Cached keys of `layer`, one vector per position.
    #[must_use]
    pub fn keys(&self, layer: usize) -> &[Vec<ValueRef>] {
        &self.keys[layer]
    }

    /// Cached values of `layer`, one vector per position.
    #[must_use]
    pub fn values(&self, layer: usize) -> &[Vec<ValueRef>] {
        &self.values[layer]
    }

    /// Drops every cached entry, keeping the layer count.
    pub fn reset(&mut self) {
        for layer in self.keys.iter_mut().chain(self.values.iter_mut()) {
            layer.clear();
        }
    }
}
