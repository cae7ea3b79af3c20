//! Bidirectional character ↔ id table. Ids are contiguous from 0.

use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug)]
pub struct Vocab {
    id_to_sym: Vec<char>,
    sym_to_id: HashMap<char, usize>,
}

impl Vocab {
    /// Unique symbols in ascending order, so the same set of documents always
    /// yields the same ids regardless of document order.
    #[must_use]
    pub fn sorted(symbols: impl IntoIterator<Item = char>) -> Self {
        let unique: BTreeSet<char> = symbols.into_iter().collect();
        let id_to_sym: Vec<char> = unique.into_iter().collect();
        let sym_to_id = id_to_sym.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self {
            id_to_sym,
            sym_to_id,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.id_to_sym.len()
    }

    #[must_use]
    pub fn symbol(&self, id: usize) -> Option<char> {
        self.id_to_sym.get(id).copied()
    }

    #[must_use]
    pub fn id(&self, symbol: char) -> Option<usize> {
        self.sym_to_id.get(&symbol).copied()
    }
}
