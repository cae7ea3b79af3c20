//! Character-level tokenizer: one id per distinct character, BOS last.

use super::super::Vocab;
use super::super::{Tokenizer, TokenizerError};

/// Ids `0..n` are the corpus characters in sorted order; BOS is `n`.
#[derive(Clone, Debug)]
pub struct CharTokenizer {
    vocab: Vocab,
}

impl CharTokenizer {
    /// Collects every character appearing in `docs`.
    ///
    /// An empty input gives a vocabulary holding only BOS.
    #[must_use]
    pub fn from_documents<S: AsRef<str>>(docs: &[S]) -> Self {
        let vocab = Vocab::sorted(docs.iter().flat_map(|d| d.as_ref().chars()));
        Self { vocab }
    }

    /// The character behind `id`, `None` for BOS and anything past it.
    #[must_use]
    pub fn symbol(&self, id: usize) -> Option<char> {
        self.vocab.symbol(id)
    }
}

impl Tokenizer for CharTokenizer {
    fn encode(&self, s: &str) -> Result<Vec<usize>, TokenizerError> {
        s.chars()
            .map(|ch| self.vocab.id(ch).ok_or(TokenizerError::UnknownSymbol(ch)))
            .collect()
    }

    fn decode(&self, ids: &[usize]) -> Result<String, TokenizerError> {
        ids.iter()
            .map(|&id| self.vocab.symbol(id).ok_or(TokenizerError::InvalidId(id)))
            .collect()
    }

    fn vocab_size(&self) -> usize {
        self.vocab.len() + 1
    }

    fn bos_id(&self) -> usize {
        self.vocab.len()
    }
}
