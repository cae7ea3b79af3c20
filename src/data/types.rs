//! [`Corpus`]: the non-empty list of documents a model is trained on.

use rand::seq::SliceRandom;
use rand::Rng;

use super::DataError;

/// Trimmed, non-empty documents in file order (until shuffled).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Corpus(Vec<String>);

impl Corpus {
    /// Keeps the trimmed non-blank lines of `text`, one document each.
    ///
    /// # Errors
    ///
    /// [`DataError::EmptyFile`] when no line survives.
    pub fn from_lines(text: &str) -> Result<Self, DataError> {
        let docs: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(docs)
    }

    /// # Errors
    ///
    /// [`DataError::EmptyFile`] when `docs` is empty.
    pub fn new(docs: Vec<String>) -> Result<Self, DataError> {
        if docs.is_empty() {
            return Err(DataError::EmptyFile);
        }
        Ok(Self(docs))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed corpus.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn documents(&self) -> &[String] {
        &self.0
    }

    /// Reorders the documents in place.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.0.shuffle(rng);
    }
}
