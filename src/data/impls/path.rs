//! Loads a corpus from a UTF-8 file, one document per line.

use std::fs;
use std::path::Path;

use super::super::{Corpus, DataError, DataLoader};

/// Reads the file at `P` on every [`DataLoader::load`].
#[derive(Clone, Debug)]
pub struct PathLoader<P>(pub P);

impl<P: AsRef<Path>> PathLoader<P> {
    #[must_use]
    pub fn new(path: P) -> Self {
        Self(path)
    }
}

impl<P: AsRef<Path>> DataLoader for PathLoader<P> {
    fn load(&self) -> Result<Corpus, DataError> {
        let path = self.0.as_ref();
        let text = fs::read_to_string(path)?;
        let corpus = Corpus::from_lines(&text)?;
        log::debug!("loaded {} documents from {}", corpus.len(), path.display());
        Ok(corpus)
    }
}

/// Shorthand for `PathLoader::new(path).load()`.
///
/// # Errors
///
/// - [`DataError::Io`] when the file cannot be read as UTF-8.
/// - [`DataError::EmptyFile`] when every line is blank.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Corpus, DataError> {
    PathLoader::new(path).load()
}
