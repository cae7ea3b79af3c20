//! Corpus loading: one training document per non-blank line.
//!
//! [`DataLoader`] is the seam; [`PathLoader`] reads a local file. Nothing is
//! ever fetched over the network.

mod error;
mod impls;
mod types;

pub use error::DataError;
pub use impls::{load_from_path, PathLoader};
pub use types::Corpus;

/// Source of a [`Corpus`].
pub trait DataLoader {
    /// # Errors
    ///
    /// [`DataError`] when the source is unreadable or holds no documents.
    fn load(&self) -> Result<Corpus, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::error::Error as _;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn temp_file(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("scalar_gpt_data_{name}.txt"));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f.sync_all().unwrap();
        path
    }

    #[test]
    fn lines_are_trimmed_and_blanks_skipped() {
        let path = temp_file("lines", "emma\n  olivia  \n\n   \nava\n");
        let result = load_from_path(&path);
        let _ = std::fs::remove_file(&path);
        let corpus = result.unwrap();
        assert_eq!(corpus.documents(), ["emma", "olivia", "ava"]);
        assert_eq!(corpus.len(), 3);
        assert!(!corpus.is_empty());
    }

    #[test]
    fn blank_file_is_empty_error() {
        let path = temp_file("blank", "\n  \n\t\n");
        let result = PathLoader::new(&path).load();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(DataError::EmptyFile)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = Path::new("/nonexistent/scalar_gpt_never_exists.txt");
        let err = load_from_path(path).unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
        assert!(err.to_string().starts_with("data io"));
        assert!(err.source().is_some());
    }

    #[test]
    fn corpus_new_rejects_empty() {
        assert!(matches!(Corpus::new(vec![]), Err(DataError::EmptyFile)));
        assert!(DataError::EmptyFile.source().is_none());
    }

    #[test]
    fn shuffle_is_a_seeded_permutation() {
        let docs: Vec<String> = (0..20).map(|i| format!("doc{i}")).collect();
        let mut a = Corpus::new(docs.clone()).unwrap();
        let mut b = a.clone();
        a.shuffle(&mut StdRng::seed_from_u64(42));
        b.shuffle(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);

        let mut sorted = a.documents().to_vec();
        sorted.sort();
        let mut expected = docs;
        expected.sort();
        assert_eq!(sorted, expected);
    }
}
