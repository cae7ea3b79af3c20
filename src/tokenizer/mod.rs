//! Text ↔ token ids.
//!
//! [`Tokenizer`] is the seam the binary talks to; [`CharTokenizer`] is the
//! character-level implementation. BOS never appears in encoded text: it is
//! added by the trainer and stops generation.

mod error;
mod impls;
mod vocab;

pub use error::TokenizerError;
pub use impls::CharTokenizer;
use vocab::Vocab;

/// Maps strings to id sequences and back.
pub trait Tokenizer {
    /// # Errors
    ///
    /// [`TokenizerError::UnknownSymbol`] for a symbol outside the vocabulary.
    fn encode(&self, s: &str) -> Result<Vec<usize>, TokenizerError>;

    /// # Errors
    ///
    /// [`TokenizerError::InvalidId`] for BOS or an id past the vocabulary.
    fn decode(&self, ids: &[usize]) -> Result<String, TokenizerError>;

    /// Distinct tokens, BOS included.
    fn vocab_size(&self) -> usize;

    /// Beginning/end-of-sequence id, `vocab_size() - 1`.
    fn bos_id(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn vocabulary_is_sorted_unique_chars_plus_bos() {
        let t = CharTokenizer::from_documents(&["cab", "abba"]);
        assert_eq!(t.vocab_size(), 4);
        assert_eq!(t.bos_id(), 3);
        assert_eq!(t.encode("abc").unwrap(), vec![0, 1, 2]);
        assert_eq!(t.symbol(3), None);
    }

    #[test]
    fn document_order_does_not_change_ids() {
        let a = CharTokenizer::from_documents(&["xyz", "zx"]);
        let b = CharTokenizer::from_documents(&["zx", "xyz"]);
        assert_eq!(a.encode("zyx").unwrap(), b.encode("zyx").unwrap());
    }

    #[test]
    fn encode_then_decode_restores_text() {
        let t = CharTokenizer::from_documents(&["emma", "olivia"]);
        let ids = t.encode("mavi").unwrap();
        assert_eq!(t.decode(&ids).unwrap(), "mavi");
        assert_eq!(t.decode(&[]).unwrap(), "");
    }

    #[test]
    fn unknown_char_is_rejected() {
        let t = CharTokenizer::from_documents(&["ab"]);
        assert_eq!(t.encode("abc"), Err(TokenizerError::UnknownSymbol('c')));
    }

    #[test]
    fn bos_and_out_of_range_ids_do_not_decode() {
        let t = CharTokenizer::from_documents(&["ab"]);
        assert_eq!(t.decode(&[0, 2]), Err(TokenizerError::InvalidId(2)));
        assert_eq!(t.decode(&[9]), Err(TokenizerError::InvalidId(9)));
        assert_eq!(
            TokenizerError::InvalidId(9).to_string(),
            "tokenizer: invalid id 9"
        );
    }

    #[test]
    fn empty_corpus_holds_only_bos() {
        let t = CharTokenizer::from_documents::<&str>(&[]);
        assert_eq!(t.vocab_size(), 1);
        assert_eq!(t.bos_id(), 0);
    }
}
