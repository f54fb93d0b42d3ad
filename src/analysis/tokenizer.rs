//! Whitespace tokenizer and word validation.
//!
//! Words are separated by single space characters. Consecutive spaces yield
//! empty words, which the document tokenizer skips and the query parser
//! rejects. A word is valid when it contains no control character (code point
//! below `0x20`); tabs and newlines therefore make a word invalid rather than
//! acting as separators.
//!
//! # Examples
//!
//! ```
//! use docsift::analysis::tokenizer::{is_valid_word, split_into_words};
//!
//! assert_eq!(split_into_words("cat  dog"), vec!["cat", "", "dog"]);
//! assert!(is_valid_word("cat"));
//! assert!(!is_valid_word("ca\u{1}t"));
//! ```

use crate::analysis::stop::StopWords;
use crate::error::{Result, SearchError};

/// The character separating words.
pub const WORD_SEPARATOR: char = ' ';

/// Split text on the space character, keeping empty words.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(WORD_SEPARATOR).collect()
}

/// Check that a word contains no control characters.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| c < '\u{20}')
}

/// Tokenizer producing the indexable words of a document.
///
/// Stop words and empty words are dropped. Any invalid word fails the whole
/// text, so callers never see a partially tokenized document.
#[derive(Clone, Debug)]
pub struct WhitespaceTokenizer<'a> {
    stop_words: &'a StopWords,
}

impl<'a> WhitespaceTokenizer<'a> {
    /// Create a tokenizer that filters the given stop words.
    pub fn new(stop_words: &'a StopWords) -> Self {
        WhitespaceTokenizer { stop_words }
    }

    /// Tokenize the given text into its retained words, in text order.
    pub fn tokenize<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::validation(format!(
                    "invalid word {word:?}: control characters are not allowed"
                )));
            }
            if word.is_empty() || self.stop_words.contains(word) {
                continue;
            }
            words.push(word);
        }
        Ok(words)
    }
}
