//! Stop word set.
//!
//! Stop words are excluded both from indexing and from queries. The set is
//! built once when the engine is constructed and never changes afterwards.
//!
//! # Examples
//!
//! ```
//! use docsift::analysis::stop::StopWords;
//!
//! let stop_words = StopWords::parse("in the  on").unwrap();
//! assert!(stop_words.contains("the"));
//! assert!(!stop_words.contains("cat"));
//! assert_eq!(stop_words.len(), 3);
//! ```

use std::collections::BTreeSet;

use crate::analysis::tokenizer::{is_valid_word, split_into_words};
use crate::error::{Result, SearchError};

/// An immutable, deduplicated set of stop words.
///
/// Empty entries are ignored. Every stop word must be a valid word; a single
/// control character anywhere rejects the whole set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    /// Build a stop word set from space-separated text.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_words(split_into_words(text))
    }

    /// Build a stop word set from an explicit collection of words.
    ///
    /// # Examples
    ///
    /// ```
    /// use docsift::analysis::stop::StopWords;
    ///
    /// let stop_words = StopWords::from_words(["a", "an", "a", ""]).unwrap();
    /// assert_eq!(stop_words.len(), 2);
    /// ```
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::validation(format!(
                    "invalid stop word {word:?}: control characters are not allowed"
                )));
            }
            set.insert(word.to_string());
        }
        Ok(StopWords { words: set })
    }

    /// Check whether the word is a stop word.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of distinct stop words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate over the stop words in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}
