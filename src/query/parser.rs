//! Query parser for plus/minus word queries.
//!
//! A query is a space-separated list of words. A word prefixed with `-` is a
//! minus word: documents containing it are excluded. Every other word is a
//! plus word and contributes to relevance. Stop words are dropped.
//!
//! # Examples
//!
//! ```
//! use docsift::analysis::StopWords;
//! use docsift::query::Query;
//!
//! let stop_words = StopWords::parse("the").unwrap();
//! let query = Query::parse("fluffy the cat -collar", &stop_words).unwrap();
//!
//! assert_eq!(query.plus_words().iter().copied().collect::<Vec<_>>(), vec!["cat", "fluffy"]);
//! assert_eq!(query.minus_words().iter().copied().collect::<Vec<_>>(), vec!["collar"]);
//! ```

use std::collections::BTreeSet;

use crate::analysis::stop::StopWords;
use crate::analysis::tokenizer::{is_valid_word, split_into_words};
use crate::error::{Result, SearchError};

/// One parsed query word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct QueryWord<'q> {
    text: &'q str,
    is_minus: bool,
    is_stop: bool,
}

/// A validated query: deduplicated plus and minus words, each set in
/// lexicographic order. Words borrow from the raw query text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query<'q> {
    plus_words: BTreeSet<&'q str>,
    minus_words: BTreeSet<&'q str>,
}

impl<'q> Query<'q> {
    /// Parse a raw query.
    ///
    /// Fails with a validation error on an empty word (from doubled, leading
    /// or trailing spaces, or an empty query), on a malformed minus word
    /// (`-`, `--x`, or one containing control characters), and on a plus word
    /// containing control characters.
    ///
    /// When the same word appears both with and without `-`, the occurrence
    /// that comes last in the query decides which set it ends up in.
    pub fn parse(raw_query: &'q str, stop_words: &StopWords) -> Result<Self> {
        let mut query = Query::default();
        for word in split_into_words(raw_query) {
            let word = parse_query_word(word, stop_words)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                query.plus_words.remove(word.text);
                query.minus_words.insert(word.text);
            } else {
                query.minus_words.remove(word.text);
                query.plus_words.insert(word.text);
            }
        }
        Ok(query)
    }

    /// Words that contribute to relevance.
    pub fn plus_words(&self) -> &BTreeSet<&'q str> {
        &self.plus_words
    }

    /// Words that exclude a document.
    pub fn minus_words(&self) -> &BTreeSet<&'q str> {
        &self.minus_words
    }

    /// Whether no words survived parsing.
    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

fn parse_query_word<'q>(word: &'q str, stop_words: &StopWords) -> Result<QueryWord<'q>> {
    if word.is_empty() {
        return Err(SearchError::validation("empty query token"));
    }

    let (text, is_minus) = match word.strip_prefix('-') {
        Some(rest) => {
            if rest.is_empty() || rest.starts_with('-') || !is_valid_word(rest) {
                return Err(SearchError::validation(format!(
                    "malformed negated word {word:?}"
                )));
            }
            (rest, true)
        }
        None => {
            if !is_valid_word(word) {
                return Err(SearchError::validation(format!(
                    "invalid query word {word:?}"
                )));
            }
            (word, false)
        }
    };

    Ok(QueryWord {
        text,
        is_minus,
        is_stop: stop_words.contains(text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words<'a>(set: &BTreeSet<&'a str>) -> Vec<&'a str> {
        set.iter().copied().collect()
    }

    #[test]
    fn test_plus_and_minus_words() {
        let stop_words = StopWords::parse("in on").unwrap();
        let query = Query::parse("dog cat -bird cat in -on", &stop_words).unwrap();

        assert_eq!(words(query.plus_words()), vec!["cat", "dog"]);
        assert_eq!(words(query.minus_words()), vec!["bird"]);
        assert!(!query.is_empty());
    }

    #[test]
    fn test_only_stop_words_gives_empty_query() {
        let stop_words = StopWords::parse("in on").unwrap();
        let query = Query::parse("in -on", &stop_words).unwrap();
        assert!(query.is_empty());
    }

    #[test]
    fn test_malformed_words_are_rejected() {
        let stop_words = StopWords::default();
        for raw in ["-", "--x", "cat  dog", "cat -", "", " cat", "cat -do\u{3}g", "ca\tt"] {
            let result = Query::parse(raw, &stop_words);
            assert!(
                matches!(result, Err(SearchError::Validation(_))),
                "expected validation error for {raw:?}"
            );
        }
    }

    #[test]
    fn test_inner_dash_is_plain_word() {
        let stop_words = StopWords::default();
        let query = Query::parse("well-known -a-b", &stop_words).unwrap();
        assert_eq!(words(query.plus_words()), vec!["well-known"]);
        assert_eq!(words(query.minus_words()), vec!["a-b"]);
    }

    #[test]
    fn test_last_occurrence_decides_conflicting_word() {
        let stop_words = StopWords::default();

        let query = Query::parse("cat -cat", &stop_words).unwrap();
        assert!(query.plus_words().is_empty());
        assert_eq!(words(query.minus_words()), vec!["cat"]);

        let query = Query::parse("-cat cat", &stop_words).unwrap();
        assert_eq!(words(query.plus_words()), vec!["cat"]);
        assert!(query.minus_words().is_empty());
    }
}
