//! Dual-mirrored inverted index.
//!
//! The index keeps two views of the same `(word, document, term frequency)`
//! triples:
//!
//! - the posting map, `word -> (document -> tf)`, used for ranking, and
//! - the document-term mirror, `document -> (word -> tf)`, used for frequency
//!   lookups and for removing a document without scanning the vocabulary.
//!
//! Words are interned as [`Term`]s. Both views share one allocation per
//! distinct word, and match results hand out clones of the same term.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use rayon::ThreadPool;
use rayon::prelude::*;

use crate::document::DocumentId;

/// An interned, immutable word.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term(Arc<str>);

impl Term {
    /// The word as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Term {
    fn from(word: &str) -> Self {
        Term(Arc::from(word))
    }
}

impl Deref for Term {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Term {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Term {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Term {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Term {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Documents containing one word, with the word's term frequency in each.
pub type PostingList = BTreeMap<DocumentId, f64>;

/// Words of one document with their term frequencies.
pub type TermFrequencies = BTreeMap<Term, f64>;

/// Inverted index with a per-document mirror.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: BTreeMap<Term, PostingList>,
    document_terms: BTreeMap<DocumentId, TermFrequencies>,
}

impl InvertedIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the retained words of a document.
    ///
    /// Each occurrence contributes `1 / words.len()` to the word's term
    /// frequency. A document without words still gets an (empty) mirror entry.
    /// The caller guarantees that `id` is not already indexed.
    pub fn insert_document(&mut self, id: DocumentId, words: &[&str]) {
        let frequencies = self.document_terms.entry(id).or_default();
        if words.is_empty() {
            return;
        }

        let inv_word_count = 1.0 / words.len() as f64;
        for &word in words {
            let term = match self.postings.get_key_value(word) {
                Some((term, _)) => term.clone(),
                None => Term::from(word),
            };
            *self
                .postings
                .entry(term.clone())
                .or_default()
                .entry(id)
                .or_insert(0.0) += inv_word_count;
            *frequencies.entry(term).or_insert(0.0) += inv_word_count;
        }
    }

    /// Remove a document by visiting every posting list.
    ///
    /// Cost is proportional to the vocabulary size. Empty posting lists are
    /// dropped.
    pub fn remove_document_scan(&mut self, id: DocumentId) {
        if !self.document_terms.contains_key(&id) {
            return;
        }
        self.postings.retain(|_, postings| {
            postings.remove(&id);
            !postings.is_empty()
        });
        self.document_terms.remove(&id);
    }

    /// Remove a document by visiting only the posting lists of its own words.
    ///
    /// The affected lists are detached from the map, cleared of `id` on the
    /// given pool, and reattached if they still hold other documents.
    pub fn remove_document_parallel(&mut self, id: DocumentId, pool: &ThreadPool) {
        let words: Vec<Term> = match self.document_terms.get(&id) {
            Some(frequencies) => frequencies.keys().cloned().collect(),
            None => return,
        };

        let mut detached: Vec<(Term, PostingList)> = words
            .iter()
            .filter_map(|word| self.postings.remove_entry(word.as_str()))
            .collect();

        pool.install(|| {
            detached.par_iter_mut().for_each(|(_, postings)| {
                postings.remove(&id);
            });
        });

        self.postings.extend(
            detached
                .into_iter()
                .filter(|(_, postings)| !postings.is_empty()),
        );
        self.document_terms.remove(&id);
    }

    /// Posting list of a word, if any live document contains it.
    pub fn postings(&self, word: &str) -> Option<&PostingList> {
        self.postings.get(word)
    }

    /// The interned term for a word, if indexed.
    pub fn term(&self, word: &str) -> Option<&Term> {
        self.postings.get_key_value(word).map(|(term, _)| term)
    }

    /// Whether document `id` contains `word`.
    pub fn contains(&self, word: &str, id: DocumentId) -> bool {
        self.postings
            .get(word)
            .is_some_and(|postings| postings.contains_key(&id))
    }

    /// Number of documents containing `word`.
    pub fn document_frequency(&self, word: &str) -> usize {
        self.postings.get(word).map_or(0, BTreeMap::len)
    }

    /// Term frequencies of a document, if indexed.
    pub fn word_frequencies(&self, id: DocumentId) -> Option<&TermFrequencies> {
        self.document_terms.get(&id)
    }

    /// Number of distinct indexed words.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.document_terms.len()
    }

    /// Iterate over indexed document ids in ascending order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.document_terms.keys().copied()
    }

    /// Check that the posting map and the mirror hold the same triples.
    pub fn is_consistent(&self) -> bool {
        let mirrored: usize = self.document_terms.values().map(BTreeMap::len).sum();
        let posted: usize = self.postings.values().map(BTreeMap::len).sum();
        if mirrored != posted {
            return false;
        }
        self.document_terms.iter().all(|(id, frequencies)| {
            frequencies.iter().all(|(term, tf)| {
                self.postings
                    .get(term)
                    .and_then(|postings| postings.get(id))
                    .is_some_and(|posted_tf| posted_tf == tf)
            })
        })
    }
}
