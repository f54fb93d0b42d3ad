//! Duplicate document detection.
//!
//! Two documents are duplicates when they contain exactly the same set of
//! words; how often each word occurs does not matter. Of a group of
//! duplicates the document with the smallest id is kept.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::document::DocumentId;
use crate::index::Term;
use crate::search::SearchEngine;

/// Ids of documents whose word set equals that of a document with a smaller id.
pub fn find_duplicates(engine: &SearchEngine) -> BTreeSet<DocumentId> {
    let mut first_with_words: BTreeMap<Vec<&Term>, DocumentId> = BTreeMap::new();
    let mut duplicates = BTreeSet::new();

    for id in engine.document_ids() {
        let words: Vec<&Term> = engine.word_frequencies(id).keys().collect();
        if first_with_words.contains_key(&words) {
            duplicates.insert(id);
        } else {
            first_with_words.insert(words, id);
        }
    }

    duplicates
}

/// Remove every duplicate document and return the removed ids in ascending
/// order.
pub fn remove_duplicates(engine: &mut SearchEngine) -> Vec<DocumentId> {
    let duplicates = find_duplicates(engine);
    for &id in &duplicates {
        info!(document_id = id, "found duplicate document id");
        engine.remove_document(id);
    }
    duplicates.into_iter().collect()
}
