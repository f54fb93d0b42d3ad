//! TF-IDF ranking and document matching.
//!
//! Both operations run in one of two [`ExecutionMode`]s. The sequential mode
//! accumulates into an ordinary ordered map on the calling thread. The
//! parallel mode fans the query words out over the engine's worker pool and
//! accumulates into a [`ShardedMap`]. Both modes flatten to the same ascending
//! id order before sorting, so their final results are identical.

use std::collections::BTreeMap;

use rayon::ThreadPool;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::document::{DocumentId, DocumentStatus, ScoredDocument};
use crate::error::Result;
use crate::index::{DocumentStore, InvertedIndex, PostingList, Term};
use crate::query::Query;
use crate::search::config::EngineConfig;
use crate::util::sharded_map::ShardedMap;

/// How an operation schedules its work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Single thread, fully deterministic.
    #[default]
    Sequential,
    /// Data-parallel over query words on the engine's worker pool.
    Parallel,
}

/// Read-only view of the engine used to answer queries.
pub struct Ranker<'a> {
    index: &'a InvertedIndex,
    store: &'a DocumentStore,
    config: &'a EngineConfig,
    pool: &'a ThreadPool,
}

impl<'a> Ranker<'a> {
    pub fn new(
        index: &'a InvertedIndex,
        store: &'a DocumentStore,
        config: &'a EngineConfig,
        pool: &'a ThreadPool,
    ) -> Self {
        Ranker {
            index,
            store,
            config,
            pool,
        }
    }

    /// Rank all matching documents, keep those accepted by `predicate`, and
    /// return at most `max_result_documents` of them.
    ///
    /// Filtering is applied to the globally sorted list and truncation to the
    /// filtered list.
    pub fn find_top<P>(
        &self,
        mode: ExecutionMode,
        query: &Query<'_>,
        predicate: P,
    ) -> Result<Vec<ScoredDocument>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let relevance = match mode {
            ExecutionMode::Sequential => self.relevance_sequential(query),
            ExecutionMode::Parallel => self.relevance_parallel(query)?,
        };

        let mut matched: Vec<ScoredDocument> = relevance
            .into_iter()
            .filter_map(|(id, relevance)| {
                self.store
                    .get(id)
                    .map(|record| ScoredDocument::new(id, relevance, record.rating))
            })
            .collect();
        let total_hits = matched.len();

        sort_by_relevance(&mut matched, self.config.relevance_epsilon);

        let top: Vec<ScoredDocument> = matched
            .into_iter()
            .filter(|doc| {
                self.store
                    .get(doc.id)
                    .is_some_and(|record| predicate(doc.id, record.status, doc.rating))
            })
            .take(self.config.max_result_documents)
            .collect();

        trace!(?mode, total_hits, returned = top.len(), "ranked query");
        Ok(top)
    }

    /// Plus words of `query` contained in document `id`, sorted and unique.
    ///
    /// Returns no words when the document contains any minus word.
    pub fn match_words(&self, mode: ExecutionMode, query: &Query<'_>, id: DocumentId) -> Vec<Term> {
        match mode {
            ExecutionMode::Sequential => {
                if query
                    .minus_words()
                    .iter()
                    .any(|word| self.index.contains(word, id))
                {
                    return Vec::new();
                }
                query
                    .plus_words()
                    .iter()
                    .filter(|word| self.index.contains(word, id))
                    .filter_map(|word| self.index.term(word).cloned())
                    .collect()
            }
            ExecutionMode::Parallel => self.pool.install(|| {
                if query
                    .minus_words()
                    .par_iter()
                    .any(|word| self.index.contains(word, id))
                {
                    return Vec::new();
                }
                let mut words: Vec<Term> = query
                    .plus_words()
                    .par_iter()
                    .filter(|word| self.index.contains(word, id))
                    .filter_map(|word| self.index.term(word).cloned())
                    .collect();
                words.sort_unstable();
                words.dedup();
                words
            }),
        }
    }

    /// Inverse document frequency of a word with the given postings.
    fn inverse_document_freq(&self, postings: &PostingList) -> f64 {
        (self.store.len() as f64 / postings.len() as f64).ln()
    }

    fn relevance_sequential(&self, query: &Query<'_>) -> BTreeMap<DocumentId, f64> {
        let mut document_to_relevance: BTreeMap<DocumentId, f64> = BTreeMap::new();

        for word in query.plus_words() {
            let Some(postings) = self.index.postings(word) else {
                continue;
            };
            let idf = self.inverse_document_freq(postings);
            for (&id, &term_freq) in postings {
                *document_to_relevance.entry(id).or_insert(0.0) += term_freq * idf;
            }
        }

        for word in query.minus_words() {
            let Some(postings) = self.index.postings(word) else {
                continue;
            };
            for id in postings.keys() {
                document_to_relevance.remove(id);
            }
        }

        document_to_relevance
    }

    fn relevance_parallel(&self, query: &Query<'_>) -> Result<BTreeMap<DocumentId, f64>> {
        let document_to_relevance: ShardedMap<DocumentId, f64> =
            ShardedMap::new(self.config.shard_count)?;

        self.pool.install(|| {
            query.plus_words().par_iter().for_each(|word| {
                let Some(postings) = self.index.postings(word) else {
                    return;
                };
                let idf = self.inverse_document_freq(postings);
                for (&id, &term_freq) in postings {
                    *document_to_relevance.access(id) += term_freq * idf;
                }
            });

            query.minus_words().par_iter().for_each(|word| {
                let Some(postings) = self.index.postings(word) else {
                    return;
                };
                for id in postings.keys() {
                    document_to_relevance.erase(id);
                }
            });
        });

        Ok(document_to_relevance.into_ordered_map())
    }
}

/// Sort by relevance descending. Relevances within `epsilon` of the highest
/// relevance of their run form one tied run, ordered by rating descending and
/// then by id ascending. A document is never placed above one whose relevance
/// exceeds its own by `epsilon` or more.
///
/// The comparison handed to the sort is always a total order: runs are found
/// after an exact sort instead of comparing with a tolerance.
pub fn sort_by_relevance(documents: &mut [ScoredDocument], epsilon: f64) {
    documents.sort_by(|lhs, rhs| {
        rhs.relevance
            .total_cmp(&lhs.relevance)
            .then(lhs.id.cmp(&rhs.id))
    });

    let mut start = 0;
    while start < documents.len() {
        let mut end = start + 1;
        while end < documents.len()
            && documents[start].relevance - documents[end].relevance < epsilon
        {
            end += 1;
        }
        documents[start..end].sort_by(|lhs, rhs| {
            rhs.rating.cmp(&lhs.rating).then(lhs.id.cmp(&rhs.id))
        });
        start = end;
    }
}
