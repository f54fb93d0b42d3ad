//! High-level search engine that combines indexing and searching.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::analysis::stop::StopWords;
use crate::analysis::tokenizer::WhitespaceTokenizer;
use crate::document::{
    DocumentId, DocumentRecord, DocumentStatus, ScoredDocument, compute_average_rating,
};
use crate::error::{Result, SearchError};
use crate::index::store::DocumentIds;
use crate::index::{DocumentStore, InvertedIndex, Term, TermFrequencies};
use crate::query::Query;
use crate::search::config::EngineConfig;
use crate::search::ranking::{ExecutionMode, Ranker};

static EMPTY_FREQUENCIES: TermFrequencies = BTreeMap::new();

/// An in-memory TF-IDF search engine.
///
/// Mutating operations take `&mut self` and reads take `&self`, so reads may
/// run concurrently from several threads but never alongside a mutation.
///
/// # Examples
///
/// ```
/// use docsift::document::DocumentStatus;
/// use docsift::search::SearchEngine;
///
/// let mut engine = SearchEngine::new("and in on").unwrap();
/// engine.add_document(1, "cat dog cat", DocumentStatus::Actual, &[1]).unwrap();
/// engine.add_document(2, "dog bird", DocumentStatus::Actual, &[1]).unwrap();
///
/// let top = engine.find_top_documents("cat dog").unwrap();
/// assert_eq!(top.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 2]);
/// ```
#[derive(Debug)]
pub struct SearchEngine {
    stop_words: StopWords,
    store: DocumentStore,
    index: InvertedIndex,
    config: EngineConfig,
    pool: Arc<ThreadPool>,
}

impl SearchEngine {
    /// Create an engine with stop words given as space-separated text.
    pub fn new(stop_words_text: &str) -> Result<Self> {
        Self::with_config(StopWords::parse(stop_words_text)?, EngineConfig::default())
    }

    /// Create an engine from an explicit collection of stop words.
    pub fn from_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(StopWords::from_words(stop_words)?, EngineConfig::default())
    }

    /// Create an engine with the given stop words and configuration.
    pub fn with_config(stop_words: StopWords, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let thread_pool_size = config.thread_pool_size.unwrap_or_else(num_cpus::get);
        let pool = ThreadPoolBuilder::new()
            .num_threads(thread_pool_size)
            .thread_name(|i| format!("docsift-worker-{i}"))
            .build()
            .map_err(|e| SearchError::thread_pool(format!("failed to create thread pool: {e}")))?;
        debug!(
            threads = thread_pool_size,
            stop_words = stop_words.len(),
            "created search engine"
        );

        Ok(SearchEngine {
            stop_words,
            store: DocumentStore::new(),
            index: InvertedIndex::new(),
            config,
            pool: Arc::new(pool),
        })
    }

    /// Add a document.
    ///
    /// Fails without changing anything if the id is negative or already live,
    /// if `ratings` is empty, or if the text contains a word with control
    /// characters.
    pub fn add_document(
        &mut self,
        id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if id < 0 || self.store.contains(id) {
            return Err(SearchError::validation(format!(
                "invalid or duplicate id {id}"
            )));
        }
        let rating = compute_average_rating(ratings)?;
        let words = WhitespaceTokenizer::new(&self.stop_words).tokenize(text)?;

        self.store
            .insert(DocumentRecord::new(id, rating, status, text));
        self.index.insert_document(id, &words);

        debug!(document_id = id, words = words.len(), rating, "added document");
        Ok(())
    }

    /// Top documents with status [`DocumentStatus::Actual`], ranked sequentially.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<ScoredDocument>> {
        self.find_top_documents_in(ExecutionMode::Sequential, raw_query)
    }

    /// Top documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents_in(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
    ) -> Result<Vec<ScoredDocument>> {
        self.find_top_documents_by_status_in(mode, raw_query, DocumentStatus::Actual)
    }

    /// Top documents with the given status, ranked sequentially.
    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<ScoredDocument>> {
        self.find_top_documents_by_status_in(ExecutionMode::Sequential, raw_query, status)
    }

    /// Top documents with the given status.
    pub fn find_top_documents_by_status_in(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<ScoredDocument>> {
        self.find_top_documents_with(mode, raw_query, |_, document_status, _| {
            document_status == status
        })
    }

    /// Top documents accepted by `predicate`, ranked sequentially.
    pub fn find_top_documents_by<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<ScoredDocument>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        self.find_top_documents_with(ExecutionMode::Sequential, raw_query, predicate)
    }

    /// Top documents accepted by `predicate(id, status, rating)`.
    ///
    /// Documents are ranked by TF-IDF relevance (ties within the configured
    /// epsilon broken by rating, then id), filtered, and cut to
    /// `max_result_documents`.
    pub fn find_top_documents_with<P>(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<ScoredDocument>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let query = Query::parse(raw_query, &self.stop_words)?;
        self.ranker().find_top(mode, &query, predicate)
    }

    /// Query words found in document `id`, matched sequentially.
    pub fn match_document(
        &self,
        raw_query: &str,
        id: DocumentId,
    ) -> Result<(Vec<Term>, DocumentStatus)> {
        self.match_document_with(ExecutionMode::Sequential, raw_query, id)
    }

    /// Plus words of the query contained in document `id`, sorted and unique,
    /// together with the document's status. The word list is empty when the
    /// document contains any minus word.
    ///
    /// Asking about a document that is not live is a precondition violation.
    pub fn match_document_with(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        id: DocumentId,
    ) -> Result<(Vec<Term>, DocumentStatus)> {
        let status = self
            .store
            .get(id)
            .map(|record| record.status)
            .ok_or_else(|| SearchError::precondition(format!("unknown document id {id}")))?;
        let query = Query::parse(raw_query, &self.stop_words)?;
        Ok((self.ranker().match_words(mode, &query, id), status))
    }

    /// Remove a document, scanning the whole vocabulary. No-op for ids that
    /// are not live.
    pub fn remove_document(&mut self, id: DocumentId) {
        self.remove_document_with(ExecutionMode::Sequential, id);
    }

    /// Remove a document. No-op for ids that are not live.
    ///
    /// The parallel mode only touches the posting lists of the document's own
    /// words.
    pub fn remove_document_with(&mut self, mode: ExecutionMode, id: DocumentId) {
        if self.store.remove(id).is_none() {
            return;
        }
        match mode {
            ExecutionMode::Sequential => self.index.remove_document_scan(id),
            ExecutionMode::Parallel => self.index.remove_document_parallel(id, &self.pool),
        }
        debug!(document_id = id, ?mode, "removed document");
    }

    /// Number of live documents.
    pub fn document_count(&self) -> usize {
        self.store.len()
    }

    /// Live document ids in ascending order.
    pub fn document_ids(&self) -> DocumentIds<'_> {
        self.store.ids()
    }

    /// The `index`-th live document id in ascending order.
    pub fn document_id_at(&self, index: usize) -> Result<DocumentId> {
        self.store.id_at(index).ok_or_else(|| {
            SearchError::precondition(format!(
                "document index {index} out of range for {} documents",
                self.store.len()
            ))
        })
    }

    /// Term frequencies of a document. Empty for ids that are not live.
    pub fn word_frequencies(&self, id: DocumentId) -> &TermFrequencies {
        self.index
            .word_frequencies(id)
            .unwrap_or(&EMPTY_FREQUENCIES)
    }

    /// The stored record of a live document.
    pub fn document(&self, id: DocumentId) -> Option<&DocumentRecord> {
        self.store.get(id)
    }

    /// The engine's stop words.
    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying inverted index.
    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Run `op` on the engine's worker pool.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    fn ranker(&self) -> Ranker<'_> {
        Ranker::new(&self.index, &self.store, &self.config, &self.pool)
    }
}

impl<'a> IntoIterator for &'a SearchEngine {
    type Item = DocumentId;
    type IntoIter = DocumentIds<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.document_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SearchEngine {
        let config = EngineConfig::default().with_thread_pool_size(2);
        SearchEngine::with_config(StopWords::parse("и в на").unwrap(), config).unwrap()
    }

    fn assert_live_ids_mirrored(engine: &SearchEngine) {
        let live: Vec<DocumentId> = engine.document_ids().collect();
        let mirrored: Vec<DocumentId> = engine.index().document_ids().collect();
        assert_eq!(live, mirrored);
        assert_eq!(engine.document_count(), engine.index().document_count());
    }

    #[test]
    fn test_add_rejects_bad_ids() {
        let mut engine = engine();
        engine
            .add_document(1, "кот", DocumentStatus::Actual, &[1])
            .unwrap();

        let duplicate = engine.add_document(1, "пёс", DocumentStatus::Actual, &[1]);
        assert!(matches!(duplicate, Err(SearchError::Validation(_))));
        let negative = engine.add_document(-1, "пёс", DocumentStatus::Actual, &[1]);
        assert!(matches!(negative, Err(SearchError::Validation(_))));

        assert_eq!(engine.document_count(), 1);
        assert_eq!(engine.document(1).unwrap().text(), "кот");
    }

    #[test]
    fn test_failed_add_leaves_no_trace() {
        let mut engine = engine();
        let bad_text = engine.add_document(3, "кот ск\u{12}ворец", DocumentStatus::Actual, &[1]);
        assert!(matches!(bad_text, Err(SearchError::Validation(_))));
        let no_ratings = engine.add_document(3, "кот", DocumentStatus::Actual, &[]);
        assert!(matches!(no_ratings, Err(SearchError::Validation(_))));

        assert_eq!(engine.document_count(), 0);
        assert!(engine.document(3).is_none());
        assert!(engine.word_frequencies(3).is_empty());
        assert_eq!(engine.index().term_count(), 0);
        assert_live_ids_mirrored(&engine);

        // the id is still free
        engine
            .add_document(3, "кот", DocumentStatus::Actual, &[1])
            .unwrap();
        assert_live_ids_mirrored(&engine);
    }

    #[test]
    fn test_live_ids_match_mirror_across_add_and_remove() {
        let mut engine = engine();
        engine
            .add_document(1, "кот в сапогах", DocumentStatus::Actual, &[1])
            .unwrap();
        // only stop words
        engine
            .add_document(2, "и в на", DocumentStatus::Actual, &[1])
            .unwrap();
        engine
            .add_document(3, "", DocumentStatus::Banned, &[2])
            .unwrap();
        engine
            .add_document(4, "пёс на сене", DocumentStatus::Actual, &[3])
            .unwrap();
        assert_live_ids_mirrored(&engine);
        assert!(engine.word_frequencies(2).is_empty());
        assert_eq!(engine.document_ids().collect::<Vec<_>>(), vec![1, 2, 3, 4]);

        engine.remove_document_with(ExecutionMode::Sequential, 2);
        assert_live_ids_mirrored(&engine);
        engine.remove_document_with(ExecutionMode::Parallel, 3);
        assert_live_ids_mirrored(&engine);
        engine.remove_document_with(ExecutionMode::Parallel, 4);
        engine.remove_document_with(ExecutionMode::Sequential, 1);
        assert_live_ids_mirrored(&engine);
        assert_eq!(engine.document_count(), 0);
        assert!(engine.index().is_consistent());
    }

    #[test]
    fn test_stop_words_are_not_indexed() {
        let mut engine = engine();
        engine
            .add_document(1, "кот в сапогах", DocumentStatus::Actual, &[1])
            .unwrap();

        let words: Vec<&str> = engine.word_frequencies(1).keys().map(Term::as_str).collect();
        assert_eq!(words, vec!["кот", "сапогах"]);
        assert!(engine.find_top_documents("в").unwrap().is_empty());
    }

    #[test]
    fn test_average_rating_is_stored() {
        let mut engine = engine();
        engine
            .add_document(1, "пушистый кот", DocumentStatus::Actual, &[7, 2, 7])
            .unwrap();
        let top = engine.find_top_documents("кот").unwrap();
        assert_eq!(top[0].rating, 5);
    }

    #[test]
    fn test_match_unknown_document_is_precondition_violation() {
        let engine = engine();
        for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
            let result = engine.match_document_with(mode, "кот", 42);
            assert!(matches!(result, Err(SearchError::Precondition(_))));
        }
    }

    #[test]
    fn test_document_id_at() {
        let mut engine = engine();
        for id in [4, 2, 9] {
            engine
                .add_document(id, "кот", DocumentStatus::Actual, &[1])
                .unwrap();
        }
        assert_eq!(engine.document_id_at(0).unwrap(), 2);
        assert_eq!(engine.document_id_at(2).unwrap(), 9);
        assert!(matches!(
            engine.document_id_at(3),
            Err(SearchError::Precondition(_))
        ));
        assert_eq!((&engine).into_iter().collect::<Vec<_>>(), vec![2, 4, 9]);
    }

    #[test]
    fn test_invalid_stop_words_fail_construction() {
        assert!(matches!(
            SearchEngine::new("и в\u{1}"),
            Err(SearchError::Validation(_))
        ));
        assert!(matches!(
            SearchEngine::from_stop_words(["ok", "b\u{7}ad"]),
            Err(SearchError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let config = EngineConfig::default().with_shard_count(0);
        assert!(matches!(
            SearchEngine::with_config(StopWords::default(), config),
            Err(SearchError::Validation(_))
        ));
    }
}
