//! Batch query execution.
//!
//! Runs many independent queries against one engine on its worker pool. Each
//! query is ranked sequentially; the parallelism is across queries.

use rayon::prelude::*;

use crate::document::ScoredDocument;
use crate::error::Result;
use crate::search::SearchEngine;

/// Run every query with [`SearchEngine::find_top_documents`], returning the
/// results in input order. The first failing query aborts the batch.
pub fn process_queries<S>(engine: &SearchEngine, queries: &[S]) -> Result<Vec<Vec<ScoredDocument>>>
where
    S: AsRef<str> + Sync,
{
    engine.install(|| {
        queries
            .par_iter()
            .map(|query| engine.find_top_documents(query.as_ref()))
            .collect()
    })
}

/// Like [`process_queries`], with all results concatenated in input order.
pub fn process_queries_joined<S>(engine: &SearchEngine, queries: &[S]) -> Result<Vec<ScoredDocument>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(engine, queries)?
        .into_iter()
        .flatten()
        .collect())
}
