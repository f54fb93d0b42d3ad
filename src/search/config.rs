//! Configuration for the search engine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Default cap on the number of documents returned by a search.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevances closer than this are treated as equal when ranking.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// Default number of shards used by parallel relevance accumulation.
pub const DEFAULT_SHARD_COUNT: usize = 97;

/// Configuration for [`SearchEngine`](crate::search::SearchEngine).
///
/// Missing fields take their default values when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of documents returned by a search.
    pub max_result_documents: usize,

    /// Relevance tolerance for tie-breaking by rating.
    pub relevance_epsilon: f64,

    /// Number of shards of the parallel relevance accumulator.
    pub shard_count: usize,

    /// Thread pool size for parallel execution.
    /// If None, uses the number of CPU cores.
    pub thread_pool_size: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_result_documents: MAX_RESULT_DOCUMENT_COUNT,
            relevance_epsilon: RELEVANCE_EPSILON,
            shard_count: DEFAULT_SHARD_COUNT,
            thread_pool_size: None,
        }
    }
}

impl EngineConfig {
    /// Set the maximum number of returned documents.
    pub fn with_max_result_documents(mut self, max_result_documents: usize) -> Self {
        self.max_result_documents = max_result_documents;
        self
    }

    /// Set the relevance tie tolerance.
    pub fn with_relevance_epsilon(mut self, relevance_epsilon: f64) -> Self {
        self.relevance_epsilon = relevance_epsilon;
        self
    }

    /// Set the shard count of the parallel accumulator.
    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count;
        self
    }

    /// Set the worker thread count.
    pub fn with_thread_pool_size(mut self, threads: usize) -> Self {
        self.thread_pool_size = Some(threads);
        self
    }

    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_result_documents == 0 {
            return Err(SearchError::validation(
                "max_result_documents must be positive",
            ));
        }
        if self.shard_count == 0 {
            return Err(SearchError::validation("shard_count must be positive"));
        }
        if self.thread_pool_size == Some(0) {
            return Err(SearchError::validation(
                "thread_pool_size must be positive",
            ));
        }
        if !self.relevance_epsilon.is_finite() || self.relevance_epsilon < 0.0 {
            return Err(SearchError::validation(
                "relevance_epsilon must be a finite non-negative number",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.max_result_documents, 5);
        assert_eq!(config.relevance_epsilon, 1e-6);
        assert_eq!(config.shard_count, 97);
        assert!(config.thread_pool_size.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = EngineConfig::default()
            .with_max_result_documents(10)
            .with_shard_count(16)
            .with_thread_pool_size(2)
            .with_relevance_epsilon(1e-9);
        assert_eq!(config.max_result_documents, 10);
        assert_eq!(config.shard_count, 16);
        assert_eq!(config.thread_pool_size, Some(2));
        assert_eq!(config.relevance_epsilon, 1e-9);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "shard_count": 13 }"#).unwrap();
        assert_eq!(config.shard_count, 13);
        assert_eq!(config.max_result_documents, 5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for json in [
            r#"{ "shard_count": 0 }"#,
            r#"{ "max_result_documents": 0 }"#,
            r#"{ "thread_pool_size": 0 }"#,
            r#"{ "relevance_epsilon": -1.0 }"#,
        ] {
            assert!(matches!(
                EngineConfig::from_json_str(json),
                Err(SearchError::Validation(_))
            ));
        }
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(SearchError::Json(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_result_documents": 3, "thread_pool_size": 2 }}"#).unwrap();

        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.max_result_documents, 3);
        assert_eq!(config.thread_pool_size, Some(2));

        let missing = EngineConfig::from_json_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(SearchError::Io(_))));
    }
}
