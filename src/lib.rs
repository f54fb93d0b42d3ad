//! # docsift
//!
//! An in-memory document search engine with TF-IDF ranking.
//!
//! ## Features
//!
//! - Plus/minus word queries with stop word filtering
//! - TF-IDF relevance with rating tie-breaks and top-k truncation
//! - Sequential and parallel execution with identical results
//! - Dual-mirrored inverted index for fast document removal
//! - Request statistics, duplicate removal, batch queries and pagination
//!
//! ## Example
//!
//! ```
//! use docsift::prelude::*;
//!
//! let mut engine = SearchEngine::new("and with").unwrap();
//! engine.add_document(1, "curly cat curly tail", DocumentStatus::Actual, &[7, 2, 7]).unwrap();
//! engine.add_document(2, "curly dog and fancy collar", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
//!
//! let top = engine.find_top_documents_in(ExecutionMode::Parallel, "curly -collar").unwrap();
//! assert_eq!(top.len(), 1);
//! assert_eq!(top[0].id, 1);
//! ```

pub mod analysis;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod search;
pub mod tools;
pub mod util;

pub mod prelude {
    pub use crate::analysis::StopWords;
    pub use crate::document::{DocumentId, DocumentRecord, DocumentStatus, ScoredDocument};
    pub use crate::error::{Result, SearchError};
    pub use crate::index::Term;
    pub use crate::search::{EngineConfig, ExecutionMode, SearchEngine};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
