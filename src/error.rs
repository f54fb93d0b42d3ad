//! Error types for docsift.
//!
//! All fallible operations return [`Result`], whose error type is
//! [`SearchError`]. Two kinds matter to callers:
//!
//! - [`SearchError::Validation`] - the input was rejected. The engine is left
//!   exactly as it was before the call.
//! - [`SearchError::Precondition`] - the caller asked about a document that is
//!   not live (or an index that is out of range). This is a programming error
//!   on the caller's side.
//!
//! # Examples
//!
//! ```
//! use docsift::error::{Result, SearchError};
//!
//! fn check_id(id: i32) -> Result<()> {
//!     if id < 0 {
//!         return Err(SearchError::validation("invalid or duplicate id"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(matches!(check_id(-1), Err(SearchError::Validation(_))));
//! ```

use std::io;

use thiserror::Error;

/// The main error type for docsift operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Rejected input: bad id, malformed token, empty ratings and so on.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lookup of a document that is not live.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// The worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// I/O errors (reading configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with SearchError.
pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// Create a new validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        SearchError::Validation(msg.into())
    }

    /// Create a new precondition error.
    pub fn precondition<S: Into<String>>(msg: S) -> Self {
        SearchError::Precondition(msg.into())
    }

    /// Create a new thread pool error.
    pub fn thread_pool<S: Into<String>>(msg: S) -> Self {
        SearchError::ThreadPool(msg.into())
    }

    /// Whether this error means the input was rejected.
    pub fn is_validation(&self) -> bool {
        matches!(self, SearchError::Validation(_))
    }

    /// Whether this error is a violated caller precondition.
    pub fn is_precondition(&self) -> bool {
        matches!(self, SearchError::Precondition(_))
    }
}
