//! Document types stored by the engine and returned from searches.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Externally supplied document identifier. Live ids are non-negative.
pub type DocumentId = i32;

/// Moderation status of a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Visible in default searches.
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

/// A stored document: metadata plus its owned text.
///
/// The text is boxed once at insertion and never reallocated for the lifetime
/// of the record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentRecord {
    /// The document identifier.
    pub id: DocumentId,
    /// Average of the ratings supplied at insertion.
    pub rating: i32,
    /// Moderation status.
    pub status: DocumentStatus,
    text: Box<str>,
}

impl DocumentRecord {
    /// Create a new record owning the given text.
    pub fn new(id: DocumentId, rating: i32, status: DocumentStatus, text: &str) -> Self {
        DocumentRecord {
            id,
            rating,
            status,
            text: text.into(),
        }
    }

    /// The original document text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A ranked search hit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// The document identifier.
    pub id: DocumentId,
    /// Sum over the query's plus words of TF x IDF.
    pub relevance: f64,
    /// Average rating of the document.
    pub rating: i32,
}

impl ScoredDocument {
    /// Create a new scored document.
    pub fn new(id: DocumentId, relevance: f64, rating: i32) -> Self {
        ScoredDocument {
            id,
            relevance,
            rating,
        }
    }
}

impl fmt::Display for ScoredDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

/// Integer average of the ratings, truncated toward zero.
///
/// An empty rating list is rejected instead of dividing by zero.
pub fn compute_average_rating(ratings: &[i32]) -> Result<i32> {
    if ratings.is_empty() {
        return Err(SearchError::validation("ratings must not be empty"));
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    // The mean of i32 values always fits in an i32.
    Ok((sum / ratings.len() as i64) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rating() {
        assert_eq!(compute_average_rating(&[7, 2, 7]).unwrap(), 5);
        assert_eq!(compute_average_rating(&[1, 2, 8]).unwrap(), 3);
        assert_eq!(compute_average_rating(&[-7, 2]).unwrap(), -2);
        assert_eq!(compute_average_rating(&[i32::MAX, i32::MAX]).unwrap(), i32::MAX);
    }

    #[test]
    fn test_empty_ratings_rejected() {
        assert!(matches!(
            compute_average_rating(&[]),
            Err(SearchError::Validation(_))
        ));
    }

    #[test]
    fn test_scored_document_display() {
        let doc = ScoredDocument::new(1, 0.5, 3);
        assert_eq!(
            doc.to_string(),
            "{ document_id = 1, relevance = 0.5, rating = 3 }"
        );
    }

    #[test]
    fn test_record_keeps_text() {
        let record = DocumentRecord::new(4, 2, DocumentStatus::Banned, "big dog");
        assert_eq!(record.text(), "big dog");
        assert_eq!(record.status, DocumentStatus::Banned);
    }
}
