//! In-memory index structures: the inverted index and the document store.

pub mod inverted;
pub mod store;

pub use inverted::{InvertedIndex, PostingList, Term, TermFrequencies};
pub use store::DocumentStore;
