//! Text analysis for docsift.
//!
//! Splitting raw text into words, validating them, and recognising stop words.
//! The same rules are applied to indexed documents and to queries.

pub mod stop;
pub mod tokenizer;

// Re-export commonly used types
pub use stop::StopWords;
pub use tokenizer::{is_valid_word, split_into_words, WhitespaceTokenizer};
