//! Query parsing.

pub mod parser;

pub use parser::Query;
