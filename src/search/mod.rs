//! Search engine for executing queries and collecting results.

pub mod config;
pub mod engine;
pub mod ranking;

pub use self::config::EngineConfig;
pub use self::engine::SearchEngine;
pub use self::ranking::{ExecutionMode, Ranker};
