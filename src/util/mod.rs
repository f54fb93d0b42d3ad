//! Shared utility modules used across docsift components.

pub mod sharded_map;

pub use sharded_map::ShardedMap;
