//! Sharded concurrent accumulation map.
//!
//! [`ShardedMap`] splits its keys across a fixed number of independently
//! locked shards. A key always hashes to the same shard, so operations on one
//! key are serialized while operations on keys in different shards proceed in
//! parallel. Mutable access is only handed out as a guard that unlocks the
//! shard when dropped, or through a closure.
//!
//! # Examples
//!
//! ```
//! use docsift::util::sharded_map::ShardedMap;
//!
//! let map: ShardedMap<i32, f64> = ShardedMap::new(8).unwrap();
//! *map.access(3) += 1.5;
//! map.update(3, |v| *v *= 2.0);
//! map.erase(&42);
//!
//! let merged = map.into_ordered_map();
//! assert_eq!(merged.get(&3), Some(&3.0));
//! ```

use std::collections::BTreeMap;
use std::hash::Hash;

use ahash::{AHashMap, RandomState};
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};

use crate::error::{Result, SearchError};

/// Guard over one value of a [`ShardedMap`]. The owning shard stays locked
/// until the guard is dropped.
pub type ValueGuard<'a, V> = MappedMutexGuard<'a, V>;

/// A thread-safe key to accumulator map partitioned into locked shards.
#[derive(Debug)]
pub struct ShardedMap<K, V> {
    shards: Vec<Mutex<AHashMap<K, V>>>,
    hasher: RandomState,
}

impl<K, V> ShardedMap<K, V>
where
    K: Hash + Eq,
{
    /// Create a map with `shard_count` shards.
    pub fn new(shard_count: usize) -> Result<Self> {
        if shard_count == 0 {
            return Err(SearchError::validation("shard count must be positive"));
        }
        let shards = (0..shard_count)
            .map(|_| Mutex::new(AHashMap::new()))
            .collect();
        Ok(ShardedMap {
            shards,
            hasher: RandomState::new(),
        })
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Index of the shard owning `key`.
    pub fn shard_index(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) % self.shards.len() as u64) as usize
    }

    fn shard(&self, key: &K) -> &Mutex<AHashMap<K, V>> {
        &self.shards[self.shard_index(key)]
    }

    /// Lock the shard owning `key` and return its value, inserting the
    /// default value first if the key is absent.
    pub fn access(&self, key: K) -> ValueGuard<'_, V>
    where
        V: Default,
    {
        let guard = self.shard(&key).lock();
        MutexGuard::map(guard, |shard| shard.entry(key).or_default())
    }

    /// Apply `f` to the value of `key` while its shard is locked.
    pub fn update<F>(&self, key: K, f: F)
    where
        V: Default,
        F: FnOnce(&mut V),
    {
        f(&mut self.access(key));
    }

    /// Remove `key` if present.
    pub fn erase(&self, key: &K) -> Option<V> {
        self.shard(key).lock().remove(key)
    }

    /// Total number of keys across all shards.
    ///
    /// Shards are locked one at a time, so the count is only exact when no
    /// other thread is mutating the map.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    /// Whether every shard is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Drain every shard into one ordered map.
    ///
    /// Consuming the map guarantees no other thread can still be mutating it.
    pub fn into_ordered_map(self) -> BTreeMap<K, V>
    where
        K: Ord,
    {
        self.shards
            .into_iter()
            .flat_map(|shard| shard.into_inner())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rayon::prelude::*;

    #[test]
    fn test_zero_shards_rejected() {
        let result: Result<ShardedMap<i32, f64>> = ShardedMap::new(0);
        assert!(matches!(result, Err(SearchError::Validation(_))));
    }

    #[test]
    fn test_key_always_maps_to_same_shard() {
        let map: ShardedMap<i32, i64> = ShardedMap::new(7).unwrap();
        for key in 0..100 {
            let shard = map.shard_index(&key);
            assert!(shard < 7);
            assert_eq!(shard, map.shard_index(&key));
        }
    }

    #[test]
    fn test_access_inserts_default() {
        let map: ShardedMap<&str, i64> = ShardedMap::new(4).unwrap();
        {
            let value = map.access("cat");
            assert_eq!(*value, 0);
        }
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());
    }

    #[test]
    fn test_erase_missing_key_is_noop() {
        let map: ShardedMap<i32, i64> = ShardedMap::new(4).unwrap();
        *map.access(1) += 5;
        assert_eq!(map.erase(&2), None);
        assert_eq!(map.erase(&1), Some(5));
        assert!(map.is_empty());
    }

    #[test]
    fn test_concurrent_increments_on_same_keys() {
        let map: ShardedMap<i32, i64> = ShardedMap::new(3).unwrap();

        (0..10_000).into_par_iter().for_each(|i| {
            *map.access(i % 10) += 1;
        });

        let merged = map.into_ordered_map();
        assert_eq!(merged.len(), 10);
        assert!(merged.values().all(|&count| count == 1_000));
        assert_eq!(merged.keys().copied().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_concurrent_erase() {
        let map: ShardedMap<i32, i64> = ShardedMap::new(5).unwrap();
        for key in 0..100 {
            map.update(key, |v| *v = i64::from(key));
        }

        (0..100).into_par_iter().filter(|k| k % 2 == 0).for_each(|k| {
            map.erase(&k);
        });

        let merged = map.into_ordered_map();
        assert_eq!(merged.len(), 50);
        assert!(merged.keys().all(|k| k % 2 == 1));
    }
}
