// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-batch caches
//!
//! A [`BatchCache`] lives for one `select`/`with_columns` call. It memoizes
//! the [`GroupIndex`] of every partition key set and the per-group results
//! of every distinct window expression, so sibling expressions over the same
//! keys share one group order.
//!
//! Both caches are single-flight: the first caller for a key computes the
//! entry while concurrent callers for the same key block until it is ready.
//! A failed computation is cached as well and returned to every caller.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::core::{Result, Table};

use super::group_index::GroupIndex;
use super::window::GroupResults;

/// Single-flight memo table
struct SingleFlight<K, V> {
    entries: Mutex<FxHashMap<K, Arc<OnceLock<Result<V>>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Eq + Hash + Clone, V: Clone> SingleFlight<K, V> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(FxHashMap::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the cached value and whether this call computed it
    fn get_or_compute(&self, key: &K, compute: impl FnOnce() -> Result<V>) -> Result<(V, bool)> {
        // Hold the map lock only to fetch the slot; computation runs outside it
        let slot = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        let mut computed = false;
        let result = slot.get_or_init(|| {
            computed = true;
            compute()
        });

        if computed {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        result.clone().map(|value| (value, computed))
    }

    fn keys(&self) -> Vec<K> {
        self.entries.lock().keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Key of a cached window result: canonical inner expression + partition keys
pub type WindowResultKey = (String, Vec<String>);

/// Caches shared by all expressions of one evaluation batch
pub struct BatchCache {
    groups: SingleFlight<Vec<String>, Arc<GroupIndex>>,
    results: SingleFlight<WindowResultKey, Arc<GroupResults>>,
}

impl Default for BatchCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            groups: SingleFlight::new(),
            results: SingleFlight::new(),
        }
    }

    /// Group index for `keys`, built from `table` on first use
    ///
    /// Every caller in the batch receives the same `Arc`, and therefore the
    /// same group order.
    pub fn group_index(&self, table: &Table, keys: &[String]) -> Result<Arc<GroupIndex>> {
        let key = keys.to_vec();
        let (index, computed) = self
            .groups
            .get_or_compute(&key, || GroupIndex::build(table, keys).map(Arc::new))?;
        if computed {
            tracing::trace!(keys = ?keys, "group cache miss");
        } else {
            tracing::trace!(keys = ?keys, "group cache hit");
        }
        Ok(index)
    }

    /// Per-group results of a window expression, computed on first use
    pub fn window_results(
        &self,
        key: WindowResultKey,
        compute: impl FnOnce() -> Result<GroupResults>,
    ) -> Result<Arc<GroupResults>> {
        let (results, computed) = self
            .results
            .get_or_compute(&key, || compute().map(Arc::new))?;
        if !computed {
            tracing::trace!(expression = %key.0, keys = ?key.1, "window result cache hit");
        }
        Ok(results)
    }

    /// Snapshot of cache statistics
    pub fn stats(&self) -> CacheStats {
        let mut key_sets = self.groups.keys();
        key_sets.sort();
        CacheStats {
            group_hits: self.groups.hits.load(Ordering::Relaxed),
            group_misses: self.groups.misses.load(Ordering::Relaxed),
            result_hits: self.results.hits.load(Ordering::Relaxed),
            result_misses: self.results.misses.load(Ordering::Relaxed),
            cached_results: self.results.len(),
            key_sets,
        }
    }
}

/// Cache statistics of one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Group index requests served from the cache
    pub group_hits: u64,
    /// Group indexes built
    pub group_misses: u64,
    /// Window result requests served from the cache
    pub result_hits: u64,
    /// Window results computed
    pub result_misses: u64,
    /// Number of cached window results
    pub cached_results: usize,
    /// Partition key sets with a cached group index, sorted
    pub key_sets: Vec<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, Error, Value};
    use crate::executor::window::GroupResult;
    use std::sync::atomic::AtomicUsize;

    fn table() -> Table {
        Table::new(vec![
            Column::from_iter("g", ["a", "a", "b"]),
            Column::from_iter("h", [1, 2, 1]),
        ])
        .unwrap()
    }

    #[test]
    fn test_group_index_shared() {
        let cache = BatchCache::new();
        let table = table();
        let keys = vec!["g".to_string()];
        let first = cache.group_index(&table, &keys).unwrap();
        let second = cache.group_index(&table, &keys).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let other = cache.group_index(&table, &["h".to_string()]).unwrap();
        assert!(!Arc::ptr_eq(&first, &other));

        let stats = cache.stats();
        assert_eq!(stats.group_misses, 2);
        assert_eq!(stats.group_hits, 1);
        assert_eq!(
            stats.key_sets,
            vec![vec!["g".to_string()], vec!["h".to_string()]]
        );
    }

    #[test]
    fn test_errors_are_cached() {
        let cache = BatchCache::new();
        let keys = vec!["missing".to_string()];
        assert!(cache.group_index(&table(), &keys).is_err());
        assert!(cache.group_index(&table(), &keys).is_err());
        assert_eq!(cache.stats().group_misses, 1);
    }

    #[test]
    fn test_window_results_computed_once() {
        let cache = BatchCache::new();
        let calls = AtomicUsize::new(0);
        let key: WindowResultKey = ("col(\"v\").sum()".to_string(), vec!["g".to_string()]);
        for _ in 0..3 {
            let results = cache
                .window_results(key.clone(), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![GroupResult::Scalar(Value::Integer(1))])
                })
                .unwrap();
            assert_eq!(results.len(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats();
        assert_eq!(stats.result_misses, 1);
        assert_eq!(stats.result_hits, 2);
        assert_eq!(stats.cached_results, 1);
    }

    #[test]
    fn test_window_result_error() {
        let cache = BatchCache::new();
        let key: WindowResultKey = ("x".to_string(), vec!["g".to_string()]);
        let err = cache
            .window_results(key, || Err(Error::InvalidQuantile(2.0)))
            .unwrap_err();
        assert_eq!(err, Error::InvalidQuantile(2.0));
    }

    #[test]
    fn test_concurrent_single_flight() {
        let cache = BatchCache::new();
        let table = table();
        let keys = vec!["g".to_string()];
        let indexes: Vec<Arc<GroupIndex>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.group_index(&table, &keys).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(indexes.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(cache.stats().group_misses, 1);
        assert_eq!(cache.stats().group_hits, 7);
    }
}
