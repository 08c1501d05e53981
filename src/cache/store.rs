//! Cache Store Module
//!
//! The storage engine behind [`Cache`](crate::Cache): a sharded concurrent
//! map of entries, swapped wholesale on flush, plus the observers and
//! statistics every operation reports to.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry as Slot;
use dashmap::DashMap;
use tracing::debug;

use crate::cache::observer::Observers;
use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheStats, Entry};
use crate::error::{CacheError, Result};

type EntryMap<V> = DashMap<String, Entry<V>>;

// == Store ==
pub(crate) struct Store<V> {
    /// Current backing map. The lock only guards the swap done by `flush`;
    /// per-key operations clone the `Arc` and release it immediately.
    entries: RwLock<Arc<EntryMap<V>>>,
    observers: Observers<V>,
    stats: StatsRecorder,
    evict_on_flush: bool,
}

impl<V: Clone> Store<V> {
    // == Constructor ==
    pub(crate) fn new(observers: Observers<V>, evict_on_flush: bool) -> Self {
        Self {
            entries: RwLock::new(Arc::new(DashMap::new())),
            observers,
            stats: StatsRecorder::default(),
            evict_on_flush,
        }
    }

    fn map(&self) -> Arc<EntryMap<V>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // == Add ==
    /// Inserts only if no live entry exists. The check and the insert happen
    /// under the same shard lock and never notify observers.
    pub(crate) fn add(&self, key: String, value: V, ttl: Duration) -> Result<()> {
        let map = self.map();
        match map.entry(key) {
            Slot::Occupied(mut slot) => {
                if !slot.get().is_expired() {
                    return Err(CacheError::KeyExists(slot.key().clone()));
                }
                slot.insert(Entry::new(value, ttl));
            }
            Slot::Vacant(slot) => {
                slot.insert(Entry::new(value, ttl));
            }
        }
        Ok(())
    }

    // == Set ==
    pub(crate) fn set(&self, key: String, value: V, ttl: Duration) {
        self.map().insert(key, Entry::new(value, ttl));
    }

    // == Get ==
    /// Returns a live value. Stale entries count as misses but stay stored.
    pub(crate) fn get(&self, key: &str) -> Option<V> {
        let map = self.map();
        let found = map
            .get(key)
            .and_then(|entry| (!entry.is_expired()).then(|| entry.value.clone()));

        match found {
            Some(value) => {
                self.stats.record_hit();
                self.observers.hit(key, &value);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                self.observers.missed(key);
                None
            }
        }
    }

    // == Delete ==
    pub(crate) fn delete(&self, key: &str) {
        if let Some((key, entry)) = self.map().remove(key) {
            self.evicted(&key, entry);
        }
    }

    // == Remove Expired ==
    /// Removes every stale entry, notifying `on_evict` for each.
    ///
    /// "Stale" is `now >= expires_at`, the same test `get` uses, so the
    /// sweep never removes an entry `get` would still return.
    ///
    /// Returns the number of entries removed.
    pub(crate) fn remove_expired(&self) -> usize {
        let stale = self.stale_keys(Instant::now());
        self.remove_stale(stale)
    }

    /// Collects the keys of entries stale at `now`.
    pub(crate) fn stale_keys(&self, now: Instant) -> Vec<String> {
        let map = self.map();
        map.iter()
            .filter(|item| item.value().is_expired_at(now))
            .map(|item| item.key().clone())
            .collect()
    }

    /// Removes the given keys if they are still stale.
    ///
    /// No shard lock is held while a callback runs. Each removal re-checks
    /// staleness, which keeps an entry refreshed since the scan.
    pub(crate) fn remove_stale(&self, keys: Vec<String>) -> usize {
        let map = self.map();
        let mut removed = 0;
        for key in keys {
            if let Some((key, entry)) = map.remove_if(&key, |_, entry| entry.is_expired()) {
                self.evicted(&key, entry);
                removed += 1;
            }
        }
        removed
    }

    // == Flush ==
    /// Replaces the backing map with an empty one.
    ///
    /// Writers still holding the old map may land there; their writes are
    /// discarded with it.
    pub(crate) fn flush(&self) {
        let old = {
            let mut current = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, Arc::new(DashMap::new()))
        };
        self.stats.record_flush();
        debug!(discarded = old.len(), "Cache flushed");

        if self.evict_on_flush {
            let keys: Vec<String> = old.iter().map(|item| item.key().clone()).collect();
            for key in keys {
                if let Some((key, entry)) = old.remove(&key) {
                    self.evicted(&key, entry);
                }
            }
        }
    }

    fn evicted(&self, key: &str, entry: Entry<V>) {
        self.stats.record_eviction();
        self.observers.evicted(key, &entry.value);
    }

    // == Length ==
    /// Number of stored entries, stale ones included.
    pub(crate) fn len(&self) -> usize {
        self.map().len()
    }

    // == Stats ==
    pub(crate) fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    /// Raw presence check that bypasses expiry and observers.
    #[cfg(test)]
    pub(crate) fn contains_raw(&self, key: &str) -> bool {
        self.map().contains_key(key)
    }
}
