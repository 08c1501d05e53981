//! Public cache handle.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use crate::cache::observer::{Callbacks, Observers};
use crate::cache::store::Store;
use crate::cache::CacheStats;
use crate::config::{Config, Dispatch};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_dispatcher, Evictor};

// == Cache ==
/// A thread-safe key-value cache with per-entry TTL.
///
/// Reads treat stale entries as absent without removing them. When the
/// configuration sets an eviction interval, a background task removes stale
/// entries periodically and reports each one to `on_evict`.
///
/// Share a cache between threads by wrapping it in an [`Arc`]. Dropping the
/// cache stops its evictor.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ncache::{Cache, Config};
///
/// let cache: Cache<String> = Cache::new(Some(Config::default())).unwrap();
/// cache.set("greeting", "hello".to_string(), Duration::ZERO);
/// assert_eq!(cache.get("greeting").as_deref(), Some("hello"));
/// ```
pub struct Cache<V> {
    store: Arc<Store<V>>,
    evictor: Option<Evictor>,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache from a configuration.
    ///
    /// # Errors
    /// - `CacheError::Configuration` if `config` is `None`
    /// - `CacheError::Configuration` if the configuration needs a background
    ///   task (eviction interval or background dispatch) and no Tokio runtime
    ///   is running
    pub fn new(config: Option<Config<V>>) -> Result<Self> {
        let config = config
            .ok_or_else(|| CacheError::Configuration("must pass a configuration".to_string()))?;

        let runtime = if config.needs_runtime() {
            let handle = Handle::try_current().map_err(|err| {
                CacheError::Configuration(format!("background tasks need a Tokio runtime: {err}"))
            })?;
            Some(handle)
        } else {
            None
        };

        let callbacks = Arc::new(Callbacks {
            on_evict: config.on_evict,
            on_hit: config.on_hit,
            on_miss: config.on_miss,
        });
        let observers = match (&runtime, config.dispatch) {
            (Some(handle), Dispatch::Background) => {
                let queue = spawn_dispatcher(handle, callbacks.clone());
                Observers::queued(callbacks, queue)
            }
            _ => Observers::inline(callbacks),
        };

        let store = Arc::new(Store::new(observers, config.evict_on_flush));

        let evictor = match runtime {
            Some(handle) if !config.evict_interval.is_zero() => Some(Evictor::start(
                &handle,
                store.clone(),
                config.evict_interval,
            )),
            _ => None,
        };

        let evict_interval_ms =
            u64::try_from(config.evict_interval.as_millis()).unwrap_or(u64::MAX);
        debug!(
            evict_interval_ms,
            dispatch = ?config.dispatch,
            "Cache created"
        );

        Ok(Self { store, evictor })
    }

    // == Add ==
    /// Adds an entry only if no live entry exists for `key`.
    ///
    /// A stale entry counts as absent and is replaced. A zero `ttl` means
    /// the entry never expires. The existence check does not fire `on_miss`
    /// or `on_hit`.
    ///
    /// # Errors
    /// `CacheError::KeyExists` if a live entry is present; the cache is left
    /// unchanged.
    pub fn add(&self, key: impl Into<String>, value: V, ttl: Duration) -> Result<()> {
        self.store.add(key.into(), value, ttl)
    }

    // == Set ==
    /// Stores an entry, replacing any existing one. A zero `ttl` means the
    /// entry never expires.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.store.set(key.into(), value, ttl);
    }

    // == Get ==
    /// Returns the value for `key` if a live entry exists.
    ///
    /// Fires `on_hit` on success and `on_miss` when the key is absent or
    /// stale. Stale entries are left in place for the evictor.
    pub fn get(&self, key: &str) -> Option<V> {
        self.store.get(key)
    }

    // == Delete ==
    /// Removes the entry for `key`, firing `on_evict` if one existed.
    /// Deleting an absent key does nothing.
    pub fn delete(&self, key: &str) {
        self.store.delete(key);
    }

    // == Flush ==
    /// Removes all entries. Use with caution.
    ///
    /// `on_evict` is not fired for the discarded entries unless
    /// `Config::evict_on_flush` is set. A `set` running concurrently with a
    /// flush may or may not survive it.
    pub fn flush(&self) {
        self.store.flush();
    }

    // == Close ==
    /// Stops the background evictor. Safe to call more than once; the cache
    /// stays usable with passive expiry only.
    pub fn close(&self) {
        if let Some(evictor) = &self.evictor {
            evictor.stop();
        }
    }

    /// Returns true while the background evictor task is running.
    pub fn is_evicting(&self) -> bool {
        self.evictor
            .as_ref()
            .is_some_and(|evictor| !evictor.is_finished())
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    // == Length ==
    /// Returns the number of stored entries, including stale entries that
    /// have not been swept yet.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    // == Is Empty ==
    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub(crate) fn contains_raw(&self, key: &str) -> bool {
        self.store.contains_raw(key)
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("evictor", &self.evictor.is_some())
            .finish_non_exhaustive()
    }
}
