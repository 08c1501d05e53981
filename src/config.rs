//! Configuration Module
//!
//! Construction-time settings for a [`Cache`](crate::Cache): the background
//! eviction interval and the optional observer callbacks.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Callback fired when an entry is removed by `delete` or the evictor.
pub type EvictCallback<V> = Arc<dyn Fn(&str, &V) + Send + Sync>;

/// Callback fired when `get` finds a live entry.
pub type HitCallback<V> = Arc<dyn Fn(&str, &V) + Send + Sync>;

/// Callback fired when `get` finds nothing, or only a stale entry.
pub type MissCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// How observer callbacks are delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dispatch {
    /// Run callbacks synchronously on the calling thread (or the sweep task).
    /// A slow callback slows down the operation that fired it.
    #[default]
    Inline,
    /// Queue callbacks to a dedicated Tokio task which runs them in order.
    /// Requires a Tokio runtime at construction.
    Background,
}

/// Cache configuration.
///
/// Every field is optional; `Config::default()` gives a cache with no
/// background eviction and no observers.
pub struct Config<V> {
    /// Interval between background sweeps of stale entries. Zero disables
    /// the evictor.
    pub evict_interval: Duration,
    /// Optional callback when entries are evicted or deleted
    pub on_evict: Option<EvictCallback<V>>,
    /// Optional callback when an entry is found
    pub on_hit: Option<HitCallback<V>>,
    /// Optional callback when an entry is not found
    pub on_miss: Option<MissCallback>,
    /// Fire `on_evict` for every entry discarded by `flush`
    pub evict_on_flush: bool,
    /// Callback delivery mode
    pub dispatch: Dispatch,
}

impl<V> Config<V> {
    /// Creates a configuration with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the background eviction interval.
    pub fn with_evict_interval(mut self, interval: Duration) -> Self {
        self.evict_interval = interval;
        self
    }

    /// Sets the eviction callback.
    pub fn on_evict<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &V) + Send + Sync + 'static,
    {
        self.on_evict = Some(Arc::new(f));
        self
    }

    /// Sets the hit callback.
    pub fn on_hit<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &V) + Send + Sync + 'static,
    {
        self.on_hit = Some(Arc::new(f));
        self
    }

    /// Sets the miss callback.
    pub fn on_miss<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_miss = Some(Arc::new(f));
        self
    }

    /// Controls whether `flush` reports discarded entries to `on_evict`.
    pub fn with_evict_on_flush(mut self, enabled: bool) -> Self {
        self.evict_on_flush = enabled;
        self
    }

    /// Sets the callback delivery mode.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Returns true if a background task must be spawned for this config.
    pub(crate) fn needs_runtime(&self) -> bool {
        !self.evict_interval.is_zero() || self.dispatch == Dispatch::Background
    }
}

impl<V> Default for Config<V> {
    fn default() -> Self {
        Self {
            evict_interval: Duration::ZERO,
            on_evict: None,
            on_hit: None,
            on_miss: None,
            evict_on_flush: false,
            dispatch: Dispatch::Inline,
        }
    }
}

impl<V> Clone for Config<V> {
    fn clone(&self) -> Self {
        Self {
            evict_interval: self.evict_interval,
            on_evict: self.on_evict.clone(),
            on_hit: self.on_hit.clone(),
            on_miss: self.on_miss.clone(),
            evict_on_flush: self.evict_on_flush,
            dispatch: self.dispatch,
        }
    }
}

impl<V> fmt::Debug for Config<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("evict_interval", &self.evict_interval)
            .field("on_evict", &self.on_evict.is_some())
            .field("on_hit", &self.on_hit.is_some())
            .field("on_miss", &self.on_miss.is_some())
            .field("evict_on_flush", &self.evict_on_flush)
            .field("dispatch", &self.dispatch)
            .finish()
    }
}
