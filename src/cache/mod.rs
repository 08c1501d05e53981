//! Cache Module
//!
//! Provides a concurrent in-memory cache with per-entry TTL, passive expiry
//! on read and optional active eviction in the background.

mod entry;
pub(crate) mod observer;
mod stats;
pub(crate) mod store;
mod ttl_cache;


// Re-export public types
pub use entry::Entry;
pub use stats::CacheStats;
pub use ttl_cache::Cache;
