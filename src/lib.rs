//! ncache - A thread-safe in-process key-value cache
//!
//! Provides per-entry TTL expiration, passive expiry on read, optional
//! background eviction of stale entries and hit/miss/evict observers.

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{Cache, CacheStats, Entry};
pub use config::{Config, Dispatch, EvictCallback, HitCallback, MissCallback};
pub use error::{CacheError, Result};
