//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Absence and expiry are not errors: `Cache::get` reports them through
/// `Option`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Construction was attempted without a usable configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// `add` found a live entry for the key
    #[error("Entry {0} already exists")]
    KeyExists(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::KeyExists("a".to_string());
        assert_eq!(err.to_string(), "Entry a already exists");

        let err = CacheError::Configuration("must pass a configuration".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: must pass a configuration"
        );
    }
}
