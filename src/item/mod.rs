//! Cache items and key validation.
//!
//! A [`CacheItem`] is owned by the wrapped pool. The middleware layer only moves
//! items through interceptor chains; it never creates or stores them itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Characters a cache key may never contain (the PSR-6 reserved set).
pub const RESERVED_KEY_CHARACTERS: &str = "{}()/\\@:";

/// Errors raised by cache pools and fetch/delete interceptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("invalid cache key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },
}

impl CacheError {
    /// Shorthand for [`CacheError::InvalidKey`].
    pub fn invalid_key(key: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason,
        }
    }
}

/// Checks `key` against the PSR-6 key rules.
///
/// A legal key is non-empty and contains none of [`RESERVED_KEY_CHARACTERS`].
///
/// # Errors
///
/// Returns [`CacheError::InvalidKey`] naming the offending key.
///
/// # Examples
///
/// ```
/// use cache_middleware::item::validate_key;
///
/// assert!(validate_key("user.42").is_ok());
/// assert!(validate_key("user:42").is_err());
/// assert!(validate_key("").is_err());
/// ```
pub fn validate_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() {
        return Err(CacheError::invalid_key(key, "key must not be empty"));
    }

    if key.chars().any(|c| RESERVED_KEY_CHARACTERS.contains(c)) {
        let reason = "key contains a reserved character";
        return Err(CacheError::invalid_key(key, reason));
    }

    Ok(())
}

/// A single cache entry: its key, an opaque value and whether the lookup hit.
///
/// # Examples
///
/// ```
/// use cache_middleware::CacheItem;
///
/// let mut item = CacheItem::miss("greeting");
/// assert!(!item.is_hit());
///
/// item.set("hello");
/// assert_eq!(item.value().and_then(|v| v.as_str()), Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheItem {
    key: String,
    value: Option<Value>,
    hit: bool,
}

impl CacheItem {
    /// An item for a key the pool does not hold.
    pub fn miss(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            hit: false,
        }
    }

    /// An item found in the pool.
    pub fn hit(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            hit: true,
        }
    }

    /// The key this item was fetched or created under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored value, or `None` for a miss that was never [`set`](Self::set).
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The value as a string slice, if it holds a JSON string.
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }

    /// Whether the pool held this key when the item was fetched.
    ///
    /// Setting a value does not turn a miss into a hit.
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Replaces the value. The hit state is left to the pool.
    pub fn set(&mut self, value: impl Into<Value>) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.set(value);
        self
    }

    /// Consumes the item, returning its value.
    pub fn into_value(self) -> Option<Value> {
        self.value
    }
}
