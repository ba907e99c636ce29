//! Key namespacing middleware.
//!
//! [`KeyPrefixMiddleware`] lets several logical caches share one pool by
//! prefixing every key it sees on fetch and delete. Saves need no rewriting:
//! items obtained through a prefixed fetch already carry the prefixed key.

use std::sync::Arc;

use crate::item::{CacheError, CacheItem};

use super::{DeleteMiddleware, DeleteNext, GetMiddleware, GetNext, Middleware};

/// Rewrites `key` to `<prefix><separator><key>` before delegating.
///
/// Implements the fetch and delete capabilities only.
///
/// # Examples
///
/// ```
/// use cache_middleware::middleware::KeyPrefixMiddleware;
///
/// let prefix = KeyPrefixMiddleware::new("users").separator("_");
/// assert_eq!(prefix.apply("42"), "users_42");
/// ```
#[derive(Debug, Clone)]
pub struct KeyPrefixMiddleware {
    prefix: String,
    separator: String,
}

impl KeyPrefixMiddleware {
    /// Creates a prefixer with the default `.` separator.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: ".".to_owned(),
        }
    }

    /// Replaces the separator placed between prefix and key.
    ///
    /// Note that most pools reject keys containing `{}()/\@:`.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Returns the namespaced form of `key`.
    pub fn apply(&self, key: &str) -> String {
        format!("{}{}{}", self.prefix, self.separator, key)
    }
}

impl GetMiddleware for KeyPrefixMiddleware {
    fn process_get(&self, key: String, next: &mut GetNext<'_>) -> Result<CacheItem, CacheError> {
        next.handle(self.apply(&key))
    }
}

impl DeleteMiddleware for KeyPrefixMiddleware {
    fn process_delete(&self, key: String, next: &mut DeleteNext<'_>) -> Result<bool, CacheError> {
        next.handle(self.apply(&key))
    }
}

impl Middleware for KeyPrefixMiddleware {
    fn as_get(self: Arc<Self>) -> Option<Arc<dyn GetMiddleware>> {
        Some(self)
    }

    fn as_delete(self: Arc<Self>) -> Option<Arc<dyn DeleteMiddleware>> {
        Some(self)
    }
}
