//! Middleware capabilities — the three interception points of a cache pool.
//!
//! An interceptor implements any non-empty subset of:
//!
//! - [`GetMiddleware`] — wraps fetching an item by key.
//! - [`SaveMiddleware`] — wraps both immediate and deferred saves.
//! - [`DeleteMiddleware`] — wraps deleting an item by key.
//!
//! and advertises which ones through [`Middleware`], the registration surface
//! used by [`MiddlewareDecorator::add_middleware`]. Each capability method
//! receives the chain itself as `next`; calling [`Chain::handle`] delegates to
//! the remaining interceptors and finally to the wrapped pool.
//!
//! Built-in interceptors:
//!
//! - [`LoggerMiddleware`] — logs every operation with its outcome and duration.
//! - [`KeyPrefixMiddleware`] — namespaces keys on fetch and delete.
//!
//! [`MiddlewareDecorator::add_middleware`]: crate::decorator::MiddlewareDecorator::add_middleware

use std::sync::Arc;
use std::time::Instant;

use crate::chain::Chain;
use crate::item::{CacheError, CacheItem};

pub mod prefix;

pub use prefix::KeyPrefixMiddleware;

/// Continuation handed to [`GetMiddleware::process_get`].
pub type GetNext<'a> = Chain<'a, dyn GetMiddleware, String, Result<CacheItem, CacheError>>;

/// Continuation handed to [`SaveMiddleware::process_save`].
pub type SaveNext<'a> = Chain<'a, dyn SaveMiddleware, CacheItem, bool>;

/// Continuation handed to [`DeleteMiddleware::process_delete`].
pub type DeleteNext<'a> = Chain<'a, dyn DeleteMiddleware, String, Result<bool, CacheError>>;

/// Intercepts fetching a single item.
pub trait GetMiddleware: Send + Sync {
    /// Returns the item for `key`, usually by calling `next.handle(key)`.
    ///
    /// The key passed on may differ from the one received, and the returned
    /// item may be modified or replaced. Returning without calling `next`
    /// skips the remaining interceptors and the pool.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidKey`] if the key is not a legal value, raised here
    /// or passed up unchanged from further down the chain.
    fn process_get(&self, key: String, next: &mut GetNext<'_>) -> Result<CacheItem, CacheError>;
}

/// Intercepts saving an item, whether immediate or deferred.
pub trait SaveMiddleware: Send + Sync {
    /// Returns whether the item was persisted (or queued, for deferred saves).
    fn process_save(&self, item: CacheItem, next: &mut SaveNext<'_>) -> bool;
}

/// Intercepts deleting a single item.
pub trait DeleteMiddleware: Send + Sync {
    /// Returns whether the item was removed; `false` signals a pool failure.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidKey`] if the key is not a legal value.
    fn process_delete(&self, key: String, next: &mut DeleteNext<'_>) -> Result<bool, CacheError>;
}

/// Registration surface: reports which capabilities an interceptor implements.
///
/// Each probe defaults to `None`. Override the ones the type supports so the
/// decorator can file it under every matching capability:
///
/// ```
/// use std::sync::Arc;
/// use cache_middleware::middleware::{DeleteMiddleware, DeleteNext, Middleware};
/// use cache_middleware::CacheError;
///
/// struct DenyDeletes;
///
/// impl DeleteMiddleware for DenyDeletes {
///     fn process_delete(&self, _key: String, _next: &mut DeleteNext<'_>) -> Result<bool, CacheError> {
///         Ok(false)
///     }
/// }
///
/// impl Middleware for DenyDeletes {
///     fn as_delete(self: Arc<Self>) -> Option<Arc<dyn DeleteMiddleware>> {
///         Some(self)
///     }
/// }
/// ```
pub trait Middleware: Send + Sync {
    /// Returns `self` as a fetch interceptor, if it is one.
    ///
    /// # Returns
    ///
    /// `Some(self)` from types implementing [`GetMiddleware`], `None` otherwise.
    fn as_get(self: Arc<Self>) -> Option<Arc<dyn GetMiddleware>> {
        None
    }

    /// Returns `self` as a save interceptor, if it is one.
    ///
    /// The same entry runs for both immediate and deferred saves.
    fn as_save(self: Arc<Self>) -> Option<Arc<dyn SaveMiddleware>> {
        None
    }

    /// Returns `self` as a delete interceptor, if it is one.
    fn as_delete(self: Arc<Self>) -> Option<Arc<dyn DeleteMiddleware>> {
        None
    }

    /// Name used in registration errors. Defaults to the bare type name.
    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>()).to_owned()
    }
}

// "a::b::Foo<c::Bar>" -> "Foo"
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Built-in interceptor that logs each operation's key, outcome and duration.
///
/// Emits one `tracing::info!` line after the rest of the chain returns:
///
/// ```text
/// OPERATION key - OUTCOME (duration)
/// ```
///
/// Failed saves and deletes, and invalid keys, are logged at `warn` instead.
/// `LoggerMiddleware` never short-circuits and never changes what it forwards.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cache_middleware::middleware::{LoggerMiddleware, Middleware};
///
/// let logger: Arc<dyn Middleware> = Arc::new(LoggerMiddleware);
/// assert_eq!(logger.name(), "LoggerMiddleware");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggerMiddleware;

impl GetMiddleware for LoggerMiddleware {
    fn process_get(&self, key: String, next: &mut GetNext<'_>) -> Result<CacheItem, CacheError> {
        let start = Instant::now();
        let result = next.handle(key.clone());
        let duration = start.elapsed();

        match &result {
            Ok(item) => {
                let outcome = if item.is_hit() { "HIT" } else { "MISS" };
                tracing::info!("GET {} - {} ({:?})", key, outcome, duration);
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "GET failed"),
        }

        result
    }
}

impl SaveMiddleware for LoggerMiddleware {
    fn process_save(&self, item: CacheItem, next: &mut SaveNext<'_>) -> bool {
        let start = Instant::now();
        let key = item.key().to_owned();
        let saved = next.handle(item);
        let duration = start.elapsed();

        if saved {
            tracing::info!("SAVE {} - OK ({:?})", key, duration);
        } else {
            tracing::warn!(key = %key, "SAVE failed");
        }

        saved
    }
}

impl DeleteMiddleware for LoggerMiddleware {
    fn process_delete(&self, key: String, next: &mut DeleteNext<'_>) -> Result<bool, CacheError> {
        let start = Instant::now();
        let result = next.handle(key.clone());
        let duration = start.elapsed();

        match &result {
            Ok(true) => tracing::info!("DELETE {} - OK ({:?})", key, duration),
            Ok(false) => tracing::warn!(key = %key, "DELETE failed"),
            Err(e) => tracing::warn!(key = %key, error = %e, "DELETE failed"),
        }

        result
    }
}

impl Middleware for LoggerMiddleware {
    fn as_get(self: Arc<Self>) -> Option<Arc<dyn GetMiddleware>> {
        Some(self)
    }

    fn as_save(self: Arc<Self>) -> Option<Arc<dyn SaveMiddleware>> {
        Some(self)
    }

    fn as_delete(self: Arc<Self>) -> Option<Arc<dyn DeleteMiddleware>> {
        Some(self)
    }
}
