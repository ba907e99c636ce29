//! Middleware decorator — a drop-in [`CacheItemPool`] with interceptor chains.
//!
//! [`MiddlewareDecorator`] owns the wrapped pool and one ordered interceptor
//! list per [`Capability`]. Every intercepted call builds a fresh
//! [`Chain`] over the matching list with the pool's native method as terminal
//! action:
//!
//! | Operation                         | Interceptors                  | Terminal action          |
//! |-----------------------------------|-------------------------------|--------------------------|
//! | [`get_item`](MiddlewareDecorator::get_item)           | [`GetMiddleware`]    | `pool.get_item`      |
//! | [`save`](MiddlewareDecorator::save)                   | [`SaveMiddleware`]   | `pool.save`          |
//! | [`save_deferred`](MiddlewareDecorator::save_deferred) | [`SaveMiddleware`]   | `pool.save_deferred` |
//! | [`delete_item`](MiddlewareDecorator::delete_item)     | [`DeleteMiddleware`] | `pool.delete_item`   |
//!
//! `get_items` and `delete_items` never reach the pool's bulk methods: every key
//! runs through its own chain so each one stays interceptable. `has_item`,
//! `clear` and `commit` have no interception point. Anything outside the pool
//! contract is reached through `Deref`/`DerefMut` to the wrapped pool.
//!
//! Registration is expected to finish before the decorator is shared; the
//! interceptor lists are only read while operations run.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::chain::Chain;
use crate::item::{CacheError, CacheItem};
use crate::middleware::{
    DeleteMiddleware, DeleteNext, GetMiddleware, GetNext, Middleware, SaveMiddleware, SaveNext,
};
use crate::pool::CacheItemPool;

/// Errors produced while registering middleware.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiddlewareError {
    #[error("Middleware \"{name}\" should implement one of the middleware capabilities.")]
    InvalidMiddleware { name: String },
}

/// The interception points a middleware can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Get,
    Save,
    Delete,
}

impl Capability {
    /// Returns the lowercase name used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Save => "save",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wraps a [`CacheItemPool`] and runs registered middleware around its
/// fetch, save and delete operations.
///
/// # Examples
///
/// ```rust,no_run
/// use cache_middleware::{CacheItemPool, MiddlewareDecorator};
/// use cache_middleware::middleware::{KeyPrefixMiddleware, LoggerMiddleware};
///
/// # fn example<P: CacheItemPool>(pool: P) -> Result<(), Box<dyn std::error::Error>> {
/// let mut cache = MiddlewareDecorator::new(pool);
/// cache
///     .add(LoggerMiddleware)?
///     .add(KeyPrefixMiddleware::new("users"))?;
///
/// let mut item = cache.get_item("42")?; // pool sees "users.42"
/// item.set("Ada");
/// cache.save(item);
/// # Ok(())
/// # }
/// ```
pub struct MiddlewareDecorator<P> {
    pool: P,
    get: Vec<Arc<dyn GetMiddleware>>,
    save: Vec<Arc<dyn SaveMiddleware>>,
    delete: Vec<Arc<dyn DeleteMiddleware>>,
}

impl<P> MiddlewareDecorator<P> {
    /// Wraps `pool` with no middleware registered.
    pub fn new(pool: P) -> Self {
        Self {
            pool,
            get: Vec::new(),
            save: Vec::new(),
            delete: Vec::new(),
        }
    }

    /// Wraps `pool` and registers `middleware` in order.
    ///
    /// # Errors
    ///
    /// Returns [`MiddlewareError::InvalidMiddleware`] for the first entry that
    /// implements no capability.
    pub fn with_middleware<I>(pool: P, middleware: I) -> Result<Self, MiddlewareError>
    where
        I: IntoIterator<Item = Arc<dyn Middleware>>,
    {
        let mut decorator = Self::new(pool);
        decorator.add_middleware(middleware)?;
        Ok(decorator)
    }

    /// Registers each middleware under every capability it implements.
    ///
    /// Middleware keep their overall registration order within each capability
    /// list. Entries processed before a rejected one stay registered.
    ///
    /// # Errors
    ///
    /// Returns [`MiddlewareError::InvalidMiddleware`], naming the entry, when a
    /// middleware implements none of the capabilities.
    pub fn add_middleware<I>(&mut self, middleware: I) -> Result<&mut Self, MiddlewareError>
    where
        I: IntoIterator<Item = Arc<dyn Middleware>>,
    {
        for item in middleware {
            let mut capabilities = Vec::with_capacity(3);

            if let Some(get) = Arc::clone(&item).as_get() {
                self.get.push(get);
                capabilities.push(Capability::Get);
            }
            if let Some(save) = Arc::clone(&item).as_save() {
                self.save.push(save);
                capabilities.push(Capability::Save);
            }
            if let Some(delete) = Arc::clone(&item).as_delete() {
                self.delete.push(delete);
                capabilities.push(Capability::Delete);
            }

            let name = item.name();
            if capabilities.is_empty() {
                warn!(middleware = %name, "rejected middleware without capabilities");
                return Err(MiddlewareError::InvalidMiddleware { name });
            }

            debug!(middleware = %name, ?capabilities, "registered middleware");
        }

        Ok(self)
    }

    /// Registers a single middleware. See [`add_middleware`](Self::add_middleware).
    ///
    /// # Errors
    ///
    /// Returns [`MiddlewareError::InvalidMiddleware`] if `middleware` implements
    /// no capability.
    pub fn add<M>(&mut self, middleware: M) -> Result<&mut Self, MiddlewareError>
    where
        M: Middleware + 'static,
    {
        let middleware: Arc<dyn Middleware> = Arc::new(middleware);
        self.add_middleware([middleware])
    }

    /// Number of middleware registered for `capability`.
    pub fn middleware_count(&self, capability: Capability) -> usize {
        match capability {
            Capability::Get => self.get.len(),
            Capability::Save => self.save.len(),
            Capability::Delete => self.delete.len(),
        }
    }

    /// Returns `true` if no middleware is registered for any capability.
    pub fn is_empty(&self) -> bool {
        self.get.is_empty() && self.save.is_empty() && self.delete.is_empty()
    }

    /// Borrows the wrapped pool.
    pub fn inner(&self) -> &P {
        &self.pool
    }

    /// Mutably borrows the wrapped pool.
    ///
    /// Calls made through the returned reference skip every middleware.
    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.pool
    }

    /// Unwraps the decorator, dropping its middleware.
    pub fn into_inner(self) -> P {
        self.pool
    }
}

impl<P: CacheItemPool> MiddlewareDecorator<P> {
    /// Fetches `key` through the get middleware, then the pool.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidKey`] from the pool or any middleware, unchanged.
    pub fn get_item(&self, key: &str) -> Result<CacheItem, CacheError> {
        debug!(key, "get_item");
        let pool = &self.pool;
        let mut chain: GetNext<'_> = Chain::new(
            &self.get,
            |middleware, key, next| middleware.process_get(key, next),
            Box::new(move |key: String| pool.get_item(&key)),
        );
        chain.handle(key.to_owned())
    }

    /// Fetches each key through its own [`get_item`](Self::get_item) chain.
    ///
    /// Results are keyed by the requested keys, in request order, whatever keys
    /// the middleware forwarded to the pool. The pool's own `get_items` is
    /// never called.
    ///
    /// # Errors
    ///
    /// Stops at the first [`CacheError`].
    pub fn get_items(&self, keys: &[&str]) -> Result<IndexMap<String, CacheItem>, CacheError> {
        let mut items = IndexMap::with_capacity(keys.len());
        for &key in keys {
            items.insert(key.to_owned(), self.get_item(key)?);
        }
        Ok(items)
    }

    /// Saves `item` through the save middleware, then `pool.save`.
    pub fn save(&mut self, item: CacheItem) -> bool {
        debug!(key = item.key(), "save");
        let pool = &mut self.pool;
        let mut chain: SaveNext<'_> = Chain::new(
            &self.save,
            |middleware, item, next| middleware.process_save(item, next),
            Box::new(move |item: CacheItem| pool.save(item)),
        );
        chain.handle(item)
    }

    /// Saves `item` through the save middleware, then `pool.save_deferred`.
    pub fn save_deferred(&mut self, item: CacheItem) -> bool {
        debug!(key = item.key(), "save_deferred");
        let pool = &mut self.pool;
        let mut chain: SaveNext<'_> = Chain::new(
            &self.save,
            |middleware, item, next| middleware.process_save(item, next),
            Box::new(move |item: CacheItem| pool.save_deferred(item)),
        );
        chain.handle(item)
    }

    /// Deletes `key` through the delete middleware, then the pool.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidKey`] from the pool or any middleware, unchanged.
    pub fn delete_item(&mut self, key: &str) -> Result<bool, CacheError> {
        debug!(key, "delete_item");
        let pool = &mut self.pool;
        let mut chain: DeleteNext<'_> = Chain::new(
            &self.delete,
            |middleware, key, next| middleware.process_delete(key, next),
            Box::new(move |key: String| pool.delete_item(&key)),
        );
        chain.handle(key.to_owned())
    }

    /// Deletes each key through its own [`delete_item`](Self::delete_item) chain.
    ///
    /// Every key is attempted even after a failed delete; the result is `true`
    /// only if all of them succeeded. The pool's own `delete_items` is never
    /// called.
    ///
    /// # Errors
    ///
    /// Stops at the first [`CacheError`].
    pub fn delete_items(&mut self, keys: &[&str]) -> Result<bool, CacheError> {
        let mut deleted = true;
        for &key in keys {
            if !self.delete_item(key)? {
                deleted = false;
            }
        }
        Ok(deleted)
    }

    /// Forwards to the pool; no middleware runs.
    pub fn has_item(&self, key: &str) -> Result<bool, CacheError> {
        self.pool.has_item(key)
    }

    /// Forwards to the pool; no middleware runs.
    pub fn clear(&mut self) -> bool {
        self.pool.clear()
    }

    /// Forwards to the pool; no middleware runs.
    pub fn commit(&mut self) -> bool {
        self.pool.commit()
    }
}

impl<P: CacheItemPool> CacheItemPool for MiddlewareDecorator<P> {
    fn get_item(&self, key: &str) -> Result<CacheItem, CacheError> {
        MiddlewareDecorator::get_item(self, key)
    }

    fn get_items(&self, keys: &[&str]) -> Result<IndexMap<String, CacheItem>, CacheError> {
        MiddlewareDecorator::get_items(self, keys)
    }

    fn has_item(&self, key: &str) -> Result<bool, CacheError> {
        MiddlewareDecorator::has_item(self, key)
    }

    fn clear(&mut self) -> bool {
        MiddlewareDecorator::clear(self)
    }

    fn delete_item(&mut self, key: &str) -> Result<bool, CacheError> {
        MiddlewareDecorator::delete_item(self, key)
    }

    fn delete_items(&mut self, keys: &[&str]) -> Result<bool, CacheError> {
        MiddlewareDecorator::delete_items(self, keys)
    }

    fn save(&mut self, item: CacheItem) -> bool {
        MiddlewareDecorator::save(self, item)
    }

    fn save_deferred(&mut self, item: CacheItem) -> bool {
        MiddlewareDecorator::save_deferred(self, item)
    }

    fn commit(&mut self) -> bool {
        MiddlewareDecorator::commit(self)
    }
}

impl<P> Deref for MiddlewareDecorator<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.pool
    }
}

impl<P> DerefMut for MiddlewareDecorator<P> {
    fn deref_mut(&mut self) -> &mut P {
        &mut self.pool
    }
}

impl<P: fmt::Debug> fmt::Debug for MiddlewareDecorator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareDecorator")
            .field("pool", &self.pool)
            .field("get", &self.get.len())
            .field("save", &self.save.len())
            .field("delete", &self.delete.len())
            .finish()
    }
}
