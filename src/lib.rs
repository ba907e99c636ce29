//! # cache-middleware
//!
//! Ordered middleware chains around the fetch, save and delete operations of a
//! key-value cache item pool.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cache_middleware::{CacheItemPool, MiddlewareDecorator};
//! use cache_middleware::middleware::{KeyPrefixMiddleware, LoggerMiddleware};
//!
//! fn wrap<P: CacheItemPool>(pool: P) -> Result<MiddlewareDecorator<P>, Box<dyn std::error::Error>> {
//!     let mut cache = MiddlewareDecorator::new(pool);
//!     cache
//!         .add(LoggerMiddleware)?
//!         .add(KeyPrefixMiddleware::new("sessions"))?;
//!     Ok(cache)
//! }
//! ```

// ── Core ──────────────────────────────────────────────────────────────────────
pub mod chain;
pub mod decorator;
pub mod middleware;

// ── Pool contract ─────────────────────────────────────────────────────────────
pub mod item;
pub mod pool;

#[cfg(test)]
mod testing;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use chain::Chain;
pub use decorator::{Capability, MiddlewareDecorator, MiddlewareError};
pub use item::{CacheError, CacheItem};
pub use middleware::{DeleteMiddleware, GetMiddleware, Middleware, SaveMiddleware};
pub use pool::CacheItemPool;
