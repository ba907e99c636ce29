//! Wraps a HashMap-backed pool with logging and key namespacing.
//!
//! Run with `RUST_LOG=debug cargo run --example key_prefix`.

use std::collections::HashMap;

use cache_middleware::item::validate_key;
use cache_middleware::middleware::{KeyPrefixMiddleware, LoggerMiddleware};
use cache_middleware::{CacheError, CacheItem, CacheItemPool, MiddlewareDecorator};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct MemoryPool {
    items: HashMap<String, Value>,
    deferred: Vec<CacheItem>,
}

impl MemoryPool {
    fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.items.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl CacheItemPool for MemoryPool {
    fn get_item(&self, key: &str) -> Result<CacheItem, CacheError> {
        validate_key(key)?;
        Ok(match self.items.get(key) {
            Some(value) => CacheItem::hit(key, value.clone()),
            None => CacheItem::miss(key),
        })
    }

    fn has_item(&self, key: &str) -> Result<bool, CacheError> {
        validate_key(key)?;
        Ok(self.items.contains_key(key))
    }

    fn clear(&mut self) -> bool {
        self.items.clear();
        self.deferred.clear();
        true
    }

    fn delete_item(&mut self, key: &str) -> Result<bool, CacheError> {
        validate_key(key)?;
        Ok(self.items.remove(key).is_some())
    }

    fn save(&mut self, item: CacheItem) -> bool {
        let key = item.key().to_owned();
        let value = item.into_value().unwrap_or(Value::Null);
        self.items.insert(key, value);
        true
    }

    fn save_deferred(&mut self, item: CacheItem) -> bool {
        self.deferred.push(item);
        true
    }

    fn commit(&mut self) -> bool {
        let deferred = std::mem::take(&mut self.deferred);
        deferred
            .into_iter()
            .fold(true, |committed, item| self.save(item) && committed)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut cache = MiddlewareDecorator::new(MemoryPool::default());
    cache
        .add(LoggerMiddleware)?
        .add(KeyPrefixMiddleware::new("users"))?;

    let mut ada = cache.get_item("ada")?;
    ada.set("Ada Lovelace");
    cache.save(ada);

    let mut alan = cache.get_item("alan")?;
    alan.set("Alan Turing");
    cache.save_deferred(alan);
    cache.commit();

    let items = cache.get_items(&["ada", "alan", "grace"])?;
    for (key, item) in &items {
        println!("{key}: {:?} (hit: {})", item.value(), item.is_hit());
    }

    println!("stored keys: {:?}", cache.keys());

    let removed = cache.delete_items(&["ada", "grace"])?;
    println!("all deleted: {removed}");

    if let Err(e) = cache.get_item("bad:key") {
        println!("rejected: {e}");
    }

    Ok(())
}
