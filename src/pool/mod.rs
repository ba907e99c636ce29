//! The cache item pool contract the middleware decorator wraps.
//!
//! Pools own their items and decide everything about persistence, expiry and
//! key legality. The decorator only adds interception points in front of them.

use indexmap::IndexMap;

use crate::item::{CacheError, CacheItem};

/// A key-value store of [`CacheItem`]s with immediate and deferred saves.
///
/// Save, delete, clear and commit report failure as `false`, never as an error.
/// Invalid keys are reported as [`CacheError::InvalidKey`].
pub trait CacheItemPool {
    /// Returns the item for `key`, a miss if the pool does not hold it.
    fn get_item(&self, key: &str) -> Result<CacheItem, CacheError>;

    /// Returns one item per requested key, in request order.
    fn get_items(&self, keys: &[&str]) -> Result<IndexMap<String, CacheItem>, CacheError> {
        let mut items = IndexMap::with_capacity(keys.len());
        for key in keys {
            items.insert((*key).to_owned(), self.get_item(key)?);
        }
        Ok(items)
    }

    fn has_item(&self, key: &str) -> Result<bool, CacheError>;

    /// Removes every item, deferred ones included.
    fn clear(&mut self) -> bool;

    fn delete_item(&mut self, key: &str) -> Result<bool, CacheError>;

    /// Deletes every key; `false` if any single delete failed.
    fn delete_items(&mut self, keys: &[&str]) -> Result<bool, CacheError> {
        let mut deleted = true;
        for key in keys {
            if !self.delete_item(key)? {
                deleted = false;
            }
        }
        Ok(deleted)
    }

    /// Persists `item` immediately.
    fn save(&mut self, item: CacheItem) -> bool;

    /// Queues `item` until the next [`commit`](Self::commit).
    fn save_deferred(&mut self, item: CacheItem) -> bool;

    /// Persists every deferred item.
    fn commit(&mut self) -> bool;
}

impl<P> CacheItemPool for Box<P>
where
    P: CacheItemPool + ?Sized,
{
    fn get_item(&self, key: &str) -> Result<CacheItem, CacheError> {
        (**self).get_item(key)
    }

    fn get_items(&self, keys: &[&str]) -> Result<IndexMap<String, CacheItem>, CacheError> {
        (**self).get_items(keys)
    }

    fn has_item(&self, key: &str) -> Result<bool, CacheError> {
        (**self).has_item(key)
    }

    fn clear(&mut self) -> bool {
        (**self).clear()
    }

    fn delete_item(&mut self, key: &str) -> Result<bool, CacheError> {
        (**self).delete_item(key)
    }

    fn delete_items(&mut self, keys: &[&str]) -> Result<bool, CacheError> {
        (**self).delete_items(keys)
    }

    fn save(&mut self, item: CacheItem) -> bool {
        (**self).save(item)
    }

    fn save_deferred(&mut self, item: CacheItem) -> bool {
        (**self).save_deferred(item)
    }

    fn commit(&mut self) -> bool {
        (**self).commit()
    }
}

impl<P> CacheItemPool for &mut P
where
    P: CacheItemPool + ?Sized,
{
    fn get_item(&self, key: &str) -> Result<CacheItem, CacheError> {
        (**self).get_item(key)
    }

    fn get_items(&self, keys: &[&str]) -> Result<IndexMap<String, CacheItem>, CacheError> {
        (**self).get_items(keys)
    }

    fn has_item(&self, key: &str) -> Result<bool, CacheError> {
        (**self).has_item(key)
    }

    fn clear(&mut self) -> bool {
        (**self).clear()
    }

    fn delete_item(&mut self, key: &str) -> Result<bool, CacheError> {
        (**self).delete_item(key)
    }

    fn delete_items(&mut self, keys: &[&str]) -> Result<bool, CacheError> {
        (**self).delete_items(keys)
    }

    fn save(&mut self, item: CacheItem) -> bool {
        (**self).save(item)
    }

    fn save_deferred(&mut self, item: CacheItem) -> bool {
        (**self).save_deferred(item)
    }

    fn commit(&mut self) -> bool {
        (**self).commit()
    }
}
