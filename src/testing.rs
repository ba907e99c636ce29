//! In-memory pools for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::item::{CacheError, CacheItem, validate_key};
use crate::pool::CacheItemPool;

/// HashMap-backed pool with a deferred queue.
///
/// Deferred items holding a value are visible to reads before `commit`.
#[derive(Debug, Default)]
pub struct ArrayPool {
    items: HashMap<String, Value>,
    deferred: IndexMap<String, CacheItem>,
    /// Exposed to check that non-contract members are reachable through the decorator.
    pub public_param: String,
}

impl ArrayPool {
    pub fn new() -> Self {
        Self {
            public_param: "public value".to_owned(),
            ..Self::default()
        }
    }

    pub fn public_function(&self, value: &str) -> String {
        format!("public function value {value}")
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Stores `value` under `key` directly, bypassing any middleware.
    pub fn put(&mut self, key: &str, value: impl Into<Value>) {
        self.items.insert(key.to_owned(), value.into());
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.items.get(key).and_then(Value::as_str)
    }
}

impl CacheItemPool for ArrayPool {
    fn get_item(&self, key: &str) -> Result<CacheItem, CacheError> {
        validate_key(key)?;
        if let Some(value) = self.deferred.get(key).and_then(CacheItem::value) {
            return Ok(CacheItem::hit(key, value.clone()));
        }
        Ok(match self.items.get(key) {
            Some(value) => CacheItem::hit(key, value.clone()),
            None => CacheItem::miss(key),
        })
    }

    fn has_item(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get_item(key)?.is_hit())
    }

    fn clear(&mut self) -> bool {
        self.items.clear();
        self.deferred.clear();
        true
    }

    fn delete_item(&mut self, key: &str) -> Result<bool, CacheError> {
        validate_key(key)?;
        self.deferred.shift_remove(key);
        self.items.remove(key);
        Ok(true)
    }

    fn save(&mut self, item: CacheItem) -> bool {
        if validate_key(item.key()).is_err() {
            return false;
        }
        let key = item.key().to_owned();
        let value = item.into_value().unwrap_or(Value::Null);
        self.items.insert(key, value);
        true
    }

    fn save_deferred(&mut self, item: CacheItem) -> bool {
        if validate_key(item.key()).is_err() {
            return false;
        }
        self.deferred.insert(item.key().to_owned(), item);
        true
    }

    fn commit(&mut self) -> bool {
        let deferred = std::mem::take(&mut self.deferred);
        deferred
            .into_values()
            .fold(true, |committed, item| self.save(item) && committed)
    }
}

/// Mock pool that records the keys it receives and returns scripted results.
#[derive(Debug, Default)]
pub struct RecordingPool {
    fetched: RefCell<Vec<String>>,
    deleted: Vec<String>,
    saved: Vec<CacheItem>,
    delete_results: HashMap<String, bool>,
    bulk_calls: RefCell<usize>,
}

impl RecordingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the result of deleting `key`; unscripted deletes succeed.
    #[must_use]
    pub fn delete_result(mut self, key: &str, result: bool) -> Self {
        self.delete_results.insert(key.to_owned(), result);
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    pub fn deleted(&self) -> Vec<&str> {
        self.deleted.iter().map(String::as_str).collect()
    }

    pub fn saved(&self) -> &[CacheItem] {
        &self.saved
    }

    pub fn bulk_calls(&self) -> usize {
        *self.bulk_calls.borrow()
    }
}

impl CacheItemPool for RecordingPool {
    fn get_item(&self, key: &str) -> Result<CacheItem, CacheError> {
        self.fetched.borrow_mut().push(key.to_owned());
        Ok(CacheItem::hit(key, key))
    }

    fn get_items(&self, keys: &[&str]) -> Result<IndexMap<String, CacheItem>, CacheError> {
        *self.bulk_calls.borrow_mut() += 1;
        Ok(keys
            .iter()
            .map(|&key| (key.to_owned(), CacheItem::hit(key, key)))
            .collect())
    }

    fn has_item(&self, _key: &str) -> Result<bool, CacheError> {
        Ok(false)
    }

    fn clear(&mut self) -> bool {
        true
    }

    fn delete_item(&mut self, key: &str) -> Result<bool, CacheError> {
        self.deleted.push(key.to_owned());
        Ok(self.delete_results.get(key).copied().unwrap_or(true))
    }

    fn delete_items(&mut self, _keys: &[&str]) -> Result<bool, CacheError> {
        *self.bulk_calls.borrow_mut() += 1;
        Ok(true)
    }

    fn save(&mut self, item: CacheItem) -> bool {
        self.saved.push(item);
        true
    }

    fn save_deferred(&mut self, item: CacheItem) -> bool {
        self.saved.push(item);
        true
    }

    fn commit(&mut self) -> bool {
        true
    }
}
