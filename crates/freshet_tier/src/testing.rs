// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock store implementation for testing.
//!
//! This module provides `MockStore`, a configurable in-memory store that
//! records all operations and supports failure injection for testing error paths.

use std::{collections::HashMap, hash::Hash, sync::Arc};

use parking_lot::Mutex;

use crate::{CacheStore, Error, Result, Ttl};

/// Recorded store operation with full context.
#[derive(Debug, Clone)]
pub enum StoreOp<K, V> {
    /// A single-key read.
    Get(K),
    /// A batched read of the given keys, in request order.
    GetMany(Vec<K>),
    /// A single-key write.
    Set {
        /// The key that was written.
        key: K,
        /// The value that was written.
        value: V,
        /// The ttl passed along with the write.
        ttl: Option<Ttl>,
    },
    /// A batched write.
    SetMany {
        /// The values that were written.
        values: HashMap<K, V>,
        /// The ttl shared by all values.
        ttl: Option<Ttl>,
    },
    /// An existence check.
    Has(K),
    /// A single-key delete.
    Delete(K),
    /// A batched delete.
    DeleteMany(Vec<K>),
    /// A clear operation.
    Clear,
}

impl<K, V> PartialEq for StoreOp<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Get(a), Self::Get(b)) | (Self::Has(a), Self::Has(b)) | (Self::Delete(a), Self::Delete(b)) => a == b,
            (Self::GetMany(a), Self::GetMany(b)) | (Self::DeleteMany(a), Self::DeleteMany(b)) => a == b,
            (
                Self::Set {
                    key: key_a,
                    value: value_a,
                    ttl: ttl_a,
                },
                Self::Set {
                    key: key_b,
                    value: value_b,
                    ttl: ttl_b,
                },
            ) => key_a == key_b && value_a == value_b && ttl_a == ttl_b,
            (
                Self::SetMany {
                    values: values_a,
                    ttl: ttl_a,
                },
                Self::SetMany {
                    values: values_b,
                    ttl: ttl_b,
                },
            ) => values_a == values_b && ttl_a == ttl_b,
            (Self::Clear, Self::Clear) => true,
            _ => false,
        }
    }
}

impl<K, V> Eq for StoreOp<K, V>
where
    K: Eq + Hash,
    V: Eq,
{
}

type FailPredicate<K, V> = Box<dyn Fn(&StoreOp<K, V>) -> bool + Send + Sync>;

/// A configurable mock store for testing.
///
/// This store keeps values in memory and can be configured to fail
/// operations on demand, making it useful for testing error handling paths.
/// All operations, including batched ones, are recorded as issued for later verification.
///
/// # Examples
///
/// ```
/// use freshet_tier::{CacheStore, testing::{MockStore, StoreOp}};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::<String, i32>::new();
///
/// store.set(&"key".to_string(), 42, None).await?;
/// assert_eq!(store.get(&"key".to_string()).await?, Some(42));
///
/// assert_eq!(store.operations(), vec![
///     StoreOp::Set { key: "key".to_string(), value: 42, ttl: None },
///     StoreOp::Get("key".to_string()),
/// ]);
/// # Ok::<(), freshet_tier::Error>(())
/// # });
/// ```
///
/// # Failure Injection
///
/// ```
/// use freshet_tier::{CacheStore, testing::{MockStore, StoreOp}};
///
/// # futures::executor::block_on(async {
/// let store: MockStore<String, i32> = MockStore::new();
///
/// // Fail only specific keys
/// store.fail_when(|op| matches!(op, StoreOp::Get(k) if k == "forbidden"));
/// assert!(store.get(&"forbidden".to_string()).await.is_err());
/// assert!(store.get(&"allowed".to_string()).await.is_ok());
/// # });
/// ```
pub struct MockStore<K, V> {
    data: Arc<Mutex<HashMap<K, V>>>,
    ttls: Arc<Mutex<HashMap<K, Option<Ttl>>>>,
    operations: Arc<Mutex<Vec<StoreOp<K, V>>>>,
    fail_when: Arc<Mutex<Option<FailPredicate<K, V>>>>,
}

impl<K, V> std::fmt::Debug for MockStore<K, V>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl<K, V> Clone for MockStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            ttls: Arc::clone(&self.ttls),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl<K, V> Default for MockStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MockStore<K, V> {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            ttls: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }
}

impl<K, V> MockStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates a mock store with pre-populated data.
    ///
    /// Seeding is not recorded as an operation.
    #[must_use]
    pub fn with_data(data: HashMap<K, V>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            ttls: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the number of entries in the store.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if the store contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.data.lock().contains_key(key)
    }

    /// Writes a value directly, bypassing recording and failure injection.
    pub fn seed(&self, key: K, value: V) {
        self.data.lock().insert(key, value);
    }

    /// Returns the ttl passed with the most recent write of `key`.
    ///
    /// The outer `Option` is `None` if the key was never written through the store API.
    #[must_use]
    pub fn ttl_of(&self, key: &K) -> Option<Option<Ttl>> {
        self.ttls.lock().get(key).copied()
    }
}

impl<K, V> MockStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Reads a value directly, bypassing recording and failure injection.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<V> {
        self.data.lock().get(key).cloned()
    }
}

impl<K, V> MockStore<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Sets a predicate that determines when operations should fail.
    ///
    /// The predicate receives the operation and returns `true` if it should fail.
    /// Failed operations are still recorded.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet_tier::testing::{MockStore, StoreOp};
    ///
    /// let store: MockStore<String, i32> = MockStore::new();
    ///
    /// // Fail all operations
    /// store.fail_when(|_| true);
    ///
    /// // Fail only batched reads
    /// store.fail_when(|op| matches!(op, StoreOp::GetMany(_)));
    /// ```
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp<K, V>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp<K, V>> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    /// Records `op` and returns an error if the failure predicate matches it.
    fn check(&self, op: StoreOp<K, V>, what: &'static str) -> Result<()> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        self.operations.lock().push(op);
        if fail {
            return Err(Error::store(format!("mock: {what} failed")));
        }
        Ok(())
    }
}

impl<K, V> CacheStore<K, V> for MockStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        self.check(StoreOp::Get(key.clone()), "get")?;
        Ok(self.data.lock().get(key).cloned())
    }

    async fn set(&self, key: &K, value: V, ttl: Option<Ttl>) -> Result<bool> {
        self.check(
            StoreOp::Set {
                key: key.clone(),
                value: value.clone(),
                ttl,
            },
            "set",
        )?;
        self.data.lock().insert(key.clone(), value);
        self.ttls.lock().insert(key.clone(), ttl);
        Ok(true)
    }

    async fn delete(&self, key: &K) -> Result<bool> {
        self.check(StoreOp::Delete(key.clone()), "delete")?;
        self.data.lock().remove(key);
        Ok(true)
    }

    async fn clear(&self) -> Result<bool> {
        self.check(StoreOp::Clear, "clear")?;
        self.data.lock().clear();
        Ok(true)
    }

    async fn get_many(&self, keys: &[K]) -> Result<HashMap<K, Option<V>>> {
        self.check(StoreOp::GetMany(keys.to_vec()), "get_many")?;
        let data = self.data.lock();
        Ok(keys.iter().map(|key| (key.clone(), data.get(key).cloned())).collect())
    }

    async fn set_many(&self, values: HashMap<K, V>, ttl: Option<Ttl>) -> Result<bool> {
        self.check(
            StoreOp::SetMany {
                values: values.clone(),
                ttl,
            },
            "set_many",
        )?;
        let mut ttls = self.ttls.lock();
        for key in values.keys() {
            ttls.insert(key.clone(), ttl);
        }
        self.data.lock().extend(values);
        Ok(true)
    }

    async fn has(&self, key: &K) -> Result<bool> {
        self.check(StoreOp::Has(key.clone()), "has")?;
        Ok(self.data.lock().contains_key(key))
    }

    async fn delete_many(&self, keys: &[K]) -> Result<bool> {
        self.check(StoreOp::DeleteMany(keys.to_vec()), "delete_many")?;
        let mut data = self.data.lock();
        for key in keys {
            data.remove(key);
        }
        Ok(true)
    }

    fn len(&self) -> Option<u64> {
        Some(self.data.lock().len() as u64)
    }
}
