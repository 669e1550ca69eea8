// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The key/value contract shared by backing stores, upstream sources and decorators.
//!
//! [`CacheStore`] is deliberately small: single and batched reads, writes with an optional
//! ttl, existence checks and deletes. Every decorator in `freshet` both consumes and
//! implements it, so they stack in any order.

use std::{collections::HashMap, hash::Hash};

use crate::{Result, Ttl};

/// Trait for key/value cache implementations.
///
/// Only `get`, `set`, `delete` and `clear` are required. The batched operations default to
/// looping over their single-key counterparts; stores with native batching should override
/// them.
///
/// Boolean results report whether the store accepted the operation, matching the
/// success flags of typical cache backends. Failures that the caller should see are
/// returned as [`Error`](crate::Error).
pub trait CacheStore<K, V>: Send + Sync {
    /// Reads a value, returning `None` when the key is absent.
    fn get(&self, key: &K) -> impl Future<Output = Result<Option<V>>> + Send;

    /// Writes a value with an optional ttl. `None` leaves expiry to the store.
    fn set(&self, key: &K, value: V, ttl: Option<Ttl>) -> impl Future<Output = Result<bool>> + Send;

    /// Deletes a key.
    fn delete(&self, key: &K) -> impl Future<Output = Result<bool>> + Send;

    /// Removes every entry.
    fn clear(&self) -> impl Future<Output = Result<bool>> + Send;

    /// Reads many values at once.
    ///
    /// The returned map contains exactly one entry per distinct requested key, with `None`
    /// for absent keys.
    fn get_many(&self, keys: &[K]) -> impl Future<Output = Result<HashMap<K, Option<V>>>> + Send
    where
        K: Clone + Eq + Hash + Send + Sync,
        V: Send,
    {
        async move {
            let mut values = HashMap::with_capacity(keys.len());
            for key in keys {
                let value = self.get(key).await?;
                values.insert(key.clone(), value);
            }
            Ok(values)
        }
    }

    /// Writes many values sharing one ttl. Returns `true` only if every write succeeded.
    fn set_many(&self, values: HashMap<K, V>, ttl: Option<Ttl>) -> impl Future<Output = Result<bool>> + Send
    where
        K: Send + Sync,
        V: Send,
    {
        async move {
            let mut all_set = true;
            for (key, value) in values {
                all_set &= self.set(&key, value, ttl).await?;
            }
            Ok(all_set)
        }
    }

    /// Returns `true` if the key is present.
    fn has(&self, key: &K) -> impl Future<Output = Result<bool>> + Send
    where
        K: Sync,
        V: Send,
    {
        async move { Ok(self.get(key).await?.is_some()) }
    }

    /// Deletes many keys. Returns `true` only if every delete succeeded.
    fn delete_many(&self, keys: &[K]) -> impl Future<Output = Result<bool>> + Send
    where
        K: Sync,
    {
        async move {
            let mut all_deleted = true;
            for key in keys {
                all_deleted &= self.delete(key).await?;
            }
            Ok(all_deleted)
        }
    }

    /// Reads a value, falling back to `default` when the key is absent.
    fn get_or(&self, key: &K, default: V) -> impl Future<Output = Result<V>> + Send
    where
        K: Sync,
        V: Send,
    {
        async move { Ok(self.get(key).await?.unwrap_or(default)) }
    }

    /// Reads many values, substituting `default` for every absent key.
    fn get_many_or(&self, keys: &[K], default: V) -> impl Future<Output = Result<HashMap<K, V>>> + Send
    where
        K: Clone + Eq + Hash + Send + Sync,
        V: Clone + Send + Sync,
    {
        async move {
            let values = self.get_many(keys).await?;
            Ok(values
                .into_iter()
                .map(|(key, value)| (key, value.unwrap_or_else(|| default.clone())))
                .collect())
        }
    }

    /// Returns the number of entries, if supported.
    ///
    /// Returns `None` for implementations that don't track size.
    fn len(&self) -> Option<u64> {
        None
    }

    /// Returns `true` if the store contains no entries.
    ///
    /// Returns `None` for implementations that don't track size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}
