// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{collections::HashMap, hash::Hash};

use freshet_tier::{CacheStore, Result, Ttl};

use crate::telemetry::{self, CacheOperation};

/// Shields callers from store failures.
///
/// Failed reads look like misses, failed writes, checks and deletes report `false`. Every
/// swallowed error is logged at warn level. This wrapper never returns an error.
///
/// # Examples
///
/// ```
/// use freshet::adapters::FaultTolerant;
/// use freshet::MemoryStore;
/// use freshet_tier::CacheStore;
/// # futures::executor::block_on(async {
///
/// let store = FaultTolerant::new(MemoryStore::<String, i32>::new());
/// assert_eq!(store.get(&"missing".to_string()).await?, None);
/// # Ok::<(), freshet_tier::Error>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct FaultTolerant<S> {
    inner: S,
}

impl<S> FaultTolerant<S> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns a reference to the inner store.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

/// Replaces an error with `fallback`, logging it.
fn tolerate<T>(operation: CacheOperation, result: Result<T>, fallback: impl FnOnce() -> T) -> T {
    result.unwrap_or_else(|e| {
        telemetry::emit_swallowed(operation, &e);
        fallback()
    })
}

impl<K, V, S> CacheStore<K, V> for FaultTolerant<S>
where
    S: CacheStore<K, V>,
    K: Clone + Eq + Hash + Send + Sync,
    V: Send,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(tolerate(CacheOperation::Get, self.inner.get(key).await, || None))
    }

    async fn get_many(&self, keys: &[K]) -> Result<HashMap<K, Option<V>>> {
        let result = self.inner.get_many(keys).await;
        Ok(tolerate(CacheOperation::GetMany, result, || {
            keys.iter().map(|key| (key.clone(), None)).collect()
        }))
    }

    async fn set(&self, key: &K, value: V, ttl: Option<Ttl>) -> Result<bool> {
        Ok(tolerate(CacheOperation::Set, self.inner.set(key, value, ttl).await, || false))
    }

    async fn set_many(&self, values: HashMap<K, V>, ttl: Option<Ttl>) -> Result<bool> {
        Ok(tolerate(CacheOperation::SetMany, self.inner.set_many(values, ttl).await, || false))
    }

    async fn has(&self, key: &K) -> Result<bool> {
        Ok(tolerate(CacheOperation::Has, self.inner.has(key).await, || false))
    }

    async fn delete(&self, key: &K) -> Result<bool> {
        Ok(tolerate(CacheOperation::Delete, self.inner.delete(key).await, || false))
    }

    async fn delete_many(&self, keys: &[K]) -> Result<bool> {
        Ok(tolerate(CacheOperation::DeleteMany, self.inner.delete_many(keys).await, || false))
    }

    async fn clear(&self) -> Result<bool> {
        Ok(tolerate(CacheOperation::Clear, self.inner.clear().await, || false))
    }

    fn len(&self) -> Option<u64> {
        self.inner.len()
    }
}
