// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{collections::HashMap, hash::Hash};

use freshet_tier::{CacheStore, Result, Ttl};

/// Supplies a ttl to writes that arrive without one.
///
/// An explicit ttl on a write always wins. Reads and deletes are forwarded unchanged.
///
/// Placed in front of a [`StaleWhileRevalidate`](crate::StaleWhileRevalidate) cache, this lets
/// callers write without a ttl even though the cache itself requires one.
#[derive(Debug, Clone)]
pub struct DefaultTtl<S> {
    inner: S,
    ttl: Option<Ttl>,
}

impl<S> DefaultTtl<S> {
    /// Wraps `inner`, using `ttl` for writes that carry none.
    #[must_use]
    pub fn new(inner: S, ttl: Option<Ttl>) -> Self {
        Self { inner, ttl }
    }

    /// The ttl applied to writes without one.
    #[must_use]
    pub fn default_ttl(&self) -> Option<Ttl> {
        self.ttl
    }

    /// Returns a reference to the inner store.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<K, V, S> CacheStore<K, V> for DefaultTtl<S>
where
    S: CacheStore<K, V>,
    K: Clone + Eq + Hash + Send + Sync,
    V: Send,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        self.inner.get(key).await
    }

    async fn get_many(&self, keys: &[K]) -> Result<HashMap<K, Option<V>>> {
        self.inner.get_many(keys).await
    }

    async fn set(&self, key: &K, value: V, ttl: Option<Ttl>) -> Result<bool> {
        self.inner.set(key, value, ttl.or(self.ttl)).await
    }

    async fn set_many(&self, values: HashMap<K, V>, ttl: Option<Ttl>) -> Result<bool> {
        self.inner.set_many(values, ttl.or(self.ttl)).await
    }

    async fn has(&self, key: &K) -> Result<bool> {
        self.inner.has(key).await
    }

    async fn delete(&self, key: &K) -> Result<bool> {
        self.inner.delete(key).await
    }

    async fn delete_many(&self, keys: &[K]) -> Result<bool> {
        self.inner.delete_many(keys).await
    }

    async fn clear(&self) -> Result<bool> {
        self.inner.clear().await
    }

    fn len(&self) -> Option<u64> {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use freshet_tier::testing::MockStore;

    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        futures::executor::block_on(f)
    }

    #[test]
    fn missing_ttl_gets_default() -> Result<()> {
        block_on(async {
            let inner = MockStore::<String, i32>::new();
            let store = DefaultTtl::new(inner.clone(), Some(Ttl::from_secs(60)));

            store.set(&"a".to_string(), 1, None).await?;
            store.set_many(HashMap::from([("b".to_string(), 2)]), None).await?;

            assert_eq!(inner.ttl_of(&"a".to_string()), Some(Some(Ttl::from_secs(60))));
            assert_eq!(inner.ttl_of(&"b".to_string()), Some(Some(Ttl::from_secs(60))));
            Ok(())
        })
    }

    #[test]
    fn explicit_ttl_wins() -> Result<()> {
        block_on(async {
            let inner = MockStore::<String, i32>::new();
            let store = DefaultTtl::new(inner.clone(), Some(Ttl::from_secs(60)));

            store.set(&"a".to_string(), 1, Some(Ttl::from_secs(5))).await?;

            assert_eq!(inner.ttl_of(&"a".to_string()), Some(Some(Ttl::from_secs(5))));
            Ok(())
        })
    }

    #[test]
    fn no_default_leaves_ttl_absent() -> Result<()> {
        block_on(async {
            let inner = MockStore::<String, i32>::new();
            let store = DefaultTtl::new(inner.clone(), None);

            store.set(&"a".to_string(), 1, None).await?;

            assert_eq!(inner.ttl_of(&"a".to_string()), Some(None));
            assert_eq!(store.default_ttl(), None);
            Ok(())
        })
    }

    #[test]
    fn reads_are_forwarded() -> Result<()> {
        block_on(async {
            let inner = MockStore::<String, i32>::new();
            inner.seed("a".to_string(), 1);
            let store = DefaultTtl::new(inner, Some(Ttl::from_secs(60)));

            assert_eq!(store.get(&"a".to_string()).await?, Some(1));
            assert!(store.has(&"a".to_string()).await?);
            assert_eq!(store.get_many(&["a".to_string()]).await?["a"], Some(1));
            assert!(store.delete_many(&["a".to_string()]).await?);
            assert_eq!(store.get(&"a".to_string()).await?, None);
            Ok(())
        })
    }
}
