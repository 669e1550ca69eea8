// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The stale-while-revalidate cache decorator.

use std::{collections::HashMap, hash::Hash, marker::PhantomData, time::Duration};

use bytes::Bytes;
use freshet_tier::{CacheStore, Error, Result, Ttl};
use serde::{Serialize, de::DeserializeOwned};
use tick::Clock;

use crate::builder::StaleWhileRevalidateBuilder;
use crate::item::{CacheItem, unix_seconds};
use crate::revalidate::{Revalidation, Revalidator};
use crate::telemetry::{self, CacheActivity, CacheOperation};

/// Name used in log events when none is configured.
pub(crate) const DEFAULT_NAME: &str = "freshet";

/// A cache that keeps serving values after they go stale while asking a [`Revalidator`] for
/// replacements.
///
/// Values are written to the underlying store `S` as encoded [`CacheItem`] envelopes. On read,
/// fresh items are returned directly; stale items are handed to the revalidator, and whatever
/// it produces is written back and returned. When it has nothing better, the stale value is
/// returned and nothing is written.
///
/// Writes require a ttl, which is the freshness window of the item. The store entry itself
/// never expires unless a grace period is configured with
/// [`ttl_after_stale`](StaleWhileRevalidateBuilder::ttl_after_stale), in which case the store
/// keeps it for `ttl + ttl_after_stale` seconds.
///
/// Revalidation runs inline with the read that found the stale item. Concurrent readers of the
/// same stale key each revalidate.
///
/// # Examples
///
/// ```
/// use freshet::revalidate::{ExtendBySeconds, SourceRevalidator};
/// use freshet::{MemoryStore, StaleWhileRevalidate};
/// use freshet_tier::{CacheStore, Ttl};
/// use tick::Clock;
/// # futures::executor::block_on(async {
///
/// let clock = Clock::new_frozen();
/// let upstream = MemoryStore::<String, String>::new();
/// let revalidator = ExtendBySeconds::new(SourceRevalidator::new(upstream, clock.clone()), 60);
///
/// let store = MemoryStore::<String, bytes::Bytes>::new();
/// let cache = StaleWhileRevalidate::<String, String, _, _>::builder(store, revalidator, clock)
///     .name("profiles")
///     .build();
///
/// cache.set(&"alice".to_string(), "Alice".to_string(), Some(Ttl::from_secs(300))).await?;
/// assert_eq!(cache.get(&"alice".to_string()).await?, Some("Alice".to_string()));
/// # Ok::<(), freshet_tier::Error>(())
/// # });
/// ```
pub struct StaleWhileRevalidate<K, V, S, R> {
    pub(crate) name: &'static str,
    pub(crate) store: S,
    pub(crate) revalidator: R,
    pub(crate) clock: Clock,
    pub(crate) ttl_after_stale: Option<Duration>,
    pub(crate) _phantom: PhantomData<fn() -> (K, V)>,
}

impl<K, V, S, R> std::fmt::Debug for StaleWhileRevalidate<K, V, S, R>
where
    S: std::fmt::Debug,
    R: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaleWhileRevalidate")
            .field("name", &self.name)
            .field("store", &self.store)
            .field("revalidator", &self.revalidator)
            .field("ttl_after_stale", &self.ttl_after_stale)
            .finish_non_exhaustive()
    }
}

impl<K, V, S, R> StaleWhileRevalidate<K, V, S, R> {
    /// Creates a cache with default settings.
    ///
    /// Equivalent to `StaleWhileRevalidate::builder(store, revalidator, clock).build()`.
    #[must_use]
    pub fn new(store: S, revalidator: R, clock: Clock) -> Self {
        Self::builder(store, revalidator, clock).build()
    }

    /// Starts building a cache over `store`, revalidating with `revalidator` and reading time
    /// from `clock`.
    #[must_use]
    pub fn builder(store: S, revalidator: R, clock: Clock) -> StaleWhileRevalidateBuilder<K, V, S, R> {
        StaleWhileRevalidateBuilder::new(store, revalidator, clock)
    }

    /// The name used in log events.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns a reference to the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the revalidator.
    #[must_use]
    pub fn revalidator(&self) -> &R {
        &self.revalidator
    }

    /// The grace period the store keeps entries after they go stale, if any.
    #[must_use]
    pub fn ttl_after_stale(&self) -> Option<Duration> {
        self.ttl_after_stale
    }

    /// Store expiry for an item with base ttl `ttl` seconds.
    fn store_ttl(&self, ttl: u64) -> Option<Ttl> {
        self.ttl_after_stale
            .map(|grace| Ttl::from(Duration::from_secs(ttl)).saturating_add_secs(grace.as_secs()))
    }

    fn emit(&self, operation: CacheOperation, activity: CacheActivity, key_count: usize) {
        telemetry::emit(self.name, operation, activity, key_count);
    }
}

/// Checks that a write carries a usable ttl and returns it in seconds.
fn required_ttl(ttl: Option<Ttl>) -> Result<u64> {
    ttl.ok_or_else(|| Error::invalid_ttl("a ttl is required for stale-while-revalidate writes"))?
        .to_secs()
}

impl<K, V, S, R> CacheStore<K, V> for StaleWhileRevalidate<K, V, S, R>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Serialize + DeserializeOwned + Send + Sync,
    S: CacheStore<K, Bytes>,
    R: Revalidator<K, V>,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        let Some(bytes) = self.store.get(key).await? else {
            self.emit(CacheOperation::Get, CacheActivity::Miss, 1);
            return Ok(None);
        };

        let item = CacheItem::<V>::decode(&bytes)?;
        if !item.is_stale(&self.clock) {
            self.emit(CacheOperation::Get, CacheActivity::Hit, 1);
            return Ok(Some(item.into_value()));
        }

        self.emit(CacheOperation::Get, CacheActivity::Stale, 1);
        match self.revalidator.revalidate(&self.store, key, item.clone()).await? {
            Revalidation::Fresh(fresh) => {
                self.store.set(key, fresh.encode()?, self.store_ttl(fresh.ttl())).await?;
                self.emit(CacheOperation::Get, CacheActivity::Revalidated, 1);
                Ok(Some(fresh.into_value()))
            }
            Revalidation::NoFreshValue => {
                self.emit(CacheOperation::Get, CacheActivity::NotRevalidated, 1);
                Ok(Some(item.into_value()))
            }
        }
    }

    async fn get_many(&self, keys: &[K]) -> Result<HashMap<K, Option<V>>> {
        let stored = self.store.get_many(keys).await?;
        let now = unix_seconds(&self.clock);

        let mut values = HashMap::with_capacity(stored.len());
        let mut stale = HashMap::new();
        let (mut hits, mut misses) = (0, 0);
        for (key, bytes) in stored {
            let Some(bytes) = bytes else {
                misses += 1;
                values.insert(key, None);
                continue;
            };

            let item = CacheItem::<V>::decode(&bytes)?;
            if item.is_stale_at(now) {
                stale.insert(key, item);
            } else {
                hits += 1;
                values.insert(key, Some(item.into_value()));
            }
        }

        if hits > 0 {
            self.emit(CacheOperation::GetMany, CacheActivity::Hit, hits);
        }
        if misses > 0 {
            self.emit(CacheOperation::GetMany, CacheActivity::Miss, misses);
        }
        if stale.is_empty() {
            return Ok(values);
        }

        self.emit(CacheOperation::GetMany, CacheActivity::Stale, stale.len());
        let mut revalidated = self.revalidator.revalidate_batch(&self.store, stale.clone()).await?;

        let mut refreshed = HashMap::new();
        let mut max_ttl = 0;
        let mut declined = 0;
        for (key, item) in stale {
            match revalidated.remove(&key) {
                Some(Revalidation::Fresh(fresh)) => {
                    max_ttl = max_ttl.max(fresh.ttl());
                    refreshed.insert(key.clone(), fresh.encode()?);
                    values.insert(key, Some(fresh.into_value()));
                }
                Some(Revalidation::NoFreshValue) | None => {
                    declined += 1;
                    values.insert(key, Some(item.into_value()));
                }
            }
        }

        if declined > 0 {
            self.emit(CacheOperation::GetMany, CacheActivity::NotRevalidated, declined);
        }

        if !refreshed.is_empty() {
            let count = refreshed.len();
            self.store.set_many(refreshed, self.store_ttl(max_ttl)).await?;
            self.emit(CacheOperation::GetMany, CacheActivity::Revalidated, count);
        }

        Ok(values)
    }

    async fn set(&self, key: &K, value: V, ttl: Option<Ttl>) -> Result<bool> {
        let ttl = required_ttl(ttl)?;
        let item = CacheItem::new(value, unix_seconds(&self.clock), ttl);

        let written = self.store.set(key, item.encode()?, self.store_ttl(ttl)).await?;
        self.emit(CacheOperation::Set, CacheActivity::Written, 1);
        Ok(written)
    }

    async fn set_many(&self, values: HashMap<K, V>, ttl: Option<Ttl>) -> Result<bool> {
        let ttl = required_ttl(ttl)?;
        let now = unix_seconds(&self.clock);

        let mut encoded = HashMap::with_capacity(values.len());
        for (key, value) in values {
            encoded.insert(key, CacheItem::new(value, now, ttl).encode()?);
        }

        let count = encoded.len();
        let written = self.store.set_many(encoded, self.store_ttl(ttl)).await?;
        self.emit(CacheOperation::SetMany, CacheActivity::Written, count);
        Ok(written)
    }

    async fn has(&self, key: &K) -> Result<bool> {
        self.store.has(key).await
    }

    async fn delete(&self, key: &K) -> Result<bool> {
        self.store.delete(key).await
    }

    async fn delete_many(&self, keys: &[K]) -> Result<bool> {
        self.store.delete_many(keys).await
    }

    async fn clear(&self) -> Result<bool> {
        self.store.clear().await
    }

    fn len(&self) -> Option<u64> {
        self.store.len()
    }
}
