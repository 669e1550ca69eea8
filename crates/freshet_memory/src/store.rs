// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory store implementation using moka.

use std::{
    hash::Hash,
    time::{Duration, Instant},
};

use freshet_tier::{CacheStore, Result, Ttl};
use moka::{Expiry, future::Cache};

use crate::builder::MemoryStoreBuilder;

/// A stored value together with the expiry requested when it was written.
#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    ttl: Option<Duration>,
}

/// Expires each slot after the ttl it was written with; `None` never expires.
#[derive(Debug, Clone, Copy)]
struct SlotExpiry;

impl<K, V> Expiry<K, Slot<V>> for SlotExpiry {
    fn expire_after_create(&self, _key: &K, slot: &Slot<V>, _created_at: Instant) -> Option<Duration> {
        slot.ttl
    }

    fn expire_after_update(
        &self,
        _key: &K,
        slot: &Slot<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        slot.ttl
    }
}

/// An in-memory store backed by moka.
///
/// This store provides:
/// - Concurrent access with high performance
/// - Per-entry expiry from the ttl given to each write
/// - Capacity-based eviction when configured
///
/// # Examples
///
/// ```
/// use freshet_memory::MemoryStore;
/// use freshet_tier::{CacheStore, Ttl};
/// # futures::executor::block_on(async {
///
/// let store = MemoryStore::<String, i32>::new();
///
/// store.set(&"key".to_string(), 42, Some(Ttl::from_secs(60))).await?;
/// assert_eq!(store.get(&"key".to_string()).await?, Some(42));
/// # Ok::<(), freshet_tier::Error>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, Slot<V>>,
}

impl<K, V> Default for MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a new unbounded in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new in-memory store holding at most `max_capacity` entries.
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self::builder().max_capacity(max_capacity).build()
    }

    /// Creates a new builder for configuring an in-memory store.
    #[must_use]
    pub fn builder() -> MemoryStoreBuilder<K, V> {
        MemoryStoreBuilder::new()
    }

    pub(crate) fn from_builder(builder: &MemoryStoreBuilder<K, V>) -> Self {
        let mut moka_builder = Cache::builder().expire_after(SlotExpiry);

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            inner: moka_builder.build(),
        }
    }
}

impl<K, V> CacheStore<K, V> for MemoryStore<K, V>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(self.inner.get(key).await.map(|slot| slot.value))
    }

    async fn set(&self, key: &K, value: V, ttl: Option<Ttl>) -> Result<bool> {
        let ttl = ttl.map(Ttl::to_duration).transpose()?;
        self.inner.insert(key.clone(), Slot { value, ttl }).await;
        Ok(true)
    }

    async fn delete(&self, key: &K) -> Result<bool> {
        self.inner.invalidate(key).await;
        Ok(true)
    }

    async fn clear(&self) -> Result<bool> {
        self.inner.invalidate_all();
        Ok(true)
    }

    async fn has(&self, key: &K) -> Result<bool> {
        Ok(self.inner.contains_key(key))
    }

    fn len(&self) -> Option<u64> {
        Some(self.inner.entry_count())
    }
}
