// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{collections::HashMap, hash::Hash};

use bytes::Bytes;
use freshet_tier::{CacheStore, Result};
use tick::Clock;

use crate::CacheItem;
use crate::item::unix_seconds;
use crate::revalidate::{Revalidation, Revalidator};

/// Reads replacements for stale items from an upstream store.
///
/// A value found upstream becomes a new item created now, keeping the stale item's base ttl
/// and dropping any extension. A key absent upstream yields [`Revalidation::NoFreshValue`].
/// Batches are served with a single `get_many` on the upstream store.
///
/// # Examples
///
/// ```
/// use freshet::revalidate::SourceRevalidator;
/// use freshet::MemoryStore;
/// use tick::Clock;
///
/// let upstream = MemoryStore::<String, String>::new();
/// let revalidator = SourceRevalidator::new(upstream, Clock::new_frozen());
/// ```
#[derive(Debug, Clone)]
pub struct SourceRevalidator<Src> {
    source: Src,
    clock: Clock,
}

impl<Src> SourceRevalidator<Src> {
    /// Creates a revalidator reading from `source`, stamping new items with `clock`.
    #[must_use]
    pub fn new(source: Src, clock: Clock) -> Self {
        Self { source, clock }
    }

    /// Returns a reference to the upstream store.
    #[must_use]
    pub fn source(&self) -> &Src {
        &self.source
    }
}

impl<K, V, Src> Revalidator<K, V> for SourceRevalidator<Src>
where
    Src: CacheStore<K, V>,
    K: Clone + Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    async fn revalidate<S>(&self, _cache: &S, key: &K, stale: CacheItem<V>) -> Result<Revalidation<V>>
    where
        S: CacheStore<K, Bytes>,
    {
        Ok(match self.source.get(key).await? {
            Some(value) => Revalidation::Fresh(CacheItem::new(value, unix_seconds(&self.clock), stale.ttl())),
            None => Revalidation::NoFreshValue,
        })
    }

    async fn revalidate_batch<S>(&self, _cache: &S, stale: HashMap<K, CacheItem<V>>) -> Result<HashMap<K, Revalidation<V>>>
    where
        S: CacheStore<K, Bytes>,
    {
        if stale.is_empty() {
            return Ok(HashMap::new());
        }

        let keys: Vec<K> = stale.keys().cloned().collect();
        let mut found = self.source.get_many(&keys).await?;
        let now = unix_seconds(&self.clock);

        Ok(stale
            .into_iter()
            .map(|(key, item)| {
                let revalidation = match found.remove(&key).flatten() {
                    Some(value) => Revalidation::Fresh(CacheItem::new(value, now, item.ttl())),
                    None => Revalidation::NoFreshValue,
                };
                (key, revalidation)
            })
            .collect())
    }
}
