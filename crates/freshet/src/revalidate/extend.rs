// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{collections::HashMap, hash::Hash};

use bytes::Bytes;
use freshet_tier::{CacheStore, Result};

use crate::item::validate_fraction;
use crate::revalidate::{Revalidation, Revalidator};
use crate::CacheItem;

/// Extends stale items by a fixed number of seconds when the inner strategy has no fresh value.
///
/// Fresh results pass through untouched and errors propagate.
///
/// # Examples
///
/// ```
/// use freshet::revalidate::{ExtendBySeconds, SourceRevalidator};
/// use freshet::MemoryStore;
/// use tick::Clock;
///
/// let source = SourceRevalidator::new(MemoryStore::<String, i32>::new(), Clock::new_frozen());
/// let revalidator = ExtendBySeconds::new(source, 30);
/// assert_eq!(revalidator.seconds(), 30);
/// ```
#[derive(Debug, Clone)]
pub struct ExtendBySeconds<R> {
    inner: R,
    seconds: u64,
}

impl<R> ExtendBySeconds<R> {
    /// Wraps `inner`, extending declined items by `seconds`.
    #[must_use]
    pub fn new(inner: R, seconds: u64) -> Self {
        Self { inner, seconds }
    }

    /// The extension applied to declined items.
    #[must_use]
    pub fn seconds(&self) -> u64 {
        self.seconds
    }
}

impl<K, V, R> Revalidator<K, V> for ExtendBySeconds<R>
where
    R: Revalidator<K, V>,
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn revalidate<S>(&self, cache: &S, key: &K, stale: CacheItem<V>) -> Result<Revalidation<V>>
    where
        S: CacheStore<K, Bytes>,
    {
        match self.inner.revalidate(cache, key, stale.clone()).await? {
            Revalidation::NoFreshValue => Ok(Revalidation::Fresh(stale.extend_by_seconds(self.seconds))),
            fresh => Ok(fresh),
        }
    }

    async fn revalidate_batch<S>(&self, cache: &S, stale: HashMap<K, CacheItem<V>>) -> Result<HashMap<K, Revalidation<V>>>
    where
        S: CacheStore<K, Bytes>,
    {
        let results = self.inner.revalidate_batch(cache, stale.clone()).await?;
        fill_declined(stale, results, |item| Ok(item.extend_by_seconds(self.seconds)))
    }
}

/// Extends stale items by a fraction of their base ttl when the inner strategy has no fresh value.
///
/// The extension is `floor(ttl * fraction)` seconds. Fresh results pass through untouched and
/// errors propagate.
#[derive(Debug, Clone)]
pub struct ExtendByTtlFraction<R> {
    inner: R,
    fraction: f64,
}

impl<R> ExtendByTtlFraction<R> {
    /// Wraps `inner`, extending declined items by `fraction` of their ttl.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](freshet_tier::ErrorKind::InvalidArgument) if
    /// `fraction` is not within `[0, 1]`.
    pub fn new(inner: R, fraction: f64) -> Result<Self> {
        validate_fraction(fraction)?;
        Ok(Self { inner, fraction })
    }

    /// The fraction of the base ttl applied to declined items.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

impl<K, V, R> Revalidator<K, V> for ExtendByTtlFraction<R>
where
    R: Revalidator<K, V>,
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn revalidate<S>(&self, cache: &S, key: &K, stale: CacheItem<V>) -> Result<Revalidation<V>>
    where
        S: CacheStore<K, Bytes>,
    {
        match self.inner.revalidate(cache, key, stale.clone()).await? {
            Revalidation::NoFreshValue => Ok(Revalidation::Fresh(stale.extend_by_ttl_fraction(self.fraction)?)),
            fresh => Ok(fresh),
        }
    }

    async fn revalidate_batch<S>(&self, cache: &S, stale: HashMap<K, CacheItem<V>>) -> Result<HashMap<K, Revalidation<V>>>
    where
        S: CacheStore<K, Bytes>,
    {
        let results = self.inner.revalidate_batch(cache, stale.clone()).await?;
        fill_declined(stale, results, |item| item.extend_by_ttl_fraction(self.fraction))
    }
}

/// Keeps fresh inner results and replaces declined or missing ones with an extended stale item.
///
/// The output holds exactly the keys of `stale`.
fn fill_declined<K, V>(
    stale: HashMap<K, CacheItem<V>>,
    mut results: HashMap<K, Revalidation<V>>,
    extend: impl Fn(&CacheItem<V>) -> Result<CacheItem<V>>,
) -> Result<HashMap<K, Revalidation<V>>>
where
    K: Eq + Hash,
{
    let mut filled = HashMap::with_capacity(stale.len());
    for (key, item) in stale {
        let revalidation = match results.remove(&key) {
            Some(fresh @ Revalidation::Fresh(_)) => fresh,
            Some(Revalidation::NoFreshValue) | None => Revalidation::Fresh(extend(&item)?),
        };
        filled.insert(key, revalidation);
    }
    Ok(filled)
}
