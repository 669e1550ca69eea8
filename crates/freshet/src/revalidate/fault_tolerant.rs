// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{collections::HashMap, hash::Hash};

use bytes::Bytes;
use freshet_tier::{CacheStore, Result};

use crate::CacheItem;
use crate::revalidate::{Revalidation, Revalidator};
use crate::telemetry::{self, CacheOperation};

/// Turns revalidation failures into [`Revalidation::NoFreshValue`], so the stale value is served.
///
/// Swallowed errors are logged at warn level.
#[derive(Debug, Clone)]
pub struct FaultTolerantRevalidator<R> {
    inner: R,
}

impl<R> FaultTolerantRevalidator<R> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<K, V, R> Revalidator<K, V> for FaultTolerantRevalidator<R>
where
    R: Revalidator<K, V>,
    K: Clone + Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    async fn revalidate<S>(&self, cache: &S, key: &K, stale: CacheItem<V>) -> Result<Revalidation<V>>
    where
        S: CacheStore<K, Bytes>,
    {
        match self.inner.revalidate(cache, key, stale).await {
            Ok(revalidation) => Ok(revalidation),
            Err(e) => {
                telemetry::emit_swallowed(CacheOperation::Revalidate, &e);
                Ok(Revalidation::NoFreshValue)
            }
        }
    }

    async fn revalidate_batch<S>(&self, cache: &S, stale: HashMap<K, CacheItem<V>>) -> Result<HashMap<K, Revalidation<V>>>
    where
        S: CacheStore<K, Bytes>,
    {
        let keys: Vec<K> = stale.keys().cloned().collect();
        let mut results = match self.inner.revalidate_batch(cache, stale).await {
            Ok(results) => results,
            Err(e) => {
                telemetry::emit_swallowed(CacheOperation::RevalidateBatch, &e);
                HashMap::new()
            }
        };

        // Exactly one answer per stale key; keys the inner strategy skipped are declined.
        Ok(keys
            .into_iter()
            .map(|key| {
                let revalidation = results.remove(&key).unwrap_or(Revalidation::NoFreshValue);
                (key, revalidation)
            })
            .collect())
    }
}
