// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Revalidation strategies for stale cache items.
//!
//! A [`Revalidator`] is asked for a replacement whenever the cache reads a stale item. It
//! answers with [`Revalidation::Fresh`] when it has a new item, [`Revalidation::NoFreshValue`]
//! when it has nothing better (the stale value is then served as is), or an error.
//!
//! Policies wrap another revalidator and adjust its answer:
//!
//! - [`ExtendBySeconds`] and [`ExtendByTtlFraction`] turn "no fresh value" into an extended
//!   copy of the stale item, so it is not revalidated again on the very next read.
//! - [`FaultTolerantRevalidator`] turns errors into "no fresh value".
//!
//! [`SourceRevalidator`] sits at the bottom of a chain and reads replacements from an
//! upstream store.
//!
//! ```
//! use freshet::revalidate::{ExtendBySeconds, FaultTolerantRevalidator, SourceRevalidator};
//! use freshet::MemoryStore;
//! use tick::Clock;
//!
//! let clock = Clock::new_frozen();
//! let upstream = MemoryStore::<String, String>::new();
//!
//! let revalidator = FaultTolerantRevalidator::new(ExtendBySeconds::new(
//!     SourceRevalidator::new(upstream, clock),
//!     60,
//! ));
//! ```

use std::{collections::HashMap, hash::Hash};

use bytes::Bytes;
use freshet_tier::{CacheStore, Result};

use crate::CacheItem;

mod extend;
mod fault_tolerant;
mod source;

#[doc(inline)]
pub use extend::{ExtendBySeconds, ExtendByTtlFraction};
#[doc(inline)]
pub use fault_tolerant::FaultTolerantRevalidator;
#[doc(inline)]
pub use source::SourceRevalidator;

/// The outcome of revalidating a stale item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revalidation<V> {
    /// A replacement item, written back to the cache and served.
    Fresh(CacheItem<V>),
    /// No replacement is available; the stale value is served.
    NoFreshValue,
}

impl<V> Revalidation<V> {
    /// Returns `true` for [`Revalidation::Fresh`].
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }

    /// Returns the replacement item, if any.
    #[must_use]
    pub fn into_fresh(self) -> Option<CacheItem<V>> {
        match self {
            Self::Fresh(item) => Some(item),
            Self::NoFreshValue => None,
        }
    }
}

/// Produces replacements for stale cache items.
///
/// `cache` is the store the stale item was read from. Strategies may consult it, but the
/// caller is responsible for writing fresh items back.
pub trait Revalidator<K, V>: Send + Sync {
    /// Revalidates one stale item.
    fn revalidate<S>(&self, cache: &S, key: &K, stale: CacheItem<V>) -> impl Future<Output = Result<Revalidation<V>>> + Send
    where
        S: CacheStore<K, Bytes>;

    /// Revalidates many stale items at once.
    ///
    /// The result must hold exactly one entry per input key. The default revalidates each
    /// item in turn and stops at the first error.
    fn revalidate_batch<S>(
        &self,
        cache: &S,
        stale: HashMap<K, CacheItem<V>>,
    ) -> impl Future<Output = Result<HashMap<K, Revalidation<V>>>> + Send
    where
        S: CacheStore<K, Bytes>,
        K: Eq + Hash + Send + Sync,
        V: Send,
    {
        async move {
            let mut results = HashMap::with_capacity(stale.len());
            for (key, item) in stale {
                let revalidation = self.revalidate(cache, &key, item).await?;
                results.insert(key, revalidation);
            }
            Ok(results)
        }
    }
}
