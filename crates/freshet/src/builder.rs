// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for [`StaleWhileRevalidate`] caches.

use std::{marker::PhantomData, time::Duration};

use tick::Clock;

use crate::swr::{DEFAULT_NAME, StaleWhileRevalidate};

/// Configures a [`StaleWhileRevalidate`] cache.
///
/// Created by [`StaleWhileRevalidate::builder`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use freshet::revalidate::SourceRevalidator;
/// use freshet::{MemoryStore, StaleWhileRevalidate};
/// use tick::Clock;
///
/// let clock = Clock::new_frozen();
/// let revalidator = SourceRevalidator::new(MemoryStore::<String, i32>::new(), clock.clone());
///
/// let store = MemoryStore::<String, bytes::Bytes>::new();
/// let cache = StaleWhileRevalidate::<String, i32, _, _>::builder(store, revalidator, clock)
///     .name("scores")
///     .ttl_after_stale(Duration::from_secs(3_600))
///     .build();
///
/// assert_eq!(cache.name(), "scores");
/// assert_eq!(cache.ttl_after_stale(), Some(Duration::from_secs(3_600)));
/// ```
#[derive(Debug)]
pub struct StaleWhileRevalidateBuilder<K, V, S, R> {
    name: &'static str,
    store: S,
    revalidator: R,
    clock: Clock,
    ttl_after_stale: Option<Duration>,
    _phantom: PhantomData<fn() -> (K, V)>,
}

impl<K, V, S, R> StaleWhileRevalidateBuilder<K, V, S, R> {
    pub(crate) fn new(store: S, revalidator: R, clock: Clock) -> Self {
        Self {
            name: DEFAULT_NAME,
            store,
            revalidator,
            clock,
            ttl_after_stale: None,
            _phantom: PhantomData,
        }
    }

    /// Sets the name reported in log events. Defaults to `"freshet"`.
    #[must_use]
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Keeps entries in the store for `grace` after they go stale.
    ///
    /// Without a grace period, entries are written without a store expiry and remain until
    /// evicted or deleted. Sub-second precision is dropped.
    #[must_use]
    pub fn ttl_after_stale(mut self, grace: Duration) -> Self {
        self.ttl_after_stale = Some(Duration::from_secs(grace.as_secs()));
        self
    }

    /// Builds the cache.
    #[must_use]
    pub fn build(self) -> StaleWhileRevalidate<K, V, S, R> {
        StaleWhileRevalidate {
            name: self.name,
            store: self.store,
            revalidator: self.revalidator,
            clock: self.clock,
            ttl_after_stale: self.ttl_after_stale,
            _phantom: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cache = StaleWhileRevalidateBuilder::<u8, u8, (), ()>::new((), (), Clock::new_frozen()).build();
        assert_eq!(cache.name(), DEFAULT_NAME);
        assert_eq!(cache.ttl_after_stale(), None);
    }

    #[test]
    fn grace_period_truncates_to_seconds() {
        let cache = StaleWhileRevalidateBuilder::<u8, u8, (), ()>::new((), (), Clock::new_frozen())
            .ttl_after_stale(Duration::from_millis(2_500))
            .build();
        assert_eq!(cache.ttl_after_stale(), Some(Duration::from_secs(2)));
    }
}
