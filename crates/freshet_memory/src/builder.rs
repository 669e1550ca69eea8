// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring in-memory stores.
//!
//! This module provides a builder API for `MemoryStore` that abstracts
//! the underlying moka configuration, providing a stable API surface
//! without exposing moka's types.

use std::hash::Hash;
use std::marker::PhantomData;

use crate::store::MemoryStore;

/// Builder for configuring a `MemoryStore`.
///
/// Expiry is always per entry, driven by the ttl passed to each write, so the
/// builder only exposes sizing options.
///
/// # Examples
///
/// ```
/// use freshet_memory::MemoryStore;
///
/// let store = MemoryStore::<String, i32>::builder()
///     .max_capacity(1000)
///     .initial_capacity(100)
///     .name("my-store")
///     .build();
/// ```
#[derive(Debug)]
pub struct MemoryStoreBuilder<K, V> {
    pub(crate) max_capacity: Option<u64>,
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) name: Option<String>,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V> Default for MemoryStoreBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryStoreBuilder<K, V> {
    /// Creates a new builder for an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_capacity: None,
            initial_capacity: None,
            name: None,
            _phantom: PhantomData,
        }
    }

    /// Sets the maximum number of entries.
    ///
    /// Once the capacity is reached, entries are evicted using the `TinyLFU`
    /// policy. If not set, the store is unbounded.
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets the initial capacity (pre-allocation hint) for the store.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets a name for the store, used by moka for debugging.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<K, V> MemoryStoreBuilder<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Builds the store.
    #[must_use]
    pub fn build(self) -> MemoryStore<K, V> {
        MemoryStore::from_builder(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_records_settings() {
        let builder = MemoryStoreBuilder::<String, i32>::new()
            .max_capacity(10)
            .initial_capacity(5)
            .name("store");

        assert_eq!(builder.max_capacity, Some(10));
        assert_eq!(builder.initial_capacity, Some(5));
        assert_eq!(builder.name.as_deref(), Some("store"));
    }

    #[test]
    fn default_is_unbounded() {
        let builder = MemoryStoreBuilder::<String, i32>::default();
        assert!(builder.max_capacity.is_none());
        assert!(builder.initial_capacity.is_none());
        assert!(builder.name.is_none());
    }
}
