// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Core key/value store abstractions for freshet caches.
//!
//! This crate defines the [`CacheStore`] trait that backing stores, upstream sources and
//! cache decorators all satisfy, along with [`Ttl`] for expressing expiry and the shared
//! [`Error`] type.
//!
//! # Implementing a Store
//!
//! Implement the four required methods of [`CacheStore`]; batched operations fall back to
//! per-key loops unless overridden:
//!
//! ```
//! use freshet_tier::{CacheStore, Result, Ttl};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! struct SimpleStore<K, V>(RwLock<HashMap<K, V>>);
//!
//! impl<K, V> CacheStore<K, V> for SimpleStore<K, V>
//! where
//!     K: Clone + Eq + std::hash::Hash + Send + Sync,
//!     V: Clone + Send + Sync,
//! {
//!     async fn get(&self, key: &K) -> Result<Option<V>> {
//!         Ok(self.0.read().unwrap().get(key).cloned())
//!     }
//!
//!     async fn set(&self, key: &K, value: V, _ttl: Option<Ttl>) -> Result<bool> {
//!         self.0.write().unwrap().insert(key.clone(), value);
//!         Ok(true)
//!     }
//!
//!     async fn delete(&self, key: &K) -> Result<bool> {
//!         Ok(self.0.write().unwrap().remove(key).is_some())
//!     }
//!
//!     async fn clear(&self) -> Result<bool> {
//!         self.0.write().unwrap().clear();
//!         Ok(true)
//!     }
//! }
//! ```

pub mod error;
pub(crate) mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;
mod ttl;

#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use store::CacheStore;
#[doc(inline)]
pub use ttl::{Interval, Ttl};
