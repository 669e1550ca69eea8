// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Stale-while-revalidate caching.
//!
//! [`StaleWhileRevalidate`] wraps any [`CacheStore`] and keeps serving values after their ttl
//! has passed, while a pluggable [`Revalidator`](revalidate::Revalidator) tries to obtain a
//! replacement. Callers read and write plain values; the cache stores each one inside a
//! [`CacheItem`] that records when it was created and how long it stays fresh.
//!
//! - [`revalidate`]: the revalidation protocol, policies that extend stale items or swallow
//!   failures, and a revalidator that reads from an upstream store.
//! - [`adapters`]: key namespacing, default ttls, fault tolerance and multi-tier stacks for any
//!   store.
//!
//! All operations emit `tracing` events named `cache.event` at debug or info level.
//!
//! # Examples
//!
//! ```
//! use freshet::revalidate::{ExtendBySeconds, FaultTolerantRevalidator, SourceRevalidator};
//! use freshet::{CacheStore, MemoryStore, StaleWhileRevalidate, Ttl};
//! use std::time::{Duration, SystemTime};
//! use tick::ClockControl;
//! # futures::executor::block_on(async {
//!
//! let control = ClockControl::new_at(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));
//! let clock = control.to_clock();
//!
//! let upstream = MemoryStore::<String, u32>::new();
//! let revalidator = FaultTolerantRevalidator::new(ExtendBySeconds::new(
//!     SourceRevalidator::new(upstream.clone(), clock.clone()),
//!     30,
//! ));
//! let cache = StaleWhileRevalidate::<String, u32, _, _>::new(MemoryStore::<String, bytes::Bytes>::new(), revalidator, clock);
//!
//! let key = "visits".to_string();
//! cache.set(&key, 1, Some(Ttl::from_secs(60))).await?;
//!
//! // Once stale, the upstream value replaces the cached one.
//! upstream.set(&key, 2, None).await?;
//! control.advance(Duration::from_secs(60));
//! assert_eq!(cache.get(&key).await?, Some(2));
//! # Ok::<(), freshet::Error>(())
//! # });
//! ```

pub mod adapters;
mod builder;
mod item;
pub mod revalidate;
mod swr;
mod telemetry;

#[doc(inline)]
pub use builder::StaleWhileRevalidateBuilder;
#[cfg(feature = "memory")]
#[doc(inline)]
pub use freshet_memory::{MemoryStore, MemoryStoreBuilder};
#[doc(inline)]
pub use freshet_tier::{CacheStore, Error, ErrorKind, Interval, Result, Ttl};
#[doc(inline)]
pub use item::CacheItem;
#[doc(inline)]
pub use swr::StaleWhileRevalidate;
