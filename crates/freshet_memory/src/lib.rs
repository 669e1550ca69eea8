// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-memory store for freshet caches, backed by moka.
//!
//! [`MemoryStore`] implements [`freshet_tier::CacheStore`] over a concurrent moka cache.
//! Every write carries its own ttl, which becomes that entry's expiry; writes without a
//! ttl never expire. Use [`MemoryStoreBuilder`] to configure capacity without exposing
//! moka types.
//!
//! # Quick Start
//!
//! ```
//! use freshet_memory::MemoryStore;
//! use freshet_tier::{CacheStore, Ttl};
//!
//! # futures::executor::block_on(async {
//! let store = MemoryStore::<String, i32>::builder().max_capacity(1000).build();
//!
//! store.set(&"key".to_string(), 42, Some(Ttl::from_secs(300))).await?;
//! assert_eq!(store.get(&"key".to_string()).await?, Some(42));
//! # Ok::<(), freshet_tier::Error>(())
//! # });
//! ```

pub mod builder;
mod store;

#[doc(inline)]
pub use builder::MemoryStoreBuilder;
#[doc(inline)]
pub use store::MemoryStore;
