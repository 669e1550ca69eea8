// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Store decorators that compose with each other and with [`StaleWhileRevalidate`](crate::StaleWhileRevalidate).
//!
//! Each adapter wraps any [`CacheStore`](freshet_tier::CacheStore) and is one itself, so they
//! stack in any order:
//!
//! ```
//! use freshet::adapters::{DefaultTtl, FaultTolerant, KeySuffix};
//! use freshet::MemoryStore;
//! use freshet_tier::Ttl;
//!
//! let store = FaultTolerant::new(DefaultTtl::new(
//!     KeySuffix::new(MemoryStore::<String, i32>::new(), "v2"),
//!     Some(Ttl::from_secs(600)),
//! ));
//! ```

mod default_ttl;
mod fault_tolerant;
mod key_suffix;
mod stack;

#[doc(inline)]
pub use default_ttl::DefaultTtl;
#[doc(inline)]
pub use fault_tolerant::FaultTolerant;
#[doc(inline)]
pub use key_suffix::KeySuffix;
#[doc(inline)]
pub use stack::Stack;
