// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Layered Store Example
//!
//! Builds the store under a stale-while-revalidate cache out of adapters: a namespace
//! suffix, a two-tier stack and error swallowing.

use std::collections::HashMap;

use bytes::Bytes;
use freshet::adapters::{DefaultTtl, FaultTolerant, KeySuffix, Stack};
use freshet::revalidate::SourceRevalidator;
use freshet::{CacheStore, MemoryStore, StaleWhileRevalidate, Ttl};
use tick::Clock;

#[tokio::main(flavor = "current_thread")]
async fn main() -> freshet::Result<()> {
    let clock = Clock::new_tokio();

    // A small local tier in front of a larger shared one.
    let local = MemoryStore::<String, Bytes>::builder().max_capacity(1_000).name("local").build();
    let shared = MemoryStore::<String, Bytes>::builder().max_capacity(100_000).name("shared").build();
    let store = KeySuffix::new(Stack::new(local, shared.clone()), "products");

    let upstream = MemoryStore::<String, String>::new();
    let swr = StaleWhileRevalidate::<String, String, _, _>::builder(
        store,
        SourceRevalidator::new(upstream.clone(), clock.clone()),
        clock,
    )
    .name("products")
    .build();

    // Writes without a ttl get five minutes; read errors become misses.
    let cache = FaultTolerant::new(DefaultTtl::new(swr, Some(Ttl::from_secs(300))));

    cache
        .set_many(
            HashMap::from([
                ("p1".to_string(), "Kettle".to_string()),
                ("p2".to_string(), "Toaster".to_string()),
            ]),
            None,
        )
        .await?;

    // Entries land in the shared tier under the namespaced key.
    let _namespaced = shared.has(&"p1:products".to_string()).await?;

    let _products = cache.get_many(&["p1".to_string(), "p2".to_string(), "p3".to_string()]).await?;
    let _missing = cache.get_or(&"p3".to_string(), "unknown".to_string()).await?;

    Ok(())
}
