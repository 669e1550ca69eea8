// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Stale-While-Revalidate Example
//!
//! Serves a value past its ttl while an upstream store supplies the replacement. When the
//! upstream has nothing, the stale value is extended for a few seconds instead.

use std::time::Duration;

use freshet::revalidate::{ExtendBySeconds, FaultTolerantRevalidator, SourceRevalidator};
use freshet::{CacheStore, MemoryStore, StaleWhileRevalidate, Ttl};
use tick::Clock;
use tracing::Level;

#[tokio::main(flavor = "current_thread")]
async fn main() -> freshet::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let clock = Clock::new_tokio();

    // The system of record the cache revalidates against.
    let upstream = MemoryStore::<String, String>::new();

    // Read replacements from upstream, extend stale items by 2 seconds when it has none, and
    // keep serving stale values if upstream fails.
    let revalidator = FaultTolerantRevalidator::new(ExtendBySeconds::new(
        SourceRevalidator::new(upstream.clone(), clock.clone()),
        2,
    ));

    let cache = StaleWhileRevalidate::<String, String, _, _>::builder(MemoryStore::new(), revalidator, clock)
        .name("profiles")
        .ttl_after_stale(Duration::from_secs(60))
        .build();

    let key = "user:1".to_string();
    cache.set(&key, "Alice".to_string(), Some(Ttl::from_secs(1))).await?;

    // Fresh hit.
    let _fresh = cache.get(&key).await?;

    // Stale, and upstream has nothing yet: the value is served and extended.
    tokio::time::sleep(Duration::from_millis(1_100)).await;
    let _extended = cache.get(&key).await?;

    // Once the extension runs out, the upstream value replaces it.
    upstream.set(&key, "Alice Smith".to_string(), None).await?;
    tokio::time::sleep(Duration::from_secs(2)).await;
    let _revalidated = cache.get(&key).await?;

    Ok(())
}
