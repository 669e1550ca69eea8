// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(feature = "test-util")]

//! Integration tests for `MockStore`.

use std::collections::HashMap;

use freshet_tier::testing::{MockStore, StoreOp};
use freshet_tier::{CacheStore, ErrorKind, Result, Ttl};

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

#[test]
fn records_batched_operations_as_issued() -> Result<()> {
    block_on(async {
        let store = MockStore::<String, i32>::new();
        let values = HashMap::from([("a".to_string(), 1)]);

        store.set_many(values.clone(), Some(Ttl::from_secs(5))).await?;
        store.get_many(&["a".to_string(), "b".to_string()]).await?;
        store.delete_many(&["a".to_string()]).await?;

        assert_eq!(
            store.operations(),
            vec![
                StoreOp::SetMany {
                    values,
                    ttl: Some(Ttl::from_secs(5)),
                },
                StoreOp::GetMany(vec!["a".to_string(), "b".to_string()]),
                StoreOp::DeleteMany(vec!["a".to_string()]),
            ]
        );
        assert_eq!(store.entry_count(), 0);
        Ok(())
    })
}

#[test]
fn failed_operations_are_recorded_and_leave_data_untouched() {
    block_on(async {
        let store = MockStore::<String, i32>::new();
        store.fail_when(|op| matches!(op, StoreOp::Set { .. }));

        let err = store.set(&"a".to_string(), 1, None).await.expect_err("set should fail");

        assert_eq!(err.kind(), ErrorKind::Store);
        assert!(!store.contains_key(&"a".to_string()));
        assert_eq!(store.operations().len(), 1);
    });
}

#[test]
fn clear_failures_restores_operations() -> Result<()> {
    block_on(async {
        let store = MockStore::<String, i32>::new();
        store.fail_when(|_| true);
        assert!(store.clear().await.is_err());

        store.clear_failures();
        assert!(store.clear().await?);
        Ok(())
    })
}

#[test]
fn seed_and_peek_bypass_recording() {
    let store = MockStore::<String, i32>::new();
    store.seed("a".to_string(), 1);

    assert_eq!(store.peek(&"a".to_string()), Some(1));
    assert!(store.operations().is_empty());
    assert_eq!(store.ttl_of(&"a".to_string()), None);
}

#[test]
fn ttl_of_tracks_last_write() -> Result<()> {
    block_on(async {
        let store = MockStore::<String, i32>::new();
        store.set(&"a".to_string(), 1, Some(Ttl::from_secs(10))).await?;
        assert_eq!(store.ttl_of(&"a".to_string()), Some(Some(Ttl::from_secs(10))));

        store.set(&"a".to_string(), 2, None).await?;
        assert_eq!(store.ttl_of(&"a".to_string()), Some(None));
        Ok(())
    })
}

#[test]
fn with_data_prepopulates() -> Result<()> {
    block_on(async {
        let store = MockStore::with_data(HashMap::from([("a".to_string(), 1)]));
        assert!(store.has(&"a".to_string()).await?);
        assert_eq!(store.len(), Some(1));
        Ok(())
    })
}
