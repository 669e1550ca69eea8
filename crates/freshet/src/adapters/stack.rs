// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{collections::HashMap, hash::Hash};

use freshet_tier::{CacheStore, Result, Ttl};
use futures::join;

/// A two-tier store: a fast primary in front of a slower fallback.
///
/// Reads try the primary first and fall through to the fallback on a miss. Values found only
/// in the fallback are copied into the primary (without a ttl) so later reads hit it. Writes
/// and deletes go to both tiers concurrently and report `true` only if both tiers accepted
/// them. Nest stacks for more tiers: `Stack::new(l1, Stack::new(l2, l3))`.
///
/// # Examples
///
/// ```
/// use freshet::adapters::Stack;
/// use freshet::MemoryStore;
/// use freshet_tier::CacheStore;
/// # futures::executor::block_on(async {
///
/// let l1 = MemoryStore::<String, i32>::new();
/// let l2 = MemoryStore::<String, i32>::new();
/// l2.set(&"k".to_string(), 7, None).await?;
///
/// let stack = Stack::new(l1.clone(), l2);
/// assert_eq!(stack.get(&"k".to_string()).await?, Some(7));
/// assert_eq!(l1.get(&"k".to_string()).await?, Some(7));
/// # Ok::<(), freshet_tier::Error>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Stack<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> Stack<P, F> {
    /// Stacks `primary` in front of `fallback`.
    #[must_use]
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// Returns a reference to the primary tier.
    #[must_use]
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// Returns a reference to the fallback tier.
    #[must_use]
    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

impl<K, V, P, F> CacheStore<K, V> for Stack<P, F>
where
    P: CacheStore<K, V>,
    F: CacheStore<K, V>,
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        if let Some(value) = self.primary.get(key).await? {
            return Ok(Some(value));
        }

        let found = self.fallback.get(key).await?;
        if let Some(value) = &found {
            self.primary.set(key, value.clone(), None).await?;
        }
        Ok(found)
    }

    async fn get_many(&self, keys: &[K]) -> Result<HashMap<K, Option<V>>> {
        let mut values = self.primary.get_many(keys).await?;
        let missing: Vec<K> = keys
            .iter()
            .filter(|key| values.get(*key).is_none_or(Option::is_none))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(values);
        }

        let found: HashMap<K, V> = self
            .fallback
            .get_many(&missing)
            .await?
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .collect();
        if found.is_empty() {
            return Ok(values);
        }

        for (key, value) in &found {
            values.insert(key.clone(), Some(value.clone()));
        }
        self.primary.set_many(found, None).await?;
        Ok(values)
    }

    async fn set(&self, key: &K, value: V, ttl: Option<Ttl>) -> Result<bool> {
        let (primary, fallback) = join!(self.primary.set(key, value.clone(), ttl), self.fallback.set(key, value, ttl));
        both(primary, fallback)
    }

    async fn set_many(&self, values: HashMap<K, V>, ttl: Option<Ttl>) -> Result<bool> {
        let (primary, fallback) = join!(self.primary.set_many(values.clone(), ttl), self.fallback.set_many(values, ttl));
        both(primary, fallback)
    }

    async fn has(&self, key: &K) -> Result<bool> {
        if self.primary.has(key).await? {
            return Ok(true);
        }
        self.fallback.has(key).await
    }

    async fn delete(&self, key: &K) -> Result<bool> {
        let (primary, fallback) = join!(self.primary.delete(key), self.fallback.delete(key));
        both(primary, fallback)
    }

    async fn delete_many(&self, keys: &[K]) -> Result<bool> {
        let (primary, fallback) = join!(self.primary.delete_many(keys), self.fallback.delete_many(keys));
        both(primary, fallback)
    }

    async fn clear(&self) -> Result<bool> {
        let (primary, fallback) = join!(self.primary.clear(), self.fallback.clear());
        both(primary, fallback)
    }
}

/// Combines the outcomes of an operation applied to both tiers.
fn both(primary: Result<bool>, fallback: Result<bool>) -> Result<bool> {
    let (primary, fallback) = (primary?, fallback?);
    Ok(primary && fallback)
}

#[cfg(test)]
mod tests {
    use freshet_tier::ErrorKind;
    use freshet_tier::testing::{MockStore, StoreOp};

    use super::*;

    type Tier = MockStore<String, i32>;

    fn tiers() -> (Tier, Tier, Stack<Tier, Tier>) {
        let primary = Tier::new();
        let fallback = Tier::new();
        let stack = Stack::new(primary.clone(), fallback.clone());
        (primary, fallback, stack)
    }

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        futures::executor::block_on(f)
    }

    #[test]
    fn primary_hit_skips_fallback() -> Result<()> {
        block_on(async {
            let (primary, fallback, stack) = tiers();
            primary.seed("k".to_string(), 1);

            assert_eq!(stack.get(&"k".to_string()).await?, Some(1));
            assert!(fallback.operations().is_empty());
            Ok(())
        })
    }

    #[test]
    fn fallback_hit_backfills_primary_without_ttl() -> Result<()> {
        block_on(async {
            let (primary, fallback, stack) = tiers();
            fallback.seed("k".to_string(), 2);

            assert_eq!(stack.get(&"k".to_string()).await?, Some(2));
            assert_eq!(primary.peek(&"k".to_string()), Some(2));
            assert_eq!(primary.ttl_of(&"k".to_string()), Some(None));
            Ok(())
        })
    }

    #[test]
    fn miss_everywhere_writes_nothing() -> Result<()> {
        block_on(async {
            let (primary, _fallback, stack) = tiers();

            assert_eq!(stack.get(&"k".to_string()).await?, None);
            assert_eq!(primary.operations(), vec![StoreOp::Get("k".to_string())]);
            Ok(())
        })
    }

    #[test]
    fn get_many_asks_fallback_only_for_missing_keys() -> Result<()> {
        block_on(async {
            let (primary, fallback, stack) = tiers();
            primary.seed("a".to_string(), 1);
            fallback.seed("b".to_string(), 2);

            let found = stack.get_many(&["a".to_string(), "b".to_string(), "c".to_string()]).await?;

            assert_eq!(found["a"], Some(1));
            assert_eq!(found["b"], Some(2));
            assert_eq!(found["c"], None);

            assert_eq!(fallback.operations(), vec![StoreOp::GetMany(vec!["b".to_string(), "c".to_string()])]);

            assert!(primary.operations().contains(&StoreOp::SetMany {
                values: HashMap::from([("b".to_string(), 2)]),
                ttl: None,
            }));
            Ok(())
        })
    }

    #[test]
    fn writes_reach_both_tiers() -> Result<()> {
        block_on(async {
            let (primary, fallback, stack) = tiers();

            assert!(stack.set(&"k".to_string(), 1, Some(Ttl::from_secs(9))).await?);
            assert!(stack.set_many(HashMap::from([("m".to_string(), 2)]), None).await?);

            assert_eq!(primary.peek(&"k".to_string()), Some(1));
            assert_eq!(fallback.peek(&"k".to_string()), Some(1));
            assert_eq!(fallback.ttl_of(&"k".to_string()), Some(Some(Ttl::from_secs(9))));
            assert_eq!(primary.peek(&"m".to_string()), Some(2));
            assert_eq!(fallback.peek(&"m".to_string()), Some(2));
            Ok(())
        })
    }

    #[test]
    fn deletes_reach_both_tiers() -> Result<()> {
        block_on(async {
            let (primary, fallback, stack) = tiers();
            primary.seed("k".to_string(), 1);
            fallback.seed("k".to_string(), 1);

            assert!(stack.delete(&"k".to_string()).await?);
            assert!(!primary.contains_key(&"k".to_string()));
            assert!(!fallback.contains_key(&"k".to_string()));

            assert!(stack.clear().await?);
            assert!(stack.delete_many(&["x".to_string()]).await?);
            Ok(())
        })
    }

    #[test]
    fn has_checks_either_tier() -> Result<()> {
        block_on(async {
            let (_primary, fallback, stack) = tiers();
            assert!(!stack.has(&"k".to_string()).await?);

            fallback.seed("k".to_string(), 1);
            assert!(stack.has(&"k".to_string()).await?);
            Ok(())
        })
    }

    #[test]
    fn tier_failure_propagates() {
        block_on(async {
            let (_primary, fallback, stack) = tiers();
            fallback.fail_when(|op| matches!(op, StoreOp::Set { .. }));

            let err = stack.set(&"k".to_string(), 1, None).await.expect_err("fallback failure should surface");
            assert_eq!(err.kind(), ErrorKind::Store);
        });
    }

    #[test]
    fn stacks_nest() -> Result<()> {
        block_on(async {
            let l1 = Tier::new();
            let l2 = Tier::new();
            let l3 = Tier::new();
            l3.seed("k".to_string(), 3);
            let stack = Stack::new(l1.clone(), Stack::new(l2.clone(), l3));

            assert_eq!(stack.get(&"k".to_string()).await?, Some(3));
            assert_eq!(l1.peek(&"k".to_string()), Some(3));
            assert_eq!(l2.peek(&"k".to_string()), Some(3));
            Ok(())
        })
    }
}
