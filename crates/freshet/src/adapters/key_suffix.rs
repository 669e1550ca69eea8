// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;

use freshet_tier::{CacheStore, Result, Ttl};

/// Namespaces every key by appending `:{suffix}` before it reaches the inner store.
///
/// Useful for versioning cached data: bumping the suffix makes old entries unreachable
/// without clearing the store. Results of batched reads are keyed by the caller's keys.
/// `clear` is forwarded unchanged and therefore clears every namespace.
///
/// # Examples
///
/// ```
/// use freshet::adapters::KeySuffix;
/// use freshet::MemoryStore;
/// use freshet_tier::CacheStore;
/// # futures::executor::block_on(async {
///
/// let inner = MemoryStore::<String, i32>::new();
/// let store = KeySuffix::new(inner.clone(), "v2");
///
/// store.set(&"answer".to_string(), 42, None).await?;
/// assert_eq!(inner.get(&"answer:v2".to_string()).await?, Some(42));
/// # Ok::<(), freshet_tier::Error>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct KeySuffix<S> {
    inner: S,
    suffix: String,
}

impl<S> KeySuffix<S> {
    /// Wraps `inner`, suffixing every key with `:{suffix}`.
    #[must_use]
    pub fn new(inner: S, suffix: impl AsRef<str>) -> Self {
        Self {
            inner,
            suffix: format!(":{}", suffix.as_ref()),
        }
    }

    /// Returns a reference to the inner store.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn suffixed(&self, key: &str) -> String {
        let mut suffixed = String::with_capacity(key.len() + self.suffix.len());
        suffixed.push_str(key);
        suffixed.push_str(&self.suffix);
        suffixed
    }

    fn suffixed_all(&self, keys: &[String]) -> Vec<String> {
        keys.iter().map(|key| self.suffixed(key)).collect()
    }
}

impl<V, S> CacheStore<String, V> for KeySuffix<S>
where
    S: CacheStore<String, V>,
    V: Send,
{
    async fn get(&self, key: &String) -> Result<Option<V>> {
        self.inner.get(&self.suffixed(key)).await
    }

    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, Option<V>>> {
        let found = self.inner.get_many(&self.suffixed_all(keys)).await?;
        Ok(found
            .into_iter()
            .map(|(key, value)| match key.strip_suffix(self.suffix.as_str()) {
                Some(original) => (original.to_owned(), value),
                None => (key, value),
            })
            .collect())
    }

    async fn set(&self, key: &String, value: V, ttl: Option<Ttl>) -> Result<bool> {
        self.inner.set(&self.suffixed(key), value, ttl).await
    }

    async fn set_many(&self, values: HashMap<String, V>, ttl: Option<Ttl>) -> Result<bool> {
        let values = values.into_iter().map(|(key, value)| (self.suffixed(&key), value)).collect();
        self.inner.set_many(values, ttl).await
    }

    async fn has(&self, key: &String) -> Result<bool> {
        self.inner.has(&self.suffixed(key)).await
    }

    async fn delete(&self, key: &String) -> Result<bool> {
        self.inner.delete(&self.suffixed(key)).await
    }

    async fn delete_many(&self, keys: &[String]) -> Result<bool> {
        self.inner.delete_many(&self.suffixed_all(keys)).await
    }

    async fn clear(&self) -> Result<bool> {
        self.inner.clear().await
    }

    fn len(&self) -> Option<u64> {
        self.inner.len()
    }
}
