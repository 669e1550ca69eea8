// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The freshness envelope stored for every cached value.

use bytes::Bytes;
use freshet_tier::{Error, Result};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tick::Clock;

/// A cached value together with the moment it was produced and how long it stays fresh.
///
/// Items are immutable: extending one yields a new item and leaves the original untouched.
/// An item expires at `created_at + ttl + extension` and is stale from that second on.
///
/// # Examples
///
/// ```
/// use freshet::CacheItem;
///
/// let item = CacheItem::new("value", 1_000, 60);
/// assert!(!item.is_stale_at(1_059));
/// assert!(item.is_stale_at(1_060));
///
/// let extended = item.extend_by_seconds(30);
/// assert_eq!(extended.expires_at(), 1_090);
/// assert_eq!(item.extension(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheItem<V> {
    value: V,
    created_at: u64,
    ttl: u64,
    #[serde(default)]
    extension: u64,
}

impl<V> CacheItem<V> {
    /// Creates an item with no extension.
    ///
    /// `created_at` is in unix seconds and `ttl` is the base freshness window in seconds.
    #[must_use]
    pub fn new(value: V, created_at: u64, ttl: u64) -> Self {
        Self::with_extension(value, created_at, ttl, 0)
    }

    /// Creates an item with an explicit extension.
    #[must_use]
    pub fn with_extension(value: V, created_at: u64, ttl: u64, extension: u64) -> Self {
        Self {
            value,
            created_at,
            ttl,
            extension,
        }
    }

    /// Returns a reference to the cached value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the item and returns the cached value.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Creation time in unix seconds.
    #[must_use]
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Base ttl in seconds.
    #[must_use]
    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    /// Seconds added on top of the base ttl.
    #[must_use]
    pub fn extension(&self) -> u64 {
        self.extension
    }

    /// The unix second at which the item becomes stale.
    #[must_use]
    pub fn expires_at(&self) -> u64 {
        self.created_at.saturating_add(self.ttl).saturating_add(self.extension)
    }

    /// Returns `true` if the item is stale at the given unix second.
    #[must_use]
    pub fn is_stale_at(&self, now: u64) -> bool {
        now >= self.expires_at()
    }

    /// Returns `true` if the item is stale according to `clock`.
    #[must_use]
    pub fn is_stale(&self, clock: &Clock) -> bool {
        self.is_stale_at(unix_seconds(clock))
    }

    /// Returns a copy whose extension is increased by `seconds`.
    #[must_use]
    pub fn extend_by_seconds(&self, seconds: u64) -> Self
    where
        V: Clone,
    {
        Self {
            value: self.value.clone(),
            created_at: self.created_at,
            ttl: self.ttl,
            extension: self.extension.saturating_add(seconds),
        }
    }

    /// Returns a copy extended by `floor(ttl * fraction)` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](freshet_tier::ErrorKind::InvalidArgument) if `fraction` is not within `[0, 1]`.
    pub fn extend_by_ttl_fraction(&self, fraction: f64) -> Result<Self>
    where
        V: Clone,
    {
        validate_fraction(fraction)?;
        Ok(self.extend_by_seconds(fraction_of(self.ttl, fraction)))
    }
}

impl<V: Serialize> CacheItem<V> {
    pub(crate) fn encode(&self) -> Result<Bytes> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(Error::serialization)
    }
}

impl<V: DeserializeOwned> CacheItem<V> {
    pub(crate) fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(Error::invalid_cached_value)
    }
}

/// Fails with [`ErrorKind::InvalidArgument`](freshet_tier::ErrorKind::InvalidArgument) unless `fraction` lies within `[0, 1]`.
pub(crate) fn validate_fraction(fraction: f64) -> Result<()> {
    if (0.0..=1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!("ttl fraction must be within [0, 1], got {fraction}")))
    }
}

#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "fraction is within [0, 1], so the product never exceeds ttl"
)]
fn fraction_of(ttl: u64, fraction: f64) -> u64 {
    (ttl as f64 * fraction).floor() as u64
}

/// Current time of `clock` in whole unix seconds; times before the epoch read as zero.
pub(crate) fn unix_seconds(clock: &Clock) -> u64 {
    clock
        .system_time()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |since_epoch| since_epoch.as_secs())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use freshet_tier::ErrorKind;

    use super::*;

    fn item() -> CacheItem<&'static str> {
        CacheItem::new("v", 1_000, 500)
    }

    #[test]
    fn staleness_boundary_is_inclusive() {
        let item = item();
        assert!(!item.is_stale_at(1_499));
        assert!(item.is_stale_at(1_500));
        assert!(item.is_stale_at(1_501));
    }

    #[test]
    fn extensions_accumulate() {
        let item = item().extend_by_seconds(10).extend_by_seconds(20);
        assert_eq!(item.extension(), 30);
        assert_eq!(item.expires_at(), 1_530);
    }

    #[test]
    fn extend_by_zero_keeps_staleness() {
        let item = item();
        let extended = item.extend_by_seconds(0);
        assert_eq!(extended, item);
        assert_eq!(extended.is_stale_at(1_500), item.is_stale_at(1_500));
    }

    #[test]
    fn extend_leaves_original_untouched() {
        let item = item();
        let _extended = item.extend_by_seconds(100);
        assert_eq!(item.extension(), 0);
    }

    #[test]
    fn ttl_fraction_truncates() {
        let item = CacheItem::new("v", 0, 7);
        assert_eq!(item.extend_by_ttl_fraction(0.5).expect("valid fraction").extension(), 3);
    }

    #[test]
    fn ttl_fraction_boundaries_are_valid() {
        let item = item();
        assert_eq!(item.extend_by_ttl_fraction(0.0).expect("zero is valid").extension(), 0);
        assert_eq!(item.extend_by_ttl_fraction(1.0).expect("one is valid").extension(), 500);
    }

    #[test]
    fn ttl_fraction_out_of_range_is_rejected() {
        for fraction in [-0.1, 1.000_001, f64::NAN, f64::INFINITY] {
            let err = item().extend_by_ttl_fraction(fraction).expect_err("fraction should be rejected");
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn expires_at_saturates() {
        let item = CacheItem::with_extension((), u64::MAX - 1, 10, 10);
        assert_eq!(item.expires_at(), u64::MAX);
    }

    #[test]
    fn is_stale_reads_clock() {
        let clock = Clock::new_frozen_at(SystemTime::UNIX_EPOCH + Duration::from_secs(1_500));
        assert!(item().is_stale(&clock));

        let clock = Clock::new_frozen_at(SystemTime::UNIX_EPOCH + Duration::from_secs(1_499));
        assert!(!item().is_stale(&clock));
    }

    #[test]
    fn envelope_encoding_is_json() {
        let item = CacheItem::with_extension("v".to_string(), 1, 2, 3);
        let bytes = item.encode().expect("encode failed");
        assert_eq!(&bytes[..], br#"{"value":"v","created_at":1,"ttl":2,"extension":3}"#);
        assert_eq!(CacheItem::<String>::decode(&bytes).expect("decode failed"), item);
    }

    #[test]
    fn missing_extension_decodes_as_zero() {
        let item = CacheItem::<i32>::decode(br#"{"value":1,"created_at":1,"ttl":2}"#).expect("decode failed");
        assert_eq!(item.extension(), 0);
    }

    #[test]
    fn foreign_payloads_are_invalid() {
        for payload in [&b"not json"[..], br#""plain string""#, br#"{"value":1}"#, br#"{"value":1,"created_at":1,"ttl":2,"extra":0}"#] {
            let err = CacheItem::<i32>::decode(payload).expect_err("payload should be rejected");
            assert_eq!(err.kind(), ErrorKind::InvalidCachedValue);
        }
    }

    #[test]
    fn unencodable_values_fail_with_serialization() {
        let value = std::collections::HashMap::from([(vec![1_u8], 1)]);
        let err = CacheItem::new(value, 1, 2).encode().expect_err("map keys must be strings in json");
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }
}
